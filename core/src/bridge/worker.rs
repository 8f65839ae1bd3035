//! bridge/worker.rs
//! Single-use crypto worker.
//!
//! One thread per call: it takes exactly one request, answers once and exits.
//! The caller owns the worker and tears it down after the exchange whatever the
//! outcome, so no state carries over between unrelated calls.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{bounded, Receiver, RecvTimeoutError, Sender};
use tracing::{debug, warn};

use crate::bridge::error::BridgeError;
use crate::bridge::types::{CryptoRequest, CryptoResponse, CryptoResponseBody, CryptoResult, RequestId};
use crate::codec::FileCodec;
use crate::types::{Action, TransferableFile};

/// Handle to a running one-shot worker.
pub struct CryptoWorker {
    tx: Option<Sender<CryptoRequest>>,
    rx: Receiver<CryptoResponse>,
    handle: Option<JoinHandle<()>>,
}

impl CryptoWorker {
    /// Start a worker thread running `codec`.
    pub fn spawn(codec: FileCodec) -> Result<Self, BridgeError> {
        Self::spawn_with(move |request| CryptoResponse {
            id: request.id,
            body: handle(&codec, request),
        })
    }

    /// Start a worker thread whose body answers the request with `handler`.
    pub fn spawn_with<H>(handler: H) -> Result<Self, BridgeError>
    where
        H: FnOnce(CryptoRequest) -> CryptoResponse + Send + 'static,
    {
        let (req_tx, req_rx) = bounded::<CryptoRequest>(1);
        let (res_tx, res_rx) = bounded::<CryptoResponse>(1);

        let handle = thread::Builder::new()
            .name("crypto-worker".into())
            .spawn(move || serve_one(handler, req_rx, res_tx))
            .map_err(|e| BridgeError::Transport(format!("failed to spawn crypto worker: {e}")))?;

        Ok(Self { tx: Some(req_tx), rx: res_rx, handle: Some(handle) })
    }

    /// Send `request` and wait up to `timeout` for the matching response.
    ///
    /// Consumes the worker. On timeout the thread is detached: it finishes on its
    /// own and its late answer is dropped.
    pub fn call(mut self, request: CryptoRequest, timeout: Duration) -> Result<CryptoResult, BridgeError> {
        let id = request.id;
        let tx = self
            .tx
            .take()
            .ok_or_else(|| BridgeError::Transport("crypto worker already used".into()))?;
        tx.send(request)
            .map_err(|_| BridgeError::Transport("crypto worker exited before the request".into()))?;
        drop(tx);

        let result = match self.rx.recv_timeout(timeout) {
            Ok(response) => accept(id, response),
            Err(RecvTimeoutError::Timeout) => {
                warn!(id, ?timeout, "crypto worker timed out");
                Err(BridgeError::Timeout(timeout))
            }
            Err(RecvTimeoutError::Disconnected) => {
                Err(BridgeError::Transport("crypto worker terminated without a response".into()))
            }
        };

        self.terminate(result.is_ok());
        result
    }

    /// Drop the channels; join only if the worker is known to be done.
    fn terminate(&mut self, join: bool) {
        self.tx = None;
        match self.handle.take() {
            Some(handle) if join => {
                if handle.join().is_err() {
                    warn!("crypto worker panicked during teardown");
                }
            }
            // Detached; the thread exits once the codec returns.
            _ => {}
        }
        debug!("crypto worker terminated");
    }
}

fn accept(id: RequestId, response: CryptoResponse) -> Result<CryptoResult, BridgeError> {
    if response.id != id {
        return Err(BridgeError::Transport(format!(
            "response id {} does not match request {}",
            response.id, id
        )));
    }
    match response.body {
        CryptoResponseBody::Result(result) => Ok(result),
        CryptoResponseBody::Error { kind, message } => Err(BridgeError::Remote { kind, message }),
    }
}

/// Worker body: at most one request, then exit.
fn serve_one<H>(handler: H, rx: Receiver<CryptoRequest>, tx: Sender<CryptoResponse>)
where
    H: FnOnce(CryptoRequest) -> CryptoResponse,
{
    let Ok(request) = rx.recv() else {
        debug!("crypto worker closed before receiving a request");
        return;
    };
    let id = request.id;
    debug!(id, action = %request.action, "crypto worker processing");

    // Unwinding drops `tx`, which the caller sees as a disconnect.
    let response = match catch_unwind(AssertUnwindSafe(|| handler(request))) {
        Ok(response) => response,
        Err(_) => {
            warn!(id, "crypto worker panicked");
            return;
        }
    };

    if tx.send(response).is_err() {
        debug!(id, "crypto response dropped, caller gone");
    }
}

fn handle(codec: &FileCodec, request: CryptoRequest) -> CryptoResponseBody {
    let outcome = match request.action {
        Action::Encode => codec
            .encode(&request.source, &request.password, request.disguise.as_ref())
            .map(|e| CryptoResult::Encoded { file_name: e.file_name, data: e.data }),
        Action::Decode => codec
            .decode(&request.source, &request.password)
            .map(|d| CryptoResult::Restored(d.restored)),
    };

    match outcome {
        Ok(result) => CryptoResponseBody::Result(result),
        Err(e) => {
            debug!(error = %e, kind = %e.kind(), "crypto request failed");
            CryptoResponseBody::Error { kind: e.kind(), message: e.to_string() }
        }
    }
}

/// Issues correlation ids and runs each call on a fresh worker.
#[derive(Debug, Default)]
pub struct CryptoBridge {
    codec: FileCodec,
    next_id: AtomicU64,
}

impl CryptoBridge {
    pub fn new(codec: FileCodec) -> Self {
        Self { codec, next_id: AtomicU64::new(1) }
    }

    pub fn codec(&self) -> &FileCodec {
        &self.codec
    }

    /// One encode or decode round trip, bounded by `timeout`.
    pub fn call(
        &self,
        action: Action,
        source: TransferableFile,
        password: &str,
        disguise: Option<TransferableFile>,
        timeout: Duration,
    ) -> Result<CryptoResult, BridgeError> {
        let request = CryptoRequest {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            action,
            source,
            password: password.to_string(),
            disguise: if action == Action::Encode { disguise } else { None },
        };
        CryptoWorker::spawn(self.codec.clone())?.call(request, timeout)
    }
}
