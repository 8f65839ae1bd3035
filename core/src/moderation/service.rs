//! moderation/service.rs
//! Slot-keyed task registry in front of the moderation worker.
//!
//! Threads:
//! - caller: `start` / `abort` / `wait` / `dispose`
//! - one short-lived prep thread per task (decode + resize)
//! - the worker (classification)
//! - a dispatcher resolving tasks from worker responses
//!
//! All bookkeeping lives in one `Registry` behind a mutex. Every resolution goes
//! through `TaskHandle::resolve`, which only takes the first result.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam::channel::{unbounded, Receiver, Sender};
use parking_lot::{Condvar, Mutex};
use tracing::{debug, warn};

use crate::config::ModerationConfig;
use crate::moderation::classifier::{ClassificationRule, Classifier};
use crate::moderation::image::{fit_image, ImageDecoder};
use crate::moderation::types::{
    ModerationError, ModerationRequest, ModerationResponse, ModerationResult, ModerationSlot, TaskId,
};
use crate::moderation::worker::ModerationWorker;
use crate::types::TransferableFile;

const WORKER_GONE: &str = "Moderation worker terminated";

/// Single-resolution completion handle shared by the registry and waiters.
#[derive(Clone)]
pub struct TaskHandle {
    id: TaskId,
    cell: Arc<TaskCell>,
}

#[derive(Default)]
struct TaskCell {
    result: Mutex<Option<ModerationResult>>,
    ready: Condvar,
}

impl TaskHandle {
    fn new(id: TaskId) -> Self {
        Self { id, cell: Arc::default() }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Store `result` unless one is already set. Returns whether it was stored.
    pub fn resolve(&self, result: ModerationResult) -> bool {
        let mut slot = self.cell.result.lock();
        if slot.is_some() {
            return false;
        }
        *slot = Some(result);
        self.cell.ready.notify_all();
        true
    }

    pub fn peek(&self) -> Option<ModerationResult> {
        self.cell.result.lock().clone()
    }

    pub fn wait(&self) -> ModerationResult {
        let mut slot = self.cell.result.lock();
        loop {
            if let Some(result) = slot.as_ref() {
                return result.clone();
            }
            self.cell.ready.wait(&mut slot);
        }
    }

    /// `None` if `deadline` passes first.
    pub fn wait_until(&self, deadline: Instant) -> Option<ModerationResult> {
        let mut slot = self.cell.result.lock();
        loop {
            if let Some(result) = slot.as_ref() {
                return Some(result.clone());
            }
            if self.cell.ready.wait_until(&mut slot, deadline).timed_out() {
                return slot.clone();
            }
        }
    }
}

struct TaskEntry {
    id: TaskId,
    handle: TaskHandle,
    /// Bitmap handed to the worker and no response yet.
    in_flight: bool,
}

#[derive(Default)]
struct Registry {
    tasks: HashMap<ModerationSlot, TaskEntry>,
    counter: TaskId,
    disposed: bool,
    requests: Option<Sender<ModerationRequest>>,
}

impl Registry {
    fn next_id(&mut self) -> TaskId {
        let id = self.counter;
        self.counter += 1;
        id
    }

    fn slot_of(&self, id: TaskId) -> Option<ModerationSlot> {
        self.tasks.iter().find(|(_, t)| t.id == id).map(|(slot, _)| *slot)
    }

    fn is_current(&self, slot: ModerationSlot, id: TaskId) -> bool {
        !self.disposed && self.tasks.get(&slot).is_some_and(|t| t.id == id)
    }

    /// Resolve the slot's task as aborted and tell the worker if it holds the bitmap.
    fn abort_slot(&mut self, slot: ModerationSlot) {
        let Some(entry) = self.tasks.remove(&slot) else {
            return;
        };
        entry.handle.resolve(ModerationResult::Aborted);
        if entry.in_flight {
            if let Some(tx) = &self.requests {
                // Worker already gone: nothing left to stop.
                let _ = tx.send(ModerationRequest::Abort { id: entry.id });
            }
        }
        debug!(%slot, id = entry.id, "moderation task aborted");
    }

    fn fail(&mut self, slot: ModerationSlot, error: String) {
        if let Some(entry) = self.tasks.remove(&slot) {
            warn!(%slot, id = entry.id, %error, "moderation task failed");
            entry.handle.resolve(ModerationResult::Error(error));
        }
    }

    /// Resolve every task with `error` and forget them.
    fn fail_all(&mut self, error: &str) {
        for (slot, entry) in self.tasks.drain() {
            warn!(%slot, id = entry.id, %error, "moderation task failed");
            entry.handle.resolve(ModerationResult::Error(error.to_string()));
        }
    }
}

struct Shared {
    registry: Mutex<Registry>,
    decoder: Box<dyn ImageDecoder>,
    max_image_size: u32,
}

/// Runs at most one classification per slot on a long-lived worker.
///
/// Dropping the service disposes it.
pub struct ModerationService {
    shared: Arc<Shared>,
}

impl ModerationService {
    /// Start the worker and dispatcher threads.
    pub fn spawn(
        classifier: impl Classifier + 'static,
        decoder: impl ImageDecoder + 'static,
        config: &ModerationConfig,
    ) -> Result<Self, ModerationError> {
        let (req_tx, req_rx) = unbounded::<ModerationRequest>();
        let (res_tx, res_rx) = unbounded::<ModerationResponse>();

        let shared = Arc::new(Shared {
            registry: Mutex::new(Registry { requests: Some(req_tx), ..Registry::default() }),
            decoder: Box::new(decoder),
            max_image_size: config.max_image_size,
        });

        ModerationWorker::new(Box::new(classifier), ClassificationRule::from(config))
            .run(req_rx, res_tx)
            .map_err(|e| ModerationError::Spawn(e.to_string()))?;

        let dispatcher = Arc::clone(&shared);
        thread::Builder::new()
            .name("moderation-dispatch".into())
            .spawn(move || dispatch(dispatcher, res_rx))
            .map_err(|e| ModerationError::Spawn(e.to_string()))?;

        Ok(Self { shared })
    }

    /// Begin classifying `file` in `slot`, aborting the slot's previous task.
    ///
    /// Returns the new task's handle, or `None` once disposed.
    pub fn start(&self, slot: ModerationSlot, file: TransferableFile) -> Option<TaskHandle> {
        let mut reg = self.shared.registry.lock();
        if reg.disposed {
            return None;
        }

        reg.abort_slot(slot);
        let id = reg.next_id();
        let handle = TaskHandle::new(id);
        reg.tasks.insert(slot, TaskEntry { id, handle: handle.clone(), in_flight: false });
        drop(reg);

        debug!(%slot, id, file = %file.name, "moderation task started");

        let shared = Arc::clone(&self.shared);
        let spawned = thread::Builder::new()
            .name("moderation-prep".into())
            .spawn(move || prepare(shared, slot, id, file));

        if let Err(e) = spawned {
            let mut reg = self.shared.registry.lock();
            if reg.is_current(slot, id) {
                reg.fail(slot, e.to_string());
            }
        }
        Some(handle)
    }

    /// Abort the slot's task, if any. No-op for idle slots and after disposal.
    pub fn abort(&self, slot: ModerationSlot) {
        let mut reg = self.shared.registry.lock();
        if reg.disposed {
            return;
        }
        reg.abort_slot(slot);
    }

    /// Completion handle of the slot's current task.
    pub fn handle(&self, slot: ModerationSlot) -> Option<TaskHandle> {
        self.shared.registry.lock().tasks.get(&slot).map(|t| t.handle.clone())
    }

    /// Block until every slot in `slots` is resolved.
    pub fn wait(
        &self,
        slots: &[ModerationSlot],
    ) -> Result<HashMap<ModerationSlot, ModerationResult>, ModerationError> {
        let handles = self.handles(slots)?;
        Ok(handles.into_iter().map(|(slot, h)| (slot, h.wait())).collect())
    }

    /// `wait` bounded by `timeout`. Tasks keep running after a timeout.
    pub fn wait_timeout(
        &self,
        slots: &[ModerationSlot],
        timeout: Duration,
    ) -> Result<HashMap<ModerationSlot, ModerationResult>, ModerationError> {
        let deadline = Instant::now() + timeout;
        let handles = self.handles(slots)?;
        handles
            .into_iter()
            .map(|(slot, h)| h.wait_until(deadline).map(|r| (slot, r)).ok_or(ModerationError::Timeout))
            .collect()
    }

    fn handles(&self, slots: &[ModerationSlot]) -> Result<Vec<(ModerationSlot, TaskHandle)>, ModerationError> {
        if slots.is_empty() {
            return Err(ModerationError::NoSlots);
        }
        let reg = self.shared.registry.lock();
        slots
            .iter()
            .map(|slot| {
                reg.tasks
                    .get(slot)
                    .map(|t| (*slot, t.handle.clone()))
                    .ok_or(ModerationError::NotStarted(*slot))
            })
            .collect()
    }

    /// Abort everything and stop the worker. Idempotent.
    pub fn dispose(&self) {
        let mut reg = self.shared.registry.lock();
        if reg.disposed {
            return;
        }
        let slots: Vec<ModerationSlot> = reg.tasks.keys().copied().collect();
        for slot in slots {
            reg.abort_slot(slot);
        }
        reg.disposed = true;
        // Closing the request channel ends the worker, which ends the dispatcher.
        reg.requests = None;
        debug!("moderation service disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.registry.lock().disposed
    }
}

impl Drop for ModerationService {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Decode and resize off the caller thread, then hand the bitmap to the worker.
fn prepare(shared: Arc<Shared>, slot: ModerationSlot, id: TaskId, file: TransferableFile) {
    let prepared = shared
        .decoder
        .decode(&file)
        .map(|bitmap| fit_image(&bitmap, shared.max_image_size));
    drop(file);

    let mut reg = shared.registry.lock();
    if !reg.is_current(slot, id) {
        // Superseded, aborted or disposed meanwhile; the bitmap is dropped here.
        debug!(%slot, id, "discarding bitmap of stale moderation task");
        return;
    }

    let bitmap = match prepared {
        Ok(bitmap) => bitmap,
        Err(e) => return reg.fail(slot, e.to_string()),
    };

    let sent = match &reg.requests {
        Some(tx) => tx.send(ModerationRequest::Classify { id, bitmap }).is_ok(),
        None => false,
    };
    if !sent {
        return reg.fail(slot, WORKER_GONE.to_string());
    }
    if let Some(entry) = reg.tasks.get_mut(&slot) {
        entry.in_flight = true;
    }
}

/// Resolve tasks from worker responses until the worker goes away.
fn dispatch(shared: Arc<Shared>, rx: Receiver<ModerationResponse>) {
    while let Ok(response) = rx.recv() {
        let mut reg = shared.registry.lock();
        match response {
            ModerationResponse::Result { id, safe } => {
                let Some(slot) = reg.slot_of(id) else {
                    debug!(id, "late moderation result ignored");
                    continue;
                };
                if let Some(entry) = reg.tasks.get_mut(&slot) {
                    entry.in_flight = false;
                    let result = if safe { ModerationResult::Safe } else { ModerationResult::Unsafe };
                    debug!(%slot, id, ?result, "moderation task resolved");
                    entry.handle.resolve(result);
                }
            }
            ModerationResponse::TaskError { id, error } => match reg.slot_of(id) {
                Some(slot) => reg.fail(slot, error),
                None => debug!(id, "late moderation error ignored"),
            },
            ModerationResponse::FatalError { error } => {
                reg.fail_all(&error);
                reg.requests = None;
            }
        }
    }

    let mut reg = shared.registry.lock();
    if !reg.disposed {
        reg.fail_all(WORKER_GONE);
        reg.requests = None;
    }
    debug!("moderation dispatcher stopped");
}
