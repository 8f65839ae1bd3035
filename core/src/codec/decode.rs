//! codec/decode.rs
//! Container bytes -> restored file.
//!
//! Order matters:
//! 1. parse the tail (format errors surface before any key work)
//! 2. derive keys from the stored salt
//! 3. check the HMAC in constant time
//! 4. open the AEAD with the stored version as AAD

use tracing::debug;
use zeroize::Zeroizing;

use crate::codec::types::{Decoded, FileCodec};
use crate::crypto::{derive_keys, verify_hmac, AeadImpl};
use crate::disguise::{decode_payload, restore, Restored};
use crate::envelope::{decode_envelope, TAIL_LEN};
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::{CodecError, TransferableFile};

/// Decrypted payload plus where it came from.
pub(crate) struct Opened {
    pub payload: Zeroizing<Vec<u8>>,
    pub prefix_len: usize,
    pub ciphertext_len: usize,
}

impl FileCodec {
    /// Open a container produced by `encode`, with or without a disguise prefix.
    ///
    /// A wrong password and a tampered file both fail with the same
    /// `ErrorKind::Authentication`.
    pub fn decode(&self, container: &TransferableFile, password: &str) -> Result<Decoded, CodecError> {
        let mut timer = TelemetryTimer::new();
        let mut counters = TelemetryCounters::default();

        let opened = self.open(&container.data, password, &mut timer)?;
        let view = timer.time(Stage::Payload, || decode_payload(&opened.payload))?;
        counters.add_envelope(view.data.len(), opened.payload.len(), opened.ciphertext_len, TAIL_LEN);
        counters.add_disguise(opened.prefix_len);

        let restored: Restored = restore(view, &container.name, opened.prefix_len > 0);

        timer.finish();
        debug!(
            file = %container.name,
            disguised = restored.was_disguised,
            bytes = restored.data.len(),
            elapsed_ms = timer.elapsed().as_millis() as u64,
            "file decoded"
        );

        Ok(Decoded {
            restored,
            telemetry: TelemetrySnapshot::from(&counters, &timer),
        })
    }

    /// Parse, authenticate and decrypt; the payload is not interpreted.
    pub(crate) fn open(
        &self,
        buf: &[u8],
        password: &str,
        timer: &mut TelemetryTimer,
    ) -> Result<Opened, CodecError> {
        let parsed = timer.time(Stage::Validate, || decode_envelope(buf))?;
        let (prefix, ciphertext) = parsed.split_body()?;

        let keys = timer.time(Stage::Derive, || {
            derive_keys(password, &parsed.salt, self.config.kdf_iterations)
        })?;

        timer.time(Stage::Authenticate, || {
            verify_hmac(ciphertext, &parsed.iv, keys.mac_key(), &parsed.hmac)
        })?;

        let payload = timer.time(Stage::Decrypt, || {
            AeadImpl::new(keys.cipher_key())?.open(&parsed.iv, &parsed.version.to_bytes(), ciphertext)
        })?;

        Ok(Opened {
            payload: Zeroizing::new(payload),
            prefix_len: prefix.len(),
            ciphertext_len: ciphertext.len(),
        })
    }
}
