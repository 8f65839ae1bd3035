//! codec/verify.rs
//! Round-trip check run on every encode.

use tracing::warn;

use crate::codec::types::FileCodec;
use crate::disguise::decode_payload;
use crate::telemetry::TelemetryTimer;

impl FileCodec {
    /// Decode `encoded` with `password` and compare the data to `original` byte-for-byte.
    ///
    /// `false` means the codec produced output it cannot read back. That is a bug in
    /// the codec, not a user error, so the cause is only logged.
    pub fn check_back(&self, original: &[u8], encoded: &[u8], password: &str) -> bool {
        let mut timer = TelemetryTimer::new();
        let opened = match self.open(encoded, password, &mut timer) {
            Ok(opened) => opened,
            Err(e) => {
                warn!(error = %e, "self-verification could not open encoded output");
                return false;
            }
        };

        match decode_payload(&opened.payload) {
            Ok(view) => view.data == original,
            Err(e) => {
                warn!(error = %e, "self-verification could not parse payload");
                false
            }
        }
    }
}
