use bytes::Bytes;

use crate::config::CodecConfig;
use crate::disguise::Restored;
use crate::telemetry::TelemetrySnapshot;

/// Output of `FileCodec::encode`.
#[derive(Debug, Clone)]
pub struct Encoded {
    /// Outward container name (disguise name, or source name with `.cph`).
    pub file_name: String,
    pub data: Bytes,
    pub telemetry: TelemetrySnapshot,
}

/// Output of `FileCodec::decode`.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub restored: Restored,
    pub telemetry: TelemetrySnapshot,
}

/// Password-based file codec. Cheap to clone; holds configuration only.
#[derive(Debug, Clone, Default)]
pub struct FileCodec {
    pub(crate) config: CodecConfig,
}

impl FileCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }
}
