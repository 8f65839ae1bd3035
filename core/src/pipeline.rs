//! End-to-end processing of one encode or decode request.
//!
//! 1. password policy
//! 2. moderation on encode (unsafe blocks, anything else proceeds)
//! 3. crypto round trip on a one-shot worker, hard timeout
//! 4. output size policy
//! 5. pad to the minimum duration

use std::thread;
use std::time::Instant;

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::bridge::{BridgeError, CryptoBridge, CryptoResult};
use crate::codec::FileCodec;
use crate::config::{AppConfig, BridgeConfig, CodecPolicy, PolicyError};
use crate::moderation::{is_moderatable, ModerationResult, ModerationService, ModerationSlot};
use crate::types::{Action, ErrorKind, TransferableFile};
use crate::utils::join_with_and;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

impl ProcessError {
    /// Text shown to the user. Codec details stay in the logs.
    pub fn user_message(&self, action: Action) -> String {
        match self {
            ProcessError::Policy(e) => e.to_string(),
            ProcessError::Bridge(_) => match action {
                Action::Encode => "Check if the file is damaged or replace it with another one.".into(),
                Action::Decode => {
                    "Check that the password or key is correct and make sure the file is not damaged."
                        .into()
                }
            },
        }
    }

    /// Codec error kind, when the codec itself failed.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ProcessError::Policy(_) => Some(ErrorKind::Validation),
            ProcessError::Bridge(e) => e.remote_kind(),
        }
    }
}

/// A file ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedFile {
    pub file_name: String,
    pub data: Bytes,
    /// Decode only: host bytes preceded the envelope.
    pub was_disguised: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    Completed(ProcessedFile),
    /// Moderation flagged these slots as unsafe; nothing was encoded.
    Blocked(Vec<ModerationSlot>),
}

impl ProcessOutcome {
    /// User-facing reason for a blocked outcome.
    pub fn blocked_message(&self) -> Option<String> {
        let ProcessOutcome::Blocked(slots) = self else {
            return None;
        };
        let names: Vec<String> = slots.iter().map(ToString::to_string).collect();
        let what = match names.len() {
            0 => "files".to_string(),
            1 => format!("{} file", join_with_and(&names)),
            _ => format!("{} files", join_with_and(&names)),
        };
        Some(format!("Uploaded {what} must not contain inappropriate content."))
    }
}

/// Ties policy, moderation and the crypto bridge together.
pub struct Processor {
    bridge: CryptoBridge,
    policy: CodecPolicy,
    timeouts: BridgeConfig,
    moderation: Option<ModerationService>,
}

impl Processor {
    pub fn new(config: AppConfig, moderation: Option<ModerationService>) -> Self {
        Self {
            policy: config.codec.policy.clone(),
            bridge: CryptoBridge::new(FileCodec::new(config.codec)),
            timeouts: config.bridge,
            moderation,
        }
    }

    pub fn moderation(&self) -> Option<&ModerationService> {
        self.moderation.as_ref()
    }

    /// Start moderation for the files about to be encoded.
    ///
    /// Non-image files are not moderated. A non-image source or a non-image or
    /// missing disguise clears its slot so no earlier verdict applies.
    pub fn select(&self, source: &TransferableFile, disguise: Option<&TransferableFile>) {
        let Some(service) = &self.moderation else {
            return;
        };
        if is_moderatable(source) {
            service.start(ModerationSlot::Source, source.clone());
        } else {
            service.abort(ModerationSlot::Source);
        }
        match disguise {
            Some(d) if is_moderatable(d) => {
                service.start(ModerationSlot::Disguise, d.clone());
            }
            _ => service.abort(ModerationSlot::Disguise),
        }
    }

    pub fn process(
        &self,
        action: Action,
        source: TransferableFile,
        password: &str,
        disguise: Option<TransferableFile>,
    ) -> Result<ProcessOutcome, ProcessError> {
        let started = Instant::now();
        let outcome = self.run(action, source, password, disguise);

        let remaining = self.timeouts.min_duration.saturating_sub(started.elapsed());
        if !remaining.is_zero() {
            thread::sleep(remaining);
        }
        outcome
    }

    fn run(
        &self,
        action: Action,
        source: TransferableFile,
        password: &str,
        disguise: Option<TransferableFile>,
    ) -> Result<ProcessOutcome, ProcessError> {
        self.policy.validate_password(password)?;

        if action == Action::Encode {
            let blocked = self.moderate(disguise.is_some());
            if !blocked.is_empty() {
                info!(slots = ?blocked, "encode blocked by moderation");
                return Ok(ProcessOutcome::Blocked(blocked));
            }
        }

        let source_name = source.name.clone();
        let result = self
            .bridge
            .call(action, source, password, disguise, self.timeouts.crypto_timeout)
            .inspect_err(|e| warn!(%action, file = %source_name, error = %e, "crypto call failed"))?;

        self.policy.validate_output(action, result.data().len())?;

        let was_disguised = match &result {
            CryptoResult::Restored(r) => r.was_disguised,
            CryptoResult::Encoded { .. } => false,
        };
        let file = ProcessedFile {
            file_name: result.file_name(),
            data: result.data().clone(),
            was_disguised,
        };
        debug!(%action, file = %file.file_name, bytes = file.data.len(), "file processed");
        Ok(ProcessOutcome::Completed(file))
    }

    /// Slots classified unsafe. Slots without a task are not moderated; errors,
    /// aborts and timeouts are logged and let the encode proceed.
    fn moderate(&self, with_disguise: bool) -> Vec<ModerationSlot> {
        let Some(service) = &self.moderation else {
            return Vec::new();
        };

        let slots: &[ModerationSlot] = if with_disguise {
            &[ModerationSlot::Source, ModerationSlot::Disguise]
        } else {
            &[ModerationSlot::Source]
        };

        let deadline = Instant::now() + self.timeouts.moderation_timeout;
        let mut blocked = Vec::new();
        for &slot in slots {
            let Some(handle) = service.handle(slot) else {
                debug!(%slot, "slot not moderated");
                continue;
            };
            match handle.wait_until(deadline) {
                Some(ModerationResult::Unsafe) => blocked.push(slot),
                Some(ModerationResult::Error(error)) => {
                    warn!(%slot, %error, "moderation failed, proceeding")
                }
                Some(ModerationResult::Aborted) => warn!(%slot, "moderation aborted, proceeding"),
                Some(ModerationResult::Safe) => {}
                None => warn!(%slot, "moderation timed out, proceeding"),
            }
        }
        blocked
    }
}
