//! Runtime configuration: codec policy, worker timeouts and moderation rules.
//!
//! Every struct has defaults matching the shipped application and can be loaded
//! from JSON, with missing fields falling back to those defaults.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    ALLOWED_DISGUISE_EXTENSIONS, CRYPTO_TIMEOUT, DEFAULT_KDF_ITERATIONS, FILE_EXTENSION_MAX_LENGTH,
    FILE_NAME_MAX_LENGTH, FORBIDDEN_CLASSES, FORBIDDEN_FILE_EXTENSIONS, MAX_FILES_SIZE_BYTES,
    MAX_IMAGE_SIZE, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH, MIN_PROCESS_DURATION,
    MODERATION_TIMEOUT, THRESHOLD,
};
use crate::types::{Action, TransferableFile};
use crate::utils::parse_file_name;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Rejections produced by `CodecPolicy`. Messages are shown to users as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("The password is empty.")]
    EmptyPassword,

    #[error("Password must contain at least {min} characters.")]
    PasswordTooShort { min: usize },

    #[error("Password must contain no more than {max} characters.")]
    PasswordTooLong { max: usize },

    #[error("The file is empty.")]
    EmptyFile,

    #[error("The file has no name.")]
    MissingName,

    #[error("The file has no extension.")]
    MissingExtension,

    #[error("The file name must contain no more than {max} characters.")]
    NameTooLong { max: usize },

    #[error("The file extension must contain no more than {max} characters.")]
    ExtensionTooLong { max: usize },

    #[error("Files with the .{extension} extension are not allowed.")]
    ForbiddenExtension { extension: String },

    #[error("Files with the .{extension} extension can't be used as a disguise.")]
    DisguiseExtensionNotAllowed { extension: String },

    #[error("The total file size exceeds the maximum allowed size of {max_mb}MB.")]
    TooLarge { max_mb: usize },
}

/// Size and extension limits applied before encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecPolicy {
    pub max_files_size: usize,
    pub min_password_length: usize,
    pub max_password_length: usize,
    pub max_name_length: usize,
    pub max_extension_length: usize,
    pub forbidden_extensions: Vec<String>,
    pub allowed_disguise_extensions: Vec<String>,
}

impl Default for CodecPolicy {
    fn default() -> Self {
        Self {
            max_files_size: MAX_FILES_SIZE_BYTES,
            min_password_length: MIN_PASSWORD_LENGTH,
            max_password_length: MAX_PASSWORD_LENGTH,
            max_name_length: FILE_NAME_MAX_LENGTH,
            max_extension_length: FILE_EXTENSION_MAX_LENGTH,
            forbidden_extensions: FORBIDDEN_FILE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            allowed_disguise_extensions: ALLOWED_DISGUISE_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl CodecPolicy {
    /// No limits beyond what the format itself imposes. Meant for tests and tools.
    pub fn permissive() -> Self {
        Self {
            max_files_size: usize::MAX,
            min_password_length: 1,
            max_password_length: usize::MAX,
            forbidden_extensions: Vec::new(),
            allowed_disguise_extensions: Vec::new(),
            ..Self::default()
        }
    }

    fn max_mb(&self) -> usize {
        self.max_files_size / (1024 * 1024)
    }

    pub fn validate_password(&self, password: &str) -> Result<(), PolicyError> {
        let len = password.chars().count();
        if len == 0 {
            return Err(PolicyError::EmptyPassword);
        }
        if len < self.min_password_length {
            return Err(PolicyError::PasswordTooShort { min: self.min_password_length });
        }
        if len > self.max_password_length {
            return Err(PolicyError::PasswordTooLong { max: self.max_password_length });
        }
        Ok(())
    }

    /// Checks a file that is about to be protected.
    pub fn validate_source(&self, file: &TransferableFile) -> Result<(), PolicyError> {
        if file.data.is_empty() {
            return Err(PolicyError::EmptyFile);
        }
        if file.data.len() > self.max_files_size {
            return Err(PolicyError::TooLarge { max_mb: self.max_mb() });
        }

        let parsed = parse_file_name(&file.name);
        if parsed.name.is_empty() {
            return Err(PolicyError::MissingName);
        }
        if parsed.name.chars().count() > self.max_name_length {
            return Err(PolicyError::NameTooLong { max: self.max_name_length });
        }
        if let Some(ext) = parsed.extension {
            if ext.chars().count() > self.max_extension_length {
                return Err(PolicyError::ExtensionTooLong { max: self.max_extension_length });
            }
            if contains_ignore_case(&self.forbidden_extensions, ext) {
                return Err(PolicyError::ForbiddenExtension { extension: ext.to_lowercase() });
            }
        }
        Ok(())
    }

    /// Checks a disguise against the file it will hide.
    ///
    /// An empty allow-list accepts any extension.
    pub fn validate_disguise(
        &self,
        disguise: &TransferableFile,
        source: &TransferableFile,
    ) -> Result<(), PolicyError> {
        if disguise.data.is_empty() {
            return Err(PolicyError::EmptyFile);
        }

        let parsed = parse_file_name(&disguise.name);
        if parsed.name.is_empty() {
            return Err(PolicyError::MissingName);
        }
        let ext = parsed.extension.ok_or(PolicyError::MissingExtension)?;
        if !self.allowed_disguise_extensions.is_empty()
            && !contains_ignore_case(&self.allowed_disguise_extensions, ext)
        {
            return Err(PolicyError::DisguiseExtensionNotAllowed { extension: ext.to_lowercase() });
        }

        let total = disguise.data.len().saturating_add(source.data.len());
        if total > self.max_files_size {
            return Err(PolicyError::TooLarge { max_mb: self.max_mb() });
        }
        Ok(())
    }

    /// Checks the size of a produced file.
    pub fn validate_output(&self, action: Action, len: usize) -> Result<(), PolicyError> {
        if action == Action::Encode && len > self.max_files_size {
            return Err(PolicyError::TooLarge { max_mb: self.max_mb() });
        }
        Ok(())
    }
}

fn contains_ignore_case(list: &[String], ext: &str) -> bool {
    list.iter().any(|e| e.eq_ignore_ascii_case(ext))
}

/// Settings shared by encode and decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// PBKDF2 rounds. Changing it makes existing files unreadable.
    pub kdf_iterations: u32,
    pub policy: CodecPolicy,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            kdf_iterations: DEFAULT_KDF_ITERATIONS,
            policy: CodecPolicy::default(),
        }
    }
}

impl CodecConfig {
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.kdf_iterations = iterations;
        self
    }

    pub fn with_policy(mut self, policy: CodecPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Timeouts of the background workers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Hard bound on one crypto round trip.
    pub crypto_timeout: Duration,
    /// Soft bound on waiting for moderation; tasks keep running past it.
    pub moderation_timeout: Duration,
    /// Minimum wall time of one processing call.
    pub min_duration: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            crypto_timeout: CRYPTO_TIMEOUT,
            moderation_timeout: MODERATION_TIMEOUT,
            min_duration: MIN_PROCESS_DURATION,
        }
    }
}

/// Classifier input size and decision rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    pub max_image_size: u32,
    pub threshold: f32,
    pub forbidden_labels: Vec<String>,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            max_image_size: MAX_IMAGE_SIZE,
            threshold: THRESHOLD,
            forbidden_labels: FORBIDDEN_CLASSES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Everything above in one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub codec: CodecConfig,
    pub bridge: BridgeConfig,
    pub moderation: ModerationConfig,
}

impl AppConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}
