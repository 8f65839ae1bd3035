//! disguise/restore.rs
//! Naming rules for encoded containers and restored files.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::constants::FILE_EXTENSION;
use crate::disguise::payload::PayloadView;
use crate::utils::{add_extension, change_extension, parse_file_name};

/// Result of opening a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restored {
    /// Host bytes preceded the envelope, or the payload carried the original name.
    pub was_disguised: bool,
    pub name: Option<String>,
    pub extension: Option<String>,
    pub data: Bytes,
}

impl Restored {
    /// Name to save the restored file under.
    pub fn file_name(&self) -> String {
        add_extension(self.name.as_deref().unwrap_or_default(), self.extension.as_deref())
    }
}

/// Fill in name and extension for a decrypted payload.
///
/// A payload with a name is authoritative for both. Otherwise both come from the
/// container name with the `cph` marker removed, and a payload extension wins over
/// the derived one.
pub fn restore(view: PayloadView<'_>, container_name: &str, has_prefix: bool) -> Restored {
    let data = Bytes::copy_from_slice(view.data);

    if let Some(name) = view.name {
        return Restored {
            was_disguised: true,
            name: Some(name.to_string()),
            extension: view.extension.map(str::to_string),
            data,
        };
    }

    let stripped = strip_marker(container_name);
    let (name, extension) = match view.extension {
        Some(ext) => (parse_file_name(container_name).name, Some(ext)),
        None => {
            let parsed = parse_file_name(stripped);
            match parsed.extension {
                Some(_) => (parsed.name, parsed.extension),
                None => (stripped, None),
            }
        }
    };

    Restored {
        was_disguised: has_prefix,
        name: Some(name).filter(|n| !n.is_empty()).map(str::to_string),
        extension: extension.map(str::to_string),
        data,
    }
}

/// `container_name` without a trailing `.cph`, compared case-insensitively.
pub fn strip_marker(container_name: &str) -> &str {
    let parsed = parse_file_name(container_name);
    match parsed.extension {
        Some(ext) if ext.eq_ignore_ascii_case(FILE_EXTENSION) => parsed.name,
        _ => container_name,
    }
}

/// Outward name of an encoded container.
pub fn container_name(source_name: &str, disguise_name: Option<&str>) -> String {
    match disguise_name {
        Some(name) => name.to_string(),
        None => change_extension(source_name, Some(FILE_EXTENSION)),
    }
}
