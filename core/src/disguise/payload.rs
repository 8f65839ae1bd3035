//! disguise/payload.rs
//! Plaintext layout encrypted inside an envelope.
//!
//! `[flags u8][name_len u16][name]?[ext_len u16][ext]?[data]`
//!
//! - Length prefixes are little-endian byte counts of UTF-8 text.
//! - `HAS_NAME` is only set for disguised files; a plain container keeps its own name.

use std::fmt;

use crate::constants::{FILE_EXTENSION_SIZE_SIZE_BYTES, FILE_NAME_SIZE_SIZE_BYTES};

bitflags::bitflags! {
    /// Optional fields present in a payload.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PayloadFlags: u8 {
        /// Original file stem follows the flags.
        const HAS_NAME = 0b0000_0001;

        /// Original extension follows the name.
        const HAS_EXTENSION = 0b0000_0010;
    }
}

const FLAGS_LEN: usize = 1;

/// Borrowed view of a decrypted payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadView<'a> {
    pub name: Option<&'a str>,
    pub extension: Option<&'a str>,
    pub data: &'a [u8],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    /// Payload ended inside a fixed field.
    Truncated { field: &'static str, have: usize, need: usize },

    /// Flag bits this build does not know.
    UnknownFlags { raw: u8 },

    /// Name or extension longer than its length prefix allows.
    FieldTooLong { field: &'static str, have: usize, max: usize },

    /// Name or extension is not valid UTF-8.
    InvalidUtf8 { field: &'static str },
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use PayloadError::*;
        match self {
            Truncated { field, have, need } =>
                write!(f, "payload truncated in {}: {} < {}", field, have, need),
            UnknownFlags { raw } =>
                write!(f, "unknown payload flags: {:#04x}", raw),
            FieldTooLong { field, have, max } =>
                write!(f, "payload {} too long: {} > {} bytes", field, have, max),
            InvalidUtf8 { field } =>
                write!(f, "payload {} is not valid UTF-8", field),
        }
    }
}

impl std::error::Error for PayloadError {}

fn max_field_len(prefix_bytes: u32) -> usize {
    (1usize << (8 * prefix_bytes)) - 1
}

fn put_field(out: &mut Vec<u8>, field: &'static str, value: &str, prefix_bytes: u32) -> Result<(), PayloadError> {
    let max = max_field_len(prefix_bytes);
    if value.len() > max {
        return Err(PayloadError::FieldTooLong { field, have: value.len(), max });
    }
    out.extend_from_slice(&(value.len() as u16).to_le_bytes());
    out.extend_from_slice(value.as_bytes());
    Ok(())
}

/// Serialize a payload. Empty name or extension is treated as absent.
pub fn encode_payload(name: Option<&str>, extension: Option<&str>, data: &[u8]) -> Result<Vec<u8>, PayloadError> {
    let name = name.filter(|n| !n.is_empty());
    let extension = extension.filter(|e| !e.is_empty());

    let mut flags = PayloadFlags::empty();
    flags.set(PayloadFlags::HAS_NAME, name.is_some());
    flags.set(PayloadFlags::HAS_EXTENSION, extension.is_some());

    let meta_len = name.map_or(0, |n| n.len() + 2) + extension.map_or(0, |e| e.len() + 2);
    let mut out = Vec::with_capacity(FLAGS_LEN + meta_len + data.len());
    out.push(flags.bits());

    if let Some(name) = name {
        put_field(&mut out, "name", name, FILE_NAME_SIZE_SIZE_BYTES)?;
    }
    if let Some(ext) = extension {
        put_field(&mut out, "extension", ext, FILE_EXTENSION_SIZE_SIZE_BYTES)?;
    }
    out.extend_from_slice(data);
    Ok(out)
}

/// Parse a decrypted payload.
pub fn decode_payload(buf: &[u8]) -> Result<PayloadView<'_>, PayloadError> {
    let (&raw, mut rest) = buf
        .split_first()
        .ok_or(PayloadError::Truncated { field: "flags", have: 0, need: FLAGS_LEN })?;
    let flags = PayloadFlags::from_bits(raw).ok_or(PayloadError::UnknownFlags { raw })?;

    let name = if flags.contains(PayloadFlags::HAS_NAME) {
        Some(take_field(&mut rest, "name")?)
    } else {
        None
    };
    let extension = if flags.contains(PayloadFlags::HAS_EXTENSION) {
        Some(take_field(&mut rest, "extension")?)
    } else {
        None
    };

    Ok(PayloadView { name, extension, data: rest })
}

fn take_field<'a>(rest: &mut &'a [u8], field: &'static str) -> Result<&'a str, PayloadError> {
    if rest.len() < 2 {
        return Err(PayloadError::Truncated { field, have: rest.len(), need: 2 });
    }
    let (len, tail) = rest.split_at(2);
    let len = u16::from_le_bytes([len[0], len[1]]) as usize;
    if tail.len() < len {
        return Err(PayloadError::Truncated { field, have: tail.len(), need: len });
    }
    let (value, tail) = tail.split_at(len);
    *rest = tail;
    std::str::from_utf8(value).map_err(|_| PayloadError::InvalidUtf8 { field })
}
