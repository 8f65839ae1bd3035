//! File-name and version helpers shared by the codec and the pipeline.

use crate::envelope::EnvelopeError;

/// File name split at its last dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileName<'a> {
    pub name: &'a str,
    pub extension: Option<&'a str>,
}

/// Split `file_name` into stem and extension.
///
/// A leading dot does not start an extension only when nothing follows it, so
/// `".txt"` is an empty name with extension `txt`.
pub fn parse_file_name(file_name: &str) -> FileName<'_> {
    match file_name.rfind('.') {
        Some(i) if i + 1 < file_name.len() => FileName {
            name: &file_name[..i],
            extension: Some(&file_name[i + 1..]),
        },
        Some(i) => FileName { name: &file_name[..i], extension: None },
        None => FileName { name: file_name, extension: None },
    }
}

/// Append `.extension` unless it is missing or empty.
pub fn add_extension(name: &str, extension: Option<&str>) -> String {
    match extension {
        Some(ext) if !ext.is_empty() => format!("{name}.{ext}"),
        _ => name.to_string(),
    }
}

/// Replace the extension of `file_name`.
///
/// - `None` leaves the name untouched.
/// - `Some("")` strips the extension.
pub fn change_extension(file_name: &str, extension: Option<&str>) -> String {
    match extension {
        None => file_name.to_string(),
        Some(ext) => add_extension(parse_file_name(file_name).name, Some(ext)),
    }
}

/// Parse `"major.minor.revision"` into `size` bytes.
pub fn parse_version(version: &str, size: usize) -> Result<Vec<u8>, EnvelopeError> {
    let parts: Vec<&str> = version.split('.').collect();
    if parts.len() != size {
        return Err(EnvelopeError::InvalidVersion(format!(
            "{version:?} must have {size} components"
        )));
    }

    parts
        .iter()
        .map(|p| {
            p.parse::<u8>().map_err(|_| {
                EnvelopeError::InvalidVersion(format!("{p:?} in {version:?} is not a number in 0..=255"))
            })
        })
        .collect()
}

/// Shorten `text` to `max_len` characters with an ellipsis in the middle.
pub fn ellipse(text: &str, max_len: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_len {
        return text.to_string();
    }
    if max_len <= 3 {
        return "...".to_string();
    }

    let keep = max_len - 3;
    let head = keep.div_ceil(2);
    let tail = keep / 2;

    let mut out: String = chars[..head].iter().collect();
    out.push_str("...");
    out.extend(&chars[chars.len() - tail..]);
    out
}

/// `["a"]` → `a`, `["a", "b"]` → `a and b`, `["a", "b", "c"]` → `a, b, and c`.
pub fn join_with_and<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [one] => one.as_ref().to_string(),
        [a, b] => format!("{} and {}", a.as_ref(), b.as_ref()),
        [rest @ .., last] => {
            let head: Vec<&str> = rest.iter().map(AsRef::as_ref).collect();
            format!("{}, and {}", head.join(", "), last.as_ref())
        }
    }
}
