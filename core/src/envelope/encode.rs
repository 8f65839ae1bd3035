// ## 📂 File: `src/envelope/encode.rs`
//! src/envelope/encode.rs
//!
//! Envelope serialization.
//!
//! Design notes:
//! - Output is `[prefix][ciphertext][ciphertext_len][iv][hmac][salt][version]`.
//! - Field order must match `decode.rs` exactly; the tail is read backwards.
//! - The prefix (disguise host bytes) is copied verbatim and never inspected.

use crate::envelope::types::{Envelope, EnvelopeError, TAIL_LEN};

/// Serialize `envelope`, appended after `prefix` when one is given.
///
/// # Errors
/// - `InvalidCiphertextLen` if the ciphertext is empty or longer than `u32::MAX`.
pub fn encode_envelope(envelope: &Envelope, prefix: Option<&[u8]>) -> Result<Vec<u8>, EnvelopeError> {
    let ct_len = envelope.ciphertext.len();
    if ct_len == 0 || ct_len > u32::MAX as usize {
        return Err(EnvelopeError::InvalidCiphertextLen { have: ct_len });
    }

    let prefix = prefix.unwrap_or(&[]);
    let mut out = Vec::with_capacity(prefix.len() + ct_len + TAIL_LEN);

    out.extend_from_slice(prefix);                               // disguise host bytes
    out.extend_from_slice(&envelope.ciphertext);                 // ciphertext
    out.extend_from_slice(&(ct_len as u32).to_le_bytes());       // ciphertext_len
    out.extend_from_slice(&envelope.iv);                         // iv
    out.extend_from_slice(&envelope.hmac);                       // hmac
    out.extend_from_slice(&envelope.salt);                       // salt
    out.extend_from_slice(&envelope.version.to_bytes());         // version (last)

    debug_assert_eq!(out.len(), prefix.len() + envelope.encoded_len());

    Ok(out)
}
