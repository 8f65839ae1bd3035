//! codec/encode.rs
//! Source file (+ optional disguise) -> container bytes.

use bytes::Bytes;
use tracing::{debug, error};
use zeroize::Zeroizing;

use crate::codec::types::{Encoded, FileCodec};
use crate::crypto::types::{IV_LEN, SALT_LEN};
use crate::crypto::{compute_hmac, derive_keys, generate_iv, generate_salt, AeadImpl};
use crate::disguise::{container_name, encode_payload};
use crate::envelope::{encode_envelope, EnvelopeBuilder, Version, TAIL_LEN};
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::{CodecError, TransferableFile};
use crate::utils::parse_file_name;

impl FileCodec {
    /// Encrypt `source` under `password`, appended after `disguise` bytes when given.
    ///
    /// The output is decoded again before it is returned; if it does not give back
    /// the source bytes the call fails with `SelfVerification`.
    pub fn encode(
        &self,
        source: &TransferableFile,
        password: &str,
        disguise: Option<&TransferableFile>,
    ) -> Result<Encoded, CodecError> {
        self.encode_with(source, password, disguise, generate_salt(), generate_iv())
    }

    /// `encode` with caller-chosen salt and IV. Same inputs give the same bytes.
    pub fn encode_with(
        &self,
        source: &TransferableFile,
        password: &str,
        disguise: Option<&TransferableFile>,
        salt: [u8; SALT_LEN],
        iv: [u8; IV_LEN],
    ) -> Result<Encoded, CodecError> {
        let mut timer = TelemetryTimer::new();
        let mut counters = TelemetryCounters::default();

        timer.time(Stage::Validate, || self.validate(source, password, disguise))?;

        let parsed = parse_file_name(&source.name);
        let payload = timer.time(Stage::Payload, || {
            encode_payload(disguise.map(|_| parsed.name), parsed.extension, &source.data)
        })?;
        let payload = Zeroizing::new(payload);

        let keys = timer.time(Stage::Derive, || {
            derive_keys(password, &salt, self.config.kdf_iterations)
        })?;

        let version = Version::current();
        let ciphertext = timer.time(Stage::Encrypt, || {
            AeadImpl::new(keys.cipher_key())?.seal(&iv, &version.to_bytes(), &payload)
        })?;
        let hmac = timer.time(Stage::Authenticate, || compute_hmac(&ciphertext, &iv, keys.mac_key()))?;

        counters.add_envelope(source.data.len(), payload.len(), ciphertext.len(), TAIL_LEN);

        let envelope = EnvelopeBuilder::new()
            .version(version)
            .salt(&salt)
            .iv(&iv)
            .hmac(&hmac)
            .ciphertext(ciphertext)
            .build()?;

        let prefix = disguise.map(|d| &d.data[..]);
        counters.add_disguise(prefix.map_or(0, <[u8]>::len));
        let data = encode_envelope(&envelope, prefix)?;

        let verified = timer.time(Stage::Verify, || self.check_back(&source.data, &data, password));
        if !verified {
            error!(file = %source.name, "encoded output failed self-verification");
            return Err(CodecError::SelfVerification);
        }

        timer.finish();
        debug!(
            file = %source.name,
            disguised = disguise.is_some(),
            bytes = data.len(),
            elapsed_ms = timer.elapsed().as_millis() as u64,
            "file encoded"
        );

        Ok(Encoded {
            file_name: container_name(&source.name, disguise.map(|d| d.name.as_str())),
            data: Bytes::from(data),
            telemetry: TelemetrySnapshot::from(&counters, &timer),
        })
    }

    fn validate(
        &self,
        source: &TransferableFile,
        password: &str,
        disguise: Option<&TransferableFile>,
    ) -> Result<(), CodecError> {
        if source.is_empty() {
            return Err(CodecError::EmptyInput);
        }
        let policy = &self.config.policy;
        policy.validate_password(password)?;
        policy.validate_source(source)?;
        if let Some(disguise) = disguise {
            policy.validate_disguise(disguise, source)?;
        }
        Ok(())
    }
}
