#[cfg(test)]
mod tests {
    use cyphro_core::constants::FORMAT_VERSION;
    use cyphro_core::envelope::{
        decode_envelope, encode_envelope, Envelope, EnvelopeBuilder, EnvelopeError, Version,
        MIN_ENVELOPE_LEN, TAIL_LEN,
    };

    fn sample(ct: Vec<u8>) -> Envelope {
        EnvelopeBuilder::new()
            .version(Version::current())
            .salt(&[1u8; 16])
            .iv(&[2u8; 12])
            .hmac(&[3u8; 32])
            .ciphertext(ct)
            .build()
            .unwrap()
    }

    #[test]
    fn current_version_parses() {
        let parsed: Version = FORMAT_VERSION.parse().unwrap();
        assert_eq!(parsed, Version::current());
        assert_eq!(parsed.to_string(), FORMAT_VERSION);
    }

    #[test]
    fn test_tail_layout() {
        assert_eq!(TAIL_LEN, 4 + 12 + 32 + 16 + 3);
        assert_eq!(MIN_ENVELOPE_LEN, TAIL_LEN + 16);

        let env = sample(vec![9u8; 20]);
        let bytes = encode_envelope(&env, None).unwrap();
        assert_eq!(bytes.len(), 20 + TAIL_LEN);

        // version is the last field, salt right before it
        let v = Version::current().to_bytes();
        assert_eq!(&bytes[bytes.len() - 3..], &v);
        assert_eq!(&bytes[bytes.len() - 19..bytes.len() - 3], &[1u8; 16]);
        assert_eq!(&bytes[..20], &[9u8; 20]);
        assert_eq!(&bytes[20..24], &20u32.to_le_bytes());
    }

    #[test]
    fn test_parse_without_prefix() {
        let env = sample(vec![9u8; 20]);
        let bytes = encode_envelope(&env, None).unwrap();
        let parsed = decode_envelope(&bytes).unwrap();

        assert_eq!(parsed.version, env.version);
        assert_eq!(parsed.salt, env.salt);
        assert_eq!(parsed.iv, env.iv);
        assert_eq!(parsed.hmac, env.hmac);
        let (prefix, ct) = parsed.split_body().unwrap();
        assert!(prefix.is_empty());
        assert_eq!(ct, &env.ciphertext[..]);
    }

    #[test]
    fn test_parse_behind_prefix() {
        let env = sample(vec![9u8; 20]);
        let host = b"GIF89a not really an image".to_vec();
        let bytes = encode_envelope(&env, Some(&host)).unwrap();
        let parsed = decode_envelope(&bytes).unwrap();

        let (prefix, ct) = parsed.split_body().unwrap();
        assert_eq!(prefix, &host[..]);
        assert_eq!(ct, &env.ciphertext[..]);
    }

    #[test]
    fn test_short_buffer_rejected() {
        let err = decode_envelope(&[0u8; MIN_ENVELOPE_LEN - 1]).unwrap_err();
        assert_eq!(err, EnvelopeError::BufferTooShort { have: MIN_ENVELOPE_LEN - 1, need: MIN_ENVELOPE_LEN });
        assert!(decode_envelope(&[]).is_err());
    }

    #[test]
    fn test_incompatible_major_rejected() {
        let mut env = sample(vec![9u8; 20]);
        env.version = Version::new(Version::current().major + 1, 0, 0);
        let bytes = encode_envelope(&env, None).unwrap();
        assert!(matches!(decode_envelope(&bytes), Err(EnvelopeError::UnsupportedVersion { .. })));
    }

    #[test]
    fn test_newer_minor_accepted() {
        let mut env = sample(vec![9u8; 20]);
        let cur = Version::current();
        env.version = Version::new(cur.major, cur.minor.wrapping_add(1), 7);
        let bytes = encode_envelope(&env, None).unwrap();
        assert_eq!(decode_envelope(&bytes).unwrap().version, env.version);
    }

    #[test]
    fn test_declared_length_out_of_bounds() {
        let env = sample(vec![9u8; 20]);
        let mut bytes = encode_envelope(&env, None).unwrap();
        bytes[20..24].copy_from_slice(&1000u32.to_le_bytes());
        let parsed = decode_envelope(&bytes).unwrap();
        assert!(matches!(parsed.split_body(), Err(EnvelopeError::CiphertextOutOfBounds { declared: 1000, body: 20 })));
    }

    #[test]
    fn test_builder_validates_fields() {
        let complete = || {
            EnvelopeBuilder::new()
                .version(Version::current())
                .salt(&[1u8; 16])
                .iv(&[2u8; 12])
                .hmac(&[3u8; 32])
                .ciphertext(vec![1])
        };
        assert!(complete().build().is_ok());

        let missing = EnvelopeBuilder::new()
            .version(Version::current())
            .salt(&[1u8; 16])
            .iv(&[2u8; 12])
            .ciphertext(vec![1])
            .build();
        assert_eq!(missing.unwrap_err(), EnvelopeError::MissingField { field: "hmac" });

        let no_version = EnvelopeBuilder::new()
            .salt(&[1u8; 16])
            .iv(&[2u8; 12])
            .hmac(&[3u8; 32])
            .ciphertext(vec![1])
            .build();
        assert_eq!(no_version.unwrap_err(), EnvelopeError::MissingField { field: "version" });

        let wrong = EnvelopeBuilder::new()
            .version(Version::current())
            .salt(&[1u8; 15])
            .iv(&[2u8; 12])
            .hmac(&[3u8; 32])
            .ciphertext(vec![1])
            .build();
        assert_eq!(wrong.unwrap_err(), EnvelopeError::InvalidFieldSize { field: "salt", have: 15, need: 16 });
    }

    #[test]
    fn test_empty_ciphertext_rejected() {
        let env = sample(Vec::new());
        assert_eq!(encode_envelope(&env, None).unwrap_err(), EnvelopeError::InvalidCiphertextLen { have: 0 });
    }

    #[test]
    fn test_version_strings() {
        assert_eq!("2.10.255".parse::<Version>().unwrap(), Version::new(2, 10, 255));
        assert!("1.0".parse::<Version>().is_err());
        assert!("1.0.256".parse::<Version>().is_err());
        assert!("a.b.c".parse::<Version>().is_err());
    }
}
