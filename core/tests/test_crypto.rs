#[cfg(test)]
mod tests {
    use cyphro_core::crypto::{
        compute_hmac, generate_iv, generate_salt, verify_hmac, AeadImpl, CryptoError, TAG_LEN,
    };

    const KEY: [u8; 32] = [0x42; 32];
    const IV: [u8; 12] = [0x24; 12];

    #[test]
    fn test_seal_is_deterministic_for_fixed_iv() {
        let aead = AeadImpl::new(&KEY).unwrap();
        let c1 = aead.seal(&IV, b"aad", b"hello world").unwrap();
        let c2 = aead.seal(&IV, b"aad", b"hello world").unwrap();
        assert_eq!(c1, c2);
        assert_eq!(c1.len(), 11 + TAG_LEN);
    }

    #[test]
    fn test_seal_open_roundtrip() {
        let aead = AeadImpl::new(&KEY).unwrap();
        let ct = aead.seal(&IV, b"1.0.0", b"payload").unwrap();
        assert_eq!(aead.open(&IV, b"1.0.0", &ct).unwrap(), b"payload");
    }

    #[test]
    fn test_open_fails_on_wrong_aad_or_flip() {
        let aead = AeadImpl::new(&KEY).unwrap();
        let mut ct = aead.seal(&IV, b"aad", b"payload").unwrap();
        assert_eq!(aead.open(&IV, b"other", &ct).unwrap_err(), CryptoError::AuthenticationFailed);

        ct[0] ^= 1;
        assert_eq!(aead.open(&IV, b"aad", &ct).unwrap_err(), CryptoError::AuthenticationFailed);
    }

    #[test]
    fn test_open_rejects_short_input() {
        let aead = AeadImpl::new(&KEY).unwrap();
        assert_eq!(aead.open(&IV, b"", &[0u8; 4]).unwrap_err(), CryptoError::AuthenticationFailed);
    }

    #[test]
    fn test_bad_key_and_iv_lengths() {
        assert!(matches!(AeadImpl::new(&[0u8; 16]), Err(CryptoError::InvalidKeyLen { expected: 32, actual: 16 })));
        let aead = AeadImpl::new(&KEY).unwrap();
        assert!(matches!(aead.seal(&[0u8; 8], b"", b"x"), Err(CryptoError::InvalidIvLen { .. })));
    }

    #[test]
    fn test_hmac_roundtrip_and_mismatch() {
        let tag = compute_hmac(b"ciphertext", &IV, &KEY).unwrap();
        verify_hmac(b"ciphertext", &IV, &KEY, &tag).unwrap();

        assert_eq!(
            verify_hmac(b"ciphertexT", &IV, &KEY, &tag).unwrap_err(),
            CryptoError::AuthenticationFailed
        );
        assert_eq!(
            verify_hmac(b"ciphertext", &[0u8; 12], &KEY, &tag).unwrap_err(),
            CryptoError::AuthenticationFailed
        );
        assert_eq!(
            verify_hmac(b"ciphertext", &IV, &[1u8; 32], &tag).unwrap_err(),
            CryptoError::AuthenticationFailed
        );
    }

    #[test]
    fn test_random_values_are_fresh() {
        assert_ne!(generate_salt(), generate_salt());
        assert_ne!(generate_iv(), generate_iv());
    }
}
