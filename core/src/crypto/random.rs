//! crypto/random.rs
//! Fresh salt and IV generation.
//!
//! Both values are drawn from the OS-seeded thread RNG for every encode; nothing
//! here is derived or counted.

use rand::RngCore;

use crate::crypto::types::{IV_LEN, SALT_LEN};

#[inline]
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}

#[inline]
pub fn generate_iv() -> [u8; IV_LEN] {
    let mut iv = [0u8; IV_LEN];
    rand::thread_rng().fill_bytes(&mut iv);
    iv
}
