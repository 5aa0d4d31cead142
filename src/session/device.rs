//! Device identifier generation
//!
//! The device id is a per-session label, not a secret: 16 random bytes
//! rendered as 32 lowercase hex characters.

use rand::RngCore;

/// Number of random bytes in a device id
pub const DEVICE_ID_BYTES: usize = 16;

/// Generate a fresh device id
pub fn generate_device_id() -> String {
    let mut bytes = [0u8; DEVICE_ID_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Whether `value` has the shape of a generated device id
pub fn is_device_id(value: &str) -> bool {
    value.len() == DEVICE_ID_BYTES * 2
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
