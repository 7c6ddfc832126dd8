extern crate rand;

pub mod bits;
pub mod des;
mod error;

use rand::prelude::*;

pub use crate::bits::BitBuffer;
pub use crate::des::{derive_subkeys, derive_subkeys_with, Key, RoundKey, ScheduleObserver};
pub use crate::error::Error;

/// The key used in the worked example of the DES key schedule.
pub const FIPS_TEST_KEY: Key = [0x13, 0x34, 0x57, 0x79, 0x9B, 0xBC, 0xDF, 0xF1];

const KEY_BITS: usize = 64;


pub fn random_key() -> Key {
    let mut key: Key = [0; 8];
    let mut rng = rand::thread_rng();
    rng.fill_bytes(&mut key);
    return key;
}

pub fn key_from_slice(bytes: &[u8]) -> Result<Key, Error> {
    if bytes.len() != 8 {
        return Err(Error::InvalidKeyLength {
            expected: KEY_BITS,
            actual: bytes.len() * 8,
        });
    }
    let mut key: Key = [0; 8];
    key.copy_from_slice(bytes);
    return Ok(key);
}

// 64 '0'/'1' characters, whitespace ignored ("00010011 00110100 ...").
pub fn parse_bit_key(text: &str) -> Result<Key, Error> {
    let bits = BitBuffer::from_bit_string(text)?;
    if bits.len() != KEY_BITS {
        return Err(Error::InvalidKeyLength {
            expected: KEY_BITS,
            actual: bits.len(),
        });
    }
    return key_from_slice(bits.as_bytes());
}

// 16 hex digits, whitespace ignored.
pub fn parse_hex_key(text: &str) -> Result<Key, Error> {
    let digits: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = hex::decode(&digits)?;
    return key_from_slice(&bytes);
}

// Derive a 64-bit key from arbitrary key material by using half of the
// bits from the MD5 digest.
pub fn key_from_passphrase(material: &[u8]) -> Key {
    let digest = md5::compute(material);
    let mut key: Key = [0; 8];
    key.copy_from_slice(&digest.0[8..16]);
    return key;
}
