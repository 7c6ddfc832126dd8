use std::io;

// Errors for key material coming from outside the program. Misuse of the
// bit buffer or the key schedule itself panics instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid character {ch:?} at offset {offset}, expected '0' or '1'")]
    InvalidBitCharacter { ch: char, offset: usize },
    #[error("key must be exactly {expected} bits, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },
    #[error("invalid hex key: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("could not read key material: {0}")]
    Io(#[from] io::Error),
}
