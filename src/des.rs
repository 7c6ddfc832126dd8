//! DES key schedule (FIPS 46-3, appendix on KS).
//!
//! https://csrc.nist.gov/csrc/media/publications/fips/46/3/archive/1999-10-25/documents/fips46-3.pdf

use crate::bits::BitBuffer;

pub type Key = [u8; 8];

/// A 48-bit round subkey.
pub type RoundKey = BitBuffer;

pub const NUM_ROUNDS: usize = 16;
pub const HALF_KEY_BITS: usize = 28;
pub const SUBKEY_BITS: usize = 48;

/// Permuted choice 1: 64-bit key to 56 bits, parity bits dropped.
pub const PC1: [usize; 56] = [
    57, 49, 41, 33, 25, 17, 9, 1, 58, 50, 42, 34, 26, 18, 10, 2, 59, 51, 43, 35, 27, 19, 11, 3, 60,
    52, 44, 36, 63, 55, 47, 39, 31, 23, 15, 7, 62, 54, 46, 38, 30, 22, 14, 6, 61, 53, 45, 37, 29,
    21, 13, 5, 28, 20, 12, 4,
];

/// Permuted choice 2: rotated CD halves to a 48-bit subkey.
pub const PC2: [usize; 48] = [
    14, 17, 11, 24, 1, 5, 3, 28, 15, 6, 21, 10, 23, 19, 12, 4, 26, 8, 16, 7, 27, 20, 13, 2, 41, 52,
    31, 37, 47, 55, 30, 40, 51, 45, 33, 48, 44, 49, 39, 56, 34, 53, 46, 42, 50, 36, 29, 32,
];

/// Left rotation applied to both halves before each round.
pub const SHIFTS: [usize; NUM_ROUNDS] = [1, 1, 2, 2, 2, 2, 2, 2, 1, 2, 2, 2, 2, 2, 2, 1];

/// Receives the intermediate values of a key schedule run.
///
/// Rounds are numbered from 1. `halves` is also called once with round 0
/// for the split straight after PC1. All methods default to doing nothing.
pub trait ScheduleObserver {
    fn permuted_key(&mut self, _permuted: &BitBuffer) {}
    fn halves(&mut self, _round: usize, _c: &BitBuffer, _d: &BitBuffer) {}
    fn shifted(&mut self, _round: usize, _cd: &BitBuffer) {}
    fn subkey(&mut self, _round: usize, _subkey: &RoundKey) {}
}

impl ScheduleObserver for () {}

pub fn derive_subkeys(key: &Key) -> [RoundKey; NUM_ROUNDS] {
    return derive_subkeys_with(key, &mut ());
}

// Same as derive_subkeys, reporting every step to `observer`.
pub fn derive_subkeys_with<O: ScheduleObserver + ?Sized>(
    key: &Key,
    observer: &mut O,
) -> [RoundKey; NUM_ROUNDS] {
    let permuted = BitBuffer::from_bytes(key).select_by_table(&PC1);
    observer.permuted_key(&permuted);

    let mut c = permuted.select_range(0, HALF_KEY_BITS);
    let mut d = permuted.select_range(HALF_KEY_BITS, HALF_KEY_BITS);
    observer.halves(0, &c, &d);

    // Each round rotates the previous round's halves, so the closure must
    // run in index order (from_fn guarantees this).
    std::array::from_fn(|k| {
        let round = k + 1;
        c = c.rotate_left(HALF_KEY_BITS, SHIFTS[k]);
        d = d.rotate_left(HALF_KEY_BITS, SHIFTS[k]);
        observer.halves(round, &c, &d);

        let cd = c.concatenate(HALF_KEY_BITS, &d, HALF_KEY_BITS);
        observer.shifted(round, &cd);

        let subkey = cd.select_by_table(&PC2);
        observer.subkey(round, &subkey);
        subkey
    })
}

// Integer form: byte 0 of the key is the most significant byte of `key`,
// each subkey is right-aligned in the returned u64.
pub fn generate_round_keys(key: u64) -> [u64; NUM_ROUNDS] {
    let subkeys = derive_subkeys(&key.to_be_bytes());
    let mut result: [u64; NUM_ROUNDS] = [0; NUM_ROUNDS];
    for (out, subkey) in result.iter_mut().zip(subkeys.iter()) {
        *out = subkey.to_u64();
    }
    return result;
}
