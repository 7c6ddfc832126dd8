//! Fixed-size, bit-addressable byte buffer.
//!
//! Bits are numbered MSB-first: bit 0 is the most significant bit of byte 0,
//! bit 8 the most significant bit of byte 1, and so on. Permutation tables
//! are 1-based, so table entry `n` refers to bit `n - 1`. This is the
//! numbering used by FIPS 46-3.

use bitvec::prelude::*;

use std::fmt;

use crate::error::Error;

type Bits = BitVec<u8, Msb0>;

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BitBuffer {
    bits: Bits,
}

impl BitBuffer {
    // Storage starts at bit 0 of the first byte and padding bits past the
    // declared length are zero.
    fn from_bits(mut bits: Bits) -> BitBuffer {
        bits.force_align();
        bits.set_uninitialized(false);
        BitBuffer { bits: bits }
    }

    /// A buffer of `len` bits, all zero.
    pub fn zeroed(len: usize) -> BitBuffer {
        BitBuffer::from_bits(Bits::repeat(false, len))
    }

    /// Wraps `bytes` as a buffer of `8 * bytes.len()` bits.
    pub fn from_bytes(bytes: &[u8]) -> BitBuffer {
        BitBuffer::from_bits(Bits::from_slice(bytes))
    }

    /// Wraps `bytes` as a buffer of `len` bits.
    ///
    /// `bytes` must hold exactly `ceil(len / 8)` bytes. Padding bits past
    /// `len` in the last byte are cleared.
    pub fn from_bytes_with_len(bytes: &[u8], len: usize) -> BitBuffer {
        let needed = (len + 7) / 8;
        assert_eq!(
            bytes.len(),
            needed,
            "{} bits need {} bytes of storage, got {}",
            len,
            needed,
            bytes.len()
        );
        let mut bits = Bits::from_slice(bytes);
        bits.truncate(len);
        return BitBuffer::from_bits(bits);
    }

    /// The low `len` bits of `value`, most significant first.
    pub fn from_u64(value: u64, len: usize) -> BitBuffer {
        assert!(len <= 64, "cannot take {} bits from a u64", len);
        let bits = value.view_bits::<Msb0>()[64 - len..].iter().by_vals().collect();
        return BitBuffer::from_bits(bits);
    }

    /// Parses a string of '0' and '1' characters. ASCII whitespace is
    /// skipped, so "00010011 00110100" is accepted.
    pub fn from_bit_string(text: &str) -> Result<BitBuffer, Error> {
        let mut bits = Bits::with_capacity(text.len());
        for (offset, ch) in text.char_indices() {
            match ch {
                '0' => bits.push(false),
                '1' => bits.push(true),
                c if c.is_ascii_whitespace() => {}
                c => return Err(Error::InvalidBitCharacter { ch: c, offset: offset }),
            }
        }
        Ok(BitBuffer::from_bits(bits))
    }

    /// Declared number of bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Backing storage, `ceil(len / 8)` bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.bits.as_raw_slice()
    }

    pub fn get_bit(&self, pos: usize) -> bool {
        self.check_index(pos);
        return self.bits[pos];
    }

    pub fn set_bit(&mut self, pos: usize, value: bool) {
        self.check_index(pos);
        self.bits.set(pos, value);
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().by_vals()
    }

    /// Copies bits `start .. start + len` into a new buffer of `len` bits.
    pub fn select_range(&self, start: usize, len: usize) -> BitBuffer {
        assert!(
            start + len <= self.len(),
            "range {}..{} out of bounds for {} bits",
            start,
            start + len,
            self.len()
        );
        return BitBuffer::from_bits(self.bits[start..start + len].to_bitvec());
    }

    /// Builds a buffer of `table.len()` bits where output bit `i` is input
    /// bit `table[i] - 1`. Entries may repeat or skip source bits.
    pub fn select_by_table(&self, table: &[usize]) -> BitBuffer {
        let len = self.len();
        let bits = table
            .iter()
            .enumerate()
            .map(|(i, &source)| {
                assert!(
                    source >= 1 && source <= len,
                    "table entry {} at index {} is outside 1..={}",
                    source,
                    i,
                    len
                );
                self.bits[source - 1]
            })
            .collect();
        return BitBuffer::from_bits(bits);
    }

    /// Circular left rotation of the first `bit_length` bits by `amount`.
    /// Output bit `i` is input bit `(i + amount) % bit_length`; the result
    /// has `bit_length` bits.
    pub fn rotate_left(&self, bit_length: usize, amount: usize) -> BitBuffer {
        assert!(bit_length > 0, "cannot rotate an empty bit range");
        assert!(
            bit_length <= self.len(),
            "rotation domain of {} bits exceeds buffer of {} bits",
            bit_length,
            self.len()
        );
        let mut bits = self.bits[..bit_length].to_bitvec();
        bits.rotate_left(amount % bit_length);
        return BitBuffer::from_bits(bits);
    }

    /// The first `bit_length_a` bits of `self` followed by the first
    /// `bit_length_b` bits of `other`.
    pub fn concatenate(
        &self,
        bit_length_a: usize,
        other: &BitBuffer,
        bit_length_b: usize,
    ) -> BitBuffer {
        assert!(bit_length_a <= self.len(), "left operand has only {} bits", self.len());
        assert!(bit_length_b <= other.len(), "right operand has only {} bits", other.len());
        let mut bits = Bits::with_capacity(bit_length_a + bit_length_b);
        bits.extend_from_bitslice(&self.bits[..bit_length_a]);
        bits.extend_from_bitslice(&other.bits[..bit_length_b]);
        return BitBuffer::from_bits(bits);
    }

    /// The bits as an unsigned integer, bit 0 being the most significant.
    pub fn to_u64(&self) -> u64 {
        let len = self.len();
        assert!(len <= 64, "{} bits do not fit in a u64", len);
        let mut value: u64 = 0;
        value.view_bits_mut::<Msb0>()[64 - len..].clone_from_bitslice(self.bits.as_bitslice());
        return value;
    }

    /// "0101..." with exactly `len` characters.
    pub fn to_bit_string(&self) -> String {
        self.iter().map(|b| if b { '1' } else { '0' }).collect()
    }

    fn check_index(&self, pos: usize) {
        assert!(
            pos < self.len(),
            "bit index {} out of range for {} bits",
            pos,
            self.len()
        );
    }
}

// Bits grouped per backing byte, e.g. "11110000 1100".
impl fmt::Display for BitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.bits.chunks(8).enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            for bit in byte.iter().by_vals() {
                f.write_str(if bit { "1" } else { "0" })?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for BitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitBuffer({}; {})", self.len(), self)
    }
}
