//! Information and structures for GBA LZ77 data.
//!
//! This is the format read by the GBA BIOS calls `LZ77UnCompWram` and
//! `LZ77UnCompVram`. A compressed stream is a four byte header followed by
//! blocks of flag-described tokens.
//!
//! ## Header
//! | Byte Num | Description |
//! | :------: | ----------- |
//! | 0        | tag (`0x10`) |
//! | 1..4     | size in little endian bytes of decompressed data |
//!
//! The header can be extracted into a [`Lz77Header`] by using [`lz77_info()`].
//!
//! ## Blocks
//! Each block starts with a flags byte that describes up to eight tokens.
//! The most significant bit describes the first token:
//! a `0` bit is an uncoded (literal) byte, and a `1` bit is a two byte copy-back.
//!
//! A copy-back packs the number of bytes to copy and how far to move back
//! in the decoded output:
//! ```text
//!  byte 0          byte 1
//! ┌───────┬───────┬───────────────┐
//! │ cnt-3 │ dist-1 (12 bits, BE)  │
//! └───────┴───────┴───────────────┘
//! ```
//! So a copy-back can copy between 3 and 18 bytes from 1 to 4096 bytes back.
//! The copy runs one byte at a time, so a copy longer than its distance
//! repeats the copied window.
//!
//! A block stops early when the decoded size is reached; the remaining flag bits
//! are ignored. After the last block, the encoder pads the stream with zeros to
//! a multiple of four bytes.
//!
//! ## An Example
//! Let's encode the ascii string "ABABAB":
//! ```text
//! Header
//! 10       <- tag
//! 060000   <- decompressed size of 6 bytes
//!
//! Block
//! 20       <- 0b0010_0000: uncoded, uncoded, copy-back
//! 41       <- uncoded ascii 'A'
//! 42       <- uncoded ascii 'B'
//! 10 01    <- copy 1 + 3 = 4 bytes from 1 + 1 = 2 bytes back
//!
//! 000000   <- padding
//! ```
//! [`lz77_info()`]: crate::lz77_info

use crate::errors::Lz77Error;
use bitstream_io::{BitReader, BitWriter, BE};
use std::fmt;
use std::io::{Read, Write};

/// First byte of every LZ77 stream
pub const TAG: u8 = 0x10;
/// Size of the tag plus the size field
pub const HEADER_SIZE: usize = 4;
/// Largest size the 24-bit size field can hold
pub const MAX_SIZE: usize = 0xFF_FFFF;
/// Largest distance a copy-back can move back
pub const WINDOW_SIZE: usize = 0x1000;
/// Shortest copy-back
pub const MIN_MATCH: usize = 3;
/// Longest copy-back
pub const MAX_MATCH: usize = 0x12;
/// Number of tokens described by one flags byte
pub const BLOCK_TOKENS: usize = 8;
/// Compressed streams are padded to a multiple of this many bytes
pub const ALIGNMENT: usize = 4;

/// The information stored at the start of LZ77 data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lz77Header {
    /// size of decompressed data
    pub size: u32,
}

impl Lz77Header {
    /// Create a header for `size` bytes of decompressed data
    pub fn for_size(size: usize) -> Result<Self, Lz77Error> {
        if size > MAX_SIZE {
            return Err(Lz77Error::InputTooLarge(size));
        }

        Ok(Self { size: size as u32 })
    }

    /// Parse the header at the start of `bytes`.
    ///
    /// The tag is checked before the size, so a bad tag is reported even
    /// when the rest of the header is missing.
    pub(crate) fn from_bytes(bytes: &[u8]) -> Result<Self, Lz77Error> {
        match bytes.first() {
            Some(&TAG) => {}
            Some(&tag) => return Err(Lz77Error::InvalidTag(tag)),
            None => return Err(truncated_header(bytes)),
        }

        match bytes.get(1..HEADER_SIZE) {
            Some(&[lo, mid, hi]) => Ok(Self {
                size: u32::from_le_bytes([lo, mid, hi, 0]),
            }),
            _ => Err(truncated_header(bytes)),
        }
    }

    /// Write out `self` to the big endian `BitWriter` to match the LZ77 format
    pub(crate) fn write<W: Write>(&self, wtr: &mut BitWriter<W, BE>) -> Result<(), Lz77Error> {
        let size = self.size.to_le_bytes();
        wtr.write(8, TAG)?; // 0
        wtr.write_bytes(&size[..3])?; // 1..4

        Ok(())
    }

    /// Total size of a padded stream with `body` bytes after the header
    pub fn padded_len(body: usize) -> usize {
        let len = HEADER_SIZE + body;
        len + (ALIGNMENT - len % ALIGNMENT) % ALIGNMENT
    }
}

fn truncated_header(bytes: &[u8]) -> Lz77Error {
    Lz77Error::TruncatedHeader(bytes.len())
}

/// A decoded (or to be encoded) copy-back token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyBack {
    /// number of bytes to copy
    pub count: usize,
    /// how far back in the decoded output the copy starts
    pub distance: usize,
}

impl CopyBack {
    /// Size of a copy-back in the compressed stream
    pub(crate) const ENCODED_SIZE: usize = 2;

    pub(crate) fn from_bitreader<R: Read>(bits: &mut BitReader<R, BE>) -> std::io::Result<Self> {
        let count: u8 = bits.read(4)?;
        let distance: u16 = bits.read(12)?;

        Ok(Self {
            count: count as usize + MIN_MATCH,
            distance: distance as usize + 1,
        })
    }

    /// Write `self` as the 4-bit count and 12-bit distance fields.
    /// `count` and `distance` must already be in range.
    pub(crate) fn write<W: Write>(&self, wtr: &mut BitWriter<W, BE>) -> Result<(), Lz77Error> {
        debug_assert!((MIN_MATCH..=MAX_MATCH).contains(&self.count));
        debug_assert!((1..=WINDOW_SIZE).contains(&self.distance));

        wtr.write(4, (self.count - MIN_MATCH) as u8)?;
        wtr.write(12, (self.distance - 1) as u16)?;

        Ok(())
    }
}

impl fmt::Display for CopyBack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "count: {} distance: {}", self.count, self.distance)
    }
}
