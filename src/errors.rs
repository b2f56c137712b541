use std::io;
use thiserror::Error;

/// Possible errors that arise from attempting to convert LZ77 data into its
/// decompressed bytes, or vise-versa.
#[derive(Error, Debug)]
pub enum Lz77Error {
    #[error("Invalid LZ77 tag {0:#04x}, expected 0x10")]
    InvalidTag(u8),

    #[error("Back-reference distance {distance} at output position {position} is outside the {size} byte output")]
    BadReference {
        distance: usize,
        position: usize,
        size: usize,
    },

    #[error("Compressed stream ended {0} bytes into its 4 byte header")]
    TruncatedHeader(usize),

    #[error("Compressed stream ended after {consumed} bytes with {decoded} of {size} bytes decoded")]
    TruncatedStream {
        consumed: usize,
        decoded: usize,
        size: usize,
    },

    #[error("Input of {0} bytes does not fit in the 24-bit LZ77 size field")]
    InputTooLarge(usize),

    #[error("Access of {length} bytes at {offset:#x} is outside the {region} byte region")]
    OutOfRegion {
        offset: usize,
        length: usize,
        region: usize,
    },

    #[error("{0}")]
    Io(#[from] io::Error),
}
