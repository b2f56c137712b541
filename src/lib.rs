//! Compress and decompress the LZ77 data found in Game Boy Advance ROMs.
//!
//! ```
//! let raw = b"ABABAB";
//! let compressed = gba_lz77::encode(raw).unwrap();
//! assert_eq!(compressed, [0x10, 0x06, 0x00, 0x00, 0x20, 0x41, 0x42, 0x10, 0x01, 0x00, 0x00, 0x00]);
//! assert_eq!(gba_lz77::decode(&compressed, 0).unwrap(), raw);
//! ```

mod decode;
mod encode;
mod errors;
pub mod format;
pub mod region;

#[cfg(feature = "parallel")]
pub mod batch;

pub use decode::{decode, lz77_info, Decoder, StreamInfo};
pub use encode::lzss::{find_match, Match};
pub use encode::{encode, EncoderBuilder};
pub use errors::Lz77Error;
pub use format::Lz77Header;
