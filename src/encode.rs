use crate::{
    errors::Lz77Error,
    format::{Lz77Header, ALIGNMENT, HEADER_SIZE},
};
use bitstream_io::{BigEndian, BitWriter};
use log::debug;
use std::io::{Cursor, Write};

pub(crate) mod lzss;

use self::lzss::{LzssByte, LzssPass};

type LogWtr<'a> = &'a mut dyn Write;

/// Specify the encoding settings, such as logging, input, and output
///
/// To create a new `EncoderBuilder`, use [`for_bytes()`].
/// Then, change any of the encoding settings with `EncoderBuilder`'s helper methods.
/// Finally, encode the input data with [`encode_to_writer()`] or [`encode_to_vec()`].
/// ```
/// # use gba_lz77::EncoderBuilder;
/// let input = b"ABBACABBCADFEGABA";
/// let mut log: Vec<u8> = Vec::new();
/// let compressed = EncoderBuilder::for_bytes(input)
///     .with_logging(&mut log)
///     .encode_to_vec()
///     .unwrap();
/// assert_eq!(compressed[0], 0x10);
/// assert_eq!(compressed.len() % 4, 0);
/// ```
///
/// The encoding itself has no settings: the window, match sizes, and padding
/// are fixed by the format (see [`format`](crate::format)).
///
/// [`for_bytes()`]: EncoderBuilder::for_bytes
/// [`encode_to_writer()`]: EncoderBuilder::encode_to_writer
/// [`encode_to_vec()`]: EncoderBuilder::encode_to_vec
pub struct EncoderBuilder<'a> {
    data: &'a [u8],
    log: Option<LogWtr<'a>>,
}

impl<'a> EncoderBuilder<'a> {
    /// Create a new `EncoderBuilder` for the data the `bytes` slice.
    #[inline]
    pub fn for_bytes(bytes: &'a [u8]) -> Self {
        Self {
            data: bytes,
            log: None,
        }
    }

    /// Write debugging and diagnotic information to `log` while the input is
    /// being encoded.
    #[inline]
    pub fn with_logging<L: Write>(&mut self, log: &'a mut L) -> &mut Self {
        let log = Some(log as &'a mut dyn Write);
        self.log = log;
        self
    }

    /// Start the encoding and write the compressed data out to `wtr`.
    /// Returns the number of bytes written, padding included.
    #[inline]
    pub fn encode_to_writer<W: Write>(&mut self, wtr: W) -> Result<usize, Lz77Error> {
        do_encode(self, wtr)
    }

    /// Start the encoding and return the compressed data in a `Vec<u8>`.
    #[inline]
    pub fn encode_to_vec(&mut self) -> Result<Vec<u8>, Lz77Error> {
        let data = Vec::new();
        let mut csr = Cursor::new(data);
        self.encode_to_writer(&mut csr).map(|_| csr.into_inner())
    }
}

/// Compress data into a LZ77 `Vec<u8>`
///
/// This is a convenience function to encode bytes without having to
/// set up an [`EncoderBuilder`]. It only fails if `bytes` is too large
/// for the 24-bit size in the header.
pub fn encode(bytes: &[u8]) -> Result<Vec<u8>, Lz77Error> {
    EncoderBuilder::for_bytes(bytes).encode_to_vec()
}

fn do_encode<W: Write>(opts: &mut EncoderBuilder<'_>, mut wtr: W) -> Result<usize, Lz77Error> {
    let data = opts.data;
    let log = &mut opts.log;

    let lzss = lzss::compress(data, log)?;

    if let Some(wtr) = log.as_mut() {
        writeln!(wtr, "{}", &lzss)?;
    }

    let written = write_file(&mut wtr, &lzss)?;
    debug!(
        "encoded {} bytes into {} bytes ({} blocks)",
        data.len(),
        written,
        lzss.blocks.len()
    );

    Ok(written)
}

fn write_file(wtr: &mut dyn Write, encoded_data: &LzssPass) -> Result<usize, Lz77Error> {
    let mut out = BitWriter::endian(wtr, BigEndian);

    encoded_data.header.write(&mut out)?;

    for block in &encoded_data.blocks {
        out.write(8, block.flags)?;
        for code in &block.tokens {
            match *code {
                LzssByte::Uncoded(byte) => out.write(8, byte)?,
                LzssByte::Encoded(copy) => copy.write(&mut out)?,
            }
        }
    }

    let body = encoded_data.encoded_size();
    let total = Lz77Header::padded_len(body);
    let padding = [0u8; ALIGNMENT];
    out.write_bytes(&padding[..total - HEADER_SIZE - body])?;

    Ok(total)
}
