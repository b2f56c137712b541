use crate::errors::Lz77Error;
use crate::format::{CopyBack, Lz77Header, BLOCK_TOKENS, HEADER_SIZE};
use bitstream_io::{BigEndian, BitReader};
use log::debug;
use std::io::{Cursor, Write};

type LogWtr<'a> = &'a mut dyn Write;

/// Information about the compressed stream gathered while decoding it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamInfo {
    pub header: Lz77Header,
    /// bytes of the source read by the decoder, header included
    pub consumed: usize,
    pub literals: usize,
    pub references: usize,
}

impl StreamInfo {
    /// Size of the stream once padded the way the encoder pads it
    pub fn padded_len(&self) -> usize {
        Lz77Header::padded_len(self.consumed - HEADER_SIZE)
    }
}

/// Specify the decoding settings, such as logging and the source offset.
///
/// To create a new `Decoder`, use [`for_bytes()`]. Then, change any of the
/// decoder settings. Finally, decode the input data with [`decode()`].
/// ```
/// # use gba_lz77::{encode, Decoder};
/// let original = b"ABBACABBACD";
/// let compressed = encode(original).unwrap();
/// let decompressed = Decoder::for_bytes(&compressed)
///     .decode()
///     .unwrap();
/// assert_eq!(&original[..], decompressed);
/// ```
/// Compressed data usually lives somewhere inside a ROM image,
/// so the stream can start at an offset:
/// ```
/// # use gba_lz77::{encode, Decoder};
/// # let original = b"ABBACABBACD";
/// let mut rom = vec![0xFFu8; 0x20];
/// rom.extend(encode(original).unwrap());
/// let mut decoder = Decoder::for_bytes(&rom);
/// decoder.at_offset(0x20);
/// assert_eq!(decoder.header().unwrap().size as usize, original.len());
/// assert_eq!(decoder.decode().unwrap(), original);
/// ```
/// [`for_bytes()`]: Decoder::for_bytes
/// [`decode()`]: Decoder::decode
pub struct Decoder<'a> {
    src: &'a [u8],
    offset: usize,
    log: Option<LogWtr<'a>>,
}

impl<'a> Decoder<'a> {
    #[inline]
    pub fn for_bytes(bytes: &'a [u8]) -> Self {
        Self {
            src: bytes,
            offset: 0,
            log: None,
        }
    }

    /// Start decoding at `offset` bytes into the source
    #[inline]
    pub fn at_offset(&mut self, offset: usize) -> &mut Self {
        self.offset = offset;
        self
    }

    /// Write a trace of every decoded token to `wtr`
    #[inline]
    pub fn with_logging<W: Write>(&mut self, wtr: &'a mut W) -> &mut Self {
        self.log = Some(wtr as LogWtr);
        self
    }

    #[inline]
    pub fn header(&self) -> Result<Lz77Header, Lz77Error> {
        Lz77Header::from_bytes(self.stream()?)
    }

    #[inline]
    pub fn decode(&mut self) -> Result<Vec<u8>, Lz77Error> {
        do_decode(self).map(|(output, _)| output)
    }

    /// Decode the stream and also report how it was encoded
    #[inline]
    pub fn decode_with_info(&mut self) -> Result<(Vec<u8>, StreamInfo), Lz77Error> {
        do_decode(self)
    }

    fn stream(&self) -> Result<&'a [u8], Lz77Error> {
        self.src
            .get(self.offset..)
            .ok_or(Lz77Error::TruncatedHeader(0))
    }
}

/// Decompress the LZ77 data that starts at `offset` in `source`
///
/// This is a convenience function to decode without having to set up a [`Decoder`]
pub fn decode(source: &[u8], offset: usize) -> Result<Vec<u8>, Lz77Error> {
    Decoder::for_bytes(source).at_offset(offset).decode()
}

/// Extract the [`Lz77Header`] of the LZ77 data at `offset` in `source`
pub fn lz77_info(source: &[u8], offset: usize) -> Result<Lz77Header, Lz77Error> {
    Decoder::for_bytes(source).at_offset(offset).header()
}

fn do_decode(opt: &mut Decoder) -> Result<(Vec<u8>, StreamInfo), Lz77Error> {
    let src = opt.stream()?;
    let header = Lz77Header::from_bytes(src)?;
    let log = &mut opt.log;

    if let Some(wtr) = log.as_mut() {
        writeln!(wtr, "# Header\n{:?}", &header)?;
    }

    let output_size = header.size as usize;
    let mut output: Vec<u8> = Vec::with_capacity(output_size);
    let mut info = StreamInfo {
        header,
        consumed: HEADER_SIZE,
        literals: 0,
        references: 0,
    };

    // reads are byte sized, so running out means every source byte was read
    let truncated = |_: std::io::Error, decoded: usize| Lz77Error::TruncatedStream {
        consumed: src.len(),
        decoded,
        size: output_size,
    };

    let mut csr = Cursor::new(src);
    csr.set_position(HEADER_SIZE as u64);
    let mut bits = BitReader::endian(&mut csr, BigEndian);

    'blocks: while output.len() < output_size {
        let flags = bits.read::<u8>(8).map_err(|e| truncated(e, output.len()))?;

        for slot in 0..BLOCK_TOKENS {
            if flags & (0x80 >> slot) != 0 {
                let copy =
                    CopyBack::from_bitreader(&mut bits).map_err(|e| truncated(e, output.len()))?;
                let position = output.len();

                // the size check is against the whole output, then against
                // what has actually been written so far
                if copy.distance > output_size || copy.distance > position {
                    debug!("rejecting copy-back ({}) at {:#x}", copy, position);
                    return Err(Lz77Error::BadReference {
                        distance: copy.distance,
                        position,
                        size: output_size,
                    });
                }

                let start = position - copy.distance;
                let count = copy.count.min(output_size - position);
                for j in 0..count {
                    let byte = output[start + j % copy.distance];
                    output.push(byte);
                }
                info.references += 1;

                if let Some(wtr) = log.as_mut() {
                    writeln!(
                        wtr,
                        "{:04x} - Encoded [Copyback]: {} | start: {:04x}\n\t{:02x?}",
                        position,
                        copy,
                        start,
                        &output[position..]
                    )?;
                }
            } else {
                let byte = bits.read::<u8>(8).map_err(|e| truncated(e, output.len()))?;
                output.push(byte);
                info.literals += 1;

                if let Some(wtr) = log.as_mut() {
                    writeln!(wtr, "{:04x} - Uncoded: {:02x}", output.len() - 1, byte)?;
                }
            }

            if output.len() >= output_size {
                break 'blocks;
            }
        }
    }

    drop(bits);
    info.consumed = csr.position() as usize;

    Ok((output, info))
}
