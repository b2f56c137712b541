//! Reading and writing LZ77 data inside a larger image, such as a ROM.

use crate::{decode::decode, encode::encode, errors::Lz77Error};
use log::trace;

/// A fixed-size store of bytes that can be read and written at an offset
///
/// The slices handed out by [`read`](ByteRegion::read) only need to stay
/// valid while a single decode is running.
pub trait ByteRegion {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self, offset: usize, length: usize) -> Result<&[u8], Lz77Error>;

    fn write(&mut self, offset: usize, bytes: &[u8]) -> Result<(), Lz77Error>;
}

fn out_of_region(offset: usize, length: usize, region: usize) -> Lz77Error {
    Lz77Error::OutOfRegion {
        offset,
        length,
        region,
    }
}

impl ByteRegion for [u8] {
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    fn read(&self, offset: usize, length: usize) -> Result<&[u8], Lz77Error> {
        offset
            .checked_add(length)
            .and_then(|end| self.get(offset..end))
            .ok_or_else(|| out_of_region(offset, length, self.len()))
    }

    fn write(&mut self, offset: usize, bytes: &[u8]) -> Result<(), Lz77Error> {
        let region = self.len();
        offset
            .checked_add(bytes.len())
            .and_then(move |end| self.get_mut(offset..end))
            .ok_or_else(|| out_of_region(offset, bytes.len(), region))?
            .copy_from_slice(bytes);

        Ok(())
    }
}

/// A `Vec` is treated as a fixed-size image: writes never grow it.
impl ByteRegion for Vec<u8> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn read(&self, offset: usize, length: usize) -> Result<&[u8], Lz77Error> {
        self.as_slice().read(offset, length)
    }

    fn write(&mut self, offset: usize, bytes: &[u8]) -> Result<(), Lz77Error> {
        self.as_mut_slice().write(offset, bytes)
    }
}

/// Decode the LZ77 data at `offset` in `region`
pub fn read_compressed<R>(region: &R, offset: usize) -> Result<Vec<u8>, Lz77Error>
where
    R: ByteRegion + ?Sized,
{
    let available = region.len().saturating_sub(offset);
    let stream = region.read(offset, available)?;

    decode(stream, 0)
}

/// Compress `raw` and write the padded stream at `offset` in `region`.
///
/// Returns the number of bytes written. Nothing is written unless the whole
/// stream fits in the region.
pub fn write_compressed<R>(region: &mut R, offset: usize, raw: &[u8]) -> Result<usize, Lz77Error>
where
    R: ByteRegion + ?Sized,
{
    let compressed = encode(raw)?;
    trace!(
        "writing {} compressed bytes at {:#x}",
        compressed.len(),
        offset
    );
    region.write(offset, &compressed)?;

    Ok(compressed.len())
}
