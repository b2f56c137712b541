//! Encode or decode many independent buffers at once.
//!
//! Each buffer is its own unit of work, so results match the single-buffer
//! functions exactly and come back in input order.

use crate::{decode::decode, encode::encode, errors::Lz77Error};
use rayon::prelude::*;

/// Compress every buffer in `inputs` in parallel
pub fn encode_batch(inputs: &[&[u8]]) -> Vec<Result<Vec<u8>, Lz77Error>> {
    inputs.par_iter().map(|input| encode(input)).collect()
}

/// Decompress every `(source, offset)` stream in `inputs` in parallel
pub fn decode_batch(inputs: &[(&[u8], usize)]) -> Vec<Result<Vec<u8>, Lz77Error>> {
    inputs
        .par_iter()
        .map(|&(source, offset)| decode(source, offset))
        .collect()
}
