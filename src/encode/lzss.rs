use std::{fmt, io::Write};

use smallvec::SmallVec;

use crate::{
    errors::Lz77Error,
    format::{CopyBack, Lz77Header, BLOCK_TOKENS, MAX_MATCH, MIN_MATCH, WINDOW_SIZE},
};

/// A possible copy-back at some position of the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// number of bytes matched, at most [`MAX_MATCH`]
    pub length: usize,
    /// how far behind the position the match starts
    pub distance: usize,
}

/// Find a match for the bytes at `position` in the data that comes before it.
///
/// Every earlier byte within the window that equals `buffer[position]` is a candidate.
/// The candidates are then extended one byte at a time, dropping the ones that stop
/// matching until only one is left or [`MAX_MATCH`] bytes match.
/// The extension reads through the bytes being matched, so a candidate closer than its
/// match length repeats itself the same way the decoder copies.
///
/// This is the greedy search Nintendo-era tools use: it doesn't look for the longest
/// or nearest match, and the nearest surviving candidate is the one reported.
/// ```
/// # use gba_lz77::{find_match, Match};
/// let found = find_match(b"ABABAB", 2);
/// assert_eq!(found, Some(Match { length: 4, distance: 2 }));
/// ```
/// There is no match for the first two bytes, or when fewer than two bytes are left.
/// A distance of one is never reported.
pub fn find_match(buffer: &[u8], position: usize) -> Option<Match> {
    let remaining = buffer.len().checked_sub(position)?;
    if position < 2 || remaining < 2 {
        return None;
    }

    let first = buffer[position];
    let mut candidates: SmallVec<[usize; 16]> = (2..=position.min(WINDOW_SIZE))
        .filter(|&d| buffer[position - d] == first)
        .collect();

    if candidates.is_empty() {
        return None;
    }

    let mut length = 0;
    let mut extending = true;
    while length < MAX_MATCH && extending {
        length += 1;
        // past the end of the input never matches
        let next = buffer.get(position + length);

        for i in (0..candidates.len()).rev() {
            let distance = candidates[i];
            let behind = buffer[position - distance + length % distance];

            if next != Some(&behind) {
                if candidates.len() > 1 {
                    candidates.remove(i);
                } else {
                    extending = false;
                }
            }
        }
    }

    Some(Match {
        length,
        distance: candidates[0],
    })
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(super) enum LzssByte {
    Encoded(CopyBack),
    Uncoded(u8),
}

impl LzssByte {
    // total number of bytes this byte encodes from the uncoded input
    fn size(&self) -> usize {
        match self {
            Self::Encoded(copy) => copy.count,
            Self::Uncoded(..) => 1,
        }
    }

    // number of bytes this takes up in the compressed stream
    fn encoded_size(&self) -> usize {
        match self {
            Self::Encoded(..) => CopyBack::ENCODED_SIZE,
            Self::Uncoded(..) => 1,
        }
    }
}

/// A flags byte and the tokens it describes
#[derive(Debug, Default)]
pub(super) struct Block {
    pub flags: u8,
    pub tokens: SmallVec<[LzssByte; BLOCK_TOKENS]>,
}

impl Block {
    fn add(&mut self, byte: LzssByte) {
        if let LzssByte::Encoded(..) = byte {
            self.flags |= 0x80 >> self.tokens.len();
        }
        self.tokens.push(byte);
    }

    fn is_full(&self) -> bool {
        self.tokens.len() == BLOCK_TOKENS
    }

    fn encoded_size(&self) -> usize {
        1 + self.tokens.iter().map(LzssByte::encoded_size).sum::<usize>()
    }
}

#[derive(Debug)]
pub(super) struct LzssPass {
    pub blocks: Vec<Block>,
    pub header: Lz77Header,
}

impl LzssPass {
    /// size of the blocks, not including the header or padding
    pub fn encoded_size(&self) -> usize {
        self.blocks.iter().map(Block::encoded_size).sum()
    }

    fn token_counts(&self) -> (usize, usize) {
        self.blocks
            .iter()
            .flat_map(|b| b.tokens.iter())
            .fold((0, 0), |(uncoded, encoded), t| match t {
                LzssByte::Uncoded(..) => (uncoded + 1, encoded),
                LzssByte::Encoded(..) => (uncoded, encoded + 1),
            })
    }
}

impl fmt::Display for LzssPass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (uncoded, encoded) = self.token_counts();
        writeln!(f, "# LZ77 Encoded Data")?;
        writeln!(
            f,
            "{} bytes => {} blocks, {} uncoded, {} encoded",
            self.header.size,
            self.blocks.len(),
            uncoded,
            encoded
        )?;

        let mut position = 0;
        for block in &self.blocks {
            writeln!(f, "flags: {:08b}", block.flags)?;
            for point in &block.tokens {
                write!(f, "{:04x} - ", position)?;
                match point {
                    LzssByte::Uncoded(b) => writeln!(f, "Uncoded: {:02x}", b),
                    LzssByte::Encoded(copy) => writeln!(f, "Encoded [Copyback]: {}", copy),
                }?;
                position += point.size();
            }
        }

        Ok(())
    }
}

/// Compress `input` into blocks of coded or uncoded `LzssByte`s.
/// Debugging information will be printed to `log` if present.
pub(super) fn compress(
    input: &[u8],
    log: &mut Option<&mut dyn Write>,
) -> Result<LzssPass, Lz77Error> {
    let header = Lz77Header::for_size(input.len())?;
    let mut blocks = Vec::with_capacity(input.len() / BLOCK_TOKENS + 1);
    let mut csr = 0;

    while csr < input.len() {
        let mut block = Block::default();

        while !block.is_full() && csr < input.len() {
            let found = find_match(input, csr);

            if let Some(wtr) = log.as_mut() {
                writeln!(wtr, "{:04x} - found {:?}", csr, found)?;
            }

            let byte = match found.filter(|m| m.length >= MIN_MATCH) {
                Some(m) => LzssByte::Encoded(CopyBack {
                    count: m.length,
                    distance: m.distance,
                }),
                None => LzssByte::Uncoded(input[csr]),
            };

            csr += byte.size();
            block.add(byte);
        }

        blocks.push(block);
    }

    Ok(LzssPass { blocks, header })
}
