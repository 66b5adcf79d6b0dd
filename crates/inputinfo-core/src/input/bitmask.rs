// Inputinfo Input Layer - Capability Bitmasks
// Parsing of the hex bitmask attributes the kernel publishes in sysfs

use std::fmt;
use std::ops::RangeInclusive;

/// Errors produced while parsing a sysfs bitmask
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BitmaskError {
    #[error("Invalid bitmask word '{0}'")]
    InvalidWord(String),

    #[error("Unsupported word width: {0} bits")]
    UnsupportedWidth(u32),
}

/// Set of event codes decoded from a kernel capability bitmask.
///
/// Attributes such as `capabilities/key` are printed by the kernel as
/// space-separated hex words, most significant word first, each word as wide
/// as the kernel's `long`:
///
/// ```text
/// 120013            -> bits 0, 1, 4, 17, 20
/// 10000 0           -> bit 16 of the second word (bit 80 on a 64-bit kernel)
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Bitmask {
    blocks: Vec<u64>,
}

impl Bitmask {
    /// Create an empty bitmask
    pub fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Parse a sysfs bitmask using the host word width.
    pub fn parse(text: &str) -> Result<Self, BitmaskError> {
        Self::parse_with_word_bits(text, usize::BITS)
    }

    /// Parse a sysfs bitmask produced by a kernel with `word_bits`-wide longs.
    pub fn parse_with_word_bits(text: &str, word_bits: u32) -> Result<Self, BitmaskError> {
        if word_bits != 32 && word_bits != 64 {
            return Err(BitmaskError::UnsupportedWidth(word_bits));
        }

        let mut mask = Self::new();

        // Least significant word is printed last
        for (index, word) in text.split_whitespace().rev().enumerate() {
            let value = u64::from_str_radix(word, 16)
                .map_err(|_| BitmaskError::InvalidWord(word.to_string()))?;
            if word_bits == 32 && value > u64::from(u32::MAX) {
                return Err(BitmaskError::InvalidWord(word.to_string()));
            }

            let base = index * word_bits as usize;
            for bit in 0..word_bits as usize {
                if value & (1u64 << bit) != 0 {
                    mask.insert_index(base + bit);
                }
            }
        }

        Ok(mask)
    }

    /// Build a bitmask from a list of codes
    pub fn from_codes(codes: &[u16]) -> Self {
        let mut mask = Self::new();
        for &code in codes {
            mask.insert(code);
        }
        mask
    }

    /// Set the bit for `code`
    pub fn insert(&mut self, code: u16) {
        self.insert_index(code as usize);
    }

    fn insert_index(&mut self, index: usize) {
        let block = index / 64;
        if block >= self.blocks.len() {
            self.blocks.resize(block + 1, 0);
        }
        self.blocks[block] |= 1u64 << (index % 64);
    }

    /// Check whether the bit for `code` is set
    pub fn contains(&self, code: u16) -> bool {
        let index = code as usize;
        self.blocks
            .get(index / 64)
            .map(|block| block & (1u64 << (index % 64)) != 0)
            .unwrap_or(false)
    }

    /// Check whether all of `codes` are set
    pub fn contains_all(&self, codes: &[u16]) -> bool {
        codes.iter().all(|&code| self.contains(code))
    }

    /// Check whether any code in `range` is set
    pub fn any_in(&self, range: RangeInclusive<u16>) -> bool {
        self.iter().any(|code| range.contains(&code))
    }

    /// Iterate set codes in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.blocks.iter().enumerate().flat_map(|(block, &bits)| {
            (0..64usize)
                .filter(move |&bit| bits & (1u64 << bit) != 0)
                .filter_map(move |bit| u16::try_from(block * 64 + bit).ok())
        })
    }

    /// Number of set codes
    pub fn len(&self) -> usize {
        self.blocks.iter().map(|b| b.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|&b| b == 0)
    }
}

impl fmt::Debug for Bitmask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
