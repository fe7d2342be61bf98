//! Symbol sets accepted for nucleotide and amino-acid input.

pub mod dna;
pub mod protein;

use bit_set::BitSet;
use std::borrow::Borrow;

/// A set of byte symbols, stored as a bit set over `0..256`.
#[derive(Default, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Alphabet {
    symbols: BitSet,
}

impl Alphabet {
    pub fn new<C, T>(symbols: T) -> Self
    where
        C: Borrow<u8>,
        T: IntoIterator<Item = C>,
    {
        let symbols = symbols
            .into_iter()
            .map(|c| *c.borrow() as usize)
            .collect();
        Alphabet { symbols }
    }

    #[inline]
    pub fn contains(&self, a: u8) -> bool {
        self.symbols.contains(a as usize)
    }

    /// Every byte of `text` belongs to the alphabet.
    pub fn is_word<C, T>(&self, text: T) -> bool
    where
        C: Borrow<u8>,
        T: IntoIterator<Item = C>,
    {
        text.into_iter().all(|c| self.contains(*c.borrow()))
    }

    pub fn union(&self, other: &Alphabet) -> Self {
        Alphabet {
            symbols: self.symbols.union(&other.symbols).collect(),
        }
    }
}
