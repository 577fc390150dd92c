//! # Program Images
//!
//! A [`Program`] is the immutable "factory reset" image a machine starts from on every
//! fresh run. It is parsed once from comma-separated text (or built from a sparse
//! address/value mapping) and never mutated afterwards; machines and their clones share
//! one image behind an `Arc`.

use std::collections::BTreeMap;
use std::num::ParseIntError;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

/// Errors produced while building a program image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The program text contained no tokens.
    #[error("program text is empty")]
    Empty,

    /// A token could not be parsed as a signed 64-bit integer.
    #[error("invalid integer {token:?} at position {index}")]
    InvalidInteger {
        /// Zero-based token position (which is also its address).
        index: usize,
        /// The offending token, trimmed.
        token: String,
        #[source]
        source: ParseIntError,
    },

    /// A sparse image named a negative address.
    #[error("negative address {address} in program image")]
    NegativeAddress { address: i64 },
}

/// Immutable Intcode program image.
///
/// # Examples
///
/// ```
/// use intcode::Program;
///
/// let program: Program = "1,9,10,3,2,3,11,0,99,30,40,50".parse().unwrap();
/// assert_eq!(program.len(), 12);
/// assert_eq!(program.get(9), 30);
/// assert_eq!(program.get(500), 0); // beyond the image reads as zero
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    cells: Arc<BTreeMap<u64, i64>>,
}

impl Program {
    /// Parses comma-separated signed decimal integers.
    ///
    /// Whitespace around the whole text and around each token is ignored, so a trailing
    /// newline from an input file is harmless. Empty tokens are rejected.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ParseError::Empty);
        }

        let mut cells = BTreeMap::new();
        for (index, token) in text.split(',').enumerate() {
            let token = token.trim();
            let value = token
                .parse::<i64>()
                .map_err(|source| ParseError::InvalidInteger {
                    index,
                    token: token.to_string(),
                    source,
                })?;
            cells.insert(index as u64, value);
        }

        Ok(Self {
            cells: Arc::new(cells),
        })
    }

    /// Builds an image from a pre-built address/value mapping.
    ///
    /// Later entries for the same address replace earlier ones.
    ///
    /// # Examples
    ///
    /// ```
    /// use intcode::Program;
    ///
    /// let program = Program::from_sparse([(0, 99), (1000, 7)]).unwrap();
    /// assert_eq!(program.len(), 1001);
    /// assert_eq!(program.get(1000), 7);
    /// assert!(Program::from_sparse([(-1, 0)]).is_err());
    /// ```
    pub fn from_sparse<I>(cells: I) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = (i64, i64)>,
    {
        let mut image = BTreeMap::new();
        for (address, value) in cells {
            let slot =
                u64::try_from(address).map_err(|_| ParseError::NegativeAddress { address })?;
            image.insert(slot, value);
        }
        Ok(Self {
            cells: Arc::new(image),
        })
    }

    /// One past the highest address present in the image (0 for an empty image).
    ///
    /// Saturates at `u64::MAX` for an image that defines the last address.
    pub fn len(&self) -> u64 {
        self.cells
            .last_key_value()
            .map(|(&address, _)| address.saturating_add(1))
            .unwrap_or(0)
    }

    /// Returns true if the image holds no words.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reads the word at `address`, or zero if the image does not define it.
    pub fn get(&self, address: u64) -> i64 {
        self.cells.get(&address).copied().unwrap_or(0)
    }

    /// Iterates over the defined words in address order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, i64)> + '_ {
        self.cells.iter().map(|(&address, &value)| (address, value))
    }

    /// Returns the image as a dense vector of `len()` words.
    ///
    /// Meant for compact images; a sparse image with far addresses allocates every
    /// word below its highest one. Use [`iter`](Self::iter) for those.
    pub fn to_vec(&self) -> Vec<i64> {
        let mut words = vec![0; self.len() as usize];
        for (address, value) in self.iter() {
            words[address as usize] = value;
        }
        words
    }

    /// Returns a new image with the given words overwritten.
    ///
    /// The receiver is left untouched. This is how callers set up variants of a program
    /// before running it, since a fresh run always reloads memory from the image.
    ///
    /// # Examples
    ///
    /// ```
    /// use intcode::Program;
    ///
    /// let program: Program = "1,0,0,0,99".parse().unwrap();
    /// let patched = program.patched(&[(1, 12), (2, 2)]);
    /// assert_eq!(patched.get(1), 12);
    /// assert_eq!(program.get(1), 0);
    /// ```
    pub fn patched(&self, patches: &[(u64, i64)]) -> Program {
        let mut cells = (*self.cells).clone();
        for &(address, value) in patches {
            cells.insert(address, value);
        }
        Program {
            cells: Arc::new(cells),
        }
    }

    /// Returns true if both handles refer to the same underlying image.
    pub fn shares_image(&self, other: &Program) -> bool {
        Arc::ptr_eq(&self.cells, &other.cells)
    }
}

impl FromStr for Program {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Program::parse(s)
    }
}

impl From<Vec<i64>> for Program {
    fn from(words: Vec<i64>) -> Self {
        Program::from(words.as_slice())
    }
}

impl From<&[i64]> for Program {
    fn from(words: &[i64]) -> Self {
        let cells = words
            .iter()
            .enumerate()
            .map(|(address, &value)| (address as u64, value))
            .collect();
        Program {
            cells: Arc::new(cells),
        }
    }
}
