use crate::error::{EnigmaError, Result};
use std::collections::HashMap;
use std::fmt;

/// Characters that carry meaning in cycle notation and setting lines
const RESERVED: [char; 3] = ['(', ')', '*'];

/// Ordered set of encodable symbols, indexed densely from 0
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
    index: HashMap<char, usize>,
}

impl Alphabet {
    /// Build an alphabet from `chars`; the k-th character gets index k
    pub fn new(chars: &str) -> Result<Self> {
        let mut symbols = Vec::with_capacity(chars.len());
        let mut index = HashMap::with_capacity(chars.len());

        for ch in chars.chars() {
            if ch.is_whitespace() || RESERVED.contains(&ch) {
                return Err(EnigmaError::config(format!(
                    "'{}' cannot be used as an alphabet symbol",
                    ch
                )));
            }
            if index.insert(ch, symbols.len()).is_some() {
                return Err(EnigmaError::config(format!(
                    "duplicate symbol '{}' in alphabet",
                    ch
                )));
            }
            symbols.push(ch);
        }

        if symbols.is_empty() {
            return Err(EnigmaError::config("alphabet is empty"));
        }

        Ok(Self { symbols, index })
    }

    /// Number of symbols
    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    pub fn contains(&self, ch: char) -> bool {
        self.index.contains_key(&ch)
    }

    /// Symbol at `index`
    pub fn to_char(&self, index: usize) -> Result<char> {
        self.symbols
            .get(index)
            .copied()
            .ok_or(EnigmaError::OutOfRange {
                index,
                size: self.size(),
            })
    }

    /// Index of `ch`, the inverse of [`Alphabet::to_char`]
    pub fn to_int(&self, ch: char) -> Result<usize> {
        self.index
            .get(&ch)
            .copied()
            .ok_or(EnigmaError::SymbolNotFound(ch))
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        let symbols: Vec<char> = ('A'..='Z').collect();
        let index = symbols.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Self { symbols, index }
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in &self.symbols {
            write!(f, "{}", ch)?;
        }
        Ok(())
    }
}
