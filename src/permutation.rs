use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use std::fmt;
use std::sync::Arc;

/// A bijection over the index space of an alphabet, given in cycle notation
#[derive(Debug, Clone)]
pub struct Permutation {
    alphabet: Arc<Alphabet>,
    forward: Vec<usize>,
    inverse: Vec<usize>,
}

impl Permutation {
    /// Parse `cycles` of the form "(ABC) (DE) ..." over `alphabet`.
    /// Symbols that appear in no cycle map to themselves.
    pub fn new(cycles: &str, alphabet: Arc<Alphabet>) -> Result<Self> {
        let size = alphabet.size();
        let mut forward: Vec<usize> = (0..size).collect();
        let mut seen = vec![false; size];

        for cycle in parse_cycles(cycles)? {
            let mut members = Vec::with_capacity(cycle.len());
            for ch in cycle.chars() {
                let idx = alphabet.to_int(ch).map_err(|_| {
                    EnigmaError::config(format!("'{}' in cycle ({}) is not in the alphabet", ch, cycle))
                })?;
                if seen[idx] {
                    return Err(EnigmaError::config(format!(
                        "'{}' appears more than once in \"{}\"",
                        ch,
                        cycles.trim()
                    )));
                }
                seen[idx] = true;
                members.push(idx);
            }

            // Each member maps to its successor; the last closes back to the first
            for (pos, &from) in members.iter().enumerate() {
                forward[from] = members[(pos + 1) % members.len()];
            }
        }

        let mut inverse = vec![0usize; size];
        for (from, &to) in forward.iter().enumerate() {
            inverse[to] = from;
        }

        Ok(Self {
            alphabet,
            forward,
            inverse,
        })
    }

    /// The permutation with no cycles
    pub fn identity(alphabet: Arc<Alphabet>) -> Self {
        let forward: Vec<usize> = (0..alphabet.size()).collect();
        Self {
            inverse: forward.clone(),
            forward,
            alphabet,
        }
    }

    /// Size of the alphabet permuted
    pub fn size(&self) -> usize {
        self.forward.len()
    }

    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Reduce a possibly negative `p` modulo [`Permutation::size`]
    pub fn wrap(&self, p: isize) -> usize {
        p.rem_euclid(self.size() as isize) as usize
    }

    /// Apply the permutation to `p` modulo the alphabet size
    pub fn permute(&self, p: usize) -> usize {
        self.forward[p % self.size()]
    }

    /// Apply the inverse permutation to `c` modulo the alphabet size
    pub fn invert(&self, c: usize) -> usize {
        self.inverse[c % self.size()]
    }

    pub fn permute_char(&self, ch: char) -> Result<char> {
        self.alphabet.to_char(self.permute(self.alphabet.to_int(ch)?))
    }

    pub fn invert_char(&self, ch: char) -> Result<char> {
        self.alphabet.to_char(self.invert(self.alphabet.to_int(ch)?))
    }

    /// True iff no index maps to itself
    pub fn derangement(&self) -> bool {
        self.forward.iter().enumerate().all(|(i, &p)| i != p)
    }

    /// True iff the permutation is its own inverse (only swaps and fixed points)
    pub fn is_involution(&self) -> bool {
        self.forward == self.inverse
    }
}

impl fmt::Display for Permutation {
    /// Canonical cycle notation, fixed points omitted
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbols = self.alphabet.symbols();
        let mut visited = vec![false; self.size()];
        let mut first = true;

        for start in 0..self.size() {
            if visited[start] || self.forward[start] == start {
                visited[start] = true;
                continue;
            }
            if !first {
                write!(f, " ")?;
            }
            first = false;

            write!(f, "(")?;
            let mut current = start;
            loop {
                visited[current] = true;
                write!(f, "{}", symbols[current])?;
                current = self.forward[current];
                if current == start {
                    break;
                }
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// Split cycle notation into the bodies of its cycles, ignoring whitespace
fn parse_cycles(text: &str) -> Result<Vec<String>> {
    let mut cycles = Vec::new();
    let mut current: Option<String> = None;

    for ch in text.chars().filter(|c| !c.is_whitespace()) {
        match (ch, current.as_mut()) {
            ('(', None) => current = Some(String::new()),
            ('(', Some(_)) => {
                return Err(EnigmaError::config(format!(
                    "nested '(' in cycle notation \"{}\"",
                    text.trim()
                )))
            }
            (')', Some(_)) => {
                if let Some(body) = current.take() {
                    if !body.is_empty() {
                        cycles.push(body);
                    }
                }
            }
            (')', None) => {
                return Err(EnigmaError::config(format!(
                    "unmatched ')' in cycle notation \"{}\"",
                    text.trim()
                )))
            }
            (_, Some(body)) => body.push(ch),
            (_, None) => {
                return Err(EnigmaError::config(format!(
                    "'{}' outside of a cycle in \"{}\"",
                    ch,
                    text.trim()
                )))
            }
        }
    }

    if current.is_some() {
        return Err(EnigmaError::config(format!(
            "unclosed cycle in \"{}\"",
            text.trim()
        )));
    }

    Ok(cycles)
}
