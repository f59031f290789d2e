use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use crate::permutation::Permutation;
use std::fmt;
use std::sync::Arc;

/// The closed set of rotor behaviours
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotorKind {
    /// Rotates on each step; allows its left neighbour to advance at any notch
    Moving { notches: Vec<usize> },
    /// Never rotates
    Fixed,
    /// Never rotates; turns the signal back through the stack
    Reflector,
}

/// A wheel wired with a permutation, positioned by a setting and a ring offset
#[derive(Debug, Clone)]
pub struct Rotor {
    name: String,
    permutation: Permutation,
    kind: RotorKind,
    setting: usize,
    ring_setting: usize,
}

impl Rotor {
    /// A rotating rotor; each symbol of `notches` must be in the permutation's alphabet
    pub fn moving(name: impl Into<String>, permutation: Permutation, notches: &str) -> Result<Self> {
        let name = name.into();
        let alphabet = permutation.alphabet();
        let mut positions = Vec::with_capacity(notches.len());
        for ch in notches.chars() {
            let pos = alphabet.to_int(ch).map_err(|_| {
                EnigmaError::config(format!("notch '{}' of rotor {} is not in the alphabet", ch, name))
            })?;
            if !positions.contains(&pos) {
                positions.push(pos);
            }
        }
        Ok(Self::with_kind(name, permutation, RotorKind::Moving { notches: positions }))
    }

    pub fn fixed(name: impl Into<String>, permutation: Permutation) -> Self {
        Self::with_kind(name.into(), permutation, RotorKind::Fixed)
    }

    /// A reflector; the permutation must leave no symbol in place
    pub fn reflector(name: impl Into<String>, permutation: Permutation) -> Result<Self> {
        let name = name.into();
        if !permutation.derangement() {
            return Err(EnigmaError::config(format!(
                "reflector {} maps a symbol to itself",
                name
            )));
        }
        Ok(Self::with_kind(name, permutation, RotorKind::Reflector))
    }

    fn with_kind(name: String, permutation: Permutation, kind: RotorKind) -> Self {
        Self {
            name,
            permutation,
            kind,
            setting: 0,
            ring_setting: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &RotorKind {
        &self.kind
    }

    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    pub fn alphabet(&self) -> &Arc<Alphabet> {
        self.permutation.alphabet()
    }

    pub fn size(&self) -> usize {
        self.permutation.size()
    }

    /// True iff the rotor has a pawl-driven ratchet
    pub fn rotates(&self) -> bool {
        matches!(self.kind, RotorKind::Moving { .. })
    }

    pub fn reflecting(&self) -> bool {
        matches!(self.kind, RotorKind::Reflector)
    }

    /// Current rotational position
    pub fn setting(&self) -> usize {
        self.setting
    }

    pub fn ring_setting(&self) -> usize {
        self.ring_setting
    }

    /// Set the rotational position, reduced modulo the alphabet size
    pub fn set(&mut self, posn: usize) {
        self.setting = posn % self.size();
    }

    /// Set the rotational position to the index of `ch`
    pub fn set_symbol(&mut self, ch: char) -> Result<()> {
        let posn = self.alphabet().to_int(ch)?;
        self.set(posn);
        Ok(())
    }

    pub fn set_ring_setting(&mut self, offset: usize) {
        self.ring_setting = offset % self.size();
    }

    /// Back to position 0 with no ring offset
    pub fn reset(&mut self) {
        self.setting = 0;
        self.ring_setting = 0;
    }

    /// Notch symbols as a string; empty unless the rotor moves
    pub fn notches(&self) -> String {
        match &self.kind {
            RotorKind::Moving { notches } => notches
                .iter()
                .filter_map(|&n| self.alphabet().to_char(n).ok())
                .collect(),
            RotorKind::Fixed | RotorKind::Reflector => String::new(),
        }
    }

    /// True iff positioned to let the rotor on its left advance
    pub fn at_notch(&self) -> bool {
        match &self.kind {
            RotorKind::Moving { notches } => notches.contains(&self.setting),
            RotorKind::Fixed | RotorKind::Reflector => false,
        }
    }

    /// Advance one position if this rotor rotates
    pub fn advance(&mut self) {
        if self.rotates() {
            self.setting = (self.setting + 1) % self.size();
        }
    }

    /// Net rotation of the wiring relative to the contacts
    fn shift(&self) -> usize {
        let size = self.size();
        (self.setting + size - self.ring_setting) % size
    }

    /// Convert the contact index `p` entering from the right
    pub fn convert_forward(&self, p: usize) -> usize {
        let size = self.size();
        let shift = self.shift();
        let result = self.permutation.permute((p + shift) % size);
        (result + size - shift) % size
    }

    /// Convert the contact index `e` entering from the left
    pub fn convert_backward(&self, e: usize) -> usize {
        let size = self.size();
        let shift = self.shift();
        let result = self.permutation.invert((e + shift) % size);
        (result + size - shift) % size
    }
}

impl fmt::Display for Rotor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rotor {}", self.name)
    }
}
