use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use crate::permutation::Permutation;
use crate::rotor::Rotor;
use std::collections::HashMap;
use std::sync::Arc;

/// A complete rotor machine: a catalog of available rotors, the slots they
/// are inserted into, and a plugboard.
///
/// Slot 0 holds the reflector and slot `num_rotors - 1` the fast rotor.
/// Slots store indices into the catalog, so each rotor sits in at most one
/// slot and keeps its identity across setups.
#[derive(Debug, Clone)]
pub struct Machine {
    alphabet: Arc<Alphabet>,
    num_rotors: usize,
    pawls: usize,
    catalog: Vec<Rotor>,
    by_name: HashMap<String, usize>,
    slots: Vec<usize>,
    plugboard: Permutation,
    verbose: bool,
}

impl Machine {
    /// A machine with `num_rotors` slots, `pawls` of them driven, able to use
    /// any rotor in `rotors`
    pub fn new(
        alphabet: Arc<Alphabet>,
        num_rotors: usize,
        pawls: usize,
        rotors: Vec<Rotor>,
    ) -> Result<Self> {
        if num_rotors < 2 {
            return Err(EnigmaError::config(format!(
                "a machine needs at least 2 rotor slots, got {}",
                num_rotors
            )));
        }
        if pawls >= num_rotors {
            return Err(EnigmaError::config(format!(
                "{} pawls is too many for {} rotor slots",
                pawls, num_rotors
            )));
        }

        let mut by_name = HashMap::with_capacity(rotors.len());
        for (i, rotor) in rotors.iter().enumerate() {
            if **rotor.alphabet() != *alphabet {
                return Err(EnigmaError::config(format!(
                    "rotor {} is wired over a different alphabet",
                    rotor.name()
                )));
            }
            if by_name.insert(rotor.name().to_string(), i).is_some() {
                return Err(EnigmaError::config(format!(
                    "rotor {} is described more than once",
                    rotor.name()
                )));
            }
        }

        Ok(Self {
            plugboard: Permutation::identity(alphabet.clone()),
            alphabet,
            num_rotors,
            pawls,
            catalog: rotors,
            by_name,
            slots: Vec::new(),
            verbose: false,
        })
    }

    pub fn num_rotors(&self) -> usize {
        self.num_rotors
    }

    /// Number of pawls, and thus of rotating rotors
    pub fn num_pawls(&self) -> usize {
        self.pawls
    }

    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// All rotors this machine can use
    pub fn catalog(&self) -> &[Rotor] {
        &self.catalog
    }

    /// The rotor in slot `k`, if rotors have been inserted
    pub fn rotor(&self, k: usize) -> Option<&Rotor> {
        self.slots.get(k).map(|&i| &self.catalog[i])
    }

    pub fn plugboard(&self) -> &Permutation {
        &self.plugboard
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Emit a debug trace of every conversion
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Fill the slots with the rotors named in `names`, reflector first.
    /// Every inserted rotor starts at setting 0 with no ring offset.
    pub fn insert_rotors<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        if names.len() != self.num_rotors {
            return Err(EnigmaError::config(format!(
                "expected {} rotors, got {}",
                self.num_rotors,
                names.len()
            )));
        }

        let mut slots = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let idx = *self
                .by_name
                .get(name)
                .ok_or_else(|| EnigmaError::config(format!("unknown rotor {}", name)))?;
            if slots.contains(&idx) {
                return Err(EnigmaError::config(format!("rotor {} is used twice", name)));
            }
            slots.push(idx);
        }

        let rotors: Vec<&Rotor> = slots.iter().map(|&i| &self.catalog[i]).collect();

        if !rotors[0].reflecting() {
            return Err(EnigmaError::config(format!(
                "rotor {} in the first slot is not a reflector",
                rotors[0].name()
            )));
        }
        if let Some(r) = rotors[1..].iter().find(|r| r.reflecting()) {
            return Err(EnigmaError::config(format!(
                "reflector {} is only allowed in the first slot",
                r.name()
            )));
        }

        let moving = rotors.iter().filter(|r| r.rotates()).count();
        if moving != self.pawls {
            return Err(EnigmaError::config(format!(
                "{} moving rotors inserted but the machine has {} pawls",
                moving, self.pawls
            )));
        }

        for pair in rotors.windows(2) {
            if pair[0].rotates() && !pair[1].rotates() {
                return Err(EnigmaError::config(format!(
                    "non-moving rotor {} is right of moving rotor {}",
                    pair[1].name(),
                    pair[0].name()
                )));
            }
        }

        for &i in &slots {
            self.catalog[i].reset();
        }
        self.slots = slots;
        Ok(())
    }

    fn require_rotors(&self) -> Result<()> {
        if self.slots.is_empty() {
            return Err(EnigmaError::config("no rotors have been inserted"));
        }
        Ok(())
    }

    /// Parse one symbol per non-reflector slot, leftmost first
    fn slot_positions(&self, what: &str, symbols: &str) -> Result<Vec<usize>> {
        self.require_rotors()?;
        let count = symbols.chars().count();
        if count != self.num_rotors - 1 {
            return Err(EnigmaError::config(format!(
                "{} \"{}\" should have {} symbols",
                what,
                symbols,
                self.num_rotors - 1
            )));
        }
        symbols.chars().map(|ch| self.alphabet.to_int(ch)).collect()
    }

    /// Set the rotational positions of slots 1.. from `setting`
    pub fn set_rotors(&mut self, setting: &str) -> Result<()> {
        let positions = self.slot_positions("setting", setting)?;
        for (k, posn) in positions.into_iter().enumerate() {
            let idx = self.slots[k + 1];
            self.catalog[idx].set(posn);
        }
        Ok(())
    }

    /// Set the ring offsets of slots 1.. from `ring_setting`
    pub fn set_ring_setting(&mut self, ring_setting: &str) -> Result<()> {
        let offsets = self.slot_positions("ring setting", ring_setting)?;
        for (k, offset) in offsets.into_iter().enumerate() {
            let idx = self.slots[k + 1];
            self.catalog[idx].set_ring_setting(offset);
        }
        Ok(())
    }

    /// Replace the plugboard; it must only swap pairs of symbols
    pub fn set_plugboard(&mut self, plugboard: Permutation) -> Result<()> {
        if **plugboard.alphabet() != *self.alphabet {
            return Err(EnigmaError::config("plugboard uses a different alphabet"));
        }
        if !plugboard.is_involution() {
            return Err(EnigmaError::config(format!(
                "plugboard {} must consist of pairs only",
                plugboard
            )));
        }
        self.plugboard = plugboard;
        Ok(())
    }

    /// Current positions of slots 1.., as symbols
    pub fn settings(&self) -> String {
        let symbols = self.alphabet.symbols();
        self.slots[1.min(self.slots.len())..]
            .iter()
            .map(|&i| symbols[self.catalog[i].setting()])
            .collect()
    }

    /// Advance the rotors by one keypress without converting anything
    pub fn step(&mut self) -> Result<()> {
        self.require_rotors()?;
        self.advance_rotors();
        Ok(())
    }

    fn slot(&self, k: usize) -> &Rotor {
        &self.catalog[self.slots[k]]
    }

    /// Pawl stepping, including the double step of a middle rotor that
    /// sits at its own notch.
    fn advance_rotors(&mut self) {
        let last = self.num_rotors - 1;
        for i in 1..last {
            if self.slot(i + 1).at_notch() {
                self.catalog[self.slots[i]].advance();
            } else if self.slot(i).at_notch() && self.slot(i - 1).rotates() {
                self.catalog[self.slots[i]].advance();
            }
        }
        self.catalog[self.slots[last]].advance();
    }

    /// Convert the index `c`, after first advancing the rotors
    pub fn convert(&mut self, c: usize) -> Result<usize> {
        self.require_rotors()?;
        if c >= self.alphabet.size() {
            return Err(EnigmaError::OutOfRange {
                index: c,
                size: self.alphabet.size(),
            });
        }

        self.advance_rotors();

        let mut path = Vec::new();
        let trace = self.verbose;
        let mut record = |p: usize| {
            if trace {
                path.push(p);
            }
            p
        };

        let mut p = record(c);
        p = record(self.plugboard.permute(p));
        for &i in self.slots.iter().rev() {
            p = record(self.catalog[i].convert_forward(p));
        }
        for &i in &self.slots[1..] {
            p = record(self.catalog[i].convert_backward(p));
        }
        p = record(self.plugboard.permute(p));

        if trace {
            let symbols = self.alphabet.symbols();
            let route: Vec<String> = path.iter().map(|&i| symbols[i].to_string()).collect();
            tracing::debug!(
                positions = %self.settings(),
                "{}",
                route.join(" -> ")
            );
        }

        Ok(p)
    }

    /// Convert every non-blank symbol of `msg` in order, dropping whitespace
    pub fn convert_message(&mut self, msg: &str) -> Result<String> {
        let mut out = String::with_capacity(msg.len());
        for ch in msg.chars().filter(|c| !c.is_whitespace()) {
            let converted = self.convert(self.alphabet.to_int(ch)?)?;
            out.push(self.alphabet.to_char(converted)?);
        }
        Ok(out)
    }
}
