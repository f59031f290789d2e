use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use crate::machine::Machine;
use crate::permutation::Permutation;
use crate::rotor::Rotor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Rotor type as written in a machine description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RotorType {
    Moving { notches: String },
    Fixed,
    Reflector,
}

impl std::str::FromStr for RotorType {
    type Err = EnigmaError;
    fn from_str(s: &str) -> Result<Self> {
        match s.chars().next() {
            Some('M') => Ok(Self::Moving {
                notches: s[1..].to_string(),
            }),
            Some('N') if s.len() == 1 => Ok(Self::Fixed),
            Some('R') if s.len() == 1 => Ok(Self::Reflector),
            _ => Err(EnigmaError::config(format!("bad rotor type \"{}\"", s))),
        }
    }
}

impl fmt::Display for RotorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Moving { notches } => write!(f, "M{}", notches),
            Self::Fixed => write!(f, "N"),
            Self::Reflector => write!(f, "R"),
        }
    }
}

/// One rotor of the catalog: its name, type and wiring in cycle notation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotorSpec {
    pub name: String,
    #[serde(flatten)]
    pub kind: RotorType,
    pub cycles: String,
}

impl RotorSpec {
    fn build(&self, alphabet: &Arc<Alphabet>) -> Result<Rotor> {
        let perm = Permutation::new(&self.cycles, alphabet.clone()).map_err(|e| match e {
            EnigmaError::Config(msg) => EnigmaError::config(format!("rotor {}: {}", self.name, msg)),
            other => other,
        })?;
        match &self.kind {
            RotorType::Moving { notches } => Rotor::moving(self.name.clone(), perm, notches),
            RotorType::Fixed => Ok(Rotor::fixed(self.name.clone(), perm)),
            RotorType::Reflector => Rotor::reflector(self.name.clone(), perm),
        }
    }
}

/// Full description of a machine: alphabet, slot geometry and rotor catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineConfig {
    pub alphabet: String,
    pub slots: usize,
    pub pawls: usize,
    pub rotors: Vec<RotorSpec>,
}

impl MachineConfig {
    /// Read a description from `path`; `.json` files are JSON, anything else
    /// uses the plain text layout accepted by [`MachineConfig::parse`]
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let config = if is_json {
            serde_json::from_str(&text)?
        } else {
            Self::parse(&text)?
        };
        tracing::debug!(
            path = %path.display(),
            rotors = config.rotors.len(),
            "loaded machine description"
        );
        Ok(config)
    }

    /// Parse the text layout:
    ///
    /// ```text
    /// ABCDEFGHIJKLMNOPQRSTUVWXYZ
    /// 5 3
    /// I MQ (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
    /// Beta N (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
    /// B R (AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP)
    ///      (RX) (SZ) (TV)
    /// ```
    ///
    /// Rotor types are `M` followed by the notch symbols, `N` or `R`.
    pub fn parse(text: &str) -> Result<Self> {
        let mut tokens = text.split_whitespace().peekable();

        let alphabet = tokens
            .next()
            .filter(|t| !t.contains(|c: char| c == '(' || c == ')'))
            .ok_or_else(|| EnigmaError::config("missing or malformed alphabet"))?
            .to_string();
        let slots = parse_count(tokens.next(), "rotor slots")?;
        let pawls = parse_count(tokens.next(), "pawls")?;
        if pawls >= slots {
            return Err(EnigmaError::config(format!(
                "{} pawls requires more than {} rotor slots",
                pawls, slots
            )));
        }

        let mut rotors = Vec::new();
        while let Some(name) = tokens.next() {
            if name.starts_with('(') {
                return Err(EnigmaError::config(format!(
                    "expected a rotor name, found \"{}\"",
                    name
                )));
            }
            let kind: RotorType = tokens
                .next()
                .ok_or_else(|| {
                    EnigmaError::config(format!("configuration truncated in rotor {}", name))
                })?
                .parse()
                .map_err(|_| EnigmaError::config(format!("rotor {} has a bad type", name)))?;

            let mut cycles = Vec::new();
            while let Some(tok) = tokens.next_if(|t| t.starts_with('(')) {
                cycles.push(tok);
            }
            rotors.push(RotorSpec {
                name: name.to_string(),
                kind,
                cycles: cycles.join(" "),
            });
        }

        Ok(Self {
            alphabet,
            slots,
            pawls,
            rotors,
        })
    }

    /// Validate the description and assemble the machine it describes
    pub fn build(&self) -> Result<Machine> {
        let alphabet = Arc::new(Alphabet::new(&self.alphabet)?);
        let rotors = self
            .rotors
            .iter()
            .map(|spec| spec.build(&alphabet))
            .collect::<Result<Vec<_>>>()?;
        Machine::new(alphabet, self.slots, self.pawls, rotors)
    }
}

fn parse_count(token: Option<&str>, what: &str) -> Result<usize> {
    let token = token.ok_or_else(|| EnigmaError::config(format!("configuration truncated before {}", what)))?;
    token
        .parse()
        .map_err(|_| EnigmaError::config(format!("bad number of {}: \"{}\"", what, token)))
}
