use crate::error::{EnigmaError, Result};
use crate::machine::Machine;
use crate::permutation::Permutation;
use std::fmt;

/// A parsed setting line:
///
/// ```text
/// * B Beta III IV I AXLE [RING] (HQ) (EX) (IP) (TR) (BW)
/// ```
///
/// Rotor names (reflector first), initial positions, an optional ring
/// setting, then plugboard pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setup {
    pub rotors: Vec<String>,
    pub positions: String,
    pub ring_setting: Option<String>,
    pub plugboard: String,
}

impl Setup {
    /// True iff `line` introduces a new message
    pub fn is_setting_line(line: &str) -> bool {
        line.trim_start().starts_with('*')
    }

    /// Parse a setting line for a machine with `num_rotors` slots
    pub fn parse(line: &str, num_rotors: usize) -> Result<Self> {
        let body = line
            .trim_start()
            .strip_prefix('*')
            .ok_or_else(|| EnigmaError::config(format!("setting line \"{}\" must start with '*'", line)))?;
        let mut tokens = body.split_whitespace().peekable();

        let mut rotors = Vec::with_capacity(num_rotors);
        for _ in 0..num_rotors {
            match tokens.next_if(|t| !t.starts_with('(')) {
                Some(name) => rotors.push(name.to_string()),
                None => {
                    return Err(EnigmaError::config(format!(
                        "setting line names {} rotors, expected {}",
                        rotors.len(),
                        num_rotors
                    )))
                }
            }
        }

        let positions = tokens
            .next_if(|t| !t.starts_with('('))
            .ok_or_else(|| EnigmaError::config("setting line has no rotor positions"))?
            .to_string();
        let ring_setting = tokens.next_if(|t| !t.starts_with('(')).map(str::to_string);

        let mut plugs = Vec::new();
        for tok in tokens {
            if !tok.starts_with('(') {
                return Err(EnigmaError::config(format!(
                    "unexpected \"{}\" in setting line",
                    tok
                )));
            }
            plugs.push(tok);
        }

        Ok(Self {
            rotors,
            positions,
            ring_setting,
            plugboard: plugs.join(" "),
        })
    }

    /// Configure `machine`: rotors, positions, ring setting, plugboard
    pub fn apply(&self, machine: &mut Machine) -> Result<()> {
        machine.insert_rotors(&self.rotors)?;
        machine.set_rotors(&self.positions)?;
        if let Some(ring) = &self.ring_setting {
            machine.set_ring_setting(ring)?;
        }
        let plugboard = Permutation::new(&self.plugboard, machine.alphabet().clone())?;
        machine.set_plugboard(plugboard)?;
        tracing::info!(setup = %self, "machine configured");
        Ok(())
    }
}

impl fmt::Display for Setup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "* {} {}", self.rotors.join(" "), self.positions)?;
        if let Some(ring) = &self.ring_setting {
            write!(f, " {}", ring)?;
        }
        if !self.plugboard.is_empty() {
            write!(f, " {}", self.plugboard)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MachineConfig;

    const CONFIG: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ 4 3
        I MQ (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
        II ME (FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT) (A) (Q)
        III MV (ABDHPEJT) (CFLVMZOYQIRWUKXSG)
        B R (AY) (BR) (CU) (DH) (EQ) (FS) (GL) (IP) (JX) (KN) (MO) (TZ) (VW)";

    #[test]
    fn test_parse_full_line() {
        let setup = Setup::parse("* B Beta III IV I AXLE BBBB (HQ) (EX)(IP)", 5).unwrap();
        assert_eq!(setup.rotors, ["B", "Beta", "III", "IV", "I"]);
        assert_eq!(setup.positions, "AXLE");
        assert_eq!(setup.ring_setting.as_deref(), Some("BBBB"));
        assert_eq!(setup.plugboard, "(HQ) (EX)(IP)");
        assert_eq!(setup.to_string(), "* B Beta III IV I AXLE BBBB (HQ) (EX)(IP)");
    }

    #[test]
    fn test_parse_minimal_line() {
        let setup = Setup::parse("*B I II III AAA", 4).unwrap();
        assert_eq!(setup.rotors, ["B", "I", "II", "III"]);
        assert_eq!(setup.ring_setting, None);
        assert!(setup.plugboard.is_empty());
        assert_eq!(setup.to_string(), "* B I II III AAA");
    }

    #[test]
    fn test_parse_errors() {
        assert!(Setup::parse("B I II III AAA", 4).is_err());
        assert!(Setup::parse("* B I II", 4).is_err());
        assert!(Setup::parse("* B I II III", 4).is_err());
        assert!(Setup::parse("* B I (AB) II III AAA", 4).is_err());
        assert!(Setup::parse("* B I II III AAA BBB CCC", 4).is_err());
        assert!(Setup::parse("* B I II III AAA (AB) CCC", 4).is_err());
    }

    #[test]
    fn test_apply() {
        let mut machine = MachineConfig::parse(CONFIG).unwrap().build().unwrap();
        Setup::parse("* B I II III AAA", 4)
            .unwrap()
            .apply(&mut machine)
            .unwrap();
        assert_eq!(machine.convert_message("AAAAA").unwrap(), "BDZGO");

        Setup::parse("* B I II III AAA BBB", 4)
            .unwrap()
            .apply(&mut machine)
            .unwrap();
        assert_eq!(machine.convert_message("AAAAA").unwrap(), "EWTYX");
    }

    #[test]
    fn test_apply_rejects_bad_plugboard() {
        let mut machine = MachineConfig::parse(CONFIG).unwrap().build().unwrap();
        let setup = Setup::parse("* B I II III AAA (AB) (BC)", 4).unwrap();
        assert!(matches!(setup.apply(&mut machine), Err(EnigmaError::Config(_))));
        let setup = Setup::parse("* B I II III AAA (ABC)", 4).unwrap();
        assert!(setup.apply(&mut machine).is_err());
    }
}
