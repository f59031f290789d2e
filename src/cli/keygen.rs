use crate::alphabet::Alphabet;
use crate::config::{MachineConfig, RotorType};
use crate::error::{EnigmaError, Result};
use crate::setup::Setup;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Options for the keygen command
#[derive(Debug, Clone)]
pub struct KeygenOptions {
    /// Seed for a reproducible key; fresh entropy when absent
    pub seed: Option<u64>,
    /// Number of plugboard pairs, capped at half the alphabet
    pub plugs: usize,
    /// Draw a random ring setting as well
    pub ring: bool,
}

impl Default for KeygenOptions {
    fn default() -> Self {
        Self {
            seed: None,
            plugs: 10,
            ring: true,
        }
    }
}

/// Draw a random, valid setting line for the machine in `config`
pub fn generate_setup(config: &MachineConfig, options: &KeygenOptions) -> Result<Setup> {
    let alphabet = Alphabet::new(&config.alphabet)?;
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let names_of = |pred: fn(&RotorType) -> bool| -> Vec<String> {
        config
            .rotors
            .iter()
            .filter(|r| pred(&r.kind))
            .map(|r| r.name.clone())
            .collect()
    };
    let reflectors = names_of(|k| matches!(k, RotorType::Reflector));
    let fixed = names_of(|k| matches!(k, RotorType::Fixed));
    let moving = names_of(|k| matches!(k, RotorType::Moving { .. }));

    let want_fixed = config.slots.saturating_sub(1 + config.pawls);
    let reflector = reflectors
        .choose(&mut rng)
        .ok_or_else(|| EnigmaError::config("the catalog has no reflector"))?
        .clone();

    let mut rotors = vec![reflector];
    rotors.extend(pick(&mut rng, fixed, want_fixed, "fixed")?);
    rotors.extend(pick(&mut rng, moving, config.pawls, "moving")?);

    let symbols = alphabet.symbols();
    let draw = |rng: &mut StdRng| -> String {
        (1..config.slots)
            .map(|_| symbols[rng.gen_range(0..symbols.len())])
            .collect()
    };
    let positions = draw(&mut rng);
    let ring_setting = options.ring.then(|| draw(&mut rng));

    let mut shuffled = symbols.to_vec();
    shuffled.shuffle(&mut rng);
    let pairs = options.plugs.min(shuffled.len() / 2);
    let plugboard = shuffled
        .chunks(2)
        .take(pairs)
        .map(|pair| format!("({}{})", pair[0], pair[1]))
        .collect::<Vec<_>>()
        .join(" ");

    let setup = Setup {
        rotors,
        positions,
        ring_setting,
        plugboard,
    };
    tracing::debug!(setup = %setup, seed = ?options.seed, "generated key");
    Ok(setup)
}

/// Choose `count` distinct names from `pool` in random order
fn pick(rng: &mut StdRng, mut pool: Vec<String>, count: usize, what: &str) -> Result<Vec<String>> {
    if pool.len() < count {
        return Err(EnigmaError::config(format!(
            "need {} {} rotors but the catalog has {}",
            count,
            what,
            pool.len()
        )));
    }
    pool.shuffle(rng);
    pool.truncate(count);
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ 5 3
        I MQ (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
        II ME (FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT)
        III MV (ABDHPEJT) (CFLVMZOYQIRWUKXSG)
        IV MJ (AEPLIYWCOXMRFZBSTGJQNH) (DV) (KU)
        Beta N (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
        Gamma N (AFNIRLBSQWVXGUZDKMTPCOYJHE)
        B R (AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP) (RX) (SZ) (TV)
        C R (AR) (BD) (CO) (EJ) (FN) (GT) (HK) (IV) (LM) (PW) (QZ) (SX) (UY)";

    fn config() -> MachineConfig {
        MachineConfig::parse(CONFIG).unwrap()
    }

    #[test]
    fn test_generated_setup_is_usable() {
        let config = config();
        let mut machine = config.build().unwrap();
        for seed in 0..20 {
            let options = KeygenOptions {
                seed: Some(seed),
                ..Default::default()
            };
            let setup = generate_setup(&config, &options).unwrap();
            assert_eq!(setup.rotors.len(), 5);
            assert_eq!(setup.positions.len(), 4);
            assert_eq!(setup.ring_setting.as_ref().map(String::len), Some(4));
            assert_eq!(setup.plugboard.matches('(').count(), 10);

            // The rendered line must parse back to the same setup
            let reparsed = Setup::parse(&setup.to_string(), 5).unwrap();
            assert_eq!(reparsed, setup);
            reparsed.apply(&mut machine).unwrap();
        }
    }

    #[test]
    fn test_seed_is_reproducible() {
        let options = KeygenOptions {
            seed: Some(42),
            ..Default::default()
        };
        let a = generate_setup(&config(), &options).unwrap();
        let b = generate_setup(&config(), &options).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_plug_count_capped() {
        let options = KeygenOptions {
            seed: Some(7),
            plugs: 100,
            ring: false,
        };
        let setup = generate_setup(&config(), &options).unwrap();
        assert_eq!(setup.plugboard.matches('(').count(), 13);
        assert_eq!(setup.ring_setting, None);
    }

    #[test]
    fn test_catalog_too_small() {
        let mut small = config();
        small.rotors.retain(|r| r.name != "III" && r.name != "IV");
        let options = KeygenOptions {
            seed: Some(1),
            ..Default::default()
        };
        assert!(generate_setup(&small, &options).is_err());
    }
}
