//! Enigma - Rotor Cipher Machine Simulator
//!
//! Simulates an electromechanical rotor machine: a stack of rotating and
//! fixed wheels, a reflector and a plugboard. The same setup both encrypts
//! and decrypts.
//!
//! ## Signal Path
//!
//! Each keypress first steps the rotors, then routes the signal:
//!
//! ```text
//! Key → Plugboard → Rotors (right to left) → Reflector → Rotors (left to right) → Plugboard → Lamp
//! ```
//!
//! - **Alphabet**: symbols and their dense indices
//! - **Permutation**: wiring given in cycle notation, e.g. `(AELTPHQXRU) (BKNW)`
//! - **Rotor**: moving, fixed or reflecting wheel with a setting and ring offset
//! - **Machine**: slot layout, pawl stepping (with the double step) and plugboard
//!
//! ## Example
//!
//! ```
//! use enigma::{MachineConfig, Setup};
//!
//! let config = MachineConfig::parse(
//!     "ABCDEFGHIJKLMNOPQRSTUVWXYZ 4 3
//!      I MQ (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
//!      II ME (FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT)
//!      III MV (ABDHPEJT) (CFLVMZOYQIRWUKXSG)
//!      B R (AY) (BR) (CU) (DH) (EQ) (FS) (GL) (IP) (JX) (KN) (MO) (TZ) (VW)",
//! )?;
//! let mut machine = config.build()?;
//!
//! Setup::parse("* B I II III AAA", machine.num_rotors())?.apply(&mut machine)?;
//! assert_eq!(machine.convert_message("AAAAA")?, "BDZGO");
//! # Ok::<(), enigma::EnigmaError>(())
//! ```

pub mod alphabet;
pub mod cli;
pub mod config;
pub mod error;
pub mod machine;
pub mod permutation;
pub mod rotor;
pub mod setup;

pub use alphabet::Alphabet;
pub use config::{MachineConfig, RotorSpec, RotorType};
pub use error::{EnigmaError, Result};
pub use machine::Machine;
pub use permutation::Permutation;
pub use rotor::{Rotor, RotorKind};
pub use setup::Setup;
