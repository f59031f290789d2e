use enigma::cli::process_messages;
use enigma::{EnigmaError, Machine, MachineConfig, Setup};
use proptest::prelude::*;
use std::error::Error;
use std::path::Path;

fn default_machine() -> Result<Machine, Box<dyn Error>> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("configs/default.conf");
    Ok(MachineConfig::load(&path)?.build()?)
}

fn configured(line: &str) -> Result<Machine, Box<dyn Error>> {
    let mut machine = default_machine()?;
    Setup::parse(line, machine.num_rotors())?.apply(&mut machine)?;
    Ok(machine)
}

#[test]
fn default_catalog_loads() -> Result<(), Box<dyn Error>> {
    let machine = default_machine()?;
    assert_eq!(machine.num_rotors(), 5);
    assert_eq!(machine.num_pawls(), 3);
    assert_eq!(machine.catalog().len(), 12);
    Ok(())
}

#[test]
fn thin_reflector_with_beta_matches_three_rotor_vector() -> Result<(), Box<dyn Error>> {
    let mut machine = configured("* B Beta I II III AAAA")?;
    assert_eq!(
        machine.convert_message("AAAAAAAAAAAAAAAAAAAAAAAAAA")?,
        "BDZGOWCXLTKSBTMCDLPBMUQOFX"
    );
    Ok(())
}

#[test]
fn four_rotor_message_with_plugboard() -> Result<(), Box<dyn Error>> {
    let mut machine = configured("* B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BW)")?;
    assert_eq!(
        machine.convert_message("FROM HIS SHOULDER HIAWATHA")?,
        "QVPQSOKOILPUYKJZPIUFXDB"
    );
    assert_eq!(
        machine.convert_message("TOOK THE CAMERA OF ROSEWOOD")?,
        "YHCNSCXNUOAATZXSRCFBDGU"
    );
    Ok(())
}

#[test]
fn double_notched_rotors_with_ring_setting() -> Result<(), Box<dyn Error>> {
    let mut machine = configured("* C Gamma VI VII VIII QEZP BCDE (AV) (LK)")?;
    assert_eq!(machine.convert_message("ATTACK AT DAWN")?, "SALWPIYWLWHR");
    assert_eq!(machine.settings(), "QFBB");
    Ok(())
}

#[test]
fn decoding_restores_plaintext() -> Result<(), Box<dyn Error>> {
    let line = "* B Gamma V II VIII MCKQ XYZA (AB) (CD) (EF) (GH)";
    let plain = "WEATHERREPORTFORTHENORTHSEASECTORSEVEN";

    let cipher = configured(line)?.convert_message(plain)?;
    assert_ne!(cipher, plain);
    assert_eq!(configured(line)?.convert_message(&cipher)?, plain);
    Ok(())
}

#[test]
fn stream_with_several_messages() -> Result<(), Box<dyn Error>> {
    let mut machine = default_machine()?;
    let input = "\
* B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BW)
FROM HIS SHOULDER HIAWATHA
TOOK THE CAMERA OF ROSEWOOD

* B Beta I II III AAAA
AAAAA
";
    let transcript = process_messages(&mut machine, input)?;
    assert_eq!(transcript.messages, 2);
    assert_eq!(
        transcript.text,
        "QVPQS OKOIL PUYKJ ZPIUF XDB\nYHCNS CXNUO AATZX SRCFB DGU\n\nBDZGO\n"
    );
    Ok(())
}

#[test]
fn setup_errors_are_config_errors() -> Result<(), Box<dyn Error>> {
    let mut machine = default_machine()?;
    for line in [
        "* B Beta I II IX AAAA",
        "* Beta B I II III AAAA",
        "* B I II III IV AAAA",
        "* B I Beta II III AAAA",
        "* B Beta I II III AAA",
        "* B Beta I II III AAAA (ABC)",
    ] {
        let result = Setup::parse(line, machine.num_rotors())?.apply(&mut machine);
        assert!(
            matches!(result, Err(EnigmaError::Config(_))),
            "{} should be rejected",
            line
        );
    }
    Ok(())
}

proptest! {
    #[test]
    fn encryption_is_self_inverse(
        plain in "[A-Z]{1,80}",
        positions in "[A-Z]{4}",
        ring in "[A-Z]{4}",
    ) {
        let line = format!("* C Beta VI I VIII {} {} (QW) (ER) (TY)", positions, ring);
        let cipher = configured(&line).unwrap().convert_message(&plain).unwrap();
        prop_assert_eq!(cipher.len(), plain.len());
        // A reflector never lets a symbol encrypt to itself
        for (p, c) in plain.chars().zip(cipher.chars()) {
            prop_assert_ne!(p, c);
        }
        let decoded = configured(&line).unwrap().convert_message(&cipher).unwrap();
        prop_assert_eq!(decoded, plain);
    }
}
