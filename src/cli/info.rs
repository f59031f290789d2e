use crate::config::{MachineConfig, RotorType};
use crate::error::Result;
use std::path::Path;

/// Describe the machine in `path`.
/// The description is validated by building the machine first.
pub fn show_info(path: &Path) -> Result<String> {
    let config = MachineConfig::load(path)?;
    let machine = config.build()?;

    let mut output = String::new();

    output.push_str("Rotor Machine Description\n");
    output.push_str("=========================\n\n");

    output.push_str(&format!("File: {}\n", path.display()));
    output.push_str(&format!("Alphabet: {} ({} symbols)\n", machine.alphabet(), machine.alphabet().size()));
    output.push_str(&format!("Rotor slots: {}\n", machine.num_rotors()));
    output.push_str(&format!("Pawls: {}\n", machine.num_pawls()));
    output.push('\n');

    output.push_str(&format!("Rotors ({}):\n", config.rotors.len()));
    let width = config.rotors.iter().map(|r| r.name.len()).max().unwrap_or(0);
    for (spec, rotor) in config.rotors.iter().zip(machine.catalog()) {
        let kind = match &spec.kind {
            RotorType::Moving { .. } => format!("moving, notches {}", display_notches(&rotor.notches())),
            RotorType::Fixed => "fixed".to_string(),
            RotorType::Reflector => "reflector".to_string(),
        };
        output.push_str(&format!(
            "  {:<width$}  {:<24} {}\n",
            spec.name,
            kind,
            rotor.permutation(),
            width = width
        ));
    }
    output.push('\n');

    let count = |f: fn(&RotorType) -> bool| config.rotors.iter().filter(|r| f(&r.kind)).count();
    output.push_str("Catalog:\n");
    output.push_str(&format!("  Moving: {}\n", count(|k| matches!(k, RotorType::Moving { .. }))));
    output.push_str(&format!("  Fixed: {}\n", count(|k| matches!(k, RotorType::Fixed))));
    output.push_str(&format!("  Reflectors: {}\n", count(|k| matches!(k, RotorType::Reflector))));

    Ok(output)
}

/// The machine description in `path` as pretty-printed JSON
pub fn show_info_json(path: &Path) -> Result<String> {
    let config = MachineConfig::load(path)?;
    config.build()?;
    Ok(serde_json::to_string_pretty(&config)?)
}

fn display_notches(notches: &str) -> String {
    if notches.is_empty() {
        "none".to_string()
    } else {
        notches.to_string()
    }
}
