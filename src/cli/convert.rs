use crate::config::MachineConfig;
use crate::error::{EnigmaError, Result};
use crate::machine::Machine;
use crate::setup::Setup;
use std::io::{Read, Write};
use std::path::Path;

/// Output symbols are printed in groups of this many
pub const GROUP_SIZE: usize = 5;

/// Options for the convert command
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Trace every conversion through the signal path
    pub verbose: bool,
}

/// Result of running a message stream through a machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub text: String,
    pub messages: usize,
}

/// Run every message in `input` through `machine`.
///
/// Each line starting with `*` is a setting line that reconfigures the
/// machine for the lines that follow it. Converted lines are written in
/// groups of five; blank lines are kept.
pub fn process_messages(machine: &mut Machine, input: &str) -> Result<Transcript> {
    let mut text = String::with_capacity(input.len() + input.len() / GROUP_SIZE);
    let mut messages = 0;

    for (lineno, line) in input.lines().enumerate() {
        if Setup::is_setting_line(line) {
            Setup::parse(line, machine.num_rotors())?.apply(machine)?;
            messages += 1;
        } else if line.trim().is_empty() {
            if messages > 0 {
                text.push('\n');
            }
        } else if messages == 0 {
            return Err(EnigmaError::InvalidInput(format!(
                "line {} comes before any setting line",
                lineno + 1
            )));
        } else {
            let converted = machine.convert_message(line)?;
            text.push_str(&group(&converted, GROUP_SIZE));
            text.push('\n');
        }
    }

    Ok(Transcript { text, messages })
}

/// Split `msg` into space-separated groups of `size` symbols
pub fn group(msg: &str, size: usize) -> String {
    let chars: Vec<char> = msg.chars().collect();
    chars
        .chunks(size.max(1))
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Convert messages from `input` (or stdin) with the machine described in
/// `config_path`, writing to `output` (or stdout).
/// Returns the number of messages processed.
pub fn convert_files(
    config_path: &Path,
    input: Option<&Path>,
    output: Option<&Path>,
    options: &ConvertOptions,
) -> Result<usize> {
    let mut machine = MachineConfig::load(config_path)?.build()?;
    machine.set_verbose(options.verbose);

    let source = match input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let transcript = process_messages(&mut machine, &source)?;

    match output {
        Some(path) => std::fs::write(path, &transcript.text)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(transcript.text.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(transcript.messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const CONFIG: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ 4 3
        I MQ (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
        II ME (FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT)
        III MV (ABDHPEJT) (CFLVMZOYQIRWUKXSG)
        B R (AY) (BR) (CU) (DH) (EQ) (FS) (GL) (IP) (JX) (KN) (MO) (TZ) (VW)";

    fn machine() -> Machine {
        MachineConfig::parse(CONFIG).unwrap().build().unwrap()
    }

    #[test]
    fn test_group() {
        assert_eq!(group("ABCDEFGHIJKL", 5), "ABCDE FGHIJ KL");
        assert_eq!(group("ABCDE", 5), "ABCDE");
        assert_eq!(group("", 5), "");
    }

    #[test]
    fn test_process_single_message() {
        let mut m = machine();
        let transcript = process_messages(&mut m, "* B I II III AAA\nAAAAA AAAAA\n").unwrap();
        assert_eq!(transcript.messages, 1);
        assert_eq!(transcript.text, "BDZGO WCXLT\n");
    }

    #[test]
    fn test_message_continues_across_lines() {
        let mut m = machine();
        let transcript = process_messages(&mut m, "* B I II III AAA\nAAAAA\nAAAAA\n").unwrap();
        assert_eq!(transcript.text, "BDZGO\nWCXLT\n");
    }

    #[test]
    fn test_each_setting_line_resets() {
        let mut m = machine();
        let input = "* B I II III AAA\nAAAAA\n\n* B I II III AAA BBB\nAAAAA\n";
        let transcript = process_messages(&mut m, input).unwrap();
        assert_eq!(transcript.messages, 2);
        assert_eq!(transcript.text, "BDZGO\n\nEWTYX\n");
    }

    #[test]
    fn test_decrypts_own_output() {
        let mut m = machine();
        let plain = "* B III I II QRS ABC (AZ) (QT)\nTHE QUICK BROWN FOX\n";
        let cipher = process_messages(&mut m, plain).unwrap().text;

        let again = format!("* B III I II QRS ABC (AZ) (QT)\n{}", cipher);
        let decoded = process_messages(&mut m, &again).unwrap().text;
        assert_eq!(decoded, "THEQU ICKBR OWNFO X\n");
    }

    #[test]
    fn test_missing_setting_line() {
        let mut m = machine();
        let err = process_messages(&mut m, "\nHELLO\n").unwrap_err();
        assert!(matches!(err, EnigmaError::InvalidInput(_)));
    }

    #[test]
    fn test_bad_symbol_aborts() {
        let mut m = machine();
        let err = process_messages(&mut m, "* B I II III AAA\nHELLO!\n").unwrap_err();
        assert!(matches!(err, EnigmaError::SymbolNotFound('!')));
    }

    #[test]
    fn test_convert_files() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("machine.conf");
        let input = dir.path().join("message.in");
        let output = dir.path().join("message.out");

        std::fs::write(&config, CONFIG).unwrap();
        std::fs::write(&input, "* B I II III AAA\nAAAAA\n").unwrap();

        let count = convert_files(&config, Some(&input), Some(&output), &ConvertOptions::default()).unwrap();
        assert_eq!(count, 1);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "BDZGO\n");
    }
}
