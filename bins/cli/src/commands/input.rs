//! JSON input read from a file or stdin.

use crate::error::CliError;
use serde_json::Value;
use std::io::{self, Read};
use std::path::Path;

/// Path that selects stdin.
pub const STDIN_PATH: &str = "-";

/// Read and parse a JSON document from `path`, or from stdin for `-`.
pub fn read_json_input(path: &Path) -> Result<Value, CliError> {
    let (text, source) = if path.as_os_str() == STDIN_PATH {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        (buffer, "stdin".to_owned())
    } else {
        (std::fs::read_to_string(path)?, path.display().to_string())
    };
    parse_json_input(&text, &source)
}

fn parse_json_input(text: &str, source: &str) -> Result<Value, CliError> {
    if text.trim().is_empty() {
        return Err(CliError::InvalidInput(format!("{source} is empty")));
    }
    serde_json::from_str(text)
        .map_err(|error| CliError::InvalidInput(format!("invalid JSON in {source}: {error}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn blank_input_is_rejected() {
        let result = parse_json_input("  \n", "stdin");
        assert!(matches!(
            result,
            Err(CliError::InvalidInput(message)) if message == "stdin is empty"
        ));
    }

    #[test]
    fn malformed_json_names_its_source() {
        let result = parse_json_input("{\"X\": [", "batch.json");
        assert!(matches!(
            result,
            Err(CliError::InvalidInput(message)) if message.starts_with("invalid JSON in batch.json")
        ));
    }

    #[test]
    fn valid_json_parses() -> Result<(), Box<dyn Error>> {
        let value = parse_json_input("{\"accuracy\": 0.9}", "stdin")?;
        assert_eq!(value.get("accuracy"), Some(&Value::from(0.9)));
        Ok(())
    }
}
