//! Reading JSON documents from files or stdin.

use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Path that selects stdin.
pub const STDIN_PATH: &str = "-";

#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to read {source_name}: {error}")]
    Read {
        source_name: String,
        #[source]
        error: std::io::Error,
    },

    #[error("Input file does not exist: {0:?}")]
    NotFound(PathBuf),

    #[error("Invalid JSON in {source_name}: {error}")]
    Json {
        source_name: String,
        #[source]
        error: serde_json::Error,
    },
}

fn is_stdin(path: Option<&Path>) -> bool {
    path.map_or(true, |p| p.as_os_str() == STDIN_PATH)
}

fn source_name(path: Option<&Path>) -> String {
    match path {
        Some(p) if !is_stdin(Some(p)) => p.display().to_string(),
        _ => "stdin".to_string(),
    }
}

/// Read raw text from `path`, or stdin when `path` is `None` or `-`.
pub fn read_text(path: Option<&Path>) -> Result<String, InputError> {
    let read_error = |error| InputError::Read {
        source_name: source_name(path),
        error,
    };

    match path {
        Some(p) if !is_stdin(Some(p)) => {
            if !p.exists() {
                return Err(InputError::NotFound(p.to_path_buf()));
            }
            std::fs::read_to_string(p).map_err(read_error)
        }
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(read_error)?;
            Ok(buf)
        }
    }
}

/// Parse a JSON document already read from `path`.
pub fn parse_json<T: DeserializeOwned>(text: &str, path: Option<&Path>) -> Result<T, InputError> {
    serde_json::from_str(text).map_err(|error| InputError::Json {
        source_name: source_name(path),
        error,
    })
}

/// Read and parse a JSON document from `path` or stdin.
pub fn read_json<T: DeserializeOwned>(path: Option<&Path>) -> Result<T, InputError> {
    let text = read_text(path)?;
    parse_json(&text, path)
}
