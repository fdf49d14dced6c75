//! Loading the example list a session annotates.

use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde_json::Value;

use crate::core::config::data::path_display;

/// Where examples come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExampleSource {
    Stdin,
    File(PathBuf),
}

impl ExampleSource {
    /// `-` and an absent argument both mean stdin.
    pub fn from_arg(arg: Option<&Path>) -> Self {
        match arg {
            Some(path) if path.as_os_str() != "-" => ExampleSource::File(path.to_path_buf()),
            _ => ExampleSource::Stdin,
        }
    }

    pub fn load(&self) -> Result<Vec<String>, ExampleError> {
        let contents = match self {
            ExampleSource::Stdin => {
                let mut buf = String::new();
                io::stdin()
                    .read_to_string(&mut buf)
                    .map_err(ExampleError::Stdin)?;
                buf
            }
            ExampleSource::File(path) => {
                fs::read_to_string(path).map_err(|source| ExampleError::Read {
                    path: path.clone(),
                    source,
                })?
            }
        };
        parse_examples(&contents)
    }
}

/// Parse a JSON array of scalars, or newline-delimited text.
pub fn parse_examples(contents: &str) -> Result<Vec<String>, ExampleError> {
    let trimmed = contents.trim_start();
    if trimmed.starts_with('[') {
        let values: Vec<Value> = serde_json::from_str(trimmed).map_err(ExampleError::Json)?;
        return values
            .into_iter()
            .enumerate()
            .map(|(index, value)| match value {
                Value::String(text) => Ok(text),
                Value::Number(number) => Ok(number.to_string()),
                Value::Bool(flag) => Ok(flag.to_string()),
                other => Err(ExampleError::UnsupportedValue {
                    index,
                    kind: json_kind(&other),
                }),
            })
            .collect();
    }

    Ok(contents
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect())
}

/// Shuffle once before the session starts. A seed makes the order reproducible.
pub fn shuffle_examples<E>(examples: &mut [E], seed: Option<u64>) {
    match seed {
        Some(seed) => examples.shuffle(&mut StdRng::seed_from_u64(seed)),
        None => examples.shuffle(&mut rand::rng()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
    }
}

#[derive(Debug)]
pub enum ExampleError {
    Stdin(io::Error),
    Read { path: PathBuf, source: io::Error },
    Json(serde_json::Error),
    UnsupportedValue { index: usize, kind: &'static str },
}

impl fmt::Display for ExampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExampleError::Stdin(source) => write!(f, "Failed to read examples from stdin: {source}"),
            ExampleError::Read { path, source } => write!(
                f,
                "Failed to read examples from {}: {}",
                path_display(path),
                source
            ),
            ExampleError::Json(source) => write!(f, "Failed to parse example list: {source}"),
            ExampleError::UnsupportedValue { index, kind } => write!(
                f,
                "Example #{index} is a JSON {kind}; only strings, numbers and booleans are supported"
            ),
        }
    }
}

impl std::error::Error for ExampleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExampleError::Stdin(source) => Some(source),
            ExampleError::Read { source, .. } => Some(source),
            ExampleError::Json(source) => Some(source),
            ExampleError::UnsupportedValue { .. } => None,
        }
    }
}
