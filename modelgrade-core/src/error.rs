//! Error types for the modelgrade-core crate.

use thiserror::Error;

/// Top-level error type for loading and evaluating datasets.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("IO error reading {source_name}: {error}")]
    Io {
        source_name: String,
        #[source]
        error: std::io::Error,
    },

    #[error("CSV error in {source_name}: {error}")]
    Csv {
        source_name: String,
        #[source]
        error: csv::Error,
    },

    #[error("{source_name}, line {line}: {message}")]
    Parse {
        source_name: String,
        line: u64,
        message: String,
    },

    #[error("{source_name}, line {line}: expected {expected} columns, found {found}")]
    ColumnCount {
        source_name: String,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("{source_name}, line {line}: label {label} is outside {allowed}")]
    InvalidLabel {
        source_name: String,
        line: u64,
        label: String,
        allowed: String,
    },

    #[error("{source_name}, line {line}: probability {value} is outside [0, 1]")]
    InvalidProbability {
        source_name: String,
        line: u64,
        value: f64,
    },

    #[error("sample {index}: {message}")]
    InvalidSample { index: usize, message: String },

    #[error("Dataset {0} contains no samples")]
    EmptyDataset(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl EvalError {
    pub fn io(source_name: impl Into<String>, error: std::io::Error) -> Self {
        Self::Io {
            source_name: source_name.into(),
            error,
        }
    }

    pub fn csv(source_name: impl Into<String>, error: csv::Error) -> Self {
        Self::Csv {
            source_name: source_name.into(),
            error,
        }
    }

    pub fn parse(source_name: impl Into<String>, line: u64, message: impl Into<String>) -> Self {
        Self::Parse {
            source_name: source_name.into(),
            line,
            message: message.into(),
        }
    }

    pub fn invalid_sample(index: usize, message: impl Into<String>) -> Self {
        Self::InvalidSample {
            index,
            message: message.into(),
        }
    }

    pub fn empty_dataset(source_name: impl Into<String>) -> Self {
        Self::EmptyDataset(source_name.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl From<Box<figment::Error>> for EvalError {
    fn from(err: Box<figment::Error>) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = EvalError::parse("model_1.csv", 4, "invalid float literal");
        assert_eq!(
            err.to_string(),
            "model_1.csv, line 4: invalid float literal"
        );
    }

    #[test]
    fn test_empty_dataset_display() {
        let err = EvalError::empty_dataset("model.csv");
        assert_eq!(err.to_string(), "Dataset model.csv contains no samples");
    }
}
