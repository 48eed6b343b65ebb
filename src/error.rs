use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Missing column '{column}' in {table} data")]
    MissingColumn { table: &'static str, column: String },

    #[error("Malformed {table} data: {reason}")]
    Malformed { table: &'static str, reason: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DashboardError {
    /// Load failures are fatal: the dashboard cannot render without both tables.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound(_) | Self::MissingColumn { .. } | Self::Malformed { .. }
        )
    }
}

#[cfg(feature = "python")]
impl From<DashboardError> for pyo3::PyErr {
    fn from(err: DashboardError) -> pyo3::PyErr {
        use pyo3::exceptions::{PyFileNotFoundError, PyRuntimeError, PyValueError};
        match err {
            DashboardError::FileNotFound(_) => PyFileNotFoundError::new_err(err.to_string()),
            DashboardError::MissingColumn { .. } | DashboardError::Malformed { .. } => {
                PyValueError::new_err(err.to_string())
            }
            _ => PyRuntimeError::new_err(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_classification() {
        assert!(DashboardError::FileNotFound(PathBuf::from("x.csv")).is_load_error());
        assert!(DashboardError::MissingColumn {
            table: "partner",
            column: "Country".into()
        }
        .is_load_error());
        assert!(!DashboardError::Config("bad".into()).is_load_error());
    }

    #[test]
    fn test_messages() {
        let err = DashboardError::MissingColumn {
            table: "disease",
            column: "Cases".into(),
        };
        assert_eq!(err.to_string(), "Missing column 'Cases' in disease data");
    }
}
