use crate::EtlResult;
use bon::Builder;
use garde::Validate;
use std::path::{Path, PathBuf};

pub const DATA_DIR_VAR: &str = "AES_DATA_DIR";
pub const DATABASE_VAR: &str = "AES_DATABASE";
pub const DEFAULT_DATABASE: &str = "energy.db";

/// Where the workbooks are read from and where the store is written.
#[derive(Debug, Clone, Validate, Builder)]
#[garde(allow_unvalidated)]
pub struct PipelineConfig {
    /// Directory holding the Table L, O and Q workbooks.
    #[garde(custom(validate_data_dir))]
    #[builder(into, default = PathBuf::from("."))]
    pub data_dir: PathBuf,

    /// SQLite database file; created if absent.
    #[garde(custom(validate_database_path))]
    #[builder(into, default = PathBuf::from(DEFAULT_DATABASE))]
    pub database_path: PathBuf,
}

fn validate_data_dir(value: &PathBuf, _context: &()) -> garde::Result {
    if !value.is_dir() {
        return Err(garde::Error::new(format!(
            "data directory '{}' does not exist",
            value.display()
        )));
    }
    Ok(())
}

fn validate_database_path(value: &PathBuf, _context: &()) -> garde::Result {
    if value.as_os_str().is_empty() {
        return Err(garde::Error::new("database path is empty"));
    }
    if value.is_dir() {
        return Err(garde::Error::new(format!(
            "database path '{}' is a directory",
            value.display()
        )));
    }
    Ok(())
}

impl PipelineConfig {
    /// Read `AES_DATA_DIR` and `AES_DATABASE`, falling back to the defaults.
    pub fn from_env() -> EtlResult<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`PipelineConfig::from_env`] with an explicit variable source.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> EtlResult<Self> {
        let mut config = Self::builder().build();
        if let Some(dir) = var(DATA_DIR_VAR).filter(|v| !v.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(db) = var(DATABASE_VAR).filter(|v| !v.trim().is_empty()) {
            config.database_path = PathBuf::from(db);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

// ================================================
// UNIT TESTS
// ================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::EtlError;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::from_vars(|_| None).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("."));
        assert_eq!(config.database_path, PathBuf::from(DEFAULT_DATABASE));
    }

    #[test]
    fn test_reads_variables() {
        let dir = tempfile::tempdir().unwrap();
        let dir_str = dir.path().to_string_lossy().to_string();
        let config = PipelineConfig::from_vars(|key| match key {
            DATA_DIR_VAR => Some(dir_str.clone()),
            DATABASE_VAR => Some("loaded.db".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.data_dir(), dir.path());
        assert_eq!(config.database_path, PathBuf::from("loaded.db"));
    }

    #[test]
    fn test_rejects_missing_data_dir() {
        let result = PipelineConfig::from_vars(|key| {
            (key == DATA_DIR_VAR).then(|| "/definitely/not/here".to_string())
        });
        assert!(matches!(result, Err(EtlError::Config(_))));
    }

    #[test]
    fn test_rejects_directory_as_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::builder()
            .database_path(dir.path())
            .build();
        assert!(config.validate().is_err());
    }
}
