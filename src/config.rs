//! Engine configuration

use std::{fmt::Display, str::FromStr};

use crate::error::{Error, Result};

/// What `CREATE TABLE` does when the table name is already taken
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicateTablePolicy {
    /// Replace the old definition; its rows are dropped
    #[default]
    Replace,
    /// Fail with `Error::TableExists` and leave the old table alone
    Error,
}

impl FromStr for DuplicateTablePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "replace" => Ok(Self::Replace),
            "error" => Ok(Self::Error),
            other => Err(Error::Parse(format!(
                "unknown duplicate table policy {}, expected replace or error",
                other
            ))),
        }
    }
}

impl Display for DuplicateTablePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Replace => "replace",
            Self::Error => "error",
        })
    }
}

/// Settings shared by every statement a `Session` executes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    pub duplicate_table: DuplicateTablePolicy,
}

impl Config {
    pub fn with_duplicate_table(mut self, policy: DuplicateTablePolicy) -> Self {
        self.duplicate_table = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, DuplicateTablePolicy};
    use crate::error::Result;

    #[test]
    fn test_policy_from_str() -> Result<()> {
        assert_eq!("replace".parse::<DuplicateTablePolicy>()?, DuplicateTablePolicy::Replace);
        assert_eq!("ERROR".parse::<DuplicateTablePolicy>()?, DuplicateTablePolicy::Error);
        assert!("keep".parse::<DuplicateTablePolicy>().is_err());
        Ok(())
    }

    #[test]
    fn test_default_config_replaces() {
        let config = Config::default();
        assert_eq!(config.duplicate_table, DuplicateTablePolicy::Replace);
        let config = config.with_duplicate_table(DuplicateTablePolicy::Error);
        assert_eq!(config.duplicate_table.to_string(), "error");
    }
}
