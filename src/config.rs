//! Runtime configuration resolved from command-line flags and environment.

use chrono::{DateTime, Utc};
use clap::Args;
use std::path::PathBuf;

/// Options shared by every subcommand.
#[derive(Args, Clone, Debug)]
pub struct GlobalOptions {
    /// SQLite database file
    #[arg(long, env = "CA_PREP_DB", default_value = "ca_prep.sqlite3", global = true)]
    pub db: PathBuf,

    /// Evaluate as if the current time were this RFC 3339 timestamp
    #[arg(long, env = "CA_PREP_NOW", global = true)]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_path: PathBuf,
    pub now: DateTime<Utc>,
}

impl Config {
    /// Falls back to the wall clock when no fixed time was given.
    pub fn resolve(options: &GlobalOptions) -> Self {
        Self {
            database_path: options.db.clone(),
            now: options.now.unwrap_or_else(Utc::now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_fixed_now() {
        let now = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let options = GlobalOptions {
            db: PathBuf::from("test.sqlite3"),
            now: Some(now),
        };
        let config = Config::resolve(&options);
        assert_eq!(config.now, now);
        assert_eq!(config.database_path, PathBuf::from("test.sqlite3"));
    }

    #[test]
    fn test_resolve_defaults_to_wall_clock() {
        let before = Utc::now();
        let config = Config::resolve(&GlobalOptions {
            db: PathBuf::from("x"),
            now: None,
        });
        assert!(config.now >= before);
    }
}
