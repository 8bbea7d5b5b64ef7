//! Where the evaluation data lives.
//!
//! Sources, highest priority first:
//! 1. `REVIEW_EVAL_*` environment variables (`REVIEW_EVAL_DATA_DIR`, `REVIEW_EVAL_RESULTS_FILE`, ...)
//! 2. `evaluation.toml` in the working directory
//! 3. Built-in defaults
//!
//! Server address and site root are not configured here; they come from the
//! Leptos options in `Cargo.toml` / `LEPTOS_*` variables.
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub const CONFIG_FILE: &str = "evaluation.toml";
pub const ENV_PREFIX: &str = "REVIEW_EVAL_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EvalConfig {
    /// Folder holding the user list, the assignments and the review texts.
    pub data_dir: PathBuf,
    /// Results CSV; relative paths are resolved against `data_dir`.
    pub results_file: PathBuf,
    pub users_file: String,
    pub assignments_file: String,
    pub reviews_file: String,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            results_file: PathBuf::from("evaluation_results.csv"),
            users_file: "user.csv".into(),
            assignments_file: "annotator_mapping.json".into(),
            reviews_file: "combined_mapping.json".into(),
        }
    }
}

impl EvalConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn results_path(&self) -> PathBuf {
        self.data_dir.join(&self.results_file)
    }

    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join(&self.users_file)
    }

    pub fn assignments_path(&self) -> PathBuf {
        self.data_dir.join(&self.assignments_file)
    }

    pub fn reviews_path(&self) -> PathBuf {
        self.data_dir.join(&self.reviews_file)
    }
}
