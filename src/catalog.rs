use crate::config::EvalConfig;
use crate::models::review::Review;
use crate::models::user::User;
use crate::session::{ReviewSource, BATCH_SIZE};
use leptos::logging::log;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Cannot open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed user list {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Malformed JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("User {user} appears more than once in the user list")]
    DuplicateUser { user: String },

    #[error("User {user} has {found} assigned reviews, at least {required} are needed")]
    ShortQueue {
        user: String,
        found: usize,
        required: usize,
    },
}

#[derive(Debug, Deserialize)]
struct UserRow {
    #[serde(rename = "User")]
    user: String,
    annotator_id: String,
}

/// annotator id -> ordered list of (paper id, review type)
pub type Assignments = HashMap<String, Vec<(String, String)>>;
/// paper id -> review type -> review text
pub type ReviewTexts = HashMap<String, HashMap<String, String>>;

/// Evaluators and the batch each of them rates, loaded once at startup.
#[derive(Debug, Clone)]
pub struct ReviewCatalog {
    users: Vec<User>,
    batches: HashMap<String, Vec<Review>>,
}

impl ReviewCatalog {
    pub fn load(config: &EvalConfig) -> Result<Self, CatalogError> {
        let users = read_users(&config.users_path())?;
        let assignments: Assignments = read_json(&config.assignments_path())?;
        let reviews: ReviewTexts = read_json(&config.reviews_path())?;
        let catalog = Self::from_parts(users, &assignments, &reviews)?;
        log!(
            "[CATALOG] Loaded {} users from {}",
            catalog.users.len(),
            config.data_dir.display()
        );
        Ok(catalog)
    }

    /// Builds batches from the first [`BATCH_SIZE`] assignments of each user.
    pub fn from_parts(
        users: Vec<User>,
        assignments: &Assignments,
        reviews: &ReviewTexts,
    ) -> Result<Self, CatalogError> {
        let mut batches = HashMap::new();
        for user in &users {
            let queue = assignments
                .get(&user.annotator_id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            if queue.len() < BATCH_SIZE {
                return Err(CatalogError::ShortQueue {
                    user: user.id.clone(),
                    found: queue.len(),
                    required: BATCH_SIZE,
                });
            }

            let batch: Vec<Review> = queue[..BATCH_SIZE]
                .iter()
                .enumerate()
                .map(|(index, (paper_id, review_type))| {
                    let content = reviews
                        .get(paper_id)
                        .and_then(|by_type| by_type.get(review_type))
                        .cloned()
                        .unwrap_or_else(|| {
                            format!(
                                "Review for Paper ID {paper_id} and type {review_type} not found."
                            )
                        });
                    Review::new(paper_id, review_type, index + 1, content)
                })
                .collect();

            if batches.insert(user.id.clone(), batch).is_some() {
                return Err(CatalogError::DuplicateUser {
                    user: user.id.clone(),
                });
            }
        }
        Ok(Self { users, batches })
    }

    pub fn user_ids(&self) -> Vec<String> {
        self.users.iter().map(|user| user.id.clone()).collect()
    }
}

impl ReviewSource for ReviewCatalog {
    fn user(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|user| user.id == user_id)
    }

    fn batch_for(&self, user: &User) -> Vec<Review> {
        self.batches.get(&user.id).cloned().unwrap_or_default()
    }
}

fn read_users(path: &Path) -> Result<Vec<User>, CatalogError> {
    let csv_error = |source| CatalogError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);
    let users = reader
        .deserialize::<UserRow>()
        .map(|row| {
            row.map(|row| User {
                id: row.user,
                annotator_id: row.annotator_id,
            })
            .map_err(csv_error)
        })
        .collect::<Result<Vec<User>, _>>()?;
    Ok(users)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let file = File::open(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| CatalogError::Json {
        path: path.to_path_buf(),
        source,
    })
}
