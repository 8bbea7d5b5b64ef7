//! Rating session for one evaluator.
//!
//! An [`EvaluationSession`] is created for exactly one user and owns that
//! user's in-progress ratings. Nothing is persisted until [`EvaluationSession::submit`]
//! succeeds, and a submitted session stays spent until its batch is reloaded.
use crate::error::EvalError;
use crate::models::rating::{Rating, RatingValue, SubmissionRecord};
use crate::models::review::Review;
use crate::models::user::User;
use crate::models::wire::SubmissionReceipt;
use crate::store::ResultStore;
use chrono::Utc;
use leptos::logging::log;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Number of reviews an evaluator rates per submission.
pub const BATCH_SIZE: usize = 10;

/// Where sessions look up evaluators and their assigned reviews.
pub trait ReviewSource {
    fn user(&self, user_id: &str) -> Option<&User>;

    /// The fixed, ordered batch for `user`. Must return the same reviews on every call.
    fn batch_for(&self, user: &User) -> Vec<Review>;
}

#[derive(Debug, Clone)]
pub struct EvaluationSession {
    user: User,
    batch: Vec<Review>,
    ratings: BTreeMap<String, Rating>,
    spent: bool,
}

impl EvaluationSession {
    /// Starts a session for `user_id`. The user cannot change afterwards.
    pub fn select_user<S: ReviewSource + ?Sized>(
        source: &S,
        user_id: &str,
    ) -> Result<Self, EvalError> {
        let user = source
            .user(user_id)
            .cloned()
            .ok_or_else(|| EvalError::InvalidUser(user_id.to_string()))?;
        let batch = source.batch_for(&user);
        log!("[SESSION] {} selected, {} reviews assigned", user.id, batch.len());
        Ok(Self {
            user,
            batch,
            ratings: BTreeMap::new(),
            spent: false,
        })
    }

    /// Returns the batch. A spent session is re-armed with no ratings;
    /// otherwise ratings entered so far are kept.
    pub fn load_batch(&mut self) -> &[Review] {
        if self.spent {
            self.ratings.clear();
            self.spent = false;
        }
        &self.batch
    }

    pub fn set_rating(
        &mut self,
        review_id: &str,
        value: i64,
        comment: Option<String>,
    ) -> Result<(), EvalError> {
        if self.spent {
            return Err(EvalError::SessionSpent);
        }
        let value = RatingValue::try_from(value)?;
        if !self.batch.iter().any(|review| review.id == review_id) {
            return Err(EvalError::UnknownReview(review_id.to_string()));
        }
        self.ratings
            .insert(review_id.to_string(), Rating::new(value, comment));
        Ok(())
    }

    /// Persists one record per review, in batch order, once every review is rated.
    /// On any failure the in-progress ratings are left untouched.
    pub fn submit<S: ResultStore + ?Sized>(
        &mut self,
        store: &S,
    ) -> Result<SubmissionReceipt, EvalError> {
        if self.spent {
            return Err(EvalError::SessionSpent);
        }
        if !self.is_complete() {
            return Err(EvalError::IncompleteSubmission {
                rated: self.rated_count(),
                required: self.batch.len(),
            });
        }

        let submitted_at = Utc::now();
        let records: Vec<SubmissionRecord> = self
            .batch
            .iter()
            .filter_map(|review| {
                self.ratings.get(&review.id).map(|rating| SubmissionRecord {
                    user_id: self.user.id.clone(),
                    review_id: review.id.clone(),
                    rating: rating.value,
                    comment: rating.comment.clone().unwrap_or_default(),
                    timestamp: submitted_at,
                })
            })
            .collect();

        store.append(&records)?;

        log!("[SESSION] {} submitted {} ratings", self.user.id, records.len());
        self.ratings.clear();
        self.spent = true;
        Ok(SubmissionReceipt {
            user_id: self.user.id.clone(),
            rows_written: records.len(),
            submitted_at,
        })
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn ratings(&self) -> &BTreeMap<String, Rating> {
        &self.ratings
    }

    pub fn rated_count(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_complete(&self) -> bool {
        !self.batch.is_empty() && self.rated_count() == self.batch.len()
    }

    pub fn is_spent(&self) -> bool {
        self.spent
    }
}

/// A session shared between the requests that address it.
pub type SharedSession = Arc<Mutex<EvaluationSession>>;

#[derive(Debug)]
struct RegistryEntry {
    user_id: String,
    session: SharedSession,
}

/// Live sessions keyed by the opaque id handed to the browser.
///
/// Each user holds at most one session: selecting a user again replaces the
/// earlier one. Every session carries its own lock, so a slow submit only
/// blocks requests for that session.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<Uuid, RegistryEntry>,
}

impl SessionRegistry {
    pub fn insert(&mut self, session: EvaluationSession) -> Uuid {
        let user_id = session.user().id.clone();
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| entry.user_id != user_id);
        if self.sessions.len() < before {
            log!("[SESSION] Replaced earlier session of {}", user_id);
        }

        let id = Uuid::new_v4();
        self.sessions.insert(
            id,
            RegistryEntry {
                user_id,
                session: Arc::new(Mutex::new(session)),
            },
        );
        id
    }

    pub fn get(&self, id: &Uuid) -> Result<SharedSession, EvalError> {
        self.sessions
            .get(id)
            .map(|entry| entry.session.clone())
            .ok_or_else(|| EvalError::UnknownSession(id.to_string()))
    }

    /// Drops a session. Returns whether it existed.
    pub fn remove(&mut self, id: &Uuid) -> bool {
        self.sessions.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
