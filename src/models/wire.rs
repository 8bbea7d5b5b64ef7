//! JSON bodies exchanged between the browser and the `/api` handlers.
use crate::models::rating::Rating;
use crate::models::review::Review;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateSessionRequest {
    pub user_id: String,
}

/// Everything the rating page needs to render a session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SessionView {
    pub session_id: Uuid,
    pub user_id: String,
    pub batch: Vec<Review>,
    pub ratings: BTreeMap<String, Rating>, // keyed by review id
    pub prior_submissions: usize,          // rows already in the results file for this user
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RatingRequest {
    pub review_id: String,
    pub value: i64, // validated against the rating scale server-side
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub user_id: String,
    pub rows_written: usize,
    pub submitted_at: DateTime<Utc>,
}

/// Error payload returned by every failing `/api` call.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}
