// src/models/rating.rs
use crate::error::EvalError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Score an evaluator can give a review. Stored and transmitted as its number.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "i64", into = "u8")]
pub enum RatingValue {
    Poor = 1,
    Fair = 2,
    Good = 3,
    VeryGood = 4,
    Excellent = 5,
}

impl RatingValue {
    pub const ALL: [RatingValue; 5] = [
        RatingValue::Poor,
        RatingValue::Fair,
        RatingValue::Good,
        RatingValue::VeryGood,
        RatingValue::Excellent,
    ];

    pub fn score(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            RatingValue::Poor => "Poor",
            RatingValue::Fair => "Fair",
            RatingValue::Good => "Good",
            RatingValue::VeryGood => "Very good",
            RatingValue::Excellent => "Excellent",
        }
    }

    /// Guideline text shown next to the scale.
    pub fn guideline(self) -> &'static str {
        match self {
            RatingValue::Poor => "Vague or generic; gives the authors nothing to act on.",
            RatingValue::Fair => "Touches on real issues but lacks evidence or specifics.",
            RatingValue::Good => "Identifies the main strengths and weaknesses with some support.",
            RatingValue::VeryGood => "Specific, well argued and mostly actionable.",
            RatingValue::Excellent => {
                "Thorough, constructive and confident; every point is actionable."
            }
        }
    }
}

impl TryFrom<i64> for RatingValue {
    type Error = EvalError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(RatingValue::Poor),
            2 => Ok(RatingValue::Fair),
            3 => Ok(RatingValue::Good),
            4 => Ok(RatingValue::VeryGood),
            5 => Ok(RatingValue::Excellent),
            other => Err(EvalError::InvalidRating(other)),
        }
    }
}

impl From<RatingValue> for u8 {
    fn from(value: RatingValue) -> Self {
        value.score()
    }
}

impl fmt::Display for RatingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.score())
    }
}

/// An in-progress rating for one review of the batch.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Rating {
    pub value: RatingValue,
    pub comment: Option<String>,
}

impl Rating {
    /// Blank comments are treated as no comment at all; anything else is kept as typed.
    pub fn new(value: RatingValue, comment: Option<String>) -> Self {
        let comment = comment.filter(|c| !c.trim().is_empty());
        Self { value, comment }
    }
}

/// One row of the results file. Field order is the column order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRecord {
    pub user_id: String,
    pub review_id: String,
    pub rating: RatingValue,
    pub comment: String,
    pub timestamp: DateTime<Utc>,
}
