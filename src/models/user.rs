use serde::{Deserialize, Serialize};

/// An evaluator known to the review catalog.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,           // Name shown in the sidebar and written to the results file
    pub annotator_id: String, // Key into the annotator assignment mapping
}
