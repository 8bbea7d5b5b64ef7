pub mod guideline;
pub mod rating_batch;
pub mod review_card;
pub mod user_select;
