pub mod rating;
pub mod review;
pub mod user;
pub mod wire;
