pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod models;
pub mod reminders;

pub use error::{Error, Result};
pub use models::{AnswerBatch, AnsweredQuestion, PartialPrior, ReviewState, compute_next_review};
