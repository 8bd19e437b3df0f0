pub mod answer;
pub mod question;
pub mod review_state;
pub mod scheduler;

pub use answer::{AnswerBatch, AnsweredQuestion};
pub use question::{DueQuery, DueReview, Question, RemovalReport, ReviewSummary};
pub use review_state::{NEVER_REVIEWED, PartialPrior, PriorState, ReviewState, StoredReview};
pub use scheduler::{MAX_STAGE, REVIEW_INTERVAL_DAYS, compute_next_review, scheduled_review_at};
