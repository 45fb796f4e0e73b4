// Operations the UI layer drives: user-scoped training CRUD and the live
// month-windowed feed

pub mod training_feed;
pub mod training_service;

pub use training_feed::TrainingFeed;
pub use training_service::{ServiceError, TrainingService, TRAININGS_COLLECTION};
