// Data models for the training tracker core

pub mod exercise;
pub mod month;
pub mod training;
pub mod user;
pub mod validation;

pub use exercise::{Effort, Exercise, ExerciseInput, ExerciseType};
pub use month::MonthWindow;
pub use training::{Training, TrainingDraft, TrainingUpdate, OWNER_FIELD};
pub use user::User;
pub use validation::ValidationError;
