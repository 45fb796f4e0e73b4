use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::exercise::{Exercise, ExerciseInput};
use crate::models::validation::{self, ValidationError};

/// Document field that scopes a training to its owner. Also the field the
/// live feed subscribes on, so it must match the serialized shape below.
pub const OWNER_FIELD: &str = "owner_user_id";

/// One logged workout: an ordered list of exercises under a name and date.
///
/// The id is assigned by the remote store and lives outside the document
/// payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Training {
    pub id: String,
    pub name: String,
    pub date: DateTime<Utc>,
    pub completed: bool,
    pub exercises: Vec<Exercise>,
    pub owner_user_id: String,
}

impl Training {
    /// Parse a raw store document into a training.
    ///
    /// Fails when the payload does not match the expected shape, including
    /// any exercise that violates its structural invariants.
    pub fn parse(id: impl Into<String>, data: Value) -> serde_json::Result<Self> {
        let doc: TrainingDoc = serde_json::from_value(data)?;
        Ok(Self {
            id: id.into(),
            name: doc.name,
            date: doc.date,
            completed: doc.completed,
            exercises: doc.exercises,
            owner_user_id: doc.owner_user_id,
        })
    }

    pub fn exercise_count(&self) -> usize {
        self.exercises.len()
    }

    /// Sum of cardio durations across the training, if any exercise has one.
    pub fn total_duration_seconds(&self) -> Option<u32> {
        let mut total = None;
        for exercise in &self.exercises {
            if let Some(duration) = exercise.duration_seconds() {
                *total.get_or_insert(0) += duration;
            }
        }
        total
    }
}

/// Client-side accumulation state for a training that has not been saved
/// yet. Exercises enter only through validation; the draft becomes durable
/// through the training service.
#[derive(Debug, Clone)]
pub struct TrainingDraft {
    pub name: String,
    pub date: DateTime<Utc>,
    pub exercises: Vec<Exercise>,
}

impl TrainingDraft {
    pub fn new(name: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            date,
            exercises: Vec::new(),
        }
    }

    /// Validate raw input and append the resulting exercise. A rejected
    /// input leaves the draft unchanged.
    pub fn add_exercise(&mut self, input: ExerciseInput) -> Result<(), ValidationError> {
        let exercise = validation::build_exercise(input)?;
        self.exercises.push(exercise);
        Ok(())
    }

    /// Remove the exercise at `index`, returning it, or `None` when out of
    /// range.
    pub fn remove_exercise(&mut self, index: usize) -> Option<Exercise> {
        if index < self.exercises.len() {
            Some(self.exercises.remove(index))
        } else {
            None
        }
    }

    /// Serialize the draft as a new store document owned by `owner_user_id`.
    /// New trainings start out not completed.
    pub fn document_data(&self, owner_user_id: &str) -> serde_json::Result<Value> {
        serde_json::to_value(TrainingDoc {
            name: self.name.clone(),
            date: self.date,
            completed: false,
            exercises: self.exercises.clone(),
            owner_user_id: owner_user_id.to_string(),
        })
    }
}

/// Partial update of a training; only present fields are written.
#[derive(Debug, Clone, Default)]
pub struct TrainingUpdate {
    pub name: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub completed: Option<bool>,
    pub exercises: Option<Vec<Exercise>>,
}

impl TrainingUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.date.is_none()
            && self.completed.is_none()
            && self.exercises.is_none()
    }

    /// Serialize the present fields as a merge payload for the store.
    pub fn document_changes(&self) -> serde_json::Result<Value> {
        let mut changes = serde_json::Map::new();
        if let Some(name) = &self.name {
            changes.insert("name".to_string(), Value::String(name.clone()));
        }
        if let Some(date) = &self.date {
            changes.insert("date".to_string(), serde_json::to_value(date)?);
        }
        if let Some(completed) = self.completed {
            changes.insert("completed".to_string(), Value::Bool(completed));
        }
        if let Some(exercises) = &self.exercises {
            changes.insert("exercises".to_string(), serde_json::to_value(exercises)?);
        }
        Ok(Value::Object(changes))
    }
}

/// Document payload for a training as stored remotely (id excluded).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TrainingDoc {
    name: String,
    date: DateTime<Utc>,
    completed: bool,
    exercises: Vec<Exercise>,
    owner_user_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::exercise::ExerciseType;
    use chrono::TimeZone;

    fn sample_draft() -> TrainingDraft {
        let mut draft = TrainingDraft::new(
            "Leg day",
            Utc.with_ymd_and_hms(2024, 2, 10, 18, 0, 0).unwrap(),
        );
        draft
            .add_exercise(ExerciseInput::strength(
                "Squat",
                ExerciseType::Quads,
                3,
                vec![8, 8, 6],
            ))
            .unwrap();
        draft
            .add_exercise(ExerciseInput::cardio(
                "Treadmill",
                ExerciseType::Treadmill,
                600,
            ))
            .unwrap();
        draft
    }

    #[test]
    fn draft_rejects_invalid_exercise_without_change() {
        let mut draft = sample_draft();
        let before = draft.exercises.len();

        let result = draft.add_exercise(ExerciseInput::strength(
            "Deadlift",
            ExerciseType::Hamstrings,
            3,
            vec![5],
        ));

        assert_eq!(result, Err(ValidationError::SetsRepsMismatch));
        assert_eq!(draft.exercises.len(), before);
    }

    #[test]
    fn draft_remove_exercise_drops_indexed_entry() {
        let mut draft = sample_draft();
        let removed = draft.remove_exercise(0).unwrap();
        assert_eq!(removed.name, "Squat");
        assert_eq!(draft.exercises.len(), 1);
        assert_eq!(draft.exercises[0].name, "Treadmill");

        assert!(draft.remove_exercise(5).is_none());
    }

    #[test]
    fn document_round_trip_preserves_training() {
        let draft = sample_draft();
        let data = draft.document_data("user-1").unwrap();
        assert_eq!(data[OWNER_FIELD], "user-1");
        assert_eq!(data["completed"], false);

        let training = Training::parse("t-1", data).unwrap();
        assert_eq!(training.id, "t-1");
        assert_eq!(training.name, "Leg day");
        assert_eq!(training.owner_user_id, "user-1");
        assert_eq!(training.exercise_count(), 2);
        assert_eq!(training.total_duration_seconds(), Some(600));
    }

    #[test]
    fn total_duration_is_none_without_cardio() {
        let mut draft = TrainingDraft::new("Push day", Utc::now());
        draft
            .add_exercise(ExerciseInput::strength(
                "Bench press",
                ExerciseType::Chest,
                3,
                vec![10, 10, 8],
            ))
            .unwrap();
        let data = draft.document_data("user-1").unwrap();
        let training = Training::parse("t-2", data).unwrap();
        assert_eq!(training.total_duration_seconds(), None);
    }

    #[test]
    fn parse_rejects_malformed_payload() {
        let data = serde_json::json!({
            "name": "Broken",
            "date": "not-a-timestamp",
            "completed": false,
            "exercises": [],
            "owner_user_id": "user-1",
        });
        assert!(Training::parse("t-3", data).is_err());
    }

    #[test]
    fn update_serializes_only_present_fields() {
        let update = TrainingUpdate {
            completed: Some(true),
            ..Default::default()
        };
        let changes = update.document_changes().unwrap();
        let object = changes.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(object["completed"], true);

        assert!(TrainingUpdate::default().is_empty());
    }
}
