use serde::{Deserialize, Serialize};

use crate::models::validation::{self, ValidationError};

/// Classification of an exercise. Cardio types carry a duration; everything
/// else is a strength type tracked as sets and repetitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    Chest,
    Shoulders,
    Biceps,
    Triceps,
    UpperBack,
    Lats,
    Calves,
    Hamstrings,
    Quads,
    Abs,
    Treadmill,
    StairClimber,
    OtherCardio,
    Other,
}

impl ExerciseType {
    pub const ALL: [ExerciseType; 14] = [
        ExerciseType::Chest,
        ExerciseType::Shoulders,
        ExerciseType::Biceps,
        ExerciseType::Triceps,
        ExerciseType::UpperBack,
        ExerciseType::Lats,
        ExerciseType::Calves,
        ExerciseType::Hamstrings,
        ExerciseType::Quads,
        ExerciseType::Abs,
        ExerciseType::Treadmill,
        ExerciseType::StairClimber,
        ExerciseType::OtherCardio,
        ExerciseType::Other,
    ];

    pub fn is_cardio(&self) -> bool {
        matches!(
            self,
            ExerciseType::Treadmill | ExerciseType::StairClimber | ExerciseType::OtherCardio
        )
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ExerciseType::Chest => "Chest",
            ExerciseType::Shoulders => "Shoulders",
            ExerciseType::Biceps => "Biceps",
            ExerciseType::Triceps => "Triceps",
            ExerciseType::UpperBack => "Upper Back",
            ExerciseType::Lats => "Lats",
            ExerciseType::Calves => "Calves",
            ExerciseType::Hamstrings => "Hamstrings",
            ExerciseType::Quads => "Quads",
            ExerciseType::Abs => "Abs",
            ExerciseType::Treadmill => "Treadmill",
            ExerciseType::StairClimber => "Stair Climber",
            ExerciseType::OtherCardio => "Other Cardio",
            ExerciseType::Other => "Other",
        }
    }

    pub fn from_display_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.display_name() == name)
    }
}

impl Default for ExerciseType {
    fn default() -> Self {
        ExerciseType::Other
    }
}

/// How an exercise was performed. The variant is keyed by the exercise's
/// classification, so a strength record can never carry a bare duration and
/// a cardio record can never carry a sets/reps pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effort {
    Strength { sets: u32, repetitions: Vec<u32> },
    Cardio { duration_seconds: u32 },
}

/// A single exercise within a training.
///
/// Constructed through [`validation::build_exercise`] (or deserialization,
/// which applies the same checks), so a value of this type always satisfies
/// the structural invariants: non-empty name, positive duration for cardio,
/// and one repetition entry per set for strength.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ExerciseDoc", into = "ExerciseDoc")]
pub struct Exercise {
    pub name: String,
    pub exercise_type: ExerciseType,
    pub effort: Effort,
}

impl Exercise {
    /// Duration in seconds, for cardio exercises.
    pub fn duration_seconds(&self) -> Option<u32> {
        match self.effort {
            Effort::Cardio { duration_seconds } => Some(duration_seconds),
            Effort::Strength { .. } => None,
        }
    }
}

/// Raw exercise fields as entered in the UI, before validation has decided
/// which effort variant they form.
#[derive(Debug, Clone, Default)]
pub struct ExerciseInput {
    pub name: String,
    pub exercise_type: ExerciseType,
    pub sets: Option<u32>,
    pub repetitions: Option<Vec<u32>>,
    pub duration_seconds: Option<u32>,
}

impl ExerciseInput {
    pub fn strength(
        name: impl Into<String>,
        exercise_type: ExerciseType,
        sets: u32,
        repetitions: Vec<u32>,
    ) -> Self {
        Self {
            name: name.into(),
            exercise_type,
            sets: Some(sets),
            repetitions: Some(repetitions),
            duration_seconds: None,
        }
    }

    pub fn cardio(
        name: impl Into<String>,
        exercise_type: ExerciseType,
        duration_seconds: u32,
    ) -> Self {
        Self {
            name: name.into(),
            exercise_type,
            sets: None,
            repetitions: None,
            duration_seconds: Some(duration_seconds),
        }
    }
}

/// Flat document shape for an exercise as stored remotely.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ExerciseDoc {
    name: String,
    exercise_type: ExerciseType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sets: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    repetitions: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration_seconds: Option<u32>,
}

impl From<Exercise> for ExerciseDoc {
    fn from(exercise: Exercise) -> Self {
        let (sets, repetitions, duration_seconds) = match exercise.effort {
            Effort::Strength { sets, repetitions } => (Some(sets), Some(repetitions), None),
            Effort::Cardio { duration_seconds } => (None, None, Some(duration_seconds)),
        };
        Self {
            name: exercise.name,
            exercise_type: exercise.exercise_type,
            sets,
            repetitions,
            duration_seconds,
        }
    }
}

impl TryFrom<ExerciseDoc> for Exercise {
    type Error = ValidationError;

    fn try_from(doc: ExerciseDoc) -> Result<Self, Self::Error> {
        validation::build_exercise(ExerciseInput {
            name: doc.name,
            exercise_type: doc.exercise_type,
            sets: doc.sets,
            repetitions: doc.repetitions,
            duration_seconds: doc.duration_seconds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardio_types_are_cardio() {
        assert!(ExerciseType::Treadmill.is_cardio());
        assert!(ExerciseType::StairClimber.is_cardio());
        assert!(ExerciseType::OtherCardio.is_cardio());
        assert!(!ExerciseType::Chest.is_cardio());
        assert!(!ExerciseType::Other.is_cardio());
    }

    #[test]
    fn display_name_round_trips() {
        for exercise_type in ExerciseType::ALL {
            assert_eq!(
                ExerciseType::from_display_name(exercise_type.display_name()),
                Some(exercise_type)
            );
        }
        assert_eq!(ExerciseType::from_display_name("Yoga"), None);
    }

    #[test]
    fn serialization_round_trips_strength() {
        let exercise = Exercise {
            name: "Bench press".to_string(),
            exercise_type: ExerciseType::Chest,
            effort: Effort::Strength {
                sets: 3,
                repetitions: vec![10, 10, 8],
            },
        };

        let json = serde_json::to_value(&exercise).unwrap();
        assert_eq!(json["sets"], 3);
        assert!(json.get("duration_seconds").is_none());

        let back: Exercise = serde_json::from_value(json).unwrap();
        assert_eq!(back, exercise);
    }

    #[test]
    fn deserialization_rejects_mismatched_shape() {
        // A strength record whose repetition list does not match its set count
        // must not deserialize into a well-formed exercise.
        let json = serde_json::json!({
            "name": "Squat",
            "exercise_type": "quads",
            "sets": 3,
            "repetitions": [10, 10],
        });

        assert!(serde_json::from_value::<Exercise>(json).is_err());
    }

    #[test]
    fn duration_seconds_only_for_cardio() {
        let cardio = Exercise {
            name: "Treadmill".to_string(),
            exercise_type: ExerciseType::Treadmill,
            effort: Effort::Cardio {
                duration_seconds: 600,
            },
        };
        assert_eq!(cardio.duration_seconds(), Some(600));

        let strength = Exercise {
            name: "Curl".to_string(),
            exercise_type: ExerciseType::Biceps,
            effort: Effort::Strength {
                sets: 2,
                repetitions: vec![12, 10],
            },
        };
        assert_eq!(strength.duration_seconds(), None);
    }
}
