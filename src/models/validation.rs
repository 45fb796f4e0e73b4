//! Structural validation for exercises and training drafts.
//!
//! Every function here is pure and total: no I/O, no partial state, same
//! input always yields the same result.

use thiserror::Error;

use crate::models::exercise::{Effort, Exercise, ExerciseInput};
use crate::models::training::TrainingDraft;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("exercise name must not be empty")]
    EmptyName,
    #[error("cardio exercise requires a duration")]
    MissingDuration,
    #[error("cardio duration must be greater than zero")]
    InvalidDuration,
    #[error("strength exercise requires a positive set count")]
    MissingSets,
    #[error("strength exercise requires repetitions")]
    MissingReps,
    #[error("repetitions must be given for each set")]
    SetsRepsMismatch,
    #[error("training name must not be empty")]
    EmptyTrainingName,
    #[error("training must contain at least one exercise")]
    NoExercises,
}

/// Build a well-formed [`Exercise`] from raw input fields.
///
/// Checks run in order: name, then the fields demanded by the
/// classification. Fields that do not belong to the classification (for
/// example sets entered for a cardio exercise) are dropped.
pub fn build_exercise(input: ExerciseInput) -> Result<Exercise, ValidationError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    let effort = if input.exercise_type.is_cardio() {
        let duration_seconds = input.duration_seconds.ok_or(ValidationError::MissingDuration)?;
        if duration_seconds == 0 {
            return Err(ValidationError::InvalidDuration);
        }
        Effort::Cardio { duration_seconds }
    } else {
        let sets = match input.sets {
            Some(sets) if sets > 0 => sets,
            _ => return Err(ValidationError::MissingSets),
        };
        let repetitions = match input.repetitions {
            Some(repetitions) if !repetitions.is_empty() => repetitions,
            _ => return Err(ValidationError::MissingReps),
        };
        if repetitions.len() != sets as usize {
            return Err(ValidationError::SetsRepsMismatch);
        }
        Effort::Strength { sets, repetitions }
    };

    Ok(Exercise {
        name: name.to_string(),
        exercise_type: input.exercise_type,
        effort,
    })
}

/// Re-check an already-built exercise.
///
/// With [`Effort`] keyed by classification this reduces to "does the value
/// match its variant's shape"; it exists so callers holding exercises from
/// an untrusted path can re-assert the invariants.
pub fn validate_exercise(exercise: &Exercise) -> Result<(), ValidationError> {
    if exercise.name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    match &exercise.effort {
        Effort::Cardio { duration_seconds } => {
            if *duration_seconds == 0 {
                return Err(ValidationError::InvalidDuration);
            }
        }
        Effort::Strength { sets, repetitions } => {
            if *sets == 0 {
                return Err(ValidationError::MissingSets);
            }
            if repetitions.is_empty() {
                return Err(ValidationError::MissingReps);
            }
            if repetitions.len() != *sets as usize {
                return Err(ValidationError::SetsRepsMismatch);
            }
        }
    }
    Ok(())
}

/// Validate a slice of exercises as the content of a training.
pub fn validate_exercises(exercises: &[Exercise]) -> Result<(), ValidationError> {
    if exercises.is_empty() {
        return Err(ValidationError::NoExercises);
    }
    for exercise in exercises {
        validate_exercise(exercise)?;
    }
    Ok(())
}

/// Validate a draft before it is allowed to leave the client.
pub fn validate_draft(draft: &TrainingDraft) -> Result<(), ValidationError> {
    if draft.name.trim().is_empty() {
        return Err(ValidationError::EmptyTrainingName);
    }
    validate_exercises(&draft.exercises)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::exercise::ExerciseType;
    use chrono::Utc;

    #[test]
    fn rejects_empty_name() {
        let input = ExerciseInput::strength("   ", ExerciseType::Chest, 3, vec![10, 10, 8]);
        assert_eq!(build_exercise(input), Err(ValidationError::EmptyName));
    }

    #[test]
    fn strength_requires_matching_sets_and_reps() {
        let valid = ExerciseInput::strength("Bench press", ExerciseType::Chest, 3, vec![10, 10, 8]);
        assert!(build_exercise(valid).is_ok());

        let mismatched = ExerciseInput::strength("Bench press", ExerciseType::Chest, 3, vec![10, 10]);
        assert_eq!(
            build_exercise(mismatched),
            Err(ValidationError::SetsRepsMismatch)
        );
    }

    #[test]
    fn strength_requires_sets_and_reps_present() {
        let no_sets = ExerciseInput {
            name: "Squat".to_string(),
            exercise_type: ExerciseType::Quads,
            sets: None,
            repetitions: Some(vec![10]),
            duration_seconds: None,
        };
        assert_eq!(build_exercise(no_sets), Err(ValidationError::MissingSets));

        let zero_sets = ExerciseInput::strength("Squat", ExerciseType::Quads, 0, vec![]);
        assert_eq!(build_exercise(zero_sets), Err(ValidationError::MissingSets));

        let no_reps = ExerciseInput {
            name: "Squat".to_string(),
            exercise_type: ExerciseType::Quads,
            sets: Some(3),
            repetitions: None,
            duration_seconds: None,
        };
        assert_eq!(build_exercise(no_reps), Err(ValidationError::MissingReps));

        let empty_reps = ExerciseInput::strength("Squat", ExerciseType::Quads, 3, vec![]);
        assert_eq!(build_exercise(empty_reps), Err(ValidationError::MissingReps));
    }

    #[test]
    fn zero_repetitions_in_a_set_are_allowed() {
        let input = ExerciseInput::strength("Pull up", ExerciseType::Lats, 3, vec![8, 5, 0]);
        assert!(build_exercise(input).is_ok());
    }

    #[test]
    fn cardio_requires_positive_duration() {
        let valid = ExerciseInput::cardio("Treadmill", ExerciseType::Treadmill, 1200);
        assert!(build_exercise(valid).is_ok());

        let zero = ExerciseInput::cardio("Treadmill", ExerciseType::Treadmill, 0);
        assert_eq!(build_exercise(zero), Err(ValidationError::InvalidDuration));

        let missing = ExerciseInput {
            name: "Treadmill".to_string(),
            exercise_type: ExerciseType::Treadmill,
            sets: None,
            repetitions: None,
            duration_seconds: None,
        };
        assert_eq!(build_exercise(missing), Err(ValidationError::MissingDuration));
    }

    #[test]
    fn cardio_drops_stray_strength_fields() {
        let input = ExerciseInput {
            name: "Stairs".to_string(),
            exercise_type: ExerciseType::StairClimber,
            sets: Some(3),
            repetitions: Some(vec![10, 10, 10]),
            duration_seconds: Some(300),
        };
        let exercise = build_exercise(input).unwrap();
        assert_eq!(
            exercise.effort,
            Effort::Cardio {
                duration_seconds: 300
            }
        );
    }

    #[test]
    fn validation_is_idempotent() {
        let input = ExerciseInput::strength("Row", ExerciseType::UpperBack, 2, vec![12, 12]);
        let first = build_exercise(input.clone());
        let second = build_exercise(input);
        assert_eq!(first, second);

        let exercise = first.unwrap();
        assert_eq!(validate_exercise(&exercise), validate_exercise(&exercise));
    }

    #[test]
    fn draft_requires_name_and_exercises() {
        let mut draft = TrainingDraft::new("", Utc::now());
        assert_eq!(validate_draft(&draft), Err(ValidationError::EmptyTrainingName));

        draft.name = "Push day".to_string();
        assert_eq!(validate_draft(&draft), Err(ValidationError::NoExercises));

        draft
            .add_exercise(ExerciseInput::strength(
                "Bench press",
                ExerciseType::Chest,
                3,
                vec![10, 10, 8],
            ))
            .unwrap();
        assert_eq!(validate_draft(&draft), Ok(()));
    }
}
