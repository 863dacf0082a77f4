//! Ratings participants leave for each other after an exchange.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::UserId;

/// Validation errors raised by rating constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RatingValidationError {
    ScoreOutOfRange { value: i16 },
    RaterIsRated,
    BlankComment,
}

impl fmt::Display for RatingValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScoreOutOfRange { value } => {
                write!(f, "puntuacion must be between 1 and 5 (got {value})")
            }
            Self::RaterIsRated => write!(f, "a user cannot rate themselves"),
            Self::BlankComment => write!(f, "comentario must not be blank when present"),
        }
    }
}

impl std::error::Error for RatingValidationError {}

/// A 1–5 score (`puntuacion`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score(i16);

impl Score {
    /// Validated constructor; accepts 1..=5.
    pub fn try_new(value: i16) -> Result<Self, RatingValidationError> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RatingValidationError::ScoreOutOfRange { value })
        }
    }

    /// The raw score value.
    pub fn value(self) -> i16 {
        self.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unvalidated rating fields used to build a [`Rating`].
#[derive(Debug, Clone)]
pub struct RatingDraft {
    pub id: Uuid,
    pub exchange_id: Uuid,
    pub rater_id: UserId,
    pub rated_id: UserId,
    pub score: Score,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A participant's rating of the counterparty for one exchange.
///
/// ## Invariants
/// - `rater_id != rated_id`.
/// - At most one rating per (exchange, rater); enforced by persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct Rating {
    id: Uuid,
    exchange_id: Uuid,
    rater_id: UserId,
    rated_id: UserId,
    score: Score,
    comment: Option<String>,
    created_at: DateTime<Utc>,
}

impl Rating {
    /// Validated constructor.
    pub fn new(draft: RatingDraft) -> Result<Self, RatingValidationError> {
        let RatingDraft {
            id,
            exchange_id,
            rater_id,
            rated_id,
            score,
            comment,
            created_at,
        } = draft;

        if rater_id == rated_id {
            return Err(RatingValidationError::RaterIsRated);
        }
        if let Some(text) = &comment {
            if text.trim().is_empty() {
                return Err(RatingValidationError::BlankComment);
            }
        }

        Ok(Self {
            id,
            exchange_id,
            rater_id,
            rated_id,
            score,
            comment,
            created_at,
        })
    }

    /// Rating identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The exchange being rated.
    pub fn exchange_id(&self) -> Uuid {
        self.exchange_id
    }

    /// The participant submitting the rating.
    pub fn rater_id(&self) -> &UserId {
        &self.rater_id
    }

    /// The counterparty being rated (`calificado_id`).
    pub fn rated_id(&self) -> &UserId {
        &self.rated_id
    }

    /// The score (`puntuacion`).
    pub fn score(&self) -> Score {
        self.score
    }

    /// Optional comment (`comentario`).
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0)]
    #[case(6)]
    #[case(-1)]
    fn out_of_range_scores_are_rejected(#[case] value: i16) {
        let error = Score::try_new(value).expect_err("out of range");
        assert_eq!(error, RatingValidationError::ScoreOutOfRange { value });
    }

    #[rstest]
    #[case(1)]
    #[case(3)]
    #[case(5)]
    fn in_range_scores_are_accepted(#[case] value: i16) {
        assert_eq!(Score::try_new(value).expect("valid score").value(), value);
    }

    #[rstest]
    fn self_rating_is_rejected() {
        let user = UserId::random();
        let error = Rating::new(RatingDraft {
            id: Uuid::new_v4(),
            exchange_id: Uuid::new_v4(),
            rater_id: user,
            rated_id: user,
            score: Score::try_new(4).expect("valid score"),
            comment: None,
            created_at: Utc::now(),
        })
        .expect_err("self rating");
        assert_eq!(error, RatingValidationError::RaterIsRated);
    }
}
