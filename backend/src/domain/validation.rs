//! Exchange validations and the resolution rule.
//!
//! Each participant submits at most one post-hoc verdict (`exito`) on whether
//! the exchange was honoured. Once both verdicts are in, the exchange's
//! terminal outcome is a pure function of the pair: agreement on success
//! completes it, agreement on failure fails it, and disagreement holds it for
//! external resolution.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{ExchangeStatus, Score, UserId};

/// Validation errors raised by the constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationValidationError {
    BlankComment,
}

impl fmt::Display for ValidationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlankComment => write!(f, "comentario must not be blank when present"),
        }
    }
}

impl std::error::Error for ValidationValidationError {}

/// Unvalidated validation fields used to build a [`Validation`].
#[derive(Debug, Clone)]
pub struct ValidationDraft {
    pub id: Uuid,
    pub exchange_id: Uuid,
    pub user_id: UserId,
    pub verdict: bool,
    pub rating: Option<Score>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A participant's verdict on one exchange.
///
/// ## Invariants
/// - At most one validation per (exchange, user); enforced by persistence.
/// - An exchange holds at most two validations, one per participant.
#[derive(Debug, Clone, PartialEq)]
pub struct Validation {
    id: Uuid,
    exchange_id: Uuid,
    user_id: UserId,
    verdict: bool,
    rating: Option<Score>,
    comment: Option<String>,
    created_at: DateTime<Utc>,
}

impl Validation {
    /// Validated constructor.
    pub fn new(draft: ValidationDraft) -> Result<Self, ValidationValidationError> {
        let ValidationDraft {
            id,
            exchange_id,
            user_id,
            verdict,
            rating,
            comment,
            created_at,
        } = draft;

        if let Some(text) = &comment {
            if text.trim().is_empty() {
                return Err(ValidationValidationError::BlankComment);
            }
        }

        Ok(Self {
            id,
            exchange_id,
            user_id,
            verdict,
            rating,
            comment,
            created_at,
        })
    }

    /// Validation identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The owning exchange.
    pub fn exchange_id(&self) -> Uuid {
        self.exchange_id
    }

    /// The submitting participant.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// The success flag (`exito`).
    pub fn verdict(&self) -> bool {
        self.verdict
    }

    /// Optional score attached to the verdict (`puntuacion`).
    pub fn rating(&self) -> Option<Score> {
        self.rating
    }

    /// Optional comment (`comentario`).
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Submission timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Resolution of a validation set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// One verdict recorded; the exchange awaits the second party.
    AwaitingSecond,
    /// Both participants reported success.
    Completed,
    /// Both participants reported failure.
    Failed,
    /// The verdicts disagree; held for external resolution.
    Disputed,
}

impl ValidationOutcome {
    /// The exchange status this outcome maps to.
    pub fn status(self) -> ExchangeStatus {
        match self {
            Self::AwaitingSecond | Self::Disputed => ExchangeStatus::PendingValidation,
            Self::Completed => ExchangeStatus::Completed,
            Self::Failed => ExchangeStatus::Failed,
        }
    }

    /// Whether this outcome sets `fecha_completado`.
    pub fn marks_completion(self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Violations of the validation-set invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationSetError {
    #[error("an exchange cannot be resolved without validations")]
    Empty,
    #[error("an exchange holds at most two validations (got {count})")]
    TooMany { count: usize },
    #[error("both validations belong to user {user_id}")]
    DuplicateSubmitter { user_id: UserId },
}

/// Derive the outcome of an exchange from its validation set.
///
/// Pure: submission order never affects the result.
pub fn resolve_validations(
    validations: &[Validation],
) -> Result<ValidationOutcome, ValidationSetError> {
    match validations {
        [] => Err(ValidationSetError::Empty),
        [_] => Ok(ValidationOutcome::AwaitingSecond),
        [first, second] => {
            if first.user_id() == second.user_id() {
                return Err(ValidationSetError::DuplicateSubmitter {
                    user_id: *first.user_id(),
                });
            }
            Ok(match (first.verdict(), second.verdict()) {
                (true, true) => ValidationOutcome::Completed,
                (false, false) => ValidationOutcome::Failed,
                _ => ValidationOutcome::Disputed,
            })
        }
        more => Err(ValidationSetError::TooMany { count: more.len() }),
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for the resolution rule's testable properties.

    use rstest::rstest;

    use super::*;

    fn verdict_for(exchange_id: Uuid, user_id: UserId, verdict: bool) -> Validation {
        Validation::new(ValidationDraft {
            id: Uuid::new_v4(),
            exchange_id,
            user_id,
            verdict,
            rating: None,
            comment: None,
            created_at: Utc::now(),
        })
        .expect("valid validation")
    }

    #[rstest]
    fn single_verdict_awaits_second_party() {
        let exchange_id = Uuid::new_v4();
        let set = vec![verdict_for(exchange_id, UserId::random(), true)];

        let outcome = resolve_validations(&set).expect("resolvable");
        assert_eq!(outcome, ValidationOutcome::AwaitingSecond);
        assert_eq!(outcome.status(), ExchangeStatus::PendingValidation);
        assert!(!outcome.marks_completion());
    }

    #[rstest]
    #[case(true, true, ValidationOutcome::Completed, ExchangeStatus::Completed)]
    #[case(false, false, ValidationOutcome::Failed, ExchangeStatus::Failed)]
    #[case(true, false, ValidationOutcome::Disputed, ExchangeStatus::PendingValidation)]
    #[case(false, true, ValidationOutcome::Disputed, ExchangeStatus::PendingValidation)]
    fn paired_verdicts_resolve_regardless_of_order(
        #[case] first: bool,
        #[case] second: bool,
        #[case] expected: ValidationOutcome,
        #[case] status: ExchangeStatus,
    ) {
        let exchange_id = Uuid::new_v4();
        let a = verdict_for(exchange_id, UserId::random(), first);
        let b = verdict_for(exchange_id, UserId::random(), second);

        let forward = resolve_validations(&[a.clone(), b.clone()]).expect("resolvable");
        let reversed = resolve_validations(&[b, a]).expect("resolvable");

        assert_eq!(forward, expected);
        assert_eq!(reversed, expected);
        assert_eq!(forward.status(), status);
    }

    #[rstest]
    fn only_double_success_marks_completion() {
        assert!(ValidationOutcome::Completed.marks_completion());
        assert!(!ValidationOutcome::Failed.marks_completion());
        assert!(!ValidationOutcome::Disputed.marks_completion());
    }

    #[rstest]
    fn empty_set_is_rejected() {
        assert_eq!(resolve_validations(&[]), Err(ValidationSetError::Empty));
    }

    #[rstest]
    fn oversized_set_is_rejected() {
        let exchange_id = Uuid::new_v4();
        let set = vec![
            verdict_for(exchange_id, UserId::random(), true),
            verdict_for(exchange_id, UserId::random(), true),
            verdict_for(exchange_id, UserId::random(), true),
        ];

        assert_eq!(
            resolve_validations(&set),
            Err(ValidationSetError::TooMany { count: 3 })
        );
    }

    #[rstest]
    fn duplicate_submitter_is_rejected() {
        let exchange_id = Uuid::new_v4();
        let user = UserId::random();
        let set = vec![
            verdict_for(exchange_id, user, true),
            verdict_for(exchange_id, user, false),
        ];

        assert_eq!(
            resolve_validations(&set),
            Err(ValidationSetError::DuplicateSubmitter { user_id: user })
        );
    }

    #[rstest]
    fn blank_comment_is_rejected() {
        let error = Validation::new(ValidationDraft {
            id: Uuid::new_v4(),
            exchange_id: Uuid::new_v4(),
            user_id: UserId::random(),
            verdict: true,
            rating: None,
            comment: Some("  ".to_owned()),
            created_at: Utc::now(),
        })
        .expect_err("blank comment");
        assert_eq!(error, ValidationValidationError::BlankComment);
    }
}
