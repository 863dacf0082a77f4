//! Exchange aggregate: a proposed transaction between two users over a listing.
//!
//! Status tokens follow the marketplace vocabulary:
//!
//! ```text
//! pendiente --accept--> aceptado --start--> en_progreso
//!   --first validation--> pendiente_validacion
//!   --second validation--> completado | fallido | pendiente_validacion
//! pendiente --reject--> rechazado
//! pendiente | aceptado | en_progreso --cancel--> cancelado
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::UserId;

/// Lifecycle status of an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExchangeStatus {
    Pending,
    Accepted,
    Rejected,
    InProgress,
    PendingValidation,
    Completed,
    Failed,
    Cancelled,
}

impl ExchangeStatus {
    /// Canonical wire token.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pendiente",
            Self::Accepted => "aceptado",
            Self::Rejected => "rechazado",
            Self::InProgress => "en_progreso",
            Self::PendingValidation => "pendiente_validacion",
            Self::Completed => "completado",
            Self::Failed => "fallido",
            Self::Cancelled => "cancelado",
        }
    }

    /// Whether the status admits no further transitions.
    ///
    /// `pendiente_validacion` with disagreeing verdicts is terminal-pending:
    /// it stays out of this set because external resolution may still move it.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Failed | Self::Cancelled | Self::Rejected
        )
    }

    /// Whether a participant may submit a validation verdict.
    pub fn accepts_validation(self) -> bool {
        matches!(self, Self::InProgress | Self::PendingValidation)
    }

    /// Whether a participant may cancel the exchange.
    pub fn is_cancellable(self) -> bool {
        matches!(self, Self::Pending | Self::Accepted | Self::InProgress)
    }
}

impl fmt::Display for ExchangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing an [`ExchangeStatus`] token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown exchange status: {value}")]
pub struct ParseExchangeStatusError {
    value: String,
}

impl FromStr for ExchangeStatus {
    type Err = ParseExchangeStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendiente" => Ok(Self::Pending),
            "aceptado" => Ok(Self::Accepted),
            "rechazado" => Ok(Self::Rejected),
            "en_progreso" => Ok(Self::InProgress),
            "pendiente_validacion" => Ok(Self::PendingValidation),
            "completado" => Ok(Self::Completed),
            "fallido" => Ok(Self::Failed),
            "cancelado" => Ok(Self::Cancelled),
            other => Err(ParseExchangeStatusError {
                value: other.to_owned(),
            }),
        }
    }
}

/// Validation errors raised by exchange constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeValidationError {
    ProposerIsReceiver,
    BlankMeetingLocation,
    BlankRejectReason,
}

impl fmt::Display for ExchangeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProposerIsReceiver => {
                write!(f, "exchange proposer and receiver must be distinct users")
            }
            Self::BlankMeetingLocation => write!(f, "meeting location must not be blank"),
            Self::BlankRejectReason => write!(f, "rejection reason must not be blank"),
        }
    }
}

impl std::error::Error for ExchangeValidationError {}

/// Meeting arrangements recorded when the receiver accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingDetails {
    location: String,
    meeting_at: DateTime<Utc>,
    notes: Option<String>,
}

impl MeetingDetails {
    /// Validated constructor.
    pub fn new(
        location: impl Into<String>,
        meeting_at: DateTime<Utc>,
        notes: Option<String>,
    ) -> Result<Self, ExchangeValidationError> {
        let location = location.into();
        if location.trim().is_empty() {
            return Err(ExchangeValidationError::BlankMeetingLocation);
        }
        Ok(Self {
            location,
            meeting_at,
            notes: notes.filter(|value| !value.trim().is_empty()),
        })
    }

    /// Agreed meeting place.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Agreed meeting time.
    pub fn meeting_at(&self) -> DateTime<Utc> {
        self.meeting_at
    }

    /// Free-form notes for the meeting.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

/// Unvalidated exchange fields used to build an [`Exchange`].
#[derive(Debug, Clone)]
pub struct ExchangeDraft {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub proposer_id: UserId,
    pub receiver_id: UserId,
    pub status: ExchangeStatus,
    pub message: Option<String>,
    pub meeting: Option<MeetingDetails>,
    pub reject_reason: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A proposed or ongoing transaction between two users over one listing.
///
/// ## Invariants
/// - `proposer_id != receiver_id`.
/// - `completed_at` (wire name `fecha_completado`) is set only by the
///   validation resolver when the pair of verdicts agrees on success.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    id: Uuid,
    listing_id: Uuid,
    proposer_id: UserId,
    receiver_id: UserId,
    status: ExchangeStatus,
    message: Option<String>,
    meeting: Option<MeetingDetails>,
    reject_reason: Option<String>,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Exchange {
    /// Validated constructor.
    pub fn new(draft: ExchangeDraft) -> Result<Self, ExchangeValidationError> {
        let ExchangeDraft {
            id,
            listing_id,
            proposer_id,
            receiver_id,
            status,
            message,
            meeting,
            reject_reason,
            completed_at,
            created_at,
            updated_at,
        } = draft;

        if proposer_id == receiver_id {
            return Err(ExchangeValidationError::ProposerIsReceiver);
        }
        if let Some(reason) = &reject_reason {
            if reason.trim().is_empty() {
                return Err(ExchangeValidationError::BlankRejectReason);
            }
        }

        Ok(Self {
            id,
            listing_id,
            proposer_id,
            receiver_id,
            status,
            message: message.filter(|value| !value.trim().is_empty()),
            meeting,
            reject_reason,
            completed_at,
            created_at,
            updated_at,
        })
    }

    /// Exchange identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The listing this exchange targets.
    pub fn listing_id(&self) -> Uuid {
        self.listing_id
    }

    /// The user who proposed the exchange.
    pub fn proposer_id(&self) -> &UserId {
        &self.proposer_id
    }

    /// The listing owner receiving the proposal.
    pub fn receiver_id(&self) -> &UserId {
        &self.receiver_id
    }

    /// Current lifecycle status.
    pub fn status(&self) -> ExchangeStatus {
        self.status
    }

    /// Message attached to the proposal.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Meeting arrangements recorded on accept.
    pub fn meeting(&self) -> Option<&MeetingDetails> {
        self.meeting.as_ref()
    }

    /// Reason recorded on reject.
    pub fn reject_reason(&self) -> Option<&str> {
        self.reject_reason.as_deref()
    }

    /// Completion timestamp (`fecha_completado`).
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last modification timestamp.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether the given user is one of the two participants.
    pub fn is_participant(&self, user_id: &UserId) -> bool {
        self.proposer_id == *user_id || self.receiver_id == *user_id
    }

    /// The other participant, when `user_id` is a participant.
    pub fn counterparty(&self, user_id: &UserId) -> Option<&UserId> {
        if self.proposer_id == *user_id {
            Some(&self.receiver_id)
        } else if self.receiver_id == *user_id {
            Some(&self.proposer_id)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    fn draft(proposer: UserId, receiver: UserId) -> ExchangeDraft {
        let now = Utc::now();
        ExchangeDraft {
            id: Uuid::new_v4(),
            listing_id: Uuid::new_v4(),
            proposer_id: proposer,
            receiver_id: receiver,
            status: ExchangeStatus::Pending,
            message: Some("Me interesa".to_owned()),
            meeting: None,
            reject_reason: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    fn proposer_must_differ_from_receiver() {
        let user = UserId::random();
        let error = Exchange::new(draft(user, user)).expect_err("same participant");
        assert_eq!(error, ExchangeValidationError::ProposerIsReceiver);
    }

    #[rstest]
    fn counterparty_is_symmetric() {
        let proposer = UserId::random();
        let receiver = UserId::random();
        let exchange = Exchange::new(draft(proposer, receiver)).expect("valid exchange");

        assert_eq!(exchange.counterparty(&proposer), Some(&receiver));
        assert_eq!(exchange.counterparty(&receiver), Some(&proposer));
        assert_eq!(exchange.counterparty(&UserId::random()), None);
    }

    #[rstest]
    fn blank_message_is_dropped() {
        let mut blank = draft(UserId::random(), UserId::random());
        blank.message = Some("   ".to_owned());
        let exchange = Exchange::new(blank).expect("valid exchange");
        assert_eq!(exchange.message(), None);
    }

    #[rstest]
    #[case(ExchangeStatus::InProgress, true)]
    #[case(ExchangeStatus::PendingValidation, true)]
    #[case(ExchangeStatus::Pending, false)]
    #[case(ExchangeStatus::Accepted, false)]
    #[case(ExchangeStatus::Completed, false)]
    fn validation_window_matches_state_machine(
        #[case] status: ExchangeStatus,
        #[case] accepts: bool,
    ) {
        assert_eq!(status.accepts_validation(), accepts);
    }

    #[rstest]
    #[case(ExchangeStatus::Completed)]
    #[case(ExchangeStatus::Failed)]
    #[case(ExchangeStatus::Cancelled)]
    #[case(ExchangeStatus::Rejected)]
    fn terminal_statuses_are_not_cancellable(#[case] status: ExchangeStatus) {
        assert!(status.is_terminal());
        assert!(!status.is_cancellable());
    }

    #[rstest]
    fn status_tokens_round_trip() {
        for status in [
            ExchangeStatus::Pending,
            ExchangeStatus::Accepted,
            ExchangeStatus::Rejected,
            ExchangeStatus::InProgress,
            ExchangeStatus::PendingValidation,
            ExchangeStatus::Completed,
            ExchangeStatus::Failed,
            ExchangeStatus::Cancelled,
        ] {
            let reparsed = status.as_str().parse::<ExchangeStatus>();
            assert_eq!(reparsed, Ok(status));
        }
    }

    #[rstest]
    fn meeting_location_must_not_be_blank() {
        let error = MeetingDetails::new("  ", Utc::now(), None).expect_err("blank location");
        assert_eq!(error, ExchangeValidationError::BlankMeetingLocation);
    }
}
