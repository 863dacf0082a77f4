//! Best-effort notifications for exchange counterparties.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::UserId;

/// What happened to the related exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    OfferReceived,
    ExchangeAccepted,
    ExchangeRejected,
    ExchangeStarted,
    ExchangeCancelled,
    ValidationRecorded,
    ExchangeCompleted,
    ExchangeFailed,
}

impl NotificationKind {
    /// Canonical wire token.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OfferReceived => "oferta_recibida",
            Self::ExchangeAccepted => "intercambio_aceptado",
            Self::ExchangeRejected => "intercambio_rechazado",
            Self::ExchangeStarted => "intercambio_iniciado",
            Self::ExchangeCancelled => "intercambio_cancelado",
            Self::ValidationRecorded => "validacion_registrada",
            Self::ExchangeCompleted => "intercambio_completado",
            Self::ExchangeFailed => "intercambio_fallido",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a [`NotificationKind`] token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown notification kind: {value}")]
pub struct ParseNotificationKindError {
    value: String,
}

impl FromStr for NotificationKind {
    type Err = ParseNotificationKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "oferta_recibida" => Ok(Self::OfferReceived),
            "intercambio_aceptado" => Ok(Self::ExchangeAccepted),
            "intercambio_rechazado" => Ok(Self::ExchangeRejected),
            "intercambio_iniciado" => Ok(Self::ExchangeStarted),
            "intercambio_cancelado" => Ok(Self::ExchangeCancelled),
            "validacion_registrada" => Ok(Self::ValidationRecorded),
            "intercambio_completado" => Ok(Self::ExchangeCompleted),
            "intercambio_fallido" => Ok(Self::ExchangeFailed),
            other => Err(ParseNotificationKindError {
                value: other.to_owned(),
            }),
        }
    }
}

/// A notification row for one recipient.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    id: Uuid,
    recipient_id: UserId,
    kind: NotificationKind,
    exchange_id: Uuid,
    body: String,
    read: bool,
    created_at: DateTime<Utc>,
}

impl Notification {
    /// Build a fresh unread notification.
    pub fn new(
        recipient_id: UserId,
        kind: NotificationKind,
        exchange_id: Uuid,
        body: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipient_id,
            kind,
            exchange_id,
            body: body.into(),
            read: false,
            created_at,
        }
    }

    /// Rebuild a persisted notification.
    pub fn from_parts(
        id: Uuid,
        recipient_id: UserId,
        kind: NotificationKind,
        exchange_id: Uuid,
        body: String,
        read: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            recipient_id,
            kind,
            exchange_id,
            body,
            read,
            created_at,
        }
    }

    /// Notification identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The user this notification addresses.
    pub fn recipient_id(&self) -> &UserId {
        &self.recipient_id
    }

    /// Event category.
    pub fn kind(&self) -> NotificationKind {
        self.kind
    }

    /// The related exchange.
    pub fn exchange_id(&self) -> Uuid {
        self.exchange_id
    }

    /// Human-readable body text.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Whether the recipient has read it.
    pub fn is_read(&self) -> bool {
        self.read
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn new_notifications_start_unread() {
        let notification = Notification::new(
            UserId::random(),
            NotificationKind::OfferReceived,
            Uuid::new_v4(),
            "Nueva oferta en tu publicacion",
            Utc::now(),
        );
        assert!(!notification.is_read());
    }

    #[rstest]
    fn kind_tokens_round_trip() {
        for kind in [
            NotificationKind::OfferReceived,
            NotificationKind::ExchangeAccepted,
            NotificationKind::ExchangeRejected,
            NotificationKind::ExchangeStarted,
            NotificationKind::ExchangeCancelled,
            NotificationKind::ValidationRecorded,
            NotificationKind::ExchangeCompleted,
            NotificationKind::ExchangeFailed,
        ] {
            assert_eq!(kind.as_str().parse::<NotificationKind>(), Ok(kind));
        }
    }
}
