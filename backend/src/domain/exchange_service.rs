//! Exchange lifecycle domain service.
//!
//! Implements the exchange driving ports over the exchange, listing, and
//! notification repositories. Every status change is a compare-and-swap
//! guarded by the expected prior status, so two concurrent mutations of the
//! same exchange cannot overwrite each other; the loser observes a missed
//! guard and reports an invalid-state failure.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::domain::notification_service::notify_best_effort;
use crate::domain::ports::{
    AcceptExchangeRequest, CancelExchangeRequest, ExchangeCommand, ExchangePayload, ExchangeQuery,
    ExchangeRepository, ExchangeRepositoryError, ExchangeStatusTransition, GetExchangeRequest,
    ListExchangesRequest, ListingRepository, ListingRepositoryError, ListingStatusTransition,
    NotificationRepository, ProposeExchangeRequest, RejectExchangeRequest, StartExchangeRequest,
};
use crate::domain::{
    Error, Exchange, ExchangeDraft, ExchangeStatus, ListingStatus, MeetingDetails, Notification,
    NotificationKind, UserId,
};

fn map_exchange_repository_error(error: ExchangeRepositoryError) -> Error {
    match error {
        ExchangeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("exchange repository unavailable: {message}"))
        }
        ExchangeRepositoryError::Query { message } => {
            Error::internal(format!("exchange repository error: {message}"))
        }
    }
}

fn map_listing_repository_error(error: ListingRepositoryError) -> Error {
    match error {
        ListingRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("listing repository unavailable: {message}"))
        }
        ListingRepositoryError::Query { message } => {
            Error::internal(format!("listing repository error: {message}"))
        }
    }
}

/// Exchange service implementing the lifecycle driving ports.
#[derive(Clone)]
pub struct ExchangeService<E, L, N> {
    exchanges: Arc<E>,
    listings: Arc<L>,
    notifications: Arc<N>,
}

impl<E, L, N> ExchangeService<E, L, N> {
    /// Create a new service with its repositories.
    pub fn new(exchanges: Arc<E>, listings: Arc<L>, notifications: Arc<N>) -> Self {
        Self {
            exchanges,
            listings,
            notifications,
        }
    }
}

impl<E, L, N> ExchangeService<E, L, N>
where
    E: ExchangeRepository,
    L: ListingRepository,
    N: NotificationRepository,
{
    async fn load_exchange(&self, exchange_id: &Uuid) -> Result<Exchange, Error> {
        self.exchanges
            .find_by_id(exchange_id)
            .await
            .map_err(map_exchange_repository_error)?
            .ok_or_else(|| Error::not_found(format!("exchange {exchange_id} not found")))
    }

    async fn reload_after_transition(&self, exchange_id: &Uuid) -> Result<ExchangePayload, Error> {
        let exchange = self
            .exchanges
            .find_by_id(exchange_id)
            .await
            .map_err(map_exchange_repository_error)?
            .ok_or_else(|| {
                Error::internal(format!("exchange {exchange_id} vanished after update"))
            })?;
        Ok(ExchangePayload::from(exchange))
    }

    /// Guarded transition; a missed guard means a concurrent caller won.
    async fn apply_transition(
        &self,
        transition: ExchangeStatusTransition,
        missed_guard: &str,
    ) -> Result<(), Error> {
        let swapped = self
            .exchanges
            .transition_status(&transition)
            .await
            .map_err(map_exchange_repository_error)?;
        if swapped {
            Ok(())
        } else {
            Err(Error::invalid_state(missed_guard.to_owned()))
        }
    }

    async fn move_listing(&self, listing_id: Uuid, from: ListingStatus, to: ListingStatus) {
        let transition = ListingStatusTransition {
            listing_id,
            expected: vec![from],
            next: to,
            updated_at: Utc::now(),
        };
        match self.listings.transition_status(&transition).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(%listing_id, from = %from, to = %to, "listing status guard missed");
            }
            Err(error) => {
                debug!(%listing_id, %error, "listing status update failed");
            }
        }
    }

    async fn notify(
        &self,
        recipient: UserId,
        kind: NotificationKind,
        exchange_id: Uuid,
        body: String,
    ) {
        let notification = Notification::new(recipient, kind, exchange_id, body, Utc::now());
        notify_best_effort(self.notifications.as_ref(), notification).await;
    }
}

#[async_trait]
impl<E, L, N> ExchangeCommand for ExchangeService<E, L, N>
where
    E: ExchangeRepository,
    L: ListingRepository,
    N: NotificationRepository,
{
    async fn propose(&self, request: ProposeExchangeRequest) -> Result<ExchangePayload, Error> {
        let listing = self
            .listings
            .find_by_id(&request.listing_id)
            .await
            .map_err(map_listing_repository_error)?
            .ok_or_else(|| Error::not_found(format!("listing {} not found", request.listing_id)))?;

        if listing.owner_id() == &request.caller {
            return Err(Error::invalid_request(
                "cannot propose an exchange on your own listing",
            ));
        }
        if listing.status() != ListingStatus::Available {
            return Err(Error::invalid_state(format!(
                "listing {} is {}",
                listing.id(),
                listing.status()
            )));
        }

        let now = Utc::now();
        let exchange = Exchange::new(ExchangeDraft {
            id: Uuid::new_v4(),
            listing_id: listing.id(),
            proposer_id: request.caller,
            receiver_id: *listing.owner_id(),
            status: ExchangeStatus::Pending,
            message: request.message,
            meeting: None,
            reject_reason: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        })
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        self.exchanges
            .insert(&exchange)
            .await
            .map_err(map_exchange_repository_error)?;

        self.notify(
            *exchange.receiver_id(),
            NotificationKind::OfferReceived,
            exchange.id(),
            format!("Nueva oferta en tu publicacion \"{}\"", listing.title()),
        )
        .await;

        Ok(ExchangePayload::from(exchange))
    }

    async fn accept(&self, request: AcceptExchangeRequest) -> Result<ExchangePayload, Error> {
        let exchange = self.load_exchange(&request.exchange_id).await?;
        if exchange.receiver_id() != &request.caller {
            return Err(Error::forbidden("only the receiver may accept an exchange"));
        }
        if exchange.status() != ExchangeStatus::Pending {
            return Err(Error::invalid_state(format!(
                "exchange in status {} cannot be accepted",
                exchange.status()
            )));
        }

        let meeting = MeetingDetails::new(request.location, request.meeting_at, request.notes)
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        let transition = ExchangeStatusTransition::new(
            exchange.id(),
            vec![ExchangeStatus::Pending],
            ExchangeStatus::Accepted,
            Utc::now(),
        )
        .with_meeting(meeting);
        self.apply_transition(transition, "exchange is no longer pendiente")
            .await?;

        self.move_listing(
            exchange.listing_id(),
            ListingStatus::Available,
            ListingStatus::Reserved,
        )
        .await;

        self.notify(
            *exchange.proposer_id(),
            NotificationKind::ExchangeAccepted,
            exchange.id(),
            "Tu oferta fue aceptada".to_owned(),
        )
        .await;

        self.reload_after_transition(&request.exchange_id).await
    }

    async fn reject(&self, request: RejectExchangeRequest) -> Result<ExchangePayload, Error> {
        let exchange = self.load_exchange(&request.exchange_id).await?;
        if exchange.receiver_id() != &request.caller {
            return Err(Error::forbidden("only the receiver may reject an exchange"));
        }
        if exchange.status() != ExchangeStatus::Pending {
            return Err(Error::invalid_state(format!(
                "exchange in status {} cannot be rejected",
                exchange.status()
            )));
        }
        if request.reason.trim().is_empty() {
            return Err(Error::invalid_request("rejection reason must not be blank"));
        }

        let transition = ExchangeStatusTransition::new(
            exchange.id(),
            vec![ExchangeStatus::Pending],
            ExchangeStatus::Rejected,
            Utc::now(),
        )
        .with_reject_reason(request.reason);
        self.apply_transition(transition, "exchange is no longer pendiente")
            .await?;

        self.notify(
            *exchange.proposer_id(),
            NotificationKind::ExchangeRejected,
            exchange.id(),
            "Tu oferta fue rechazada".to_owned(),
        )
        .await;

        self.reload_after_transition(&request.exchange_id).await
    }

    async fn start(&self, request: StartExchangeRequest) -> Result<ExchangePayload, Error> {
        let exchange = self.load_exchange(&request.exchange_id).await?;
        if !exchange.is_participant(&request.caller) {
            return Err(Error::forbidden("only participants may start an exchange"));
        }
        if exchange.status() != ExchangeStatus::Accepted {
            return Err(Error::invalid_state(format!(
                "exchange in status {} cannot be started",
                exchange.status()
            )));
        }

        let transition = ExchangeStatusTransition::new(
            exchange.id(),
            vec![ExchangeStatus::Accepted],
            ExchangeStatus::InProgress,
            Utc::now(),
        );
        self.apply_transition(transition, "exchange is no longer aceptado")
            .await?;

        if let Some(counterparty) = exchange.counterparty(&request.caller) {
            self.notify(
                *counterparty,
                NotificationKind::ExchangeStarted,
                exchange.id(),
                "El intercambio esta en progreso".to_owned(),
            )
            .await;
        }

        self.reload_after_transition(&request.exchange_id).await
    }

    async fn cancel(&self, request: CancelExchangeRequest) -> Result<ExchangePayload, Error> {
        let exchange = self.load_exchange(&request.exchange_id).await?;
        if !exchange.is_participant(&request.caller) {
            return Err(Error::forbidden("only participants may cancel an exchange"));
        }
        if !exchange.status().is_cancellable() {
            return Err(Error::invalid_state(format!(
                "exchange in status {} cannot be cancelled",
                exchange.status()
            )));
        }

        let transition = ExchangeStatusTransition::new(
            exchange.id(),
            vec![
                ExchangeStatus::Pending,
                ExchangeStatus::Accepted,
                ExchangeStatus::InProgress,
            ],
            ExchangeStatus::Cancelled,
            Utc::now(),
        );
        self.apply_transition(transition, "exchange can no longer be cancelled")
            .await?;

        self.move_listing(
            exchange.listing_id(),
            ListingStatus::Reserved,
            ListingStatus::Available,
        )
        .await;

        if let Some(counterparty) = exchange.counterparty(&request.caller) {
            self.notify(
                *counterparty,
                NotificationKind::ExchangeCancelled,
                exchange.id(),
                "El intercambio fue cancelado".to_owned(),
            )
            .await;
        }

        self.reload_after_transition(&request.exchange_id).await
    }
}

#[async_trait]
impl<E, L, N> ExchangeQuery for ExchangeService<E, L, N>
where
    E: ExchangeRepository,
    L: ListingRepository,
    N: NotificationRepository,
{
    async fn get(&self, request: GetExchangeRequest) -> Result<ExchangePayload, Error> {
        let exchange = self.load_exchange(&request.exchange_id).await?;
        if !exchange.is_participant(&request.caller) {
            return Err(Error::forbidden("only participants may view an exchange"));
        }
        Ok(ExchangePayload::from(exchange))
    }

    async fn list(&self, request: ListExchangesRequest) -> Result<Vec<ExchangePayload>, Error> {
        let exchanges = self
            .exchanges
            .list_for_user(&request.caller)
            .await
            .map_err(map_exchange_repository_error)?;
        Ok(exchanges.into_iter().map(ExchangePayload::from).collect())
    }
}

#[cfg(test)]
#[path = "exchange_service_tests.rs"]
mod tests;
