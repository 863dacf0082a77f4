//! Tests for the exchange lifecycle service.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::*;
use crate::domain::ports::{
    MockExchangeRepository, MockListingRepository, MockNotificationRepository,
};
use crate::domain::{ErrorCode, Listing, ListingDraft, ListingKind};

fn listing_owned_by(owner: UserId, status: ListingStatus) -> Listing {
    let now = Utc::now();
    Listing::new(ListingDraft {
        id: Uuid::new_v4(),
        owner_id: owner,
        title: "Bicicleta de montana".to_owned(),
        description: "Usada, buen estado".to_owned(),
        category: "deportes".to_owned(),
        kind: ListingKind::Exchange,
        price_cents: None,
        status,
        created_at: now,
        updated_at: now,
    })
    .expect("valid listing")
}

fn exchange_between(
    proposer: UserId,
    receiver: UserId,
    status: ExchangeStatus,
) -> Exchange {
    let now = Utc::now();
    Exchange::new(ExchangeDraft {
        id: Uuid::new_v4(),
        listing_id: Uuid::new_v4(),
        proposer_id: proposer,
        receiver_id: receiver,
        status,
        message: None,
        meeting: None,
        reject_reason: None,
        completed_at: None,
        created_at: now,
        updated_at: now,
    })
    .expect("valid exchange")
}

fn service(
    exchanges: MockExchangeRepository,
    listings: MockListingRepository,
    notifications: MockNotificationRepository,
) -> ExchangeService<MockExchangeRepository, MockListingRepository, MockNotificationRepository> {
    ExchangeService::new(Arc::new(exchanges), Arc::new(listings), Arc::new(notifications))
}

#[tokio::test]
async fn propose_creates_pending_exchange_and_notifies_owner() {
    let proposer = UserId::random();
    let owner = UserId::random();
    let listing = listing_owned_by(owner, ListingStatus::Available);
    let listing_id = listing.id();

    let mut listings = MockListingRepository::new();
    listings
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(listing)));

    let mut exchanges = MockExchangeRepository::new();
    exchanges.expect_insert().times(1).return_once(|_| Ok(()));

    let mut notifications = MockNotificationRepository::new();
    notifications.expect_insert().times(1).return_once(|_| Ok(()));

    let payload = service(exchanges, listings, notifications)
        .propose(ProposeExchangeRequest {
            caller: proposer,
            listing_id,
            message: Some("Me interesa".to_owned()),
        })
        .await
        .expect("propose succeeds");

    assert_eq!(payload.status, ExchangeStatus::Pending);
    assert_eq!(payload.proposer_id, proposer);
    assert_eq!(payload.receiver_id, owner);
    assert_eq!(payload.listing_id, listing_id);
}

#[tokio::test]
async fn propose_on_own_listing_is_rejected() {
    let owner = UserId::random();
    let listing = listing_owned_by(owner, ListingStatus::Available);
    let listing_id = listing.id();

    let mut listings = MockListingRepository::new();
    listings
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(listing)));

    let mut exchanges = MockExchangeRepository::new();
    exchanges.expect_insert().times(0);

    let error = service(exchanges, listings, MockNotificationRepository::new())
        .propose(ProposeExchangeRequest {
            caller: owner,
            listing_id,
            message: None,
        })
        .await
        .expect_err("own listing");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn propose_on_reserved_listing_is_invalid_state() {
    let listing = listing_owned_by(UserId::random(), ListingStatus::Reserved);
    let listing_id = listing.id();

    let mut listings = MockListingRepository::new();
    listings
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(listing)));

    let error = service(
        MockExchangeRepository::new(),
        listings,
        MockNotificationRepository::new(),
    )
    .propose(ProposeExchangeRequest {
        caller: UserId::random(),
        listing_id,
        message: None,
    })
    .await
    .expect_err("reserved listing");

    assert_eq!(error.code(), ErrorCode::InvalidState);
}

#[tokio::test]
async fn propose_against_unknown_listing_is_not_found() {
    let mut listings = MockListingRepository::new();
    listings.expect_find_by_id().times(1).return_once(|_| Ok(None));

    let error = service(
        MockExchangeRepository::new(),
        listings,
        MockNotificationRepository::new(),
    )
    .propose(ProposeExchangeRequest {
        caller: UserId::random(),
        listing_id: Uuid::new_v4(),
        message: None,
    })
    .await
    .expect_err("missing listing");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn accept_transitions_reserves_listing_and_notifies_proposer() {
    let proposer = UserId::random();
    let receiver = UserId::random();
    let pending = exchange_between(proposer, receiver, ExchangeStatus::Pending);
    let exchange_id = pending.id();
    let accepted = Exchange::new(ExchangeDraft {
        id: exchange_id,
        listing_id: pending.listing_id(),
        proposer_id: proposer,
        receiver_id: receiver,
        status: ExchangeStatus::Accepted,
        message: None,
        meeting: None,
        reject_reason: None,
        completed_at: None,
        created_at: pending.created_at(),
        updated_at: Utc::now(),
    })
    .expect("valid exchange");

    let mut exchanges = MockExchangeRepository::new();
    exchanges
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(pending)));
    exchanges
        .expect_transition_status()
        .times(1)
        .withf(|transition| {
            transition.next == ExchangeStatus::Accepted
                && transition.expected == vec![ExchangeStatus::Pending]
                && transition.meeting.is_some()
        })
        .return_once(|_| Ok(true));
    exchanges
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(accepted)));

    let mut listings = MockListingRepository::new();
    listings
        .expect_transition_status()
        .times(1)
        .withf(|transition| transition.next == ListingStatus::Reserved)
        .return_once(|_| Ok(true));

    let mut notifications = MockNotificationRepository::new();
    notifications.expect_insert().times(1).return_once(|_| Ok(()));

    let payload = service(exchanges, listings, notifications)
        .accept(AcceptExchangeRequest {
            caller: receiver,
            exchange_id,
            location: "Plaza Mayor".to_owned(),
            meeting_at: Utc::now(),
            notes: None,
        })
        .await
        .expect("accept succeeds");

    assert_eq!(payload.status, ExchangeStatus::Accepted);
}

#[tokio::test]
async fn accept_by_proposer_is_forbidden() {
    let proposer = UserId::random();
    let receiver = UserId::random();
    let pending = exchange_between(proposer, receiver, ExchangeStatus::Pending);
    let exchange_id = pending.id();

    let mut exchanges = MockExchangeRepository::new();
    exchanges
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(pending)));
    exchanges.expect_transition_status().times(0);

    let error = service(
        exchanges,
        MockListingRepository::new(),
        MockNotificationRepository::new(),
    )
    .accept(AcceptExchangeRequest {
        caller: proposer,
        exchange_id,
        location: "Plaza Mayor".to_owned(),
        meeting_at: Utc::now(),
        notes: None,
    })
    .await
    .expect_err("proposer cannot accept");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn accept_outside_pending_is_invalid_state() {
    let receiver = UserId::random();
    let in_progress =
        exchange_between(UserId::random(), receiver, ExchangeStatus::InProgress);
    let exchange_id = in_progress.id();

    let mut exchanges = MockExchangeRepository::new();
    exchanges
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(in_progress)));

    let error = service(
        exchanges,
        MockListingRepository::new(),
        MockNotificationRepository::new(),
    )
    .accept(AcceptExchangeRequest {
        caller: receiver,
        exchange_id,
        location: "Plaza Mayor".to_owned(),
        meeting_at: Utc::now(),
        notes: None,
    })
    .await
    .expect_err("not pendiente");

    assert_eq!(error.code(), ErrorCode::InvalidState);
}

#[tokio::test]
async fn accept_losing_the_guard_is_invalid_state() {
    let receiver = UserId::random();
    let pending = exchange_between(UserId::random(), receiver, ExchangeStatus::Pending);
    let exchange_id = pending.id();

    let mut exchanges = MockExchangeRepository::new();
    exchanges
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(pending)));
    exchanges
        .expect_transition_status()
        .times(1)
        .return_once(|_| Ok(false));

    let error = service(
        exchanges,
        MockListingRepository::new(),
        MockNotificationRepository::new(),
    )
    .accept(AcceptExchangeRequest {
        caller: receiver,
        exchange_id,
        location: "Plaza Mayor".to_owned(),
        meeting_at: Utc::now(),
        notes: None,
    })
    .await
    .expect_err("guard missed");

    assert_eq!(error.code(), ErrorCode::InvalidState);
}

#[tokio::test]
async fn reject_requires_a_reason() {
    let receiver = UserId::random();
    let pending = exchange_between(UserId::random(), receiver, ExchangeStatus::Pending);
    let exchange_id = pending.id();

    let mut exchanges = MockExchangeRepository::new();
    exchanges
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(pending)));
    exchanges.expect_transition_status().times(0);

    let error = service(
        exchanges,
        MockListingRepository::new(),
        MockNotificationRepository::new(),
    )
    .reject(RejectExchangeRequest {
        caller: receiver,
        exchange_id,
        reason: "   ".to_owned(),
    })
    .await
    .expect_err("blank reason");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn cancel_by_stranger_is_forbidden() {
    let exchange =
        exchange_between(UserId::random(), UserId::random(), ExchangeStatus::Accepted);
    let exchange_id = exchange.id();

    let mut exchanges = MockExchangeRepository::new();
    exchanges
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(exchange)));

    let error = service(
        exchanges,
        MockListingRepository::new(),
        MockNotificationRepository::new(),
    )
    .cancel(CancelExchangeRequest {
        caller: UserId::random(),
        exchange_id,
    })
    .await
    .expect_err("stranger cannot cancel");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn cancel_from_terminal_status_is_invalid_state() {
    let proposer = UserId::random();
    let completed =
        exchange_between(proposer, UserId::random(), ExchangeStatus::Completed);
    let exchange_id = completed.id();

    let mut exchanges = MockExchangeRepository::new();
    exchanges
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(completed)));

    let error = service(
        exchanges,
        MockListingRepository::new(),
        MockNotificationRepository::new(),
    )
    .cancel(CancelExchangeRequest {
        caller: proposer,
        exchange_id,
    })
    .await
    .expect_err("terminal status");

    assert_eq!(error.code(), ErrorCode::InvalidState);
}

#[tokio::test]
async fn notification_failure_does_not_fail_propose() {
    let proposer = UserId::random();
    let listing = listing_owned_by(UserId::random(), ListingStatus::Available);
    let listing_id = listing.id();

    let mut listings = MockListingRepository::new();
    listings
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(listing)));

    let mut exchanges = MockExchangeRepository::new();
    exchanges.expect_insert().times(1).return_once(|_| Ok(()));

    let mut notifications = MockNotificationRepository::new();
    notifications.expect_insert().times(1).return_once(|_| {
        Err(crate::domain::ports::NotificationRepositoryError::query(
            "disk full",
        ))
    });

    let payload = service(exchanges, listings, notifications)
        .propose(ProposeExchangeRequest {
            caller: proposer,
            listing_id,
            message: None,
        })
        .await
        .expect("propose still succeeds");

    assert_eq!(payload.status, ExchangeStatus::Pending);
}

#[tokio::test]
async fn get_by_non_participant_is_forbidden() {
    let exchange =
        exchange_between(UserId::random(), UserId::random(), ExchangeStatus::Pending);
    let exchange_id = exchange.id();

    let mut exchanges = MockExchangeRepository::new();
    exchanges
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(exchange)));

    let error = service(
        exchanges,
        MockListingRepository::new(),
        MockNotificationRepository::new(),
    )
    .get(GetExchangeRequest {
        caller: UserId::random(),
        exchange_id,
    })
    .await
    .expect_err("not a participant");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn list_maps_connection_errors_to_service_unavailable() {
    let mut exchanges = MockExchangeRepository::new();
    exchanges
        .expect_list_for_user()
        .times(1)
        .return_once(|_| Err(ExchangeRepositoryError::connection("pool exhausted")));

    let error = service(
        exchanges,
        MockListingRepository::new(),
        MockNotificationRepository::new(),
    )
    .list(ListExchangesRequest {
        caller: UserId::random(),
    })
    .await
    .expect_err("unavailable");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
