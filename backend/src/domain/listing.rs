//! Listing aggregate: a used good offered for exchange, sale, or donation.
//!
//! Wire and database values use the marketplace's Spanish vocabulary
//! (`intercambio`, `disponible`, ...); Rust identifiers stay English.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::UserId;

/// How a listing changes hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListingKind {
    Exchange,
    Sale,
    Donation,
}

impl ListingKind {
    /// Canonical wire token.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exchange => "intercambio",
            Self::Sale => "venta",
            Self::Donation => "donacion",
        }
    }
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a [`ListingKind`] token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown listing kind: {value}")]
pub struct ParseListingKindError {
    value: String,
}

impl FromStr for ListingKind {
    type Err = ParseListingKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "intercambio" => Ok(Self::Exchange),
            "venta" => Ok(Self::Sale),
            "donacion" => Ok(Self::Donation),
            other => Err(ParseListingKindError {
                value: other.to_owned(),
            }),
        }
    }
}

/// Lifecycle status of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListingStatus {
    Available,
    Reserved,
    Closed,
}

impl ListingStatus {
    /// Canonical wire token.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "disponible",
            Self::Reserved => "reservado",
            Self::Closed => "cerrado",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a [`ListingStatus`] token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown listing status: {value}")]
pub struct ParseListingStatusError {
    value: String,
}

impl FromStr for ListingStatus {
    type Err = ParseListingStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "disponible" => Ok(Self::Available),
            "reservado" => Ok(Self::Reserved),
            "cerrado" => Ok(Self::Closed),
            other => Err(ParseListingStatusError {
                value: other.to_owned(),
            }),
        }
    }
}

/// Validation errors raised by listing constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingValidationError {
    BlankTitle,
    TitleTooLong { length: usize },
    BlankCategory,
    CategoryTooLong { length: usize },
    PriceRequiredForSale,
    PriceNotAllowed { kind: ListingKind },
    NonPositivePrice { cents: i64 },
}

impl fmt::Display for ListingValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "listing title must not be blank"),
            Self::TitleTooLong { length } => {
                write!(f, "listing title must be at most 120 characters (got {length})")
            }
            Self::BlankCategory => write!(f, "listing category must not be blank"),
            Self::CategoryTooLong { length } => {
                write!(f, "listing category must be at most 64 characters (got {length})")
            }
            Self::PriceRequiredForSale => write!(f, "venta listings require a price"),
            Self::PriceNotAllowed { kind } => {
                write!(f, "{kind} listings must not carry a price")
            }
            Self::NonPositivePrice { cents } => {
                write!(f, "listing price must be positive (got {cents})")
            }
        }
    }
}

impl std::error::Error for ListingValidationError {}

/// Unvalidated listing fields used to build a [`Listing`].
#[derive(Debug, Clone)]
pub struct ListingDraft {
    pub id: Uuid,
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub kind: ListingKind,
    pub price_cents: Option<i64>,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A published listing.
///
/// ## Invariants
/// - `title` non-blank, at most 120 characters.
/// - `category` non-blank, at most 64 characters.
/// - `price_cents` present and positive iff `kind` is [`ListingKind::Sale`].
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    id: Uuid,
    owner_id: UserId,
    title: String,
    description: String,
    category: String,
    kind: ListingKind,
    price_cents: Option<i64>,
    status: ListingStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Listing {
    /// Validated constructor.
    pub fn new(draft: ListingDraft) -> Result<Self, ListingValidationError> {
        let ListingDraft {
            id,
            owner_id,
            title,
            description,
            category,
            kind,
            price_cents,
            status,
            created_at,
            updated_at,
        } = draft;

        if title.trim().is_empty() {
            return Err(ListingValidationError::BlankTitle);
        }
        let title_length = title.chars().count();
        if title_length > 120 {
            return Err(ListingValidationError::TitleTooLong {
                length: title_length,
            });
        }
        if category.trim().is_empty() {
            return Err(ListingValidationError::BlankCategory);
        }
        let category_length = category.chars().count();
        if category_length > 64 {
            return Err(ListingValidationError::CategoryTooLong {
                length: category_length,
            });
        }
        match (kind, price_cents) {
            (ListingKind::Sale, None) => return Err(ListingValidationError::PriceRequiredForSale),
            (ListingKind::Sale, Some(cents)) if cents <= 0 => {
                return Err(ListingValidationError::NonPositivePrice { cents });
            }
            (ListingKind::Exchange | ListingKind::Donation, Some(_)) => {
                return Err(ListingValidationError::PriceNotAllowed { kind });
            }
            _ => {}
        }

        Ok(Self {
            id,
            owner_id,
            title,
            description,
            category,
            kind,
            price_cents,
            status,
            created_at,
            updated_at,
        })
    }

    /// Listing identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Owner of the listed good.
    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    /// Listing title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Free-form description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Category label.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// How the good changes hands.
    pub fn kind(&self) -> ListingKind {
        self.kind
    }

    /// Asking price in cents; present only for `venta` listings.
    pub fn price_cents(&self) -> Option<i64> {
        self.price_cents
    }

    /// Current lifecycle status.
    pub fn status(&self) -> ListingStatus {
        self.status
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last modification timestamp.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    fn draft(kind: ListingKind, price_cents: Option<i64>) -> ListingDraft {
        let now = Utc::now();
        ListingDraft {
            id: Uuid::new_v4(),
            owner_id: UserId::random(),
            title: "Bicicleta de montana".to_owned(),
            description: "Usada, buen estado".to_owned(),
            category: "deportes".to_owned(),
            kind,
            price_cents,
            status: ListingStatus::Available,
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    fn sale_requires_price() {
        let error = Listing::new(draft(ListingKind::Sale, None)).expect_err("missing price");
        assert_eq!(error, ListingValidationError::PriceRequiredForSale);
    }

    #[rstest]
    fn donation_rejects_price() {
        let error =
            Listing::new(draft(ListingKind::Donation, Some(500))).expect_err("priced donation");
        assert!(matches!(error, ListingValidationError::PriceNotAllowed { .. }));
    }

    #[rstest]
    fn sale_rejects_non_positive_price() {
        let error = Listing::new(draft(ListingKind::Sale, Some(0))).expect_err("zero price");
        assert_eq!(error, ListingValidationError::NonPositivePrice { cents: 0 });
    }

    #[rstest]
    fn exchange_listing_is_valid_without_price() {
        let listing = Listing::new(draft(ListingKind::Exchange, None)).expect("valid listing");
        assert_eq!(listing.status(), ListingStatus::Available);
        assert_eq!(listing.kind().as_str(), "intercambio");
    }

    #[rstest]
    fn blank_title_is_rejected() {
        let mut invalid = draft(ListingKind::Donation, None);
        invalid.title = "  ".to_owned();
        let error = Listing::new(invalid).expect_err("blank title");
        assert_eq!(error, ListingValidationError::BlankTitle);
    }

    #[rstest]
    #[case("disponible", ListingStatus::Available)]
    #[case("reservado", ListingStatus::Reserved)]
    #[case("cerrado", ListingStatus::Closed)]
    fn status_tokens_round_trip(#[case] token: &str, #[case] status: ListingStatus) {
        assert_eq!(token.parse::<ListingStatus>(), Ok(status));
        assert_eq!(status.to_string(), token);
    }

    #[rstest]
    fn unknown_kind_token_is_rejected() {
        assert!("trueque".parse::<ListingKind>().is_err());
    }
}
