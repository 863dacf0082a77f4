//! User identity and profile types.

use std::fmt;

use uuid::Uuid;

/// Validation errors raised by user constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    InvalidId { value: String },
    BlankDisplayName,
    DisplayNameTooLong { length: usize },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId { value } => write!(f, "user id must be a valid UUID (got {value})"),
            Self::BlankDisplayName => write!(f, "display name must not be blank"),
            Self::DisplayNameTooLong { length } => {
                write!(f, "display name must be at most 32 characters (got {length})")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Strongly typed user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a user id from its canonical string form.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = raw.as_ref();
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId {
                value: raw.to_owned(),
            })
    }

    /// Wrap an already-validated UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Borrow the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registered marketplace user.
///
/// ## Invariants
/// - `display_name` is non-blank and at most 32 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    display_name: String,
}

impl User {
    /// Validated constructor.
    pub fn try_new(
        id: UserId,
        display_name: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        let display_name = display_name.into();
        if display_name.trim().is_empty() {
            return Err(UserValidationError::BlankDisplayName);
        }
        let length = display_name.chars().count();
        if length > 32 {
            return Err(UserValidationError::DisplayNameTooLong { length });
        }
        Ok(Self { id, display_name })
    }

    /// The user's identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// The user's display name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}
