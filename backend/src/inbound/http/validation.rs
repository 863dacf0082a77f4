//! Shared validation helpers for inbound HTTP adapters.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, UserId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidDate,
    InvalidTime,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidDate => "invalid_date",
            Self::InvalidTime => "invalid_time",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

fn field_error(field: FieldName, message: String, code: ErrorCode, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn parse_uuid(value: String, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(&value).map_err(|_| {
        field_error(
            field,
            format!("{} must be a valid UUID", field.as_str()),
            ErrorCode::InvalidUuid,
            &value,
        )
    })
}

pub(crate) fn parse_user_id(value: String, field: FieldName) -> Result<UserId, Error> {
    parse_uuid(value, field).map(UserId::from_uuid)
}

/// Parse `YYYY-MM-DD` and `HH:MM` parts into a single UTC timestamp.
pub(crate) fn parse_meeting_timestamp(
    date: String,
    time: String,
) -> Result<DateTime<Utc>, Error> {
    let date_field = FieldName::new("date");
    let time_field = FieldName::new("time");

    let parsed_date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|_| {
        field_error(
            date_field,
            "date must use the YYYY-MM-DD format".to_owned(),
            ErrorCode::InvalidDate,
            &date,
        )
    })?;
    let parsed_time = NaiveTime::parse_from_str(&time, "%H:%M").map_err(|_| {
        field_error(
            time_field,
            "time must use the HH:MM format".to_owned(),
            ErrorCode::InvalidTime,
            &time,
        )
    })?;

    Ok(parsed_date.and_time(parsed_time).and_utc())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode as DomainErrorCode;

    #[rstest]
    fn rejects_malformed_uuids_with_field_details() {
        let error =
            parse_uuid("not-a-uuid".to_owned(), FieldName::new("listingId")).expect_err("invalid");
        assert_eq!(error.code(), DomainErrorCode::InvalidRequest);
        let details = error.details().expect("details present");
        assert_eq!(details["field"], "listingId");
        assert_eq!(details["code"], "invalid_uuid");
    }

    #[rstest]
    fn combines_date_and_time_into_utc() {
        let timestamp = parse_meeting_timestamp("2026-03-14".to_owned(), "16:30".to_owned())
            .expect("valid parts");
        assert_eq!(timestamp.to_rfc3339(), "2026-03-14T16:30:00+00:00");
    }

    #[rstest]
    #[case("14-03-2026", "16:30")]
    #[case("2026-03-14", "4pm")]
    fn rejects_malformed_meeting_parts(#[case] date: &str, #[case] time: &str) {
        let error = parse_meeting_timestamp(date.to_owned(), time.to_owned())
            .expect_err("malformed parts");
        assert_eq!(error.code(), DomainErrorCode::InvalidRequest);
    }
}
