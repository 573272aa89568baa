//! Date string conversion at the presentation boundary.
//!
//! The canonical internal encoding for every stored date is ISO-8601
//! (`YYYY-MM-DD`): start dates and completed-date ledger entries all use it,
//! so ledger lookups are plain string comparisons. The `dd/mm/yyyy` form the
//! UI shows for start dates exists only at the edge, through the two
//! converters below.

use crate::errors::{Error, Result};
use chrono::NaiveDate;

const ISO_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// Parses an ISO date string.
pub fn parse_iso(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, ISO_FORMAT).map_err(|e| Error::Validation {
        message: format!("invalid ISO date '{value}': {e}"),
    })
}

/// Formats a date in the canonical ISO form.
#[must_use]
pub fn to_iso(date: NaiveDate) -> String {
    date.format(ISO_FORMAT).to_string()
}

/// Converts a stored ISO date to the `dd/mm/yyyy` display form.
pub fn to_display(iso: &str) -> Result<String> {
    Ok(parse_iso(iso)?.format(DISPLAY_FORMAT).to_string())
}

/// Converts a `dd/mm/yyyy` display date to the canonical ISO form.
pub fn from_display(display: &str) -> Result<String> {
    let date = NaiveDate::parse_from_str(display, DISPLAY_FORMAT).map_err(|e| {
        Error::Validation {
            message: format!("invalid display date '{display}': {e}"),
        }
    })?;
    Ok(to_iso(date))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trip() {
        assert_eq!(to_display("2024-02-05").unwrap(), "05/02/2024");
        assert_eq!(from_display("05/02/2024").unwrap(), "2024-02-05");
    }

    #[test]
    fn test_invalid_dates_are_validation_errors() {
        assert!(matches!(
            to_display("not-a-date"),
            Err(Error::Validation { .. })
        ));
        assert!(matches!(
            from_display("31/02/2024"),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_parse_iso_accepts_canonical_form_only() {
        assert!(parse_iso("2024-02-05").is_ok());
        assert!(parse_iso("05/02/2024").is_err());
    }
}
