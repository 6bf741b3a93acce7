//! `yyyy-MM-dd` dates for request and response payloads.
//!
//! ```
//! use chrono::NaiveDate;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Project {
//!     name: String,
//!     #[serde(with = "bim_setup::serde_date::option", skip_serializing_if = "Option::is_none")]
//!     start_date: Option<NaiveDate>,
//! }
//!
//! let project = Project { name: "p".into(), start_date: NaiveDate::from_ymd_opt(2024, 3, 1) };
//! assert_eq!(
//!     serde_json::to_string(&project).unwrap(),
//!     r#"{"name":"p","start_date":"2024-03-01"}"#
//! );
//! ```

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serializer};

pub const FORMAT: &str = "%Y-%m-%d";

pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&date.format(FORMAT))
}

/// Accepts a plain date or a full RFC 3339 timestamp, keeping the date part.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(serde::de::Error::custom)
}

fn parse(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|e| format!("invalid date '{raw}': {e}"))
}

pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => super::serialize(date, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| parse(&raw).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Dated {
        #[serde(with = "crate::serde_date")]
        on: NaiveDate,
        #[serde(
            default,
            with = "crate::serde_date::option",
            skip_serializing_if = "Option::is_none"
        )]
        until: Option<NaiveDate>,
    }

    #[test]
    fn writes_date_only_and_omits_absent() {
        let value = Dated {
            on: NaiveDate::from_ymd_opt(2021, 1, 5).unwrap(),
            until: None,
        };
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"on":"2021-01-05"}"#);
    }

    #[test]
    fn reads_timestamps_as_dates() {
        let value: Dated =
            serde_json::from_str(r#"{"on":"2021-01-05T10:00:00Z","until":"2021-02-01"}"#).unwrap();
        assert_eq!(value.on, NaiveDate::from_ymd_opt(2021, 1, 5).unwrap());
        assert_eq!(value.until, NaiveDate::from_ymd_opt(2021, 2, 1));
    }

    #[test]
    fn rejects_garbage() {
        assert!(serde_json::from_str::<Dated>(r#"{"on":"05/01/2021"}"#).is_err());
    }
}
