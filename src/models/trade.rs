//! Trade model representing individual GTS exchanges.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::GtsError;

/// Format of `tradeDate` in the portal's JSON.
pub const TRADE_DATE_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Parse a portal date written in local time of `tz`.
pub fn parse_trade_date(value: &str, tz: Tz) -> Result<DateTime<Utc>, GtsError> {
    let invalid = || GtsError::InvalidTradeDate {
        value: value.to_string(),
    };

    let naive = NaiveDateTime::parse_from_str(value.trim(), TRADE_DATE_FORMAT)
        .map_err(|_| invalid())?;

    // Wall-clock times skipped by a DST jump have no instant.
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(invalid)
}

/// Key of the trade date inside a record.
pub const TRADE_DATE_KEY: &str = "tradeDate";

/// One GTS trade record.
///
/// Only the date is interpreted. The record itself is kept as the portal sent
/// it, key order included, and serialized back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    /// When the trade happened
    #[serde(skip)]
    pub trade_date: DateTime<Utc>,

    /// `tradeDate` exactly as received
    #[serde(skip)]
    pub raw_trade_date: String,

    /// The full record, `tradeDate` included
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Trade {
    /// Build from a raw record; fails if `tradeDate` is missing or malformed.
    pub fn new(fields: Map<String, Value>, tz: Tz) -> Result<Self, GtsError> {
        let raw_trade_date = match fields.get(TRADE_DATE_KEY) {
            Some(Value::String(s)) => s.clone(),
            other => {
                return Err(GtsError::InvalidTradeDate {
                    value: other.map(Value::to_string).unwrap_or_default(),
                })
            }
        };
        let trade_date = parse_trade_date(&raw_trade_date, tz)?;

        Ok(Self {
            trade_date,
            raw_trade_date,
            fields,
        })
    }

    /// Look up a field of the record.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// True if the trade happened strictly after `threshold`.
    pub fn is_newer_than(&self, threshold: DateTime<Utc>) -> bool {
        self.trade_date > threshold
    }
}

/// One page of the trade-list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradePage {
    pub trade_list: Vec<Trade>,
    pub total_count: u64,
}

/// Identifiers scraped from a profile page; both are needed by the trade API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountData {
    pub account_id: String,
    pub save_data_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_parse_trade_date_utc() {
        let dt = parse_trade_date("2024/03/05 12:34:56", Tz::UTC).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 5, 12, 34, 56).unwrap());
    }

    #[test]
    fn test_parse_trade_date_applies_timezone() {
        // Tokyo is UTC+9 with no DST
        let dt = parse_trade_date("2024/01/01 09:00:00", chrono_tz::Asia::Tokyo).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_trade_date_rejects_other_formats() {
        for value in ["2024-03-05 12:34:56", "2024/03/05", "", "yesterday"] {
            assert_eq!(
                parse_trade_date(value, Tz::UTC),
                Err(GtsError::InvalidTradeDate {
                    value: value.to_string()
                })
            );
        }
    }

    #[test]
    fn test_parse_trade_date_in_dst_gap() {
        // 02:30 does not exist in New York on 2024-03-10
        assert!(parse_trade_date("2024/03/10 02:30:00", chrono_tz::America::New_York).is_err());
    }

    #[test]
    fn test_trade_serializes_record_verbatim() {
        let body = r#"{"pokemonName":"Eevee","tradeDate":"2024/03/05 12:34:56","level":12,"requestPokemon":{"name":"Vulpix","gender":null}}"#;
        let record: Map<String, Value> = serde_json::from_str(body).unwrap();

        let trade = Trade::new(record, Tz::UTC).unwrap();

        assert_eq!(trade.raw_trade_date, "2024/03/05 12:34:56");
        assert_eq!(trade.get("level"), Some(&json!(12)));
        assert_eq!(serde_json::to_string(&trade).unwrap(), body);
    }

    #[test]
    fn test_trade_requires_string_date() {
        let missing = Trade::new(fields(json!({"pokemonName": "Eevee"})), Tz::UTC);
        assert_eq!(
            missing,
            Err(GtsError::InvalidTradeDate {
                value: String::new()
            })
        );

        let numeric = Trade::new(fields(json!({"tradeDate": 1709641496})), Tz::UTC);
        assert_eq!(
            numeric,
            Err(GtsError::InvalidTradeDate {
                value: "1709641496".to_string()
            })
        );
    }

    #[test]
    fn test_is_newer_than_is_strict() {
        let trade = Trade::new(fields(json!({"tradeDate": "2024/03/05 12:00:00"})), Tz::UTC).unwrap();
        let same = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();

        assert!(!trade.is_newer_than(same));
        assert!(trade.is_newer_than(same - chrono::Duration::seconds(1)));
    }
}
