//! Wire types for the GTS trade-list endpoint.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Response body of `getGtsTradeList`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeListResponse {
    #[serde(default)]
    pub trade_list: Vec<TradeResponse>,
    #[serde(default, deserialize_with = "count_from_number_or_string")]
    pub total_count: u64,
}

/// A single record of `tradeList`, kept whole and in key order.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct TradeResponse {
    pub fields: Map<String, Value>,
}

/// Form body of `getGtsTradeList`. Field order matches what the portal's own
/// page sends.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeListForm<'a> {
    pub language_id: u8,
    pub member_savedata_id_code: &'a str,
    pub account_id: &'a str,
    pub savedata_id: &'a str,
    pub count: u32,
    pub page: u32,
    pub mypage_tab: &'static str,
    pub time_stamp: i64,
}

fn count_from_number_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u64),
        Text(String),
        Null,
    }

    match Count::deserialize(deserializer)? {
        Count::Number(n) => Ok(n),
        Count::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
        Count::Null => Ok(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_trade_list() {
        let body = json!({
            "tradeList": [
                {"tradeDate": "2024/03/05 12:00:00", "pokemonName": "Eevee", "id": 7}
            ],
            "totalCount": 1,
            "status": "ok"
        });

        let resp: TradeListResponse = serde_json::from_value(body).unwrap();
        assert_eq!(resp.total_count, 1);
        assert_eq!(resp.trade_list.len(), 1);

        let keys: Vec<&str> = resp.trade_list[0].fields.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["tradeDate", "pokemonName", "id"]);
    }

    #[test]
    fn test_total_count_as_string() {
        let resp: TradeListResponse =
            serde_json::from_value(json!({"tradeList": [], "totalCount": "12"})).unwrap();
        assert_eq!(resp.total_count, 12);
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let resp: TradeListResponse = serde_json::from_value(json!({})).unwrap();
        assert!(resp.trade_list.is_empty());
        assert_eq!(resp.total_count, 0);
    }
}
