// src/core/scanner/geo_intel.rs

use reqwest::Client;
use serde_json::Value;
use std::collections::BTreeMap;
use std::net::IpAddr;
use tracing::{debug, info, warn};

const GEO_ENDPOINT: &str = "http://ip-api.com/json";
const GEO_FIELDS: &str = "status,country,city,isp,org,as";

/// Looks up country, ISP and AS details for an address.
///
/// Any failure yields an empty map; geo data is decoration and never fails a scan.
pub async fn lookup_geo_intel(client: &Client, ip: IpAddr) -> BTreeMap<String, Value> {
    let url = format!("{GEO_ENDPOINT}/{ip}?fields={GEO_FIELDS}");
    info!(%ip, "Starting geo intel lookup.");

    let body = match client.get(&url).send().await {
        Ok(response) => match response.text().await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Failed to read geo intel response.");
                return BTreeMap::new();
            }
        },
        Err(e) => {
            warn!(url = %url, error = %e, "Geo intel request failed.");
            return BTreeMap::new();
        }
    };

    parse_geo_intel(&body)
}

/// Keeps the payload fields of a successful ip-api response, dropping `status`.
fn parse_geo_intel(body: &str) -> BTreeMap<String, Value> {
    let Ok(Value::Object(mut fields)) = serde_json::from_str::<Value>(body) else {
        debug!("Geo intel response was not a JSON object.");
        return BTreeMap::new();
    };

    match fields.remove("status") {
        Some(Value::String(status)) if status == "success" => fields.into_iter().collect(),
        other => {
            debug!(status = ?other, "Geo intel lookup was not successful.");
            BTreeMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successful_payload_is_kept() {
        let intel = parse_geo_intel(
            r#"{"status":"success","country":"Germany","city":"Berlin","isp":"Example ISP","org":"Example","as":"AS64500"}"#,
        );
        assert_eq!(intel.len(), 5);
        assert_eq!(intel["country"], Value::String("Germany".to_string()));
        assert!(!intel.contains_key("status"));
    }

    #[test]
    fn test_failed_or_garbled_payload_is_empty() {
        assert!(parse_geo_intel(r#"{"status":"fail","message":"private range"}"#).is_empty());
        assert!(parse_geo_intel("<html>rate limited</html>").is_empty());
    }
}
