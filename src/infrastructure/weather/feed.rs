//! Station observation feed over HTTP
//!
//! The feed is an XML document of the form
//!
//! ```xml
//! <observations timestamp="1710000000">
//!   <station>
//!     <name>Tallinn-Harku</name>
//!     <wmocode>26038</wmocode>
//!     <airtemperature>-2.1</airtemperature>
//!     <windspeed>4.7</windspeed>
//!     <phenomenon>Light snow shower</phenomenon>
//!     ...
//!   </station>
//! </observations>
//! ```
//!
//! Unknown elements are ignored. Blank values are treated as absent;
//! values that fail to parse are logged and treated as absent.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::ports::ObservationFeed;
use crate::domain::{DomainError, DomainResult, FeedSnapshot, StationReading};
use crate::shared::errors::InfraError;

#[derive(Debug, Deserialize)]
struct ObservationsXml {
    #[serde(rename = "@timestamp", default)]
    timestamp: Option<String>,
    #[serde(rename = "station", default)]
    stations: Vec<StationXml>,
}

#[derive(Debug, Deserialize)]
struct StationXml {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    wmocode: Option<String>,
    #[serde(default)]
    airtemperature: Option<String>,
    #[serde(default)]
    windspeed: Option<String>,
    #[serde(default)]
    phenomenon: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_field<T: FromStr>(station: &str, field: &str, value: Option<String>) -> Option<T> {
    let raw = non_blank(value)?;
    match raw.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(station, field, value = raw.as_str(), "Ignoring malformed feed value");
            None
        }
    }
}

fn parse_timestamp(value: Option<String>) -> Option<DateTime<Utc>> {
    let raw = non_blank(value)?;
    let seconds = match raw.parse::<i64>() {
        Ok(seconds) => seconds,
        Err(_) => {
            warn!(value = raw.as_str(), "Ignoring malformed feed timestamp");
            return None;
        }
    };
    Utc.timestamp_opt(seconds, 0).single()
}

/// Parse one feed document.
pub fn parse_observations(xml: &str) -> Result<FeedSnapshot, InfraError> {
    let document: ObservationsXml = quick_xml::de::from_str(xml)?;

    let stations = document
        .stations
        .into_iter()
        .map(|s| {
            let name = non_blank(s.name).unwrap_or_default();
            StationReading {
                wmo_code: parse_field::<i32>(&name, "wmocode", s.wmocode),
                air_temperature: parse_field::<Decimal>(&name, "airtemperature", s.airtemperature),
                wind_speed: parse_field::<Decimal>(&name, "windspeed", s.windspeed),
                phenomenon: non_blank(s.phenomenon),
                name,
            }
        })
        .collect();

    Ok(FeedSnapshot {
        timestamp: parse_timestamp(document.timestamp),
        stations,
    })
}

fn truncate_body(body: &str) -> &str {
    let end = body
        .char_indices()
        .nth(200)
        .map(|(i, _)| i)
        .unwrap_or(body.len());
    &body[..end]
}

/// [`ObservationFeed`] that downloads the XML document with reqwest
#[derive(Debug, Clone)]
pub struct HttpObservationFeed {
    url: String,
    http: Client,
}

impl HttpObservationFeed {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, InfraError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("delivery-fee-service/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            url: url.into(),
            http,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn download(&self) -> Result<String, DomainError> {
        let res = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(InfraError::from)?;

        let status = res.status();
        let body = res.text().await.map_err(InfraError::from)?;

        if !status.is_success() {
            return Err(DomainError::Upstream(format!(
                "weather feed request failed with status {}: {}",
                status,
                truncate_body(&body)
            )));
        }

        Ok(body)
    }
}

#[async_trait]
impl ObservationFeed for HttpObservationFeed {
    async fn fetch(&self) -> DomainResult<FeedSnapshot> {
        debug!(url = self.url.as_str(), "Fetching weather observations");
        let body = self.download().await?;
        let snapshot = parse_observations(&body)?;
        debug!(stations = snapshot.stations.len(), "Weather feed parsed");
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<observations timestamp="1710000000">
  <station>
    <name>Tallinn-Harku</name>
    <wmocode>26038</wmocode>
    <longitude>24.602891666624284</longitude>
    <phenomenon>Light snow shower</phenomenon>
    <visibility>20.0</visibility>
    <airtemperature>-2.1</airtemperature>
    <windspeed>4.7</windspeed>
  </station>
  <station>
    <name>Pärnu</name>
    <wmocode>41803</wmocode>
    <phenomenon></phenomenon>
    <airtemperature> </airtemperature>
    <windspeed>abc</windspeed>
  </station>
  <station>
    <name>Kuressaare linn</name>
    <wmocode/>
    <airtemperature>1.0</airtemperature>
  </station>
</observations>"#;

    #[test]
    fn parses_stations_and_timestamp() {
        let snapshot = parse_observations(FEED).unwrap();
        assert_eq!(snapshot.timestamp, Utc.timestamp_opt(1_710_000_000, 0).single());
        assert_eq!(snapshot.stations.len(), 3);

        let tallinn = &snapshot.stations[0];
        assert_eq!(tallinn.name, "Tallinn-Harku");
        assert_eq!(tallinn.wmo_code, Some(26038));
        assert_eq!(tallinn.air_temperature, Some(dec!(-2.1)));
        assert_eq!(tallinn.wind_speed, Some(dec!(4.7)));
        assert_eq!(tallinn.phenomenon.as_deref(), Some("Light snow shower"));
    }

    #[test]
    fn blank_and_malformed_values_are_absent() {
        let snapshot = parse_observations(FEED).unwrap();
        let parnu = &snapshot.stations[1];
        assert_eq!(parnu.wmo_code, Some(41803));
        assert_eq!(parnu.air_temperature, None);
        assert_eq!(parnu.wind_speed, None);
        assert_eq!(parnu.phenomenon, None);

        let kuressaare = &snapshot.stations[2];
        assert_eq!(kuressaare.wmo_code, None);
        assert_eq!(kuressaare.air_temperature, Some(dec!(1.0)));
    }

    #[test]
    fn invalid_wmo_code_is_absent() {
        let xml = "<stations><station><name>Tallinn</name><wmocode>invalid_code</wmocode>\
                   <airtemperature>abc</airtemperature></station></stations>";
        let snapshot = parse_observations(xml).unwrap();
        assert_eq!(snapshot.timestamp, None);
        assert_eq!(snapshot.stations[0].wmo_code, None);
        assert_eq!(snapshot.stations[0].air_temperature, None);
    }

    #[test]
    fn empty_document_has_no_stations() {
        let snapshot = parse_observations("<observations></observations>").unwrap();
        assert!(snapshot.stations.is_empty());
    }

    #[test]
    fn broken_xml_is_an_error() {
        let err: DomainError = parse_observations("<observations><station>").unwrap_err().into();
        assert!(matches!(err, DomainError::Upstream(_)));
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(500);
        assert_eq!(truncate_body(&body).len(), 200);
        assert_eq!(truncate_body("short"), "short");
    }
}
