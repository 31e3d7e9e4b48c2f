use crate::application::ports::ticket_registry::{RedeemOutcome, TicketRegistry};
use crate::domain::entities::{RemoteTicket, TicketSummary};
use crate::domain::value_objects::{EventId, RedemptionToken, TicketId};
use crate::shared::config::RegistryConfig;
use crate::shared::error::{Result, ScanError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Ticket payload as served by the registry. SQLite-backed deployments
/// serialize booleans as 0/1, so `is_used` accepts both encodings.
#[derive(Debug, Deserialize)]
struct WireTicket {
    id: i64,
    buyer_name: Option<String>,
    buyer_phone: Option<String>,
    qr_token: String,
    #[serde(deserialize_with = "bool_from_json")]
    is_used: bool,
    ticket_type_name: Option<String>,
}

impl WireTicket {
    fn into_domain(self, event_id: &EventId) -> Result<RemoteTicket> {
        let ticket_id = TicketId::new(self.id.to_string()).map_err(ScanError::Remote)?;
        let redemption_token = RedemptionToken::new(self.qr_token).map_err(ScanError::Remote)?;
        let summary = TicketSummary::new(self.buyer_name, self.buyer_phone, self.ticket_type_name);

        Ok(RemoteTicket::new(
            ticket_id,
            event_id.clone(),
            redemption_token,
            summary,
            self.is_used,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct ScanAcceptedPayload {
    #[serde(rename = "message")]
    _message: Option<String>,
    ticket: Option<WireTicket>,
}

#[derive(Debug, Deserialize, Default)]
struct ScanConflictPayload {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    used_at: Option<String>,
}

/// HTTP adapter for the remote ticket registry.
pub struct HttpTicketRegistry {
    base_url: String,
    auth_token: Option<String>,
    http: Client,
}

impl HttpTicketRegistry {
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        let base_url = normalize_base_url(&config.base_url)?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .build()?;

        Ok(Self {
            base_url,
            auth_token: config
                .auth_token
                .clone()
                .filter(|value| !value.trim().is_empty()),
            http,
        })
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = build_url(&self.base_url, path);
        let builder = self.http.request(method, url);
        match &self.auth_token {
            Some(token) => builder.header("Authorization", format!("Bearer {token}")),
            None => builder,
        }
    }
}

#[async_trait]
impl TicketRegistry for HttpTicketRegistry {
    async fn fetch_event_tickets(&self, event_id: &EventId) -> Result<Vec<RemoteTicket>> {
        let path = format!("/api/tickets/event/{}", event_id.as_str());
        let tickets: Vec<WireTicket> = request_json(self.request(Method::GET, &path)).await?;

        tickets
            .into_iter()
            .map(|ticket| ticket.into_domain(event_id))
            .collect()
    }

    async fn redeem(&self, token: &RedemptionToken) -> Result<RedeemOutcome> {
        let response = self
            .request(Method::POST, "/api/scan")
            .json(&json!({ "qr_token": token.as_str() }))
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        match status {
            StatusCode::BAD_REQUEST => {
                let conflict: ScanConflictPayload =
                    serde_json::from_str(&body).unwrap_or_default();
                tracing::debug!(
                    target: "mogiri::registry",
                    message = conflict.message.as_deref().unwrap_or(""),
                    "redeem conflict"
                );
                Ok(RedeemOutcome::AlreadyUsed {
                    used_at: parse_used_at(conflict.used_at.as_deref()),
                })
            }
            StatusCode::NOT_FOUND => Ok(RedeemOutcome::NotFound),
            status if status.is_success() => {
                let accepted: ScanAcceptedPayload = serde_json::from_str(&body).map_err(|err| {
                    ScanError::Remote(format!("Malformed registry payload: {err}"))
                })?;
                let summary = accepted
                    .ticket
                    .map(|ticket| {
                        TicketSummary::new(
                            ticket.buyer_name,
                            ticket.buyer_phone,
                            ticket.ticket_type_name,
                        )
                    })
                    .unwrap_or_default();
                Ok(RedeemOutcome::Accepted(summary))
            }
            status => Err(ScanError::Remote(format!(
                "Registry error ({status}): {body}"
            ))),
        }
    }
}

async fn request_json<T: DeserializeOwned>(builder: reqwest::RequestBuilder) -> Result<T> {
    let response = builder.send().await?;
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if !status.is_success() {
        return Err(ScanError::Remote(format!(
            "Registry error ({status}): {body}"
        )));
    }
    serde_json::from_str(&body)
        .map_err(|err| ScanError::Remote(format!("Malformed registry payload: {err}")))
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/').to_string();
    let url = Url::parse(&trimmed)
        .map_err(|err| ScanError::Configuration(format!("Invalid registry URL: {err}")))?;
    match url.scheme() {
        "http" | "https" => Ok(trimmed),
        other => Err(ScanError::Configuration(format!(
            "Registry URL scheme must be http or https, got {other}"
        ))),
    }
}

fn build_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

fn parse_used_at(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|value| {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    })
}

fn bool_from_json<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_bool()
        .unwrap_or_else(|| value.as_i64().unwrap_or(0) != 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_base_url_trims_trailing_slash() {
        let url = normalize_base_url("https://registry.example.com/ ").unwrap();
        assert_eq!(url, "https://registry.example.com");
    }

    #[test]
    fn normalize_base_url_rejects_other_schemes() {
        assert!(normalize_base_url("ftp://registry.example.com").is_err());
        assert!(normalize_base_url("not a url").is_err());
    }

    #[test]
    fn build_url_joins_without_double_slash() {
        assert_eq!(
            build_url("https://registry.example.com", "/api/scan"),
            "https://registry.example.com/api/scan"
        );
    }

    #[test]
    fn wire_ticket_accepts_numeric_booleans() {
        let ticket: WireTicket = serde_json::from_str(
            r#"{"id": 7, "buyer_name": "Ada", "qr_token": "tok", "is_used": 1}"#,
        )
        .unwrap();
        assert!(ticket.is_used);

        let ticket: WireTicket = serde_json::from_str(
            r#"{"id": 8, "qr_token": "tok2", "is_used": false}"#,
        )
        .unwrap();
        assert!(!ticket.is_used);
    }

    #[test]
    fn parse_used_at_handles_rfc3339_and_garbage() {
        let parsed = parse_used_at(Some("2025-06-01T10:30:00Z"));
        assert!(parsed.is_some());
        assert!(parse_used_at(Some("yesterday")).is_none());
        assert!(parse_used_at(None).is_none());
    }
}
