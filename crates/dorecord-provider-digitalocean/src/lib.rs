// # DigitalOcean DNS Provider
//
// This crate provides the DigitalOcean implementation of `RecordProvider`.
//
// ## Behaviour
//
// - One logical API operation per trait call (listing follows pagination,
//   bounded to `MAX_PAGES` pages)
// - Full error propagation; no retry, no backoff, no caching
// - HTTP timeout taken from `ProviderConfig` (30 seconds by default)
// - Status codes mapped to `Error` kinds (401/403, 404, 429, 5xx)
// - Never spawns background tasks
//
// ## Security Requirements
//
// - API token NEVER appears in logs or Debug output
// - Provider MUST fail fast if the token is empty
//
// ## API Reference
//
// - DigitalOcean API v2: https://docs.digitalocean.com/reference/api/
// - List records: GET `/domains/:domain/records?page=N&per_page=200`
// - Create record: POST `/domains/:domain/records`
// - Delete record: DELETE `/domains/:domain/records/:id`

mod types;

use async_trait::async_trait;
use dorecord_core::{DeleteEvent, DomainRecord, Error, ProviderConfig, RecordProvider, Result};
use reqwest::Response;
use std::fmt;
use std::time::Duration;

use crate::types::{ApiError, CreateRecordRequest, RecordListResponse, RecordResponse};

/// Provider name used in errors and logs
const PROVIDER_NAME: &str = "digitalocean";

/// Records requested per page when listing (API maximum)
const PER_PAGE: u32 = 200;

/// Upper bound on pages fetched by one listing
const MAX_PAGES: u32 = 500;

/// API operation, used to shape error messages
#[derive(Debug, Clone, Copy)]
enum Action<'a> {
    List { domain: &'a str },
    Create { domain: &'a str },
    Delete { domain: &'a str, id: u64 },
}

impl fmt::Display for Action<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::List { domain } => write!(f, "Listing records of {domain}"),
            Action::Create { domain } => write!(f, "Creating record in {domain}"),
            Action::Delete { domain, id } => write!(f, "Deleting record {id} from {domain}"),
        }
    }
}

/// DigitalOcean DNS provider
///
/// Constructed once per invocation from a [`ProviderConfig`] and passed to
/// the reconciler by reference.
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API token.
pub struct DigitalOceanProvider {
    /// DigitalOcean API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// API base URL without trailing slash
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl fmt::Debug for DigitalOceanProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigitalOceanProvider")
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl DigitalOceanProvider {
    /// Create a new DigitalOcean provider session
    ///
    /// # Errors
    ///
    /// - `Error::Config` if the token is empty or the HTTP client cannot be built
    pub fn new(config: ProviderConfig) -> Result<Self> {
        config.validate()?;

        let api_token = config.credential.expose().to_string();
        if api_token.is_empty() {
            return Err(Error::config("DigitalOcean API token cannot be empty"));
        }

        // Build HTTP client with timeout
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("dorecord/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_token,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn records_url(&self, domain: &str) -> String {
        format!("{}/domains/{}/records", self.base_url, domain)
    }

    /// Map a non-2xx response to an error; pass 2xx responses through
    async fn check_status(response: Response, action: Action<'_>) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());
        let message = ApiError::message_from(&body).unwrap_or(body);

        tracing::debug!("{} failed with status {}: {}", action, status, message);

        Err(match (status.as_u16(), action) {
            (401 | 403, _) => Error::provider(
                PROVIDER_NAME,
                format!(
                    "Authentication failed: Invalid API token or insufficient permissions. Status: {status} - {message}"
                ),
            ),
            (404, Action::List { domain }) => {
                Error::not_found(format!("Domain not found {domain}"))
            }
            (429, _) => Error::provider(
                PROVIDER_NAME,
                format!("Rate limit exceeded. Please retry later. Status: {status} - {message}"),
            ),
            (500..=599, _) => Error::provider(
                PROVIDER_NAME,
                format!("DigitalOcean server error: {status} - {message}"),
            ),
            _ => Error::provider(PROVIDER_NAME, format!("{action} failed: {status} - {message}")),
        })
    }

    /// Map a transport failure to an error
    fn transport_error(err: &reqwest::Error, action: Action<'_>) -> Error {
        match action {
            Action::Delete { id, .. } if err.is_timeout() => {
                Error::timeout(format!("{action} timed out: {err}"), id)
            }
            _ => Error::provider(PROVIDER_NAME, format!("{action}: HTTP request failed: {err}")),
        }
    }

    async fn parse_json<T: serde::de::DeserializeOwned>(
        response: Response,
        action: Action<'_>,
    ) -> Result<T> {
        response.json().await.map_err(|e| {
            Error::provider(PROVIDER_NAME, format!("{action}: Failed to parse response: {e}"))
        })
    }
}

#[async_trait]
impl RecordProvider for DigitalOceanProvider {
    /// # API Call
    ///
    /// ```http
    /// GET /domains/example.com/records?page=1&per_page=200
    /// Authorization: Bearer <token>
    /// ```
    ///
    /// Repeated with the next page number while `links.pages.next` is set.
    /// Stops at an empty page; fails if the next link repeats or more than
    /// `MAX_PAGES` pages are advertised.
    async fn list_records(&self, domain: &str) -> Result<Vec<DomainRecord>> {
        let action = Action::List { domain };
        let url = self.records_url(domain);
        let mut records = Vec::new();
        let mut page: u32 = 1;
        let mut previous_next: Option<String> = None;

        loop {
            tracing::debug!("GET {} (page {})", url, page);

            let response = self
                .client
                .get(&url)
                .bearer_auth(&self.api_token)
                .query(&[("page", page), ("per_page", PER_PAGE)])
                .send()
                .await
                .map_err(|e| Self::transport_error(&e, action))?;

            let response = Self::check_status(response, action).await?;
            let body: RecordListResponse = Self::parse_json(response, action).await?;

            let next = body.next_page().map(str::to_string);
            let fetched = body.domain_records.len();
            records.extend(body.domain_records);

            let Some(next) = next else { break };
            if fetched == 0 {
                break;
            }
            if previous_next.as_deref() == Some(next.as_str()) {
                return Err(Error::provider(
                    PROVIDER_NAME,
                    format!("{action}: pagination did not advance past {next}"),
                ));
            }
            if page >= MAX_PAGES {
                return Err(Error::provider(
                    PROVIDER_NAME,
                    format!("{action}: more than {MAX_PAGES} pages of records"),
                ));
            }

            previous_next = Some(next);
            page += 1;
        }

        tracing::debug!("Listed {} record(s) for {}", records.len(), domain);
        Ok(records)
    }

    /// # API Call
    ///
    /// ```http
    /// POST /domains/example.com/records
    /// Authorization: Bearer <token>
    /// {"type": "A", "name": "www", "data": "127.0.0.1"}
    /// ```
    async fn create_record(&self, domain: &str, record: &DomainRecord) -> Result<DomainRecord> {
        let action = Action::Create { domain };
        let url = self.records_url(domain);
        let payload = CreateRecordRequest::from(record);

        tracing::debug!("POST {} ({} record)", url, payload.record_type);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Self::transport_error(&e, action))?;

        let response = Self::check_status(response, action).await?;
        let body: RecordResponse = Self::parse_json(response, action).await?;
        Ok(body.domain_record)
    }

    /// # API Call
    ///
    /// ```http
    /// DELETE /domains/example.com/records/3352896
    /// Authorization: Bearer <token>
    /// ```
    ///
    /// Answers 204 No Content on success.
    async fn delete_record(&self, domain: &str, id: u64) -> Result<DeleteEvent> {
        let action = Action::Delete { domain, id };
        let url = format!("{}/{}", self.records_url(domain), id);

        tracing::debug!("DELETE {}", url);

        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| Self::transport_error(&e, action))?;

        let response = Self::check_status(response, action).await?;

        Ok(DeleteEvent {
            domain: domain.to_string(),
            id,
            status: response.status().as_u16(),
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
