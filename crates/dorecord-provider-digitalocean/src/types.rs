//! DigitalOcean API v2 request and response bodies
//!
//! Only the fields this module reads are mapped. Everything else in a
//! response is ignored.

use dorecord_core::DomainRecord;
use serde::{Deserialize, Serialize};

/// `GET /domains/{domain}/records`
#[derive(Debug, Deserialize)]
pub(crate) struct RecordListResponse {
    pub domain_records: Vec<DomainRecord>,
    #[serde(default)]
    pub links: Links,
}

impl RecordListResponse {
    /// Link to the next page, if the API advertises one
    pub fn next_page(&self) -> Option<&str> {
        self.links
            .pages
            .as_ref()
            .and_then(|pages| pages.next.as_deref())
            .filter(|next| !next.is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Links {
    #[serde(default)]
    pub pages: Option<Pages>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Pages {
    #[serde(default)]
    pub next: Option<String>,
}

/// `POST /domains/{domain}/records`
#[derive(Debug, Deserialize)]
pub(crate) struct RecordResponse {
    pub domain_record: DomainRecord,
}

/// Error body returned with non-2xx statuses
#[derive(Debug, Deserialize)]
pub(crate) struct ApiError {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiError {
    /// Extract a readable message from an error body, if it is one
    pub fn message_from(body: &str) -> Option<String> {
        let error: ApiError = serde_json::from_str(body).ok()?;
        match (error.id, error.message) {
            (Some(id), Some(message)) => Some(format!("{message} ({id})")),
            (None, Some(message)) => Some(message),
            (Some(id), None) => Some(id),
            (None, None) => None,
        }
    }
}

/// Body of a record creation request
///
/// Unset optional fields are omitted rather than sent as `null`.
#[derive(Debug, Serialize)]
pub(crate) struct CreateRecordRequest<'a> {
    #[serde(rename = "type")]
    pub record_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
}

impl<'a> From<&'a DomainRecord> for CreateRecordRequest<'a> {
    fn from(record: &'a DomainRecord) -> Self {
        Self {
            record_type: record.record_type.as_str(),
            data: record.data.as_deref(),
            name: record.name.as_deref(),
            priority: record.priority,
            port: record.port,
            weight: record.weight,
        }
    }
}
