// # Domain Records
//
// The data model shared by the reconciler and the providers.
//
// A `DomainRecord` is built either from the declared module parameters (no
// identifier) or from a provider response (identifier assigned by the
// provider). It is never persisted; it only lives for one invocation.
//
// ## Matching
//
// Two records match when their (type, data, name, priority, port, weight)
// tuples are equal by value. The identifier never takes part, and an unset
// field only matches an unset field. `find_match` is a first-match linear
// scan over one domain's record list.

use serde::{Deserialize, Serialize};
use std::fmt;

/// DNS record type
///
/// The seven managed types parse from their canonical upper-case names.
/// Anything else a provider returns (CAA, SOA, ...) is kept verbatim in
/// [`RecordType::Other`] so listing a domain never fails on a type this
/// module does not manage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordType {
    #[default]
    A,
    Aaaa,
    Cname,
    Mx,
    Txt,
    Srv,
    Ns,
    /// A type returned by the provider that cannot be managed here
    Other(String),
}

impl RecordType {
    /// Types accepted for the `type` parameter, in documentation order
    pub const MANAGED: [RecordType; 7] = [
        RecordType::A,
        RecordType::Aaaa,
        RecordType::Cname,
        RecordType::Mx,
        RecordType::Txt,
        RecordType::Srv,
        RecordType::Ns,
    ];

    /// Canonical wire name
    pub fn as_str(&self) -> &str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Txt => "TXT",
            RecordType::Srv => "SRV",
            RecordType::Ns => "NS",
            RecordType::Other(name) => name,
        }
    }

    /// Whether this module can create or delete records of this type
    pub fn is_managed(&self) -> bool {
        !matches!(self, RecordType::Other(_))
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for RecordType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "A" => RecordType::A,
            "AAAA" => RecordType::Aaaa,
            "CNAME" => RecordType::Cname,
            "MX" => RecordType::Mx,
            "TXT" => RecordType::Txt,
            "SRV" => RecordType::Srv,
            "NS" => RecordType::Ns,
            _ => RecordType::Other(value),
        }
    }
}

impl From<&str> for RecordType {
    fn from(value: &str) -> Self {
        RecordType::from(value.to_string())
    }
}

impl From<RecordType> for String {
    fn from(value: RecordType) -> Self {
        match value {
            RecordType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

/// A single DNS resource record under a domain
///
/// Deserialization maps exactly the fields below. Other fields in a provider
/// response (`ttl`, `flags`, `tag`, ...) are ignored rather than adopted.
/// Serialization always emits every field, with `null` where a field does
/// not apply, which is the shape the result envelope reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRecord {
    /// Provider-assigned identifier, present only after creation
    #[serde(default)]
    pub id: Option<u64>,

    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,

    /// Record value, e.g. an IP address or target host
    #[serde(default)]
    pub data: Option<String>,

    /// Host label relative to the domain
    #[serde(default)]
    pub name: Option<String>,

    /// MX/SRV priority
    #[serde(default)]
    pub priority: Option<u32>,

    /// SRV port
    #[serde(default)]
    pub port: Option<u32>,

    /// SRV weight
    #[serde(default)]
    pub weight: Option<u32>,
}

impl DomainRecord {
    /// Create a record descriptor with only a type and value
    pub fn new(record_type: RecordType, data: impl Into<String>) -> Self {
        Self {
            record_type,
            data: Some(data.into()),
            ..Self::default()
        }
    }

    /// Set the host label
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the port
    pub fn with_port(mut self, port: u32) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the weight
    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Set the provider identifier
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    /// Exact-tuple comparison over (type, data, name, priority, port, weight)
    ///
    /// The identifier is ignored. `None` only equals `None`.
    pub fn matches(&self, other: &DomainRecord) -> bool {
        self.record_type == other.record_type
            && self.data == other.data
            && self.name == other.name
            && self.priority == other.priority
            && self.port == other.port
            && self.weight == other.weight
    }
}

/// Return the first record in `records` that matches `desired`
///
/// Duplicate matches are not detected; the earliest one wins.
pub fn find_match<'a>(desired: &DomainRecord, records: &'a [DomainRecord]) -> Option<&'a DomainRecord> {
    records.iter().find(|record| desired.matches(record))
}

/// Acknowledgement of a record deletion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteEvent {
    /// Domain the record belonged to
    pub domain: String,
    /// Identifier of the deleted record
    pub id: u64,
    /// HTTP status the provider answered with
    pub status: u16,
}
