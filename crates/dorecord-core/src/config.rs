//! Configuration types for the dorecord module
//!
//! Module parameters arrive as one JSON object from the orchestration engine.
//! Provider settings that are not module parameters (API base URL, HTTP
//! timeout) and the credential fallbacks come from environment variables,
//! read through an injected lookup so they can be exercised without touching
//! the process environment.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};
use crate::reconcile::ReconciliationRequest;
use crate::record::{DomainRecord, RecordType};

/// Environment variables consulted for the API token, in order
pub const TOKEN_ENV_VARS: [&str; 2] = ["DO_API_TOKEN", "DO_API_KEY"];

/// Environment variable overriding the API base URL
pub const API_URL_ENV_VAR: &str = "DO_API_URL";

/// Environment variable overriding the HTTP timeout (seconds)
pub const API_TIMEOUT_ENV_VAR: &str = "DO_API_TIMEOUT";

/// DigitalOcean API v2 base URL
pub const DEFAULT_API_BASE_URL: &str = "https://api.digitalocean.com/v2";

/// Default HTTP timeout for API requests (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Wrapper key used when the engine nests parameters
const ARGS_WRAPPER_KEY: &str = "ANSIBLE_MODULE_ARGS";

/// Prefix of engine-internal keys mixed into the parameter object
const INTERNAL_KEY_PREFIX: &str = "_ansible_";

/// Engine-internal key carrying the dry-run flag
const CHECK_MODE_KEY: &str = "_ansible_check_mode";

/// Parameters this module accepts, including aliases
const SUPPORTED_PARAMS: [&str; 10] = [
    "state", "api_token", "API_TOKEN", "domain", "type", "data", "name", "priority", "port",
    "weight",
];

/// Desired lifecycle state of the record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesiredState {
    /// Ensure the record exists
    #[default]
    Present,
    /// Ensure the record does not exist
    Absent,
}

/// Declared module parameters
///
/// Every field is optional at this level because the engine sends `null`
/// for options the user left unset. Defaults and required-ness are applied
/// in [`ModuleParams::validate`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModuleParams {
    /// present / absent, default present
    #[serde(default)]
    pub state: Option<DesiredState>,

    /// Provider credential
    #[serde(default, alias = "API_TOKEN")]
    pub api_token: Option<String>,

    /// Domain owning the record (required)
    #[serde(default)]
    pub domain: Option<String>,

    /// Record type, default A
    #[serde(default, rename = "type")]
    pub record_type: Option<String>,

    /// Record value
    #[serde(default)]
    pub data: Option<String>,

    /// Record host label
    #[serde(default)]
    pub name: Option<String>,

    /// MX/SRV priority
    #[serde(default, deserialize_with = "de_opt_int")]
    pub priority: Option<u32>,

    /// SRV port
    #[serde(default, deserialize_with = "de_opt_int")]
    pub port: Option<u32>,

    /// SRV weight
    #[serde(default, deserialize_with = "de_opt_int")]
    pub weight: Option<u32>,
}

impl ModuleParams {
    /// Validate the parameters and build the reconciliation request
    ///
    /// Nothing here touches the network or the credential.
    pub fn validate(&self) -> Result<ReconciliationRequest> {
        let domain = self
            .domain
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| Error::config("Unable to load domain"))?;

        let record_type = match self.record_type.as_deref() {
            None => RecordType::default(),
            Some(raw) => {
                let parsed = RecordType::from(raw);
                if !parsed.is_managed() {
                    let choices = RecordType::MANAGED
                        .iter()
                        .map(RecordType::as_str)
                        .collect::<Vec<_>>()
                        .join(", ");
                    return Err(Error::config(format!(
                        "value of type must be one of: {choices}, got: {raw}"
                    )));
                }
                parsed
            }
        };

        Ok(ReconciliationRequest {
            domain: domain.to_string(),
            state: self.state.unwrap_or_default(),
            record: DomainRecord {
                id: None,
                record_type,
                data: self.data.clone(),
                name: self.name.clone(),
                priority: self.priority,
                port: self.port,
                weight: self.weight,
            },
        })
    }
}

/// Accept a JSON integer or a numeric string (key=value invocation style)
fn de_opt_int<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString {
        Int(i64),
        Str(String),
    }

    match Option::<IntOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IntOrString::Int(n)) => u32::try_from(n)
            .map(Some)
            .map_err(|_| D::Error::custom(format!("{n} is not a valid non-negative int"))),
        Some(IntOrString::Str(s)) => s
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("'{s}' cannot be converted to an int"))),
    }
}

/// Module arguments as received from the orchestration engine
#[derive(Debug, Clone, Default)]
pub struct ModuleArgs {
    /// Declared parameters
    pub params: ModuleParams,
    /// Report what would change without mutating anything
    pub check_mode: bool,
}

impl ModuleArgs {
    /// Parse module arguments from JSON
    ///
    /// Accepts the bare parameter object or one wrapped in
    /// `ANSIBLE_MODULE_ARGS`. Engine-internal `_ansible_*` keys are consumed
    /// or dropped; any other unknown key is rejected.
    pub fn from_json(input: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(input)
            .map_err(|e| Error::config(format!("Failed to parse module arguments: {e}")))?;

        let serde_json::Value::Object(mut object) = value else {
            return Err(Error::config("Module arguments must be a JSON object"));
        };

        if let Some(serde_json::Value::Object(inner)) = object.remove(ARGS_WRAPPER_KEY) {
            object = inner;
        }

        let mut check_mode = false;
        let mut params = serde_json::Map::new();
        let mut unsupported = Vec::new();

        for (key, value) in object {
            if key == CHECK_MODE_KEY {
                check_mode = value.as_bool().ok_or_else(|| {
                    Error::config(format!(
                        "Invalid value for {CHECK_MODE_KEY}: expected a boolean, got {value}"
                    ))
                })?;
            } else if key.starts_with(INTERNAL_KEY_PREFIX) {
                continue;
            } else if SUPPORTED_PARAMS.contains(&key.as_str()) {
                params.insert(key, value);
            } else {
                unsupported.push(key);
            }
        }

        if !unsupported.is_empty() {
            unsupported.sort();
            return Err(Error::config(format!(
                "Unsupported parameters for module: {}",
                unsupported.join(", ")
            )));
        }

        let params = serde_json::from_value(serde_json::Value::Object(params))
            .map_err(|e| Error::config(format!("Invalid module parameters: {e}")))?;

        Ok(Self { params, check_mode })
    }

    /// Read and parse module arguments from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read module arguments from {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&contents)
    }
}

/// Provider API token
///
/// The Debug implementation never exposes the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Resolve the token from the explicit parameter, else `DO_API_TOKEN`,
    /// else `DO_API_KEY`
    ///
    /// Empty values count as unset.
    pub fn resolve<F>(explicit: Option<&str>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        explicit
            .map(str::to_string)
            .into_iter()
            .chain(TOKEN_ENV_VARS.iter().filter_map(|&var| lookup(var)))
            .map(|token| token.trim().to_string())
            .find(|token| !token.is_empty())
            .map(Self)
            .ok_or_else(|| {
                Error::config(format!(
                    "Unable to load api_token: set the api_token parameter or one of {}",
                    TOKEN_ENV_VARS.join(", ")
                ))
            })
    }

    /// The raw token, for building the Authorization header only
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<REDACTED>)")
    }
}

/// Settings needed to open a provider session
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// API token
    pub credential: Credential,
    /// API base URL without trailing slash
    pub api_base_url: String,
    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

impl ProviderConfig {
    /// Create a configuration with default URL and timeout
    pub fn new(credential: Credential) -> Self {
        Self {
            credential,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Create a configuration, applying `DO_API_URL` and `DO_API_TIMEOUT`
    /// overrides from `lookup`
    pub fn from_lookup<F>(credential: Credential, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(credential);

        if let Some(url) = lookup(API_URL_ENV_VAR).filter(|u| !u.trim().is_empty()) {
            config.api_base_url = url.trim().trim_end_matches('/').to_string();
        }

        if let Some(raw) = lookup(API_TIMEOUT_ENV_VAR).filter(|t| !t.trim().is_empty()) {
            config.timeout_secs = raw.trim().parse().map_err(|_| {
                Error::config(format!("{API_TIMEOUT_ENV_VAR} must be a whole number of seconds. Got: {raw}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the API base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Validate the provider configuration
    pub fn validate(&self) -> Result<()> {
        if !self.api_base_url.starts_with("https://") && !self.api_base_url.starts_with("http://") {
            return Err(Error::config(format!(
                "{API_URL_ENV_VAR} must use HTTP or HTTPS scheme. Got: {}",
                self.api_base_url
            )));
        }

        if self.timeout_secs == 0 {
            return Err(Error::config(format!("{API_TIMEOUT_ENV_VAR} must be > 0")));
        }

        Ok(())
    }
}
