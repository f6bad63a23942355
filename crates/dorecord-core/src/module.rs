//! Module invocation pipeline and result envelopes
//!
//! One invocation runs: parameter validation → credential resolution →
//! provider construction → reconciliation. The first two steps are local, so
//! a missing domain or credential fails before a provider exists and before
//! any network call.

use serde::Serialize;

use crate::config::{Credential, ModuleArgs, ProviderConfig};
use crate::error::{Error, Result};
use crate::reconcile::{Outcome, Reconciler};
use crate::record::{DeleteEvent, DomainRecord};
use crate::traits::RecordProvider;

/// Run one module invocation
///
/// - `lookup` resolves environment variables (credential fallbacks,
///   `DO_API_URL`, `DO_API_TIMEOUT`)
/// - `connect` builds the provider session; it is only called once the
///   parameters and credential are valid
pub async fn execute<L, C, P>(args: &ModuleArgs, lookup: L, connect: C) -> Result<Outcome>
where
    L: Fn(&str) -> Option<String>,
    C: FnOnce(ProviderConfig) -> Result<P>,
    P: RecordProvider,
{
    let request = args.params.validate()?;
    let credential = Credential::resolve(args.params.api_token.as_deref(), &lookup)?;
    let config = ProviderConfig::from_lookup(credential, &lookup)?;

    let provider = connect(config)?;

    Reconciler::new(&provider)
        .check_mode(args.check_mode)
        .reconcile(&request)
        .await
}

/// JSON envelope printed on stdout for the orchestration engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ModuleResult {
    /// Success reporting a record (or `null` when none exists)
    Record {
        changed: bool,
        record: Option<DomainRecord>,
    },
    /// Success reporting a deletion acknowledgement
    Event { changed: bool, event: DeleteEvent },
    /// Failure with a human-readable message
    Failed {
        failed: bool,
        msg: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<u64>,
    },
}

impl ModuleResult {
    /// Build the success envelope for `outcome`
    pub fn success(outcome: Outcome) -> Self {
        let changed = outcome.changed();
        match outcome {
            Outcome::Created(record)
            | Outcome::Present(record)
            | Outcome::WouldCreate(record)
            | Outcome::WouldDelete(record) => Self::Record {
                changed,
                record: Some(record),
            },
            Outcome::Deleted(event) => Self::Event { changed, event },
            Outcome::Absent => Self::Record {
                changed,
                record: None,
            },
        }
    }

    /// Build the failure envelope for `error`
    pub fn failure(error: &Error) -> Self {
        Self::Failed {
            failed: true,
            msg: error.to_string(),
            id: error.record_id(),
        }
    }

    /// Whether this envelope reports a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Serialize the envelope as a single JSON line
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"failed": true, "msg": "Failed to serialize module result: {e}"}}"#)
        })
    }
}

impl From<Result<Outcome>> for ModuleResult {
    fn from(result: Result<Outcome>) -> Self {
        match result {
            Ok(outcome) => Self::success(outcome),
            Err(error) => Self::failure(&error),
        }
    }
}
