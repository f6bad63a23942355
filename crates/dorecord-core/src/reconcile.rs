//! Record reconciler
//!
//! The reconciler aligns one remote DNS record with its declared state:
//!
//! ```text
//! ┌────────────────────────┐
//! │ ReconciliationRequest  │
//! └────────────────────────┘
//!             │
//!             ▼
//!     ┌──────────────┐   list_records    ┌────────────────┐
//!     │  Reconciler  │ ────────────────▶ │ RecordProvider │
//!     └──────────────┘ ◀──────────────── └────────────────┘
//!             │            records               ▲
//!             │ find_match                       │ create_record /
//!             ▼                                  │ delete_record
//!      decision table ───────────────────────────┘ (at most one)
//! ```
//!
//! ## Decision table
//!
//! | state   | match | action | changed |
//! |---------|-------|--------|---------|
//! | present | no    | create | true    |
//! | present | yes   | none   | false   |
//! | absent  | yes   | delete | true    |
//! | absent  | no    | none   | false   |
//!
//! There is no update path. A declared record that differs from an existing
//! one in any tuple field is treated as absent and created alongside it.

use tracing::{debug, info, warn};

use crate::config::DesiredState;
use crate::error::{Error, Result};
use crate::record::{DeleteEvent, DomainRecord, find_match};
use crate::traits::RecordProvider;

/// The declared configuration for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationRequest {
    /// Domain owning the record
    pub domain: String,
    /// Desired lifecycle state
    pub state: DesiredState,
    /// Declared record fields; `id` is always `None`
    pub record: DomainRecord,
}

/// Result of a reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Record was created
    Created(DomainRecord),
    /// Matching record already exists (no-op)
    Present(DomainRecord),
    /// Matching record was deleted
    Deleted(DeleteEvent),
    /// No matching record exists and none is wanted (no-op)
    Absent,
    /// Check mode: record would have been created
    WouldCreate(DomainRecord),
    /// Check mode: matching record would have been deleted
    WouldDelete(DomainRecord),
}

impl Outcome {
    /// Whether the remote state changed (or would have, in check mode)
    pub fn changed(&self) -> bool {
        matches!(
            self,
            Outcome::Created(_)
                | Outcome::Deleted(_)
                | Outcome::WouldCreate(_)
                | Outcome::WouldDelete(_)
        )
    }
}

/// Reconciles a single declared record against a provider
///
/// The provider is borrowed for the duration of the call and is never
/// stored beyond it.
pub struct Reconciler<'a> {
    provider: &'a dyn RecordProvider,
    check_mode: bool,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler that mutates through `provider`
    pub fn new(provider: &'a dyn RecordProvider) -> Self {
        Self {
            provider,
            check_mode: false,
        }
    }

    /// Enable or disable check mode
    ///
    /// In check mode the list call is still made and the decision is still
    /// taken, but no create or delete is issued.
    pub fn check_mode(mut self, enabled: bool) -> Self {
        self.check_mode = enabled;
        self
    }

    /// Reconcile `request` against the provider
    ///
    /// Performs exactly one list call and at most one mutating call.
    pub async fn reconcile(&self, request: &ReconciliationRequest) -> Result<Outcome> {
        let desired = &request.record;

        debug!(
            "Listing {} records for domain {}",
            self.provider.provider_name(),
            request.domain
        );
        let records = self.provider.list_records(&request.domain).await?;
        debug!("Fetched {} record(s) for {}", records.len(), request.domain);

        let found = find_match(desired, &records);

        match (request.state, found) {
            (DesiredState::Present, None) => {
                if self.check_mode {
                    warn!(
                        "[CHECK] Would create {} record {:?} -> {:?} in {}",
                        desired.record_type, desired.name, desired.data, request.domain
                    );
                    return Ok(Outcome::WouldCreate(desired.clone()));
                }

                info!(
                    "Creating {} record {:?} -> {:?} in {}",
                    desired.record_type, desired.name, desired.data, request.domain
                );
                let created = self.provider.create_record(&request.domain, desired).await?;
                info!("Created record id {:?} in {}", created.id, request.domain);
                Ok(Outcome::Created(created))
            }
            (DesiredState::Present, Some(existing)) => {
                info!(
                    "Record already present in {} (id {:?})",
                    request.domain, existing.id
                );
                Ok(Outcome::Present(existing.clone()))
            }
            (DesiredState::Absent, Some(existing)) => {
                let id = existing.id.ok_or_else(|| {
                    Error::provider(
                        self.provider.provider_name(),
                        format!(
                            "Matched {} record in {} has no identifier",
                            existing.record_type, request.domain
                        ),
                    )
                })?;

                if self.check_mode {
                    warn!("[CHECK] Would delete record id {} from {}", id, request.domain);
                    return Ok(Outcome::WouldDelete(existing.clone()));
                }

                info!("Deleting record id {} from {}", id, request.domain);
                let event = self.provider.delete_record(&request.domain, id).await?;
                info!("Deleted record id {} from {}", id, request.domain);
                Ok(Outcome::Deleted(event))
            }
            (DesiredState::Absent, None) => {
                info!("Record already absent from {}", request.domain);
                Ok(Outcome::Absent)
            }
        }
    }
}
