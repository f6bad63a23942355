// # Record Provider Trait
//
// Defines the interface the reconciler uses to read and mutate the remote
// record store.
//
// ## Implementations
//
// - DigitalOcean: `dorecord-provider-digitalocean` crate
//
// ## Usage
//
// ```rust,ignore
// use dorecord_core::RecordProvider;
//
// let records = provider.list_records("example.com").await?;
// ```

use async_trait::async_trait;

use crate::record::{DeleteEvent, DomainRecord};

/// Trait for DNS record provider implementations
///
/// A provider is constructed once per invocation and passed explicitly to
/// the reconciler. It is never held in shared or static state.
///
/// ## Constraints
///
/// Providers are single-shot:
/// - One logical API operation per method call (list may span pages)
/// - No retry or backoff; every error is returned to the caller
/// - No caching between calls
/// - No spawned tasks
/// - No decision about whether a mutation is needed (owned by `Reconciler`)
#[async_trait]
pub trait RecordProvider: Send + Sync {
    /// Fetch every record belonging to `domain`
    ///
    /// # Errors
    ///
    /// - `Error::NotFound` if the domain does not exist on the provider
    /// - `Error::Provider` for authentication, transport or response faults
    async fn list_records(&self, domain: &str) -> Result<Vec<DomainRecord>, crate::Error>;

    /// Create `record` under `domain` and return it as the provider stored it
    ///
    /// The identifier of `record` is ignored.
    async fn create_record(
        &self,
        domain: &str,
        record: &DomainRecord,
    ) -> Result<DomainRecord, crate::Error>;

    /// Delete the record with provider identifier `id`
    ///
    /// # Errors
    ///
    /// - `Error::Timeout` carrying `id` if the call did not complete in time
    /// - `Error::Provider` for any other fault
    async fn delete_record(&self, domain: &str, id: u64) -> Result<DeleteEvent, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
