// # dorecord-core
//
// Core library for the DigitalOcean domain record module.
//
// ## Architecture Overview
//
// One invocation reconciles one DNS record against its declared state:
// - **config**: module parameters, credential resolution, provider settings
// - **record**: the `DomainRecord` data model and exact-tuple matching
// - **RecordProvider**: trait for listing, creating and deleting records
// - **Reconciler**: list → match → create/delete/no-op decision
// - **module**: the invocation pipeline and the JSON result envelopes
//
// ## Design Principles
//
// 1. **Local validation first**: parameters and credential are checked before a provider exists
// 2. **Explicit injection**: the provider is built per invocation and passed in, never shared
// 3. **Single-shot**: one list call, at most one mutation, no retries
// 4. **Library-First**: the binary is a thin wrapper around `module::execute`

pub mod config;
pub mod error;
pub mod module;
pub mod reconcile;
pub mod record;
pub mod traits;

// Re-export core types for convenience
pub use config::{Credential, DesiredState, ModuleArgs, ModuleParams, ProviderConfig};
pub use error::{Error, Result};
pub use module::{ModuleResult, execute};
pub use reconcile::{Outcome, ReconciliationRequest, Reconciler};
pub use record::{DeleteEvent, DomainRecord, RecordType, find_match};
pub use traits::RecordProvider;
