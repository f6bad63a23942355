//! Test doubles shared by the reconciliation contract tests
//!
//! `MockRecordProvider` keeps an in-memory record store per domain and counts
//! every provider call, so tests can assert exactly which network calls an
//! invocation would have made.

#![allow(dead_code)]

use dorecord_core::error::{Error, Result};
use dorecord_core::{DeleteEvent, DomainRecord, RecordProvider};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Store {
    domains: HashMap<String, Vec<DomainRecord>>,
    next_id: u64,
}

/// In-memory provider that tracks calls
///
/// Clones share the store and the counters, so a clone handed to
/// `execute` can be inspected afterwards through the original.
#[derive(Clone, Default)]
pub struct MockRecordProvider {
    store: Arc<Mutex<Store>>,
    list_calls: Arc<AtomicUsize>,
    create_calls: Arc<AtomicUsize>,
    delete_calls: Arc<AtomicUsize>,
    deleted_ids: Arc<Mutex<Vec<u64>>>,
}

impl MockRecordProvider {
    /// Create a provider hosting `domain` with no records
    pub fn with_domain(domain: &str) -> Self {
        let provider = Self::default();
        {
            let mut store = provider.store.lock().unwrap();
            store.domains.insert(domain.to_string(), Vec::new());
            store.next_id = 1000;
        }
        provider
    }

    /// Seed a record, assigning it a fresh identifier
    pub fn seed(&self, domain: &str, record: DomainRecord) -> u64 {
        let mut store = self.store.lock().unwrap();
        store.next_id += 1;
        let id = store.next_id;
        store
            .domains
            .entry(domain.to_string())
            .or_default()
            .push(DomainRecord { id: Some(id), ..record });
        id
    }

    /// Records currently stored for `domain`
    pub fn records(&self, domain: &str) -> Vec<DomainRecord> {
        self.store
            .lock()
            .unwrap()
            .domains
            .get(domain)
            .cloned()
            .unwrap_or_default()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Total number of provider calls of any kind
    pub fn total_calls(&self) -> usize {
        self.list_calls() + self.create_calls() + self.delete_calls()
    }

    /// Identifiers passed to `delete_record`, in call order
    pub fn deleted_ids(&self) -> Vec<u64> {
        self.deleted_ids.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl RecordProvider for MockRecordProvider {
    async fn list_records(&self, domain: &str) -> Result<Vec<DomainRecord>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.store
            .lock()
            .unwrap()
            .domains
            .get(domain)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("Domain not found {domain}")))
    }

    async fn create_record(&self, domain: &str, record: &DomainRecord) -> Result<DomainRecord> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let mut store = self.store.lock().unwrap();
        store.next_id += 1;
        let created = DomainRecord {
            id: Some(store.next_id),
            ..record.clone()
        };
        store
            .domains
            .get_mut(domain)
            .ok_or_else(|| Error::not_found(format!("Domain not found {domain}")))?
            .push(created.clone());
        Ok(created)
    }

    async fn delete_record(&self, domain: &str, id: u64) -> Result<DeleteEvent> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.deleted_ids.lock().unwrap().push(id);
        let mut store = self.store.lock().unwrap();
        let records = store
            .domains
            .get_mut(domain)
            .ok_or_else(|| Error::not_found(format!("Domain not found {domain}")))?;
        let before = records.len();
        records.retain(|r| r.id != Some(id));
        if records.len() == before {
            return Err(Error::provider("mock", format!("record {id} does not exist")));
        }
        Ok(DeleteEvent {
            domain: domain.to_string(),
            id,
            status: 204,
        })
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Environment lookup that never finds anything
pub fn empty_env(_key: &str) -> Option<String> {
    None
}

/// Environment lookup providing only `DO_API_TOKEN`
pub fn token_env(key: &str) -> Option<String> {
    (key == "DO_API_TOKEN").then(|| "env-token".to_string())
}
