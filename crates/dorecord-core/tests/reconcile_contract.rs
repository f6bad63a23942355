//! Contract Test: Reconciliation Decision Table
//!
//! Verifies, against an in-memory provider, that:
//! - The list call is always made exactly once
//! - At most one mutating call is made per reconciliation
//! - create/delete/no-op follow the present/absent × found/not-found table
//! - Repeating a successful reconciliation is a no-op
//!
//! If this test fails, idempotency is broken.

mod common;

use common::*;
use dorecord_core::{
    DesiredState, DomainRecord, Error, Outcome, ReconciliationRequest, Reconciler, RecordType,
};

const DOMAIN: &str = "example.com";

fn www_request(state: DesiredState) -> ReconciliationRequest {
    ReconciliationRequest {
        domain: DOMAIN.to_string(),
        state,
        record: DomainRecord::new(RecordType::A, "127.0.0.1").with_name("www"),
    }
}

#[tokio::test]
async fn present_without_match_creates_once() {
    let provider = MockRecordProvider::with_domain(DOMAIN);
    provider.seed(DOMAIN, DomainRecord::new(RecordType::Ns, "ns1.digitalocean.com").with_name("@"));

    let outcome = Reconciler::new(&provider)
        .reconcile(&www_request(DesiredState::Present))
        .await
        .expect("reconcile succeeds");

    let Outcome::Created(created) = &outcome else {
        panic!("expected Created, got {outcome:?}");
    };
    assert!(outcome.changed());
    assert!(created.id.is_some(), "created record carries provider id");
    assert!(created.matches(&www_request(DesiredState::Present).record));

    assert_eq!(provider.list_calls(), 1);
    assert_eq!(provider.create_calls(), 1);
    assert_eq!(provider.delete_calls(), 0);
}

#[tokio::test]
async fn present_with_match_is_noop() {
    let provider = MockRecordProvider::with_domain(DOMAIN);
    let id = provider.seed(DOMAIN, www_request(DesiredState::Present).record);

    let outcome = Reconciler::new(&provider)
        .reconcile(&www_request(DesiredState::Present))
        .await
        .expect("reconcile succeeds");

    assert!(!outcome.changed());
    assert_eq!(
        outcome,
        Outcome::Present(www_request(DesiredState::Present).record.with_id(id))
    );
    assert_eq!(provider.list_calls(), 1);
    assert_eq!(provider.create_calls() + provider.delete_calls(), 0);
}

#[tokio::test]
async fn absent_with_match_deletes_by_identifier() {
    let provider = MockRecordProvider::with_domain(DOMAIN);
    let id = provider.seed(DOMAIN, www_request(DesiredState::Present).record);

    let outcome = Reconciler::new(&provider)
        .reconcile(&www_request(DesiredState::Absent))
        .await
        .expect("reconcile succeeds");

    let Outcome::Deleted(event) = &outcome else {
        panic!("expected Deleted, got {outcome:?}");
    };
    assert!(outcome.changed());
    assert_eq!(event.id, id);
    assert_eq!(provider.deleted_ids(), vec![id]);
    assert_eq!(provider.list_calls(), 1);
    assert_eq!(provider.create_calls(), 0);
    assert!(provider.records(DOMAIN).is_empty());
}

#[tokio::test]
async fn absent_without_match_is_noop() {
    let provider = MockRecordProvider::with_domain(DOMAIN);
    // Same name and type, different data: not a match
    provider.seed(DOMAIN, DomainRecord::new(RecordType::A, "10.0.0.1").with_name("www"));

    let outcome = Reconciler::new(&provider)
        .reconcile(&www_request(DesiredState::Absent))
        .await
        .expect("reconcile succeeds");

    assert_eq!(outcome, Outcome::Absent);
    assert!(!outcome.changed());
    assert_eq!(provider.list_calls(), 1);
    assert_eq!(provider.create_calls() + provider.delete_calls(), 0);
    assert_eq!(provider.records(DOMAIN).len(), 1);
}

#[tokio::test]
async fn create_then_repeat_then_delete() {
    let provider = MockRecordProvider::with_domain(DOMAIN);
    let reconciler = Reconciler::new(&provider);

    // First run creates
    let first = reconciler
        .reconcile(&www_request(DesiredState::Present))
        .await
        .expect("create succeeds");
    assert!(first.changed());
    let Outcome::Created(created) = first else {
        panic!("expected Created");
    };

    // Second run finds it
    let second = reconciler
        .reconcile(&www_request(DesiredState::Present))
        .await
        .expect("repeat succeeds");
    assert!(!second.changed());
    assert_eq!(provider.create_calls(), 1, "repeat must not create again");

    // Third run removes it, by the id assigned on creation
    let third = reconciler
        .reconcile(&www_request(DesiredState::Absent))
        .await
        .expect("delete succeeds");
    assert!(third.changed());
    assert_eq!(provider.deleted_ids(), vec![created.id.expect("id assigned")]);

    assert_eq!(provider.list_calls(), 3);
}

#[tokio::test]
async fn changed_data_creates_a_second_record() {
    // There is no update path: the old record is left in place
    let provider = MockRecordProvider::with_domain(DOMAIN);
    provider.seed(DOMAIN, DomainRecord::new(RecordType::A, "10.0.0.1").with_name("www"));

    let outcome = Reconciler::new(&provider)
        .reconcile(&www_request(DesiredState::Present))
        .await
        .expect("reconcile succeeds");

    assert!(matches!(outcome, Outcome::Created(_)));
    let records = provider.records(DOMAIN);
    assert_eq!(records.len(), 2);
    assert!(records.iter().any(|r| r.data.as_deref() == Some("10.0.0.1")));
    assert!(records.iter().any(|r| r.data.as_deref() == Some("127.0.0.1")));
}

#[tokio::test]
async fn srv_match_requires_every_field() {
    let provider = MockRecordProvider::with_domain(DOMAIN);
    let srv = DomainRecord::new(RecordType::Srv, "sip.example.com")
        .with_name("_sip._tcp")
        .with_priority(10)
        .with_port(5060)
        .with_weight(5);
    provider.seed(DOMAIN, DomainRecord { weight: Some(10), ..srv.clone() });

    let request = ReconciliationRequest {
        domain: DOMAIN.to_string(),
        state: DesiredState::Present,
        record: srv,
    };
    let outcome = Reconciler::new(&provider)
        .reconcile(&request)
        .await
        .expect("reconcile succeeds");

    assert!(matches!(outcome, Outcome::Created(_)));
    assert_eq!(provider.create_calls(), 1);
}

#[tokio::test]
async fn unknown_domain_fails_without_mutation() {
    let provider = MockRecordProvider::with_domain(DOMAIN);
    let request = ReconciliationRequest {
        domain: "missing.example".to_string(),
        ..www_request(DesiredState::Present)
    };

    let err = Reconciler::new(&provider)
        .reconcile(&request)
        .await
        .expect_err("unknown domain fails");

    assert!(matches!(err, Error::NotFound(_)), "got {err:?}");
    assert_eq!(provider.list_calls(), 1);
    assert_eq!(provider.create_calls() + provider.delete_calls(), 0);
}

#[tokio::test]
async fn check_mode_lists_but_never_mutates() {
    let provider = MockRecordProvider::with_domain(DOMAIN);
    let id = provider.seed(DOMAIN, www_request(DesiredState::Present).record);
    let reconciler = Reconciler::new(&provider).check_mode(true);

    let delete = reconciler
        .reconcile(&www_request(DesiredState::Absent))
        .await
        .expect("check-mode delete succeeds");
    assert!(delete.changed());
    assert!(matches!(delete, Outcome::WouldDelete(ref r) if r.id == Some(id)));

    let mx = ReconciliationRequest {
        domain: DOMAIN.to_string(),
        state: DesiredState::Present,
        record: DomainRecord::new(RecordType::Mx, "mail.example.com").with_priority(10),
    };
    let create = reconciler.reconcile(&mx).await.expect("check-mode create succeeds");
    assert!(create.changed());
    assert!(matches!(create, Outcome::WouldCreate(_)));

    assert_eq!(provider.list_calls(), 2);
    assert_eq!(provider.create_calls() + provider.delete_calls(), 0);
    assert_eq!(provider.records(DOMAIN).len(), 1);
}
