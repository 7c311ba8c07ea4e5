// Copyright (C) 2026 Repair Desk contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the report boundary functions.

use repair_desk::{TechnicianOrdering, UNASSIGNED_LABEL};
use repair_desk_persistence::Persistence;

use crate::tests::helpers::{
    FailingStore, admin_session, create_test_shop, technician_session,
};
use crate::{
    FailureKind, MetricsQuery, Outcome, TechnicianReportQuery, order_metrics, technician_orders,
    technician_report, warranty_stats,
};

#[test]
fn test_admin_report_covers_all_technicians() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    create_test_shop(&mut persistence);

    let response = technician_report(
        &mut persistence,
        &admin_session(),
        &TechnicianReportQuery::default(),
        TechnicianOrdering::Alphabetical,
    )
    .into_result()
    .unwrap();

    let labels: Vec<&str> = response
        .groups
        .iter()
        .map(|group| group.technician.as_str())
        .collect();
    assert_eq!(labels, vec!["Luis", "Marta", "Marta G.", UNASSIGNED_LABEL]);
    assert_eq!(response.metrics.total, 4);
    assert_eq!(response.ordering, TechnicianOrdering::Alphabetical);
}

#[test]
fn test_report_ordering_can_be_requested() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    create_test_shop(&mut persistence);

    let response = technician_report(
        &mut persistence,
        &admin_session(),
        &TechnicianReportQuery {
            technician_id: None,
            ordering: Some(String::from("recent-activity")),
        },
        TechnicianOrdering::Alphabetical,
    )
    .into_result()
    .unwrap();

    let labels: Vec<&str> = response
        .groups
        .iter()
        .map(|group| group.technician.as_str())
        .collect();
    assert_eq!(labels, vec!["Luis", "Marta G.", "Marta", UNASSIGNED_LABEL]);
}

#[test]
fn test_unknown_ordering_is_a_validation_failure() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let outcome = technician_report(
        &mut persistence,
        &admin_session(),
        &TechnicianReportQuery {
            technician_id: None,
            ordering: Some(String::from("by-salary")),
        },
        TechnicianOrdering::Alphabetical,
    );

    assert_eq!(outcome.failure_kind(), Some(FailureKind::Validation));
}

#[test]
fn test_technician_report_defaults_to_own_person() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let shop = create_test_shop(&mut persistence);

    let response = technician_report(
        &mut persistence,
        &technician_session(shop.marta_again),
        &TechnicianReportQuery::default(),
        TechnicianOrdering::Alphabetical,
    )
    .into_result()
    .unwrap();

    assert_eq!(response.metrics.total, 2);
    assert!(
        response
            .groups
            .iter()
            .all(|group| group.technician.starts_with("Marta"))
    );
}

#[test]
fn test_technician_cannot_request_another_person() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let shop = create_test_shop(&mut persistence);

    let outcome = technician_report(
        &mut persistence,
        &technician_session(shop.marta),
        &TechnicianReportQuery {
            technician_id: Some(shop.luis),
            ordering: None,
        },
        TechnicianOrdering::Alphabetical,
    );

    assert_eq!(outcome.failure_kind(), Some(FailureKind::Unauthorized));
}

#[test]
fn test_report_for_unknown_technician_is_not_found() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let outcome = technician_report(
        &mut persistence,
        &admin_session(),
        &TechnicianReportQuery {
            technician_id: Some(404),
            ordering: None,
        },
        TechnicianOrdering::Alphabetical,
    );

    assert_eq!(outcome.failure_kind(), Some(FailureKind::NotFound));
}

#[test]
fn test_technician_orders_for_signed_in_technician() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let shop = create_test_shop(&mut persistence);

    let response = technician_orders(
        &mut persistence,
        &technician_session(shop.luis),
        TechnicianOrdering::Alphabetical,
    )
    .into_result()
    .unwrap();

    assert_eq!(response.technician_id, Some(shop.luis));
    assert_eq!(response.metrics.total, 1);
    assert_eq!(response.metrics.completed, 1);
}

#[test]
fn test_technician_orders_refuses_admin() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let outcome = technician_orders(
        &mut persistence,
        &admin_session(),
        TechnicianOrdering::Alphabetical,
    );

    assert_eq!(outcome.failure_kind(), Some(FailureKind::Unauthorized));
}

#[test]
fn test_order_metrics_for_person() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let shop = create_test_shop(&mut persistence);

    let response = order_metrics(
        &mut persistence,
        &admin_session(),
        &MetricsQuery {
            technician_id: Some(shop.marta),
        },
    )
    .into_result()
    .unwrap();

    assert_eq!(response.metrics.total, 2);
    assert_eq!(response.metrics.pending, 1);
    assert_eq!(response.metrics.completed, 0);
}

#[test]
fn test_warranty_stats_span_equivalence_class() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let shop = create_test_shop(&mut persistence);

    let response = warranty_stats(&mut persistence, &technician_session(shop.marta), shop.marta)
        .into_result()
        .unwrap();

    let stats = response.stats.unwrap();
    assert_eq!(stats.technician_ids, vec![shop.marta, shop.marta_again]);
    assert_eq!(stats.total, 2);
    assert_eq!(stats.warranty_applied, 1);
}

#[test]
fn test_warranty_stats_of_another_person_are_refused() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let shop = create_test_shop(&mut persistence);

    let outcome = warranty_stats(&mut persistence, &technician_session(shop.marta), shop.luis);

    assert_eq!(outcome.failure_kind(), Some(FailureKind::Unauthorized));
}

#[test]
fn test_store_failure_passes_message_through() {
    let mut store = FailingStore::new("database is locked");

    let outcome = order_metrics(&mut store, &admin_session(), &MetricsQuery::default());

    assert_eq!(
        outcome,
        Outcome::Failure {
            kind: FailureKind::Upstream,
            message: String::from("database is locked"),
        }
    );
}

#[test]
fn test_store_failure_during_authorization_is_upstream() {
    let mut store = FailingStore::new("directory offline");

    let outcome = warranty_stats(&mut store, &technician_session(1), 2);

    assert_eq!(outcome.failure_kind(), Some(FailureKind::Upstream));
}
