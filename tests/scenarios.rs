//! The concrete end-to-end scenarios (spec §8): one fixture each, run
//! through the full pipeline, and checked against the documented outcome.

mod common;

use archlens::criteria::{ClassificationOutcome, ClassificationTarget};
use archlens::model::{FixtureModel, TypeForm};
use archlens::style::{PackageOrganizationStyle, StyleConfidence};
use common::{config, TB};

fn classified<'a>(
    classifications: &'a std::collections::BTreeMap<String, ClassificationOutcome>,
    qualified_name: &str,
) -> &'a archlens::criteria::Classification {
    match classifications.get(qualified_name) {
        Some(ClassificationOutcome::Classified(c)) => c,
        other => panic!("expected {qualified_name} to be Classified, got {other:?}"),
    }
}

#[test]
fn scenario_explicit_aggregate_root() {
    let provider = FixtureModel::new("com.example.orders")
        .with_type(
            TB::new("com.example.orders.Orders", TypeForm::Interface)
                .annotated("org.jmolecules.ddd.annotation.Repository")
                .method("save", &[("order", "com.example.orders.Order")], "com.example.orders.Order")
                .build(),
        )
        .with_type(
            TB::new("com.example.orders.Order", TypeForm::Class)
                .annotated("org.jmolecules.ddd.annotation.AggregateRoot")
                .field("id", "com.example.orders.OrderId", true)
                .build(),
        )
        .with_type(
            TB::new("com.example.orders.OrderId", TypeForm::Record)
                .annotated("org.jmolecules.ddd.annotation.Identity")
                .field("value", "java.util.UUID", true)
                .build(),
        );

    let result = archlens::analyze(&config("com.example.orders"), &provider).expect("analysis succeeds");

    let order = classified(&result.classifications, "com.example.orders.Order");
    assert_eq!(order.kind_name, "AGGREGATE_ROOT");
    assert_eq!(order.priority, 100);
    assert!(order.conflicts.is_empty());

    let order_id = classified(&result.classifications, "com.example.orders.OrderId");
    assert_eq!(order_id.kind_name, "IDENTIFIER");
    assert_eq!(order_id.priority, 100);
    assert!(order_id.conflicts.is_empty());

    let orders = classified(&result.classifications, "com.example.orders.Orders");
    assert_eq!(orders.target, ClassificationTarget::Port);
    assert_eq!(orders.kind_name, "REPOSITORY");
    assert!(orders.priority >= 85);
    assert!(orders.conflicts.is_empty());
}

#[test]
fn scenario_record_single_id_inference() {
    let provider = FixtureModel::new("com.example.customers").with_type(
        TB::new("com.example.customers.CustomerId", TypeForm::Record)
            .field("value", "java.util.UUID", true)
            .build(),
    );

    let result = archlens::analyze(&config("com.example.customers"), &provider).expect("analysis succeeds");

    let customer_id = classified(&result.classifications, "com.example.customers.CustomerId");
    assert_eq!(customer_id.kind_name, "IDENTIFIER");
    assert_eq!(customer_id.priority, 80);
    assert_eq!(customer_id.confidence, archlens::criteria::Confidence::High);
    assert_eq!(customer_id.criterion_name, "record-single-id");
    assert!(customer_id.conflicts.is_empty());
}

#[test]
fn scenario_tie_break_on_priorities() {
    let provider = FixtureModel::new("com.example.misc").with_type(
        TB::new("com.example.misc.Thing", TypeForm::Class)
            .annotated("org.jmolecules.ddd.annotation.Entity")
            .annotated("org.jmolecules.ddd.annotation.ValueObject")
            .build(),
    );

    let result = archlens::analyze(&config("com.example.misc"), &provider).expect("analysis succeeds");

    match result.classifications.get("com.example.misc.Thing") {
        Some(ClassificationOutcome::Conflict { target, conflicts }) => {
            assert_eq!(*target, ClassificationTarget::Domain);
            assert_eq!(conflicts.len(), 2);
            assert_eq!(conflicts[0].criterion_name, "explicit-entity");
            assert_eq!(conflicts[1].criterion_name, "explicit-value-object");
            assert!(conflicts
                .iter()
                .all(|c| c.severity == archlens::criteria::ConflictSeverity::Error));
        }
        other => panic!("expected CONFLICT, got {other:?}"),
    }
}

#[test]
fn scenario_application_service_vs_saga() {
    let provider = FixtureModel::new("com.example.svc")
        .with_type(
            TB::new("com.example.svc.OrderRepository", TypeForm::Interface)
                .annotated("org.jmolecules.ddd.annotation.Repository")
                .method("findById", &[("id", "java.lang.String")], "boolean")
                .build(),
        )
        .with_type(
            TB::new("com.example.svc.PaymentRepository", TypeForm::Interface)
                .annotated("org.jmolecules.ddd.annotation.Repository")
                .method("findById", &[("id", "java.lang.String")], "boolean")
                .build(),
        )
        .with_type(
            TB::new("com.example.svc.OrderRepositoryAdapter", TypeForm::Class)
                .implementing("com.example.svc.OrderRepository")
                .build(),
        )
        .with_type(
            TB::new("com.example.svc.PaymentRepositoryAdapter", TypeForm::Class)
                .implementing("com.example.svc.PaymentRepository")
                .build(),
        )
        .with_type(
            TB::new("com.example.svc.SagaCoordinator", TypeForm::Class)
                .constructor(&[
                    ("orders", "com.example.svc.OrderRepository"),
                    ("payments", "com.example.svc.PaymentRepository"),
                ])
                .field("retryCount", "int", false)
                .build(),
        )
        .with_type(
            TB::new("com.example.svc.OutboundOnlyService", TypeForm::Class)
                .constructor(&[
                    ("orders", "com.example.svc.OrderRepository"),
                    ("payments", "com.example.svc.PaymentRepository"),
                ])
                .build(),
        );

    let result = archlens::analyze(&config("com.example.svc"), &provider).expect("analysis succeeds");

    let saga = classified(&result.classifications, "com.example.svc.SagaCoordinator");
    assert_eq!(saga.kind_name, "SAGA");
    assert_eq!(saga.priority, 72);
    assert!(saga.conflicts.is_empty());

    let outbound = classified(&result.classifications, "com.example.svc.OutboundOnlyService");
    assert_eq!(outbound.kind_name, "OUTBOUND_ONLY");
    assert_eq!(outbound.priority, 68);
    assert!(outbound.conflicts.is_empty());
}

#[test]
fn scenario_value_object_immutability_violation() {
    let provider = FixtureModel::new("com.example.money").with_type(
        TB::new("com.example.money.Money", TypeForm::Class)
            .annotated("org.jmolecules.ddd.annotation.ValueObject")
            .field("amount", "java.math.BigDecimal", true)
            .method("setAmount", &[("amount", "java.math.BigDecimal")], "void")
            .build(),
    );

    let result = archlens::analyze(&config("com.example.money"), &provider).expect("analysis succeeds");

    let money = classified(&result.classifications, "com.example.money.Money");
    assert_eq!(money.kind_name, "VALUE_OBJECT");

    let violation = result
        .audit
        .violations
        .iter()
        .find(|v| v.rule_id == "ddd:value-object-immutable")
        .expect("value-object-immutable violation present");
    assert_eq!(violation.severity, archlens::config::Severity::Critical);
    assert_eq!(result.audit.status(), archlens::audit::AuditStatus::Failed);
    assert_eq!(result.audit.status_str(), "FAILED");
    assert_eq!(archlens::exit_code(&result), 1);
}

#[test]
fn scenario_package_style_detection() {
    let mut provider = FixtureModel::new("com.example.app");
    for i in 0..10 {
        provider = provider.with_type(
            TB::new(&format!("com.example.app.ports.in.InPort{i}"), TypeForm::Interface).build(),
        );
    }
    for i in 0..8 {
        provider = provider.with_type(
            TB::new(&format!("com.example.app.ports.out.OutPort{i}"), TypeForm::Interface).build(),
        );
    }
    for i in 0..2 {
        provider = provider.with_type(
            TB::new(&format!("com.example.app.adapter.Adapter{i}"), TypeForm::Class).build(),
        );
    }

    let result = archlens::analyze(&config("com.example.app"), &provider).expect("analysis succeeds");

    assert_eq!(result.graph.metadata().style, PackageOrganizationStyle::Hexagonal);
    assert_eq!(result.graph.metadata().style_confidence, StyleConfidence::Explicit);
}
