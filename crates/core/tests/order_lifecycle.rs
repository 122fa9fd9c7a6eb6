//! Order lifecycle scenarios

use bazaar::orders::{
    NoteKind, OrderLifecycle, OrderStatus, PaymentStatus, StatusMachine, StatusPatch,
    TrackingInfo, TransitionError, TransitionPolicy,
};
use jiff::{SignedDuration, Timestamp};
use testresult::TestResult;

fn at(minutes: i64) -> Timestamp {
    Timestamp::UNIX_EPOCH + SignedDuration::from_mins(minutes)
}

#[test]
fn pending_to_shipped_is_flagged_once() -> TestResult {
    let machine = StatusMachine::default();
    let mut lifecycle = OrderLifecycle::default();
    let patch = StatusPatch {
        status: Some(OrderStatus::Shipped),
        ..StatusPatch::default()
    };

    let first = machine.apply(&mut lifecycle, patch.clone(), "admin", at(0))?;
    let second = machine.apply(&mut lifecycle, patch, "admin", at(1))?;

    assert!(first.change.order_status_changed);
    assert_eq!(first.change.previous_order_status, OrderStatus::Pending);
    assert!(!second.change.order_status_changed);
    assert_eq!(second.change.previous_order_status, OrderStatus::Shipped);

    Ok(())
}

#[test]
fn strict_and_permissive_disagree_on_reopening() -> TestResult {
    let delivered = OrderLifecycle {
        status: OrderStatus::Delivered,
        ..OrderLifecycle::default()
    };
    let reopen = StatusPatch {
        status: Some(OrderStatus::Pending),
        ..StatusPatch::default()
    };

    let mut strict = delivered.clone();
    let strict_result = StatusMachine::new(TransitionPolicy::Strict).apply(
        &mut strict,
        reopen.clone(),
        "admin",
        at(0),
    );

    let mut permissive = delivered;
    let applied = StatusMachine::new(TransitionPolicy::Permissive).apply(
        &mut permissive,
        reopen,
        "admin",
        at(0),
    )?;

    assert_eq!(
        strict_result.err(),
        Some(TransitionError::InvalidTransition {
            from: OrderStatus::Delivered,
            to: OrderStatus::Pending,
        })
    );
    assert_eq!(strict.status, OrderStatus::Delivered);
    assert!(applied.change.unlisted_transition);
    assert_eq!(permissive.status, OrderStatus::Pending);

    Ok(())
}

#[test]
fn full_patch_reports_every_change() -> TestResult {
    let machine = StatusMachine::new(TransitionPolicy::Strict);
    let mut lifecycle = OrderLifecycle {
        status: OrderStatus::Processing,
        ..OrderLifecycle::default()
    };

    let applied = machine.apply(
        &mut lifecycle,
        StatusPatch {
            status: Some(OrderStatus::Shipped),
            payment_status: Some(PaymentStatus::Completed),
            tracking: Some(TrackingInfo {
                carrier: Some("Royal Mail".to_string()),
                tracking_number: Some("RM123".to_string()),
                ..TrackingInfo::default()
            }),
            admin_note: Some("Dispatched from warehouse 2".to_string()),
        },
        "ops@example.com",
        at(5),
    )?;

    let change = applied.change;

    assert!(change.order_status_changed);
    assert!(change.payment_status_changed);
    assert!(change.tracking_info_added);
    assert!(change.admin_note_added);
    assert!(!change.unlisted_transition);
    assert_eq!(change.previous_payment_status, PaymentStatus::Pending);
    assert_eq!(change.notification_kinds().len(), 3);
    assert_eq!(
        applied.admin_note.map(|note| note.created_by),
        Some("ops@example.com".to_string())
    );

    Ok(())
}

#[test]
fn customer_notes_land_in_their_own_list_and_sort_newest_first() -> TestResult {
    let mut lifecycle = OrderLifecycle::default();

    lifecycle
        .notes
        .append(NoteKind::Customer, "Please gift wrap", "jo@example.com", at(1))?;
    lifecycle
        .notes
        .append(NoteKind::Admin, "Gift wrap added", "admin", at(2))?;

    let timeline = lifecycle.notes.timeline();
    let kinds: Vec<_> = timeline.iter().map(|tagged| tagged.kind).collect();

    assert_eq!(lifecycle.notes.customer().len(), 1);
    assert_eq!(lifecycle.notes.admin().len(), 1);
    assert_eq!(kinds, vec![NoteKind::Admin, NoteKind::Customer]);

    Ok(())
}
