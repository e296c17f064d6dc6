use super::common::*;
use crate::error::ServiceError;
use crate::identity::Actor;
use crate::workflows::fixtures::Harness;
use crate::workflows::notifications::NotificationId;

#[test]
fn list_is_newest_first_and_scoped_to_recipient() {
    let harness = Harness::new();
    let first = notify(&harness, &recipient(), "prop-1");
    let second = notify(&harness, &recipient(), "prop-2");
    notify(&harness, &Actor::client("client-b"), "prop-3");

    let listed = harness
        .market
        .notifications
        .list(&recipient())
        .expect("listing works");
    let ids: Vec<_> = listed.into_iter().map(|notification| notification.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[test]
fn mark_read_is_limited_to_the_recipient() {
    let harness = Harness::new();
    let notification = notify(&harness, &recipient(), "prop-1");
    let service = &harness.market.notifications;

    let err = service
        .mark_read(&Actor::client("client-b"), &notification.id)
        .expect_err("not the recipient");
    assert!(matches!(err, ServiceError::Forbidden(_)));

    let err = service
        .mark_read(&recipient(), &NotificationId("ntf-missing".into()))
        .expect_err("unknown id");
    assert!(matches!(err, ServiceError::NotFound(_)));

    let updated = service
        .mark_read(&recipient(), &notification.id)
        .expect("marked read");
    assert!(updated.read);
    assert!(harness.notifications_for("client-a")[0].read);
}

#[test]
fn mark_all_read_counts_only_unread() {
    let harness = Harness::new();
    let first = notify(&harness, &recipient(), "prop-1");
    notify(&harness, &recipient(), "prop-2");
    notify(&harness, &recipient(), "prop-3");
    let service = &harness.market.notifications;

    service
        .mark_read(&recipient(), &first.id)
        .expect("marked read");
    assert_eq!(service.mark_all_read(&recipient()).expect("bulk update"), 2);
    assert_eq!(service.mark_all_read(&recipient()).expect("bulk update"), 0);
}

#[test]
fn delete_removes_only_own_notifications() {
    let harness = Harness::new();
    let notification = notify(&harness, &recipient(), "prop-1");
    let service = &harness.market.notifications;

    let err = service
        .delete(&Actor::client("client-b"), &notification.id)
        .expect_err("not the recipient");
    assert!(matches!(err, ServiceError::Forbidden(_)));

    service
        .delete(&recipient(), &notification.id)
        .expect("deleted");
    assert!(harness.notifications_for("client-a").is_empty());
}
