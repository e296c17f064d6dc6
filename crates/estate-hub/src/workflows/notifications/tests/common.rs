use crate::identity::{Actor, UserId};
use crate::workflows::fixtures::Harness;
use crate::workflows::notifications::{Notification, NotificationKind};

pub(super) fn recipient() -> Actor {
    Actor::client("client-a")
}

pub(super) fn notify(harness: &Harness, recipient: &Actor, reference: &str) -> Notification {
    harness
        .market
        .dispatcher
        .notify(
            &recipient.id,
            Some(&UserId::new("owner-1")),
            NotificationKind::Interest,
            reference,
            Some(format!("Update on {reference}")),
        )
        .expect("notification stored")
}
