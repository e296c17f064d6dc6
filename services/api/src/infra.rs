use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use estate_hub::error::ServiceError;
use estate_hub::identity::{Actor, UserId};
use estate_hub::marketplace::Marketplace;
use estate_hub::workflows::listings::{DealType, NewProperty, Property};
use estate_hub::workflows::notifications::{LiveChannel, LiveChannelError, LiveEvent};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use tokio::sync::broadcast;
use tracing::{debug, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// A live event tagged with the user whose private channel it belongs to.
#[derive(Debug, Clone)]
pub(crate) struct AddressedEvent {
    pub(crate) recipient: UserId,
    pub(crate) event: LiveEvent,
}

/// In-process fan-out of live events to whichever transport subscribes.
#[derive(Clone)]
pub(crate) struct BroadcastLiveChannel {
    sender: broadcast::Sender<AddressedEvent>,
}

impl BroadcastLiveChannel {
    pub(crate) fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<AddressedEvent> {
        self.sender.subscribe()
    }
}

impl LiveChannel for BroadcastLiveChannel {
    fn publish(&self, recipient: &UserId, event: LiveEvent) -> Result<(), LiveChannelError> {
        let addressed = AddressedEvent {
            recipient: recipient.clone(),
            event,
        };
        // No subscribers just means nobody is connected right now.
        if self.sender.send(addressed).is_err() {
            debug!(%recipient, "live event had no subscribers");
        }
        Ok(())
    }
}

/// Log every live event until the channel closes.
pub(crate) fn spawn_live_relay(channel: &BroadcastLiveChannel) -> tokio::task::JoinHandle<()> {
    let mut receiver = channel.subscribe();
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(addressed) => debug!(
                    recipient = %addressed.recipient,
                    event = addressed.event.name(),
                    "live event relayed"
                ),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "live relay lagged behind");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

pub(crate) const DEMO_OWNER: &str = "demo-owner";

/// Publish a small catalog under [`DEMO_OWNER`].
pub(crate) fn seed_demo_catalog(market: &Marketplace) -> Result<Vec<Property>, ServiceError> {
    let owner = Actor::owner(DEMO_OWNER);
    let listings = [
        (
            "Garden flat near the park",
            900.0,
            Some(68.0),
            Some(2),
            json!([{ "name": "petsAllowed", "value": true, "importance": "high" }]),
        ),
        (
            "Harbour penthouse",
            2400.0,
            Some(120.0),
            Some(3),
            json!([
                { "name": "familyStatus", "value": "couple", "importance": "high" },
                { "name": "hasParking", "value": true, "importance": "low" },
            ]),
        ),
        (
            "Furnished studio",
            550.0,
            Some(32.0),
            Some(1),
            json!({ "furnished": "yes", "smokingAllowed": false }),
        ),
    ];

    let mut published = Vec::with_capacity(listings.len());
    for (title, price, area_sqm, bedrooms, requirements) in listings {
        let requirements = serde_json::from_value(requirements).map_err(|err| {
            ServiceError::bad_request(format!("invalid demo requirements: {err}"))
        })?;
        published.push(market.listings.create(
            &owner,
            NewProperty {
                title: title.to_string(),
                price,
                deal_type: DealType::Rent,
                area_sqm,
                bedrooms,
                bathrooms: Some(1),
                location: Some("Old Town".to_string()),
                requirements,
            },
        )?);
    }
    Ok(published)
}
