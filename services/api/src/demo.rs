use crate::infra::{seed_demo_catalog, DEMO_OWNER};
use clap::Args;
use estate_hub::error::{AppError, ServiceError};
use estate_hub::identity::Actor;
use estate_hub::marketplace::Marketplace;
use estate_hub::workflows::appointments::ProposeRequest;
use estate_hub::workflows::listings::Property;
use estate_hub::workflows::matching::{ClientPreferences, Matchable, PriceRange};
use estate_hub::workflows::memory::{InMemoryStore, RecordingLiveChannel};
use estate_hub::workflows::notifications::LiveEvent;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Viewing slot both demo clients are offered (RFC 3339 or YYYY-MM-DDTHH:MM)
    #[arg(long, default_value = "2026-06-01T10:00:00Z")]
    pub(crate) slot: String,
    /// Print every live event pushed during the walk-through
    #[arg(long)]
    pub(crate) show_events: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { slot, show_events } = args;

    let store = InMemoryStore::new();
    let live = RecordingLiveChannel::new();
    let market = Marketplace::in_memory(&store, Arc::new(live.clone()));
    let owner = Actor::owner(DEMO_OWNER);

    println!("Estate hub demo");
    let catalog = seed_demo_catalog(&market)?;
    println!("\nCatalog ({} listings)", catalog.len());
    for property in &catalog {
        println!("  {} | {} | {:.0}/month", property.id, property.title, property.price);
    }

    let pet_owner = Actor::client("client-pets");
    let couple = Actor::client("client-couple");
    market.listings.save_preferences(
        &pet_owner,
        ClientPreferences::new()
            .with("pets", true)
            .with("maxPrice", 1000)
            .with("furnished", "yes"),
    )?;
    market.listings.save_preferences(
        &couple,
        ClientPreferences::new()
            .with("familyStatus", "couple")
            .with("hasParking", true)
            .with("maxPrice", 3000),
    )?;

    for client in [&pet_owner, &couple] {
        render_verdicts(&market, client, &catalog)?;
    }

    let Some(garden) = catalog.first() else {
        return Ok(());
    };

    println!("\nScheduling viewings of \"{}\" at {}", garden.title, slot);
    let first = market.appointments.propose(
        &owner,
        ProposeRequest {
            property_id: garden.id.clone(),
            tenant_id: pet_owner.id.clone(),
            available_slots: vec![slot.clone(), slot.clone()],
        },
    )?;
    let second = market.appointments.propose(
        &owner,
        ProposeRequest {
            property_id: garden.id.clone(),
            tenant_id: couple.id.clone(),
            available_slots: vec![slot.clone()],
        },
    )?;
    println!(
        "  proposed {} to {} and {} to {}",
        first.id, first.tenant, second.id, second.tenant
    );

    let confirmed = market.appointments.confirm(&pet_owner, &first.id, &slot)?;
    println!(
        "  {} confirmed by {} ({})",
        confirmed.id,
        confirmed.tenant,
        confirmed.status.label()
    );
    match market.appointments.confirm(&couple, &second.id, &slot) {
        Ok(_) => println!("  unexpected: {} double-booked the slot", second.id),
        Err(err) => println!("  {} rejected: {}", second.id, err.public_message()),
    }

    market.listings.add_favorite(&couple, &garden.id)?;
    println!("\nRemoving \"{}\"", garden.title);
    let summary = market.listings.delete(&owner, &garden.id)?;
    println!(
        "  favorites removed: {}, appointments cancelled: {}",
        summary.removed_favorites, summary.cancelled_appointments
    );
    let notified: Vec<&str> = summary
        .notified_users
        .iter()
        .map(|user| user.as_str())
        .collect();
    println!("  notified: {}", notified.join(", "));

    println!("\nNotifications");
    for actor in [&owner, &pet_owner, &couple] {
        let notifications = market.notifications.list(actor)?;
        println!("  {} ({})", actor.id, notifications.len());
        for notification in notifications {
            println!(
                "    [{}] {}",
                notification.kind.label(),
                notification.message.as_deref().unwrap_or("-")
            );
        }
    }

    if show_events {
        println!("\nLive events");
        for (recipient, event) in live.events() {
            let detail = match &event {
                LiveEvent::Notification(notification) => notification.id.to_string(),
                LiveEvent::NewMessage(message) => message.content.clone(),
            };
            println!("  -> {} {} {}", recipient, event.name(), detail);
        }
    } else {
        println!("\n{} live events published", live.events().len());
    }

    Ok(())
}

fn render_verdicts(
    market: &Marketplace,
    client: &Actor,
    catalog: &[Property],
) -> Result<(), ServiceError> {
    let visible = market.listings.list(Some(client), &PriceRange::default())?;
    println!("\nMatches for {} ({} visible)", client.id, visible.len());
    for property in catalog {
        let verdict = market.listings.match_report(client, &property.id)?;
        let marker = if verdict.visible { "shown " } else { "hidden" };
        println!(
            "  {} {} score={:.2} soft={}/{} hard_fails={:?}",
            marker,
            property.listing_id(),
            verdict.score,
            verdict.soft_matched,
            verdict.soft_total,
            verdict.hard_fails
        );
    }
    Ok(())
}
