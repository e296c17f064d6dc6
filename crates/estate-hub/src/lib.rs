//! Core of the estate hub marketplace: tenant/property matching, appointment negotiation, and the
//! notification side effects both produce.

pub mod config;
pub mod error;
pub mod identity;
pub mod marketplace;
pub mod telemetry;
pub mod workflows;
