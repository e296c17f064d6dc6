pub mod appointments;
pub mod listings;
pub mod matching;
pub mod memory;
pub mod notifications;

#[cfg(test)]
pub(crate) mod fixtures;
