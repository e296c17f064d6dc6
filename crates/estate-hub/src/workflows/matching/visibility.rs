use serde::Deserialize;
use tracing::debug;

use super::domain::{ClientPreferences, Matchable};
use super::scorer::MatchScorer;

/// Who is looking at the catalog.
#[derive(Debug, Clone, Copy)]
pub enum Audience<'a> {
    /// An authenticated client; the catalog is narrowed by matching.
    Client(&'a ClientPreferences),
    /// Anonymous visitors, owners, and admins see the whole catalog.
    Public,
}

/// Optional price bounds applied to non-client catalog requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
}

impl PriceRange {
    pub fn contains(&self, price: Option<f64>) -> bool {
        let Some(price) = price else {
            return true;
        };
        self.min_price.map_or(true, |min| price >= min)
            && self.max_price.map_or(true, |max| price <= max)
    }
}

/// Decides which listings a requester gets to see.
#[derive(Debug, Clone, Default)]
pub struct VisibilityFilter {
    scorer: MatchScorer,
}

impl VisibilityFilter {
    pub fn new(scorer: MatchScorer) -> Self {
        Self { scorer }
    }

    pub fn scorer(&self) -> &MatchScorer {
        &self.scorer
    }

    /// Keep the listings the scorer marks visible, preserving input order.
    pub fn filter_for_client<T: Matchable>(
        &self,
        preferences: &ClientPreferences,
        candidates: Vec<T>,
    ) -> Vec<T> {
        candidates
            .into_iter()
            .filter(|candidate| {
                let verdict = self.scorer.score(
                    preferences,
                    candidate.requirements(),
                    &candidate.attributes(),
                );
                if !verdict.visible {
                    debug!(
                        listing = candidate.listing_id(),
                        score = verdict.score,
                        hard_fails = ?verdict.hard_fails,
                        "listing hidden from client"
                    );
                }
                verdict.visible
            })
            .collect()
    }

    pub fn visible_catalog<T: Matchable>(
        &self,
        audience: Audience<'_>,
        candidates: Vec<T>,
        range: &PriceRange,
    ) -> Vec<T> {
        match audience {
            Audience::Client(preferences) => self.filter_for_client(preferences, candidates),
            Audience::Public => candidates
                .into_iter()
                .filter(|candidate| range.contains(candidate.attributes().price))
                .collect(),
        }
    }
}
