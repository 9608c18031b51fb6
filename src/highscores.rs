//! Best-score tables
//!
//! One table per game variant, persisted to LocalStorage as JSON. Keeps the
//! top `MAX_BEST_SCORES` scores, highest first.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_BEST_SCORES;
use crate::games::Variant;
use crate::platform;

/// Top scores for one variant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestScores {
    /// Sorted descending, at most `MAX_BEST_SCORES` long
    pub scores: Vec<u64>,
}

impl BestScores {
    pub fn new() -> Self {
        Self { scores: Vec::new() }
    }

    fn storage_key(variant: Variant) -> String {
        format!("mini_arcade_best_{}", variant.slug())
    }

    /// Insert a score; returns its rank (1-indexed) if it made the table.
    /// A score of 0 never does; a tie ranks below the existing score.
    pub fn record(&mut self, score: u64) -> Option<usize> {
        if score == 0 {
            return None;
        }
        let pos = self
            .scores
            .iter()
            .position(|&s| score > s)
            .unwrap_or(self.scores.len());
        if pos >= MAX_BEST_SCORES {
            return None;
        }
        self.scores.insert(pos, score);
        self.scores.truncate(MAX_BEST_SCORES);
        Some(pos + 1)
    }

    /// Would this score make the table?
    pub fn qualifies(&self, score: u64) -> bool {
        score > 0
            && (self.scores.len() < MAX_BEST_SCORES
                || self.scores.last().is_some_and(|&s| score > s))
    }

    pub fn best(&self) -> Option<u64> {
        self.scores.first().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn clear(&mut self) {
        self.scores.clear();
    }

    /// Parse a stored table. Malformed data yields an empty table; the result
    /// is re-sorted and truncated in case the stored list was edited by hand.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<BestScores>(json) {
            Ok(mut table) => {
                table.scores.sort_unstable_by(|a, b| b.cmp(a));
                table.scores.truncate(MAX_BEST_SCORES);
                table
            }
            Err(e) => {
                log::warn!("Discarding malformed best scores: {}", e);
                Self::new()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Load the table for a variant (empty if nothing is stored)
    pub fn load(variant: Variant) -> Self {
        match platform::read(&Self::storage_key(variant)) {
            Some(json) => {
                let table = Self::from_json(&json);
                log::info!(
                    "Loaded {} best scores for {}",
                    table.scores.len(),
                    variant.name()
                );
                table
            }
            None => Self::new(),
        }
    }

    pub fn save(&self, variant: Variant) {
        platform::write(&Self::storage_key(variant), &self.to_json());
        log::info!("Best scores saved for {}", variant.name());
    }

    /// Clear and drop the stored table
    pub fn reset(&mut self, variant: Variant) {
        self.clear();
        platform::remove(&Self::storage_key(variant));
    }
}
