//! Per-difficulty score wallet
//!
//! Each difficulty keeps its own balance. Level scores are paid into the
//! wallet when a level is sold; jumps are paid from the level score, not
//! from here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tuning::Difficulty;

/// Score balances keyed by difficulty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScoreBook {
    /// Difficulty the player has selected
    pub current: Difficulty,
    pub scores: BTreeMap<Difficulty, i64>,
}

impl ScoreBook {
    /// Create an empty wallet on Easy
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance for a difficulty (0 if never touched)
    pub fn get(&self, difficulty: Difficulty) -> i64 {
        self.scores.get(&difficulty).copied().unwrap_or(0)
    }

    pub fn set(&mut self, difficulty: Difficulty, score: i64) {
        self.scores.insert(difficulty, score);
    }

    /// Balance for the selected difficulty
    pub fn current_score(&self) -> i64 {
        self.get(self.current)
    }

    pub fn plus(&mut self, difficulty: Difficulty, amount: i64) {
        let score = self.get(difficulty) + amount;
        self.set(difficulty, score);
    }

    /// Subtract, never going below zero
    pub fn minus(&mut self, difficulty: Difficulty, amount: i64) {
        let score = (self.get(difficulty) - amount).max(0);
        self.set(difficulty, score);
    }

    /// Select the next difficulty and return it
    pub fn cycle_difficulty(&mut self) -> Difficulty {
        self.current = self.current.next();
        log::info!("Difficulty set to {}", self.current.as_str());
        self.current
    }

    /// Check if any difficulty holds a balance
    pub fn is_empty(&self) -> bool {
        self.scores.values().all(|&s| s == 0)
    }
}
