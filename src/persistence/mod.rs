//! Level records, the score book and chart files on disk
//!
//! Layout of the data directory:
//! - `<ticker>.json`: one [`LevelRecord`] per level
//! - `score.json`: the [`ScoreBook`]
//! - chart files referenced by `LevelRecord::chart_file`

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::FINISHED_LEVEL_SELL_MULTIPLIER;
use crate::error::StoreError;
use crate::score::ScoreBook;
use crate::sim::{ChartScale, SessionSnapshot, parse_chart_csv};
use crate::tuning::Difficulty;

/// File name of the score book inside the data directory
pub const SCORE_FILE: &str = "score.json";

/// A level as listed on the level-select screen
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelRecord {
    pub name: String,
    pub ticker: String,
    /// Chart file name, relative to the data directory
    pub chart_file: String,
    /// Position in the level list
    pub number: u32,
    /// Saved progress per difficulty
    pub progress: BTreeMap<Difficulty, SessionSnapshot>,
    /// X of the last chart point, 0 until the level was first generated
    pub max_x: f64,
    /// Highest chart point (negative Y)
    pub max_y: f64,
}

impl LevelRecord {
    pub fn new(name: &str, ticker: &str, chart_file: &str, number: u32) -> Self {
        Self {
            name: name.to_string(),
            ticker: ticker.to_string(),
            chart_file: chart_file.to_string(),
            number,
            ..Default::default()
        }
    }

    /// Snapshot to resume from (default when never played)
    pub fn snapshot(&self, difficulty: Difficulty) -> SessionSnapshot {
        self.progress.get(&difficulty).cloned().unwrap_or_default()
    }

    /// Store the progress of a session that just ended
    pub fn record(&mut self, difficulty: Difficulty, snapshot: SessionSnapshot) {
        self.progress.insert(difficulty, snapshot);
    }

    /// Completion in percent: 100 when finished, else the checkpoint's share of the chart
    pub fn progress_percent(&self, difficulty: Difficulty) -> u32 {
        let Some(snapshot) = self.progress.get(&difficulty) else {
            return 0;
        };
        if snapshot.finished {
            return 100;
        }
        match &snapshot.checkpoint {
            Some(cp) if self.max_x > 0.0 => {
                (cp.position.x * 100.0 / self.max_x).clamp(0.0, 100.0) as u32
            }
            _ => 0,
        }
    }

    fn file_name(&self) -> String {
        format!("{}.json", self.ticker)
    }
}

/// Cash out a level: pay its score into the wallet and reset its progress
///
/// Finished levels pay a multiple of their score. Returns the amount paid.
pub fn sell_level(record: &mut LevelRecord, book: &mut ScoreBook, difficulty: Difficulty) -> i64 {
    let snapshot = record.snapshot(difficulty);
    let payout = if snapshot.finished {
        snapshot.score * FINISHED_LEVEL_SELL_MULTIPLIER
    } else {
        snapshot.score
    };

    book.plus(difficulty, payout);
    record.progress.remove(&difficulty);
    log::info!(
        "Sold {} on {} for {payout}",
        record.ticker,
        difficulty.as_str()
    );
    payout
}

/// JSON files in one data directory
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// All level records, ordered by their list number
    pub fn load_levels(&self) -> Result<Vec<LevelRecord>, StoreError> {
        let mut levels = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_json = path.extension().is_some_and(|ext| ext == "json");
            let is_score = path.file_name().is_some_and(|name| name == SCORE_FILE);
            if !is_json || is_score {
                continue;
            }
            let text = fs::read_to_string(&path)?;
            levels.push(serde_json::from_str::<LevelRecord>(&text)?);
        }
        levels.sort_by_key(|l| l.number);
        log::info!("Loaded {} levels from {}", levels.len(), self.dir.display());
        Ok(levels)
    }

    /// Find one level by ticker
    pub fn load_level(&self, ticker: &str) -> Result<LevelRecord, StoreError> {
        self.load_levels()?
            .into_iter()
            .find(|l| l.ticker == ticker)
            .ok_or_else(|| StoreError::UnknownLevel(ticker.to_string()))
    }

    pub fn save_level(&self, record: &LevelRecord) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(record)?;
        fs::write(self.dir.join(record.file_name()), json)?;
        log::debug!("Saved level {}", record.ticker);
        Ok(())
    }

    /// Load the score book, creating an empty one on first run
    pub fn load_score_book(&self) -> Result<ScoreBook, StoreError> {
        let path = self.dir.join(SCORE_FILE);
        if !path.exists() {
            log::info!("No score book found, starting fresh");
            let book = ScoreBook::new();
            self.save_score_book(&book)?;
            return Ok(book);
        }
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save_score_book(&self, book: &ScoreBook) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(book)?;
        fs::write(self.dir.join(SCORE_FILE), json)?;
        Ok(())
    }

    /// Read and parse the chart of a level
    pub fn read_chart(&self, record: &LevelRecord, scale: ChartScale) -> Result<Vec<DVec2>, StoreError> {
        let text = fs::read_to_string(self.dir.join(&record.chart_file))?;
        Ok(parse_chart_csv(&text, scale)?)
    }
}
