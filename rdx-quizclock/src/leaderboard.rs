//! The ranked, capacity-bounded high score table.
//!
//! Entries are kept in descending score order. A new score is inserted below
//! every existing entry with an equal or higher score, so among equal scores
//! whoever got there first keeps the higher rank. The table is persisted as
//! a JSON array of `{ "name", "score" }` objects after every mutation.

use crate::common::Rank;
use crate::error::{QuizError, Result};
use crate::store::ScoreStore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// The maximum number of entries the leaderboard holds.
pub const MAX_ENTRIES: usize = 10;

/// The maximum length of a player name, in characters.
pub const MAX_NAME_CHARS: usize = 8;

/// A player name that is non-empty and at most `MAX_NAME_CHARS` characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn parse(raw: &str) -> Result<Self> {
        let name = raw.trim();
        let len = name.chars().count();
        if len == 0 || len > MAX_NAME_CHARS {
            return Err(QuizError::InvalidName {
                len,
                max: MAX_NAME_CHARS,
            });
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
}

/// Where a candidate score would land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Ranked(Rank),
    Unranked,
}

impl Placement {
    pub fn rank(self) -> Option<Rank> {
        match self {
            Placement::Ranked(rank) => Some(rank),
            Placement::Unranked => None,
        }
    }

    pub fn qualifies(self) -> bool {
        matches!(self, Placement::Ranked(_))
    }
}

pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
    store: Box<dyn ScoreStore>,
    key: String,
}

impl Leaderboard {
    /// Loads the leaderboard stored under `key`.
    ///
    /// Missing, unreadable, or malformed contents yield an empty leaderboard;
    /// this never fails. Entries whose name would not pass `PlayerName::parse`
    /// are dropped, and the rest are re-sorted and truncated so the ordering
    /// and capacity invariants hold even for hand-edited data.
    pub fn load(store: Box<dyn ScoreStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let entries = match store.read(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<LeaderboardEntry>>(&raw) {
                Ok(entries) => normalize(entries),
                Err(err) => {
                    warn!(%key, error = %err, "stored leaderboard is malformed; starting empty");
                    Vec::new()
                }
            },
            Ok(None) => {
                debug!(%key, "no stored leaderboard; starting empty");
                Vec::new()
            }
            Err(err) => {
                warn!(%key, error = %err, "stored leaderboard is unreadable; starting empty");
                Vec::new()
            }
        };
        info!(%key, entries = entries.len(), "leaderboard loaded");
        Self {
            entries,
            store,
            key,
        }
    }

    /// Computes the rank `score` would take, or `Unranked` if it falls outside capacity.
    ///
    /// The rank is the number of existing entries scoring at least `score`.
    pub fn find_placement(&self, score: u32) -> Placement {
        let rank = self
            .entries
            .iter()
            .rposition(|entry| entry.score >= score)
            .map_or(0, |i| i + 1);
        if rank >= MAX_ENTRIES {
            Placement::Unranked
        } else {
            Placement::Ranked(rank)
        }
    }

    /// Inserts a score at its rank, dropping whatever is pushed past capacity, and persists.
    ///
    /// An unranked score leaves the leaderboard and the store untouched.
    pub fn add_score(&mut self, name: &PlayerName, score: u32) -> Placement {
        let placement = self.find_placement(score);
        let Placement::Ranked(rank) = placement else {
            debug!(%name, score, "score does not qualify for the leaderboard");
            return placement;
        };
        self.entries.insert(
            rank,
            LeaderboardEntry {
                name: name.as_str().to_string(),
                score,
            },
        );
        self.entries.truncate(MAX_ENTRIES);
        info!(%name, score, rank, "score recorded");
        self.persist();
        placement
    }

    /// Removes every entry and persists the empty table.
    pub fn clear(&mut self) {
        self.entries.clear();
        info!("leaderboard cleared");
        self.persist();
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serializes the entries as the persisted JSON array.
    pub fn to_json(&self) -> String {
        // Serializing plain strings and integers into a String cannot fail.
        serde_json::to_string(&self.entries).unwrap_or_else(|_| "[]".to_string())
    }

    fn persist(&mut self) {
        let json = self.to_json();
        if let Err(err) = self.store.write(&self.key, &json) {
            warn!(key = %self.key, error = %err, "failed to persist leaderboard; keeping in-memory copy");
        }
    }
}

fn normalize(mut entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
    let stored = entries.len();
    entries.retain(|entry| PlayerName::parse(&entry.name).is_ok());
    if entries.len() < stored {
        warn!(dropped = stored - entries.len(), "stored entries with invalid names were dropped");
    }
    // Stable, so equal scores keep their stored order.
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(MAX_ENTRIES);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    const KEY: &str = "quiz-game-high-scores";

    fn board() -> (Leaderboard, MemoryStore) {
        let store = MemoryStore::new();
        (Leaderboard::load(Box::new(store.clone()), KEY), store)
    }

    fn name(raw: &str) -> PlayerName {
        PlayerName::parse(raw).unwrap()
    }

    fn is_sorted_desc(entries: &[LeaderboardEntry]) -> bool {
        entries.windows(2).all(|w| w[0].score >= w[1].score)
    }

    #[test]
    fn equal_scores_keep_arrival_order() {
        let (mut board, _) = board();
        assert_eq!(board.add_score(&name("A"), 50), Placement::Ranked(0));
        assert_eq!(board.add_score(&name("B"), 50), Placement::Ranked(1));
        let names: Vec<&str> = board.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn full_board_rejects_a_lower_score() {
        let (mut board, store) = board();
        for i in 0..10 {
            board.add_score(&name(&format!("P{}", i)), 10 + i);
        }
        let before = board.entries().to_vec();
        let persisted = store.get_raw(KEY);

        assert_eq!(board.add_score(&name("X"), 5), Placement::Unranked);
        assert_eq!(board.entries(), before.as_slice());
        assert_eq!(store.get_raw(KEY), persisted);
    }

    #[test]
    fn full_board_rejects_a_tie_with_the_last_entry() {
        let (mut board, _) = board();
        for i in 0..10 {
            board.add_score(&name(&format!("P{}", i)), 10);
        }
        assert_eq!(board.find_placement(10), Placement::Unranked);
        assert_eq!(board.find_placement(11), Placement::Ranked(0));
    }

    #[test]
    fn insertion_displaces_the_lowest_entry() {
        let (mut board, _) = board();
        for i in 0..10 {
            board.add_score(&name(&format!("P{}", i)), 100 - i * 10);
        }
        assert_eq!(board.add_score(&name("New"), 55), Placement::Ranked(5));
        assert_eq!(board.len(), MAX_ENTRIES);
        assert_eq!(board.entries()[5].name, "New");
        assert_eq!(board.entries().last().unwrap().score, 20);
    }

    #[test]
    fn arbitrary_sequences_stay_sorted_and_bounded() {
        let (mut board, _) = board();
        let mut seed: u32 = 7;
        for i in 0..200 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let score = (seed >> 16) % 40;
            board.add_score(&name(&format!("n{}", i % 1000)), score);
            assert!(board.len() <= MAX_ENTRIES);
            assert!(is_sorted_desc(board.entries()));
        }
    }

    #[test]
    fn persisted_board_round_trips() {
        let (mut board, store) = board();
        board.add_score(&name("Al"), 9);
        board.add_score(&name("Bo"), 3);
        assert_eq!(
            store.get_raw(KEY).unwrap(),
            r#"[{"name":"Al","score":9},{"name":"Bo","score":3}]"#
        );

        let reloaded = Leaderboard::load(Box::new(store), KEY);
        assert_eq!(reloaded.entries(), board.entries());
    }

    #[test]
    fn malformed_storage_loads_empty() {
        let store = MemoryStore::new();
        store.insert_raw(KEY, "{not json");
        assert!(Leaderboard::load(Box::new(store.clone()), KEY).is_empty());

        store.insert_raw(KEY, "null");
        assert!(Leaderboard::load(Box::new(store), KEY).is_empty());
    }

    #[test]
    fn unsorted_storage_is_normalized() {
        let store = MemoryStore::new();
        store.insert_raw(
            KEY,
            r#"[{"name":"Lo","score":1},{"name":"Hi","score":9},{"name":"Mid","score":5}]"#,
        );
        let board = Leaderboard::load(Box::new(store), KEY);
        let scores: Vec<u32> = board.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![9, 5, 1]);
    }

    #[test]
    fn stored_entries_with_invalid_names_are_dropped() {
        let store = MemoryStore::new();
        store.insert_raw(
            KEY,
            r#"[{"name":"","score":9},{"name":"Al","score":7},{"name":"waytoolongname","score":5},{"name":"   ","score":4}]"#,
        );
        let board = Leaderboard::load(Box::new(store), KEY);
        let names: Vec<&str> = board.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Al"]);
    }

    #[test]
    fn clear_persists_an_empty_table() {
        let (mut board, store) = board();
        board.add_score(&name("Al"), 9);
        board.clear();
        assert!(board.is_empty());
        assert_eq!(store.get_raw(KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn names_are_validated() {
        assert!(PlayerName::parse("").is_err());
        assert!(PlayerName::parse("   ").is_err());
        assert!(PlayerName::parse("ninechars").is_err());
        assert_eq!(PlayerName::parse(" Zo ").unwrap().as_str(), "Zo");
        assert!(PlayerName::parse("eightchr").is_ok());
        assert!(PlayerName::parse("ÅÄÖÜåäöü").is_ok());
    }
}
