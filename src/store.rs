//! In-memory tournament store keyed by id, with eviction of inactive entries.

use crate::models::{Tournament, TournamentId};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Per-tournament entry: tournament data + last activity time (for auto-cleanup).
#[derive(Debug)]
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

/// Owns every live tournament. Callers wrap it in one lock so that mutations of the
/// same tournament are applied one at a time.
#[derive(Debug, Default)]
pub struct TournamentStore {
    entries: HashMap<TournamentId, TournamentEntry>,
}

impl TournamentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Store a tournament and return its id.
    pub fn insert(&mut self, tournament: Tournament) -> TournamentId {
        let id = tournament.id;
        self.entries.insert(
            id,
            TournamentEntry {
                tournament,
                last_activity: Instant::now(),
            },
        );
        id
    }

    /// Mutable access; touching a tournament refreshes its activity time.
    pub fn get_mut(&mut self, id: TournamentId) -> Option<&mut Tournament> {
        self.entries.get_mut(&id).map(|entry| {
            entry.last_activity = Instant::now();
            &mut entry.tournament
        })
    }

    pub fn remove(&mut self, id: TournamentId) -> Option<Tournament> {
        self.entries.remove(&id).map(|entry| entry.tournament)
    }

    /// Drop tournaments idle for at least `timeout`; returns how many were removed.
    pub fn remove_inactive(&mut self, timeout: Duration) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.last_activity.elapsed() < timeout);
        before - self.entries.len()
    }
}
