use std::collections::BTreeMap;

use crate::player::{PlayerId, PlayerSnapshot, PlayerState, Team};

/// Per-room player store; the source of truth for team membership,
/// AFK flags, and activity timers.
///
/// Keyed by player id in a BTreeMap: the host assigns ids
/// monotonically, so iteration order is join order.
#[derive(Debug, Default)]
pub struct Roster {
    players: BTreeMap<PlayerId, PlayerState>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, snapshot: PlayerSnapshot) {
        self.players
            .insert(snapshot.id, PlayerState::new(snapshot));
    }

    pub fn remove(&mut self, id: PlayerId) -> Option<PlayerState> {
        self.players.remove(&id)
    }

    /// Missing players are an expected race with leave events, so this
    /// returns None rather than treating absence as an error.
    pub fn get(&self, id: PlayerId) -> Option<&PlayerState> {
        self.players.get(&id)
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut PlayerState> {
        self.players.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerState> {
        self.players.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PlayerState> {
        self.players.values_mut()
    }

    /// Connected players who are not self-flagged AFK, in join order.
    /// All headcount-based decisions use this set, never the raw roster.
    pub fn active_ids(&self) -> Vec<PlayerId> {
        self.players
            .values()
            .filter(|p| !p.afk)
            .map(|p| p.id)
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.players.values().filter(|p| !p.afk).count()
    }

    /// Members of a team, in join order.
    pub fn team_ids(&self, team: Team) -> Vec<PlayerId> {
        self.players
            .values()
            .filter(|p| p.team == team)
            .map(|p| p.id)
            .collect()
    }

    /// Active spectators, in join order: the queue picks draw from.
    pub fn spectator_queue(&self) -> Vec<PlayerId> {
        self.players
            .values()
            .filter(|p| !p.afk && p.team == Team::Spectator)
            .map(|p| p.id)
            .collect()
    }

    pub fn current_picker(&self) -> Option<PlayerId> {
        self.players.values().find(|p| p.pick_mode).map(|p| p.id)
    }

    /// Clears every pick flag and returns the previous picker, if any.
    /// Callers set the new flag afterwards, keeping at most one picker.
    pub fn clear_pick_flags(&mut self) -> Option<PlayerId> {
        let mut previous = None;
        for player in self.players.values_mut() {
            if player.pick_mode {
                previous = Some(player.id);
            }
            player.pick_mode = false;
        }
        previous
    }
}
