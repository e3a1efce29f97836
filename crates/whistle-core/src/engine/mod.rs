//! The per-room matchmaking engine.
//!
//! Every host event lands here, mutates the roster, and funnels into
//! the team balancer, which re-derives assignments and drives the host
//! through [`HostControl`]. Handlers run to completion one at a time;
//! recursion inside a single event is plain call depth bounded by the
//! roster size.

mod activity;
mod balance;
mod chat;
mod picks;
mod scoring;

use tracing::info;

use crate::host::HostControl;
use crate::player::{HOST_PLAYER_ID, PlayerId, PlayerSnapshot, Team};
use crate::roster::Roster;
use crate::touch::{TouchHistory, in_contact};

/// Per-room policy, fixed at room creation.
#[derive(Debug, Clone)]
pub struct RoomRules {
    pub room_name: String,
    /// Capacity per team once the headcount table stops applying.
    pub default_team_capacity: usize,
    /// Shortens matches and disables match-idle kicks.
    pub dev_mode: bool,
}

/// Matchmaking state for one room.
pub struct RoomEngine {
    rules: RoomRules,
    roster: Roster,
    touch: TouchHistory,
    current_streak: u32,
}

impl RoomEngine {
    pub fn new(rules: RoomRules) -> Self {
        Self {
            rules,
            roster: Roster::new(),
            touch: TouchHistory::default(),
            current_streak: 0,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    pub fn on_player_join(&mut self, host: &mut dyn HostControl, snapshot: PlayerSnapshot) {
        info!(room = %self.rules.room_name, player = %snapshot.name, "player joined");
        let (id, name) = (snapshot.id, snapshot.name.clone());
        self.roster.add(snapshot);
        host.send_chat_to(
            &format!("👋 Welcome in {}, {}.", self.rules.room_name, name),
            id,
        );
        self.check_matchmaking(host);
    }

    pub fn on_player_leave(&mut self, host: &mut dyn HostControl, id: PlayerId) {
        let Some(removed) = self.roster.remove(id) else {
            return;
        };
        info!(room = %self.rules.room_name, player = %removed.name, "player left");
        self.check_matchmaking(host);
        if self.roster.is_empty() && host.elapsed_secs().is_some() {
            host.stop_game();
        }
    }

    /// Any input counts as a sign of life.
    pub fn on_input_change(&mut self, id: PlayerId) {
        if let Some(player) = self.roster.get_mut(id) {
            player.mark_active();
        }
    }

    pub fn on_ball_kick(&mut self, id: PlayerId) {
        self.touch.record(id);
    }

    /// Mirrors host-side team moves back into the roster. Moves the
    /// engine issued itself arrive as no-op echoes. The bot's own
    /// pseudo-player never plays; moving it is undone on the spot.
    pub fn on_team_change(&mut self, host: &mut dyn HostControl, id: PlayerId, team: Team) {
        if id == HOST_PLAYER_ID {
            if team != Team::Spectator {
                host.set_player_team(HOST_PLAYER_ID, Team::Spectator);
            }
            return;
        }
        if let Some(player) = self.roster.get_mut(id) {
            player.team = team;
            player.mark_active();
        }
    }

    pub fn on_game_start(&mut self, host: &mut dyn HostControl) {
        self.touch.reset();
        for player in self.roster.iter_mut() {
            player.match_idle_secs = 0;
        }
        host.send_chat("⚽ Match started.");
    }

    pub fn on_game_stop(&mut self) {
        self.touch.reset();
    }

    /// Per-frame pass: contact tracking while a score-limited match
    /// runs, then the match-end check.
    pub fn on_tick(&mut self, host: &mut dyn HostControl) {
        if host.elapsed_secs().is_some()
            && host.score_limit() != 0
            && let Some(ball) = host.ball()
        {
            let playing: Vec<PlayerId> = self
                .roster
                .iter()
                .filter(|p| p.team.is_playing())
                .map(|p| p.id)
                .collect();
            for id in playing {
                if let Some(disc) = host.player_disc(id)
                    && in_contact(&disc, &ball)
                {
                    self.touch.record(id);
                }
            }
        }
        self.check_ended_match(host);
    }

    /// Once-per-second pass: idle enforcement.
    pub fn on_second(&mut self, host: &mut dyn HostControl) {
        self.run_activity_pass(host);
    }

    /// Moves a player, keeping the roster and the host in lockstep.
    /// Skips the command when the player is already there.
    fn set_team(&mut self, host: &mut dyn HostControl, id: PlayerId, team: Team) {
        if let Some(player) = self.roster.get_mut(id)
            && player.team != team
        {
            player.team = team;
            host.set_player_team(id, team);
        }
    }
}
