//! The team balancer: turns the active roster into team assignments.

use rand::seq::SliceRandom;
use tracing::debug;

use super::RoomEngine;
use crate::format::{self, FormatProfile, TRAINING};
use crate::host::HostControl;
use crate::player::{PlayerId, Team};

impl RoomEngine {
    /// Re-derives team assignments from the current roster. Invoked
    /// after every roster or membership change. Calling it again with
    /// nothing changed issues no host commands.
    pub fn check_matchmaking(&mut self, host: &mut dyn HostControl) {
        let active = self.roster.active_ids();
        match active.len() {
            0 => {}
            1 => self.solo_session(host, active[0]),
            _ => self.group_session(host, active),
        }
    }

    /// A lone player free-trains on RED with no limits.
    fn solo_session(&mut self, host: &mut dyn HostControl, id: PlayerId) {
        self.roster.clear_pick_flags();
        let on_red = self.roster.get(id).is_some_and(|p| p.team == Team::Red);
        if host.stadium_name() == TRAINING.name && on_red && host.elapsed_secs().is_some() {
            return;
        }
        if host.elapsed_secs().is_some() {
            host.stop_game();
        }
        if host.stadium_name() != TRAINING.name {
            self.current_streak = 0;
            host.set_stadium(&TRAINING);
            host.set_score_limit(0);
            host.set_time_limit(0);
        }
        self.set_team(host, id, Team::Red);
        host.start_game();
    }

    fn group_session(&mut self, host: &mut dyn HostControl, active: Vec<PlayerId>) {
        let n = active.len();
        let capacity = format::team_capacity(n, self.rules.default_team_capacity);
        self.apply_profile(host, format::profile_for(n));

        let red = self.roster.team_ids(Team::Red);
        let blue = self.roster.team_ids(Team::Blue);
        let running = host.elapsed_secs().is_some();

        // Even splits reshuffle rather than negotiate, unless a
        // balanced match is already underway.
        if n % 2 == 0
            && n / 2 == capacity
            && (!running || red.len() != blue.len() || (capacity == 2 && red.len() == 1))
        {
            self.randomize_teams(host, active);
        } else if red.len() != blue.len() || red.len() > capacity || blue.len() > capacity {
            self.rebalance(host, capacity, red, blue);
        } else {
            // Settled teams end any pending pick negotiation.
            self.roster.clear_pick_flags();
            if !running {
                host.start_game();
            } else if host.is_paused() {
                host.pause_game(false);
            }
        }
    }

    /// Arena switches are disruptive, so they only happen on an
    /// actual profile change, and never under a live match.
    fn apply_profile(&mut self, host: &mut dyn HostControl, profile: &FormatProfile) {
        if host.stadium_name() == profile.name {
            return;
        }
        if host.elapsed_secs().is_some() {
            host.stop_game();
        }
        self.current_streak = 0;
        host.set_stadium(profile);
        host.set_score_limit(profile.effective_score_limit(self.rules.dev_mode));
        host.set_time_limit(profile.time_limit);
    }

    fn randomize_teams(&mut self, host: &mut dyn HostControl, mut active: Vec<PlayerId>) {
        if host.elapsed_secs().is_some() {
            host.stop_game();
        }
        host.send_chat("🤖 Randomizing teams...");
        self.roster.clear_pick_flags();
        active.shuffle(&mut rand::rng());
        for (index, id) in active.iter().enumerate() {
            let team = if index % 2 == 0 { Team::Red } else { Team::Blue };
            self.set_team(host, *id, team);
        }
        self.current_streak = 0;
        host.start_game();
        debug!(room = %self.rules.room_name, players = active.len(), "teams randomized");
    }

    /// Trim runs before fill so both teams respect capacity before any
    /// pick negotiation begins.
    fn rebalance(
        &mut self,
        host: &mut dyn HostControl,
        capacity: usize,
        red: Vec<PlayerId>,
        blue: Vec<PlayerId>,
    ) {
        if red.len() > capacity {
            for &id in red[capacity..].iter().rev() {
                self.set_team(host, id, Team::Spectator);
            }
            return self.check_matchmaking(host);
        }
        if blue.len() > capacity {
            for &id in blue[capacity..].iter().rev() {
                self.set_team(host, id, Team::Spectator);
            }
            return self.check_matchmaking(host);
        }

        if red.len() < capacity || blue.len() < capacity {
            let (short_team, short, fuller) = if blue.len() < red.len() {
                (Team::Blue, blue, red)
            } else {
                (Team::Red, red, blue)
            };
            self.fill_side(host, short_team, &short, &fuller);
        }
    }

    fn fill_side(
        &mut self,
        host: &mut dyn HostControl,
        short_team: Team,
        short: &[PlayerId],
        fuller: &[PlayerId],
    ) {
        let spectators = self.roster.spectator_queue();
        let Some(&first) = spectators.first() else {
            // Nobody left to draw from; play on with uneven sides.
            self.roster.clear_pick_flags();
            if host.elapsed_secs().is_none() {
                host.start_game();
            } else if host.is_paused() {
                host.pause_game(false);
            }
            return;
        };

        // A single candidate or an empty side leaves nothing to
        // negotiate over.
        if spectators.len() == 1 || short.is_empty() {
            self.set_team(host, first, short_team);
            return self.check_matchmaking(host);
        }

        match host.elapsed_secs() {
            Some(elapsed) if elapsed < 16.0 => host.stop_game(),
            Some(_) if !host.is_paused() => host.pause_game(true),
            _ => {}
        }
        self.begin_pick(host, fuller[0]);
    }
}
