//! The live [`HostControl`] implementation: commands go out over the
//! gateway channel, queries are answered from a local mirror of the
//! host's match state.

use tokio::sync::mpsc;

use whistle_core::format::FormatProfile;
use whistle_core::host::{Disc, HostControl};
use whistle_core::net::messages::{GatewayCommand, MatchSnapshot};
use whistle_core::player::{PlayerId, Team};

/// Mirror of the hosting service for one room.
///
/// Commands update the mirror optimistically so the engine sees its
/// own effects immediately; every tick event overwrites the mirror
/// with the host's authoritative snapshot.
pub struct GatewayHost {
    tx: mpsc::UnboundedSender<GatewayCommand>,
    stadium: String,
    snapshot: MatchSnapshot,
}

impl GatewayHost {
    pub fn new(tx: mpsc::UnboundedSender<GatewayCommand>) -> Self {
        Self {
            tx,
            stadium: "classic".to_string(),
            snapshot: MatchSnapshot::default(),
        }
    }

    /// Fire-and-forget: a closed channel means the room is shutting
    /// down and the command no longer matters.
    pub fn send(&self, command: GatewayCommand) {
        if self.tx.send(command).is_err() {
            tracing::debug!("gateway channel closed, dropping command");
        }
    }

    pub fn apply_snapshot(&mut self, snapshot: MatchSnapshot) {
        self.snapshot = snapshot;
    }

    /// Host-initiated start observed as an event.
    pub fn on_game_started(&mut self) {
        self.snapshot.elapsed_secs = Some(0.0);
        self.snapshot.paused = false;
        self.snapshot.red_score = 0;
        self.snapshot.blue_score = 0;
    }

    pub fn on_game_stopped(&mut self) {
        self.snapshot.elapsed_secs = None;
        self.snapshot.paused = false;
    }
}

impl HostControl for GatewayHost {
    fn start_game(&mut self) {
        self.send(GatewayCommand::StartGame);
        self.on_game_started();
    }

    fn stop_game(&mut self) {
        self.send(GatewayCommand::StopGame);
        self.on_game_stopped();
    }

    fn pause_game(&mut self, paused: bool) {
        self.send(GatewayCommand::PauseGame { paused });
        self.snapshot.paused = paused;
    }

    fn set_player_team(&mut self, id: PlayerId, team: Team) {
        self.send(GatewayCommand::SetPlayerTeam {
            player_id: id,
            team,
        });
    }

    fn kick_player(&mut self, id: PlayerId, reason: &str) {
        self.send(GatewayCommand::KickPlayer {
            player_id: id,
            reason: reason.to_string(),
        });
    }

    fn set_stadium(&mut self, profile: &FormatProfile) {
        self.send(GatewayCommand::SetStadium {
            stadium: profile.stadium.to_string(),
        });
        self.stadium = profile.name.to_string();
    }

    fn set_score_limit(&mut self, limit: u32) {
        self.send(GatewayCommand::SetScoreLimit { limit });
        self.snapshot.score_limit = limit;
    }

    fn set_time_limit(&mut self, limit: u32) {
        self.send(GatewayCommand::SetTimeLimit { limit });
        self.snapshot.time_limit = limit;
    }

    fn send_chat(&mut self, text: &str) {
        self.send(GatewayCommand::SendChat {
            text: text.to_string(),
            target: None,
        });
    }

    fn send_chat_to(&mut self, text: &str, target: PlayerId) {
        self.send(GatewayCommand::SendChat {
            text: text.to_string(),
            target: Some(target),
        });
    }

    fn stadium_name(&self) -> &str {
        &self.stadium
    }

    fn elapsed_secs(&self) -> Option<f64> {
        self.snapshot.elapsed_secs
    }

    fn is_paused(&self) -> bool {
        self.snapshot.paused
    }

    fn scores(&self) -> (u32, u32) {
        (self.snapshot.red_score, self.snapshot.blue_score)
    }

    fn score_limit(&self) -> u32 {
        self.snapshot.score_limit
    }

    fn time_limit(&self) -> u32 {
        self.snapshot.time_limit
    }

    fn ball(&self) -> Option<Disc> {
        self.snapshot.ball
    }

    fn player_disc(&self, id: PlayerId) -> Option<Disc> {
        self.snapshot
            .player_discs
            .iter()
            .find(|entry| entry.player_id == id)
            .map(|entry| entry.disc)
    }
}
