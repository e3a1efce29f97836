pub mod engine;
pub mod format;
pub mod host;
pub mod net;
pub mod player;
pub mod roster;
pub mod touch;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::collections::HashMap;

    use crate::format::FormatProfile;
    use crate::host::{Disc, HostControl};
    use crate::player::{PlayerId, PlayerSnapshot, Team};

    /// Create a join snapshot for a test player.
    pub fn snapshot(id: PlayerId, name: &str) -> PlayerSnapshot {
        PlayerSnapshot {
            id,
            name: name.to_string(),
            auth: Some(format!("auth-{id}")),
            conn: Some(format!("conn-{id}")),
        }
    }

    /// One recorded host command.
    #[derive(Debug, Clone, PartialEq)]
    pub enum HostCall {
        StartGame,
        StopGame,
        PauseGame(bool),
        SetPlayerTeam(PlayerId, Team),
        KickPlayer(PlayerId, String),
        /// Profile name only; the stadium payload is opaque here.
        SetStadium(&'static str),
        SetScoreLimit(u32),
        SetTimeLimit(u32),
        Chat(String),
        ChatTo(String, PlayerId),
    }

    /// In-memory host double: records every command and mirrors the
    /// observable match state synchronously, the way the live gateway
    /// mirror does. Tests poke the public fields to fake mid-match
    /// conditions.
    pub struct FakeHost {
        pub calls: Vec<HostCall>,
        pub stadium: String,
        pub elapsed: Option<f64>,
        pub paused: bool,
        pub red_score: u32,
        pub blue_score: u32,
        pub score_limit: u32,
        pub time_limit: u32,
        pub ball: Option<Disc>,
        pub discs: HashMap<PlayerId, Disc>,
    }

    impl FakeHost {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl Default for FakeHost {
        fn default() -> Self {
            Self {
                calls: Vec::new(),
                stadium: "classic".to_string(),
                elapsed: None,
                paused: false,
                red_score: 0,
                blue_score: 0,
                score_limit: 0,
                time_limit: 0,
                ball: None,
                discs: HashMap::new(),
            }
        }
    }

    impl HostControl for FakeHost {
        fn start_game(&mut self) {
            self.calls.push(HostCall::StartGame);
            self.elapsed = Some(0.0);
            self.paused = false;
            self.red_score = 0;
            self.blue_score = 0;
        }

        fn stop_game(&mut self) {
            self.calls.push(HostCall::StopGame);
            self.elapsed = None;
            self.paused = false;
        }

        fn pause_game(&mut self, paused: bool) {
            self.calls.push(HostCall::PauseGame(paused));
            self.paused = paused;
        }

        fn set_player_team(&mut self, id: PlayerId, team: Team) {
            self.calls.push(HostCall::SetPlayerTeam(id, team));
        }

        fn kick_player(&mut self, id: PlayerId, reason: &str) {
            self.calls.push(HostCall::KickPlayer(id, reason.to_string()));
        }

        fn set_stadium(&mut self, profile: &FormatProfile) {
            self.calls.push(HostCall::SetStadium(profile.name));
            self.stadium = profile.name.to_string();
        }

        fn set_score_limit(&mut self, limit: u32) {
            self.calls.push(HostCall::SetScoreLimit(limit));
            self.score_limit = limit;
        }

        fn set_time_limit(&mut self, limit: u32) {
            self.calls.push(HostCall::SetTimeLimit(limit));
            self.time_limit = limit;
        }

        fn send_chat(&mut self, text: &str) {
            self.calls.push(HostCall::Chat(text.to_string()));
        }

        fn send_chat_to(&mut self, text: &str, target: PlayerId) {
            self.calls.push(HostCall::ChatTo(text.to_string(), target));
        }

        fn stadium_name(&self) -> &str {
            &self.stadium
        }

        fn elapsed_secs(&self) -> Option<f64> {
            self.elapsed
        }

        fn is_paused(&self) -> bool {
            self.paused
        }

        fn scores(&self) -> (u32, u32) {
            (self.red_score, self.blue_score)
        }

        fn score_limit(&self) -> u32 {
            self.score_limit
        }

        fn time_limit(&self) -> u32 {
            self.time_limit
        }

        fn ball(&self) -> Option<Disc> {
            self.ball
        }

        fn player_disc(&self, id: PlayerId) -> Option<Disc> {
            self.discs.get(&id).copied()
        }
    }
}
