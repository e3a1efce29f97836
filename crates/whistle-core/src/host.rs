use serde::{Deserialize, Serialize};

use crate::format::FormatProfile;
use crate::player::{PlayerId, Team};

/// A physical disc (player body or ball) as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Disc {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
}

impl Disc {
    pub fn distance_to(&self, other: &Disc) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn speed(&self) -> f64 {
        (self.vx.powi(2) + self.vy.powi(2)).sqrt()
    }
}

/// Commands and queries the hosting service exposes to a room.
///
/// Commands are fire-and-forget: the engine never observes a send
/// failure. Queries reflect the host's current synchronous view of
/// the match; `elapsed_secs` is None while no match runs.
pub trait HostControl {
    fn start_game(&mut self);
    fn stop_game(&mut self);
    fn pause_game(&mut self, paused: bool);
    fn set_player_team(&mut self, id: PlayerId, team: Team);
    fn kick_player(&mut self, id: PlayerId, reason: &str);
    fn set_stadium(&mut self, profile: &FormatProfile);
    fn set_score_limit(&mut self, limit: u32);
    fn set_time_limit(&mut self, limit: u32);
    fn send_chat(&mut self, text: &str);
    fn send_chat_to(&mut self, text: &str, target: PlayerId);

    fn stadium_name(&self) -> &str;
    fn elapsed_secs(&self) -> Option<f64>;
    fn is_paused(&self) -> bool;
    /// (red, blue)
    fn scores(&self) -> (u32, u32);
    fn score_limit(&self) -> u32;
    fn time_limit(&self) -> u32;
    fn ball(&self) -> Option<Disc>;
    fn player_disc(&self, id: PlayerId) -> Option<Disc>;
}
