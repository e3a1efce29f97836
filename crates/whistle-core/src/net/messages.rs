use serde::{Deserialize, Serialize};

use crate::host::Disc;
use crate::player::{PlayerId, PlayerSnapshot, Team};

/// Room settings sent with an `open_room` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSettings {
    pub name: String,
    /// Display name the bot occupies slot 0 with.
    pub player_name: String,
    #[serde(default)]
    pub password: Option<String>,
    pub public: bool,
    pub join_token: String,
    pub max_players: u32,
    pub geo: GeoLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

/// Commands issued by a room toward the hosting service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GatewayCommand {
    OpenRoom { settings: RoomSettings },
    StartGame,
    StopGame,
    PauseGame { paused: bool },
    SetPlayerTeam { player_id: PlayerId, team: Team },
    KickPlayer { player_id: PlayerId, reason: String },
    /// Stadium payload forwarded verbatim.
    SetStadium { stadium: String },
    SetScoreLimit { limit: u32 },
    SetTimeLimit { limit: u32 },
    SendChat {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<PlayerId>,
    },
}

/// Host view refresh delivered with every tick event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    /// None while no match runs.
    #[serde(default)]
    pub elapsed_secs: Option<f64>,
    #[serde(default)]
    pub paused: bool,
    pub red_score: u32,
    pub blue_score: u32,
    pub score_limit: u32,
    pub time_limit: u32,
    #[serde(default)]
    pub ball: Option<Disc>,
    #[serde(default)]
    pub player_discs: Vec<PlayerDisc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerDisc {
    pub player_id: PlayerId,
    pub disc: Disc,
}

/// Events delivered by the hosting service to a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GatewayEvent {
    /// Room creation confirmed. May fire more than once; rooms must
    /// treat duplicates as no-ops.
    RoomLink { url: String },
    /// Room creation rejected by the host.
    RoomDenied { reason: String },
    PlayerJoin { player: PlayerSnapshot },
    PlayerLeave { player_id: PlayerId },
    InputChange { player_id: PlayerId },
    Chat { player_id: PlayerId, text: String },
    BallKick { player_id: PlayerId },
    GameStart,
    GameStop,
    TeamGoal { team: Team },
    TeamChange { player_id: PlayerId, team: Team },
    Tick { snapshot: MatchSnapshot },
    RoomClosed,
}
