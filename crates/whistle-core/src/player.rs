use serde::{Deserialize, Serialize};

/// Player identifier assigned by the hosting service, stable for the session.
pub type PlayerId = u32;

/// Pseudo-id the hosting service reserves for the room bot itself.
/// It never enters the roster and its events are ignored.
pub const HOST_PLAYER_ID: PlayerId = 0;

/// Side a player occupies. Wire-encoded as 0/1/2 to match the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Team {
    Spectator,
    Red,
    Blue,
}

impl Team {
    /// The opposing side. Spectator has no opponent.
    pub fn opponent(self) -> Team {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
            Team::Spectator => Team::Spectator,
        }
    }

    pub fn is_playing(self) -> bool {
        self != Team::Spectator
    }
}

impl From<Team> for u8 {
    fn from(team: Team) -> u8 {
        match team {
            Team::Spectator => 0,
            Team::Red => 1,
            Team::Blue => 2,
        }
    }
}

impl TryFrom<u8> for Team {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Team::Spectator),
            1 => Ok(Team::Red),
            2 => Ok(Team::Blue),
            other => Err(format!("unknown team id: {other}")),
        }
    }
}

/// Immutable view of a joining player, validated once at the gateway boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub name: String,
    /// Auth identity, stable across connections.
    #[serde(default)]
    pub auth: Option<String>,
    /// Connection identity, one per socket.
    #[serde(default)]
    pub conn: Option<String>,
}

/// Per-player state owned by the roster store.
#[derive(Debug, Clone)]
pub struct PlayerState {
    pub id: PlayerId,
    pub name: String,
    pub auth: Option<String>,
    pub conn: Option<String>,
    pub team: Team,
    pub pick_mode: bool,
    pub afk: bool,
    /// Epoch millis of the last chat message, for the spam guard.
    pub last_message: Option<u64>,
    pub chat_warnings: u8,
    /// Seconds spent idle while flagged AFK.
    pub afk_idle_secs: u32,
    /// Seconds spent idle while occupying a team in a running match.
    pub match_idle_secs: u32,
}

impl PlayerState {
    pub fn new(snapshot: PlayerSnapshot) -> Self {
        Self {
            id: snapshot.id,
            name: snapshot.name,
            auth: snapshot.auth,
            conn: snapshot.conn,
            team: Team::Spectator,
            pick_mode: false,
            afk: false,
            last_message: None,
            chat_warnings: 0,
            afk_idle_secs: 0,
            match_idle_secs: 0,
        }
    }

    /// Any qualifying activity signal clears both idle counters.
    pub fn mark_active(&mut self) {
        self.afk_idle_secs = 0;
        self.match_idle_secs = 0;
    }
}
