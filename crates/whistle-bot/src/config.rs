use serde::Deserialize;

use whistle_core::engine::RoomRules;
use whistle_core::net::messages::{GeoLocation, RoomSettings};

/// Top-level bot configuration, loaded from `whistle.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub gateway_url: String,
    /// Display name the bot occupies slot 0 with in every room.
    pub bot_name: String,
    /// Shortens matches and disables match-idle kicks.
    pub dev_mode: bool,
    pub rooms: Vec<RoomDefinition>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            gateway_url: "ws://127.0.0.1:9500/host".to_string(),
            bot_name: "whistle".to_string(),
            dev_mode: false,
            rooms: Vec::new(),
        }
    }
}

/// One hosted room.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RoomDefinition {
    pub name: String,
    pub public: bool,
    pub password: Option<String>,
    pub geo: GeoConfig,
    pub join_token: String,
    pub max_players: u32,
    /// Capacity per team once the headcount table stops applying.
    pub max_players_in_team: usize,
}

impl Default for RoomDefinition {
    fn default() -> Self {
        Self {
            name: String::new(),
            public: true,
            password: None,
            geo: GeoConfig::default(),
            join_token: String::new(),
            max_players: 16,
            max_players_in_team: 4,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeoConfig {
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            country: "it".to_string(),
            lat: 45.46,
            lon: 9.19,
        }
    }
}

impl RoomDefinition {
    pub fn settings(&self, bot_name: &str) -> RoomSettings {
        RoomSettings {
            name: self.name.clone(),
            player_name: bot_name.to_string(),
            password: self.password.clone(),
            public: self.public,
            join_token: self.join_token.clone(),
            max_players: self.max_players,
            geo: GeoLocation {
                country: self.geo.country.clone(),
                lat: self.geo.lat,
                lon: self.geo.lon,
            },
        }
    }

    pub fn rules(&self, dev_mode: bool) -> RoomRules {
        RoomRules {
            room_name: self.name.clone(),
            default_team_capacity: self.max_players_in_team,
            dev_mode,
        }
    }
}

impl BotConfig {
    /// Validate configuration, logging errors and exiting on fatal issues.
    pub fn validate(&self) {
        if !self.gateway_url.starts_with("ws://") && !self.gateway_url.starts_with("wss://") {
            tracing::error!(url = %self.gateway_url, "gateway_url must be a ws:// or wss:// URL");
            std::process::exit(1);
        }
        if self.bot_name.is_empty() {
            tracing::error!("bot_name must not be empty");
            std::process::exit(1);
        }
        if self.rooms.is_empty() {
            tracing::error!("no rooms configured");
            std::process::exit(1);
        }
        for room in &self.rooms {
            if room.name.is_empty() {
                tracing::error!("every room needs a name");
                std::process::exit(1);
            }
            if room.max_players_in_team == 0 {
                tracing::error!(room = %room.name, "max_players_in_team must be > 0");
                std::process::exit(1);
            }
            if (room.max_players as usize) < room.max_players_in_team * 2 {
                tracing::error!(
                    room = %room.name,
                    "max_players must fit two full teams"
                );
                std::process::exit(1);
            }
            if room.join_token.is_empty() {
                tracing::warn!(room = %room.name, "join_token is empty — the host may refuse the room");
            }
        }
    }

    /// Load config from the file named by `WHISTLE_CONFIG` (default
    /// `whistle.toml`) if it exists, then apply env var overrides.
    pub fn load() -> Self {
        let path =
            std::env::var("WHISTLE_CONFIG").unwrap_or_else(|_| "whistle.toml".to_string());
        let mut config = match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<BotConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!(%path, "Loaded configuration");
                    cfg
                },
                Err(e) => {
                    tracing::warn!(%path, "Failed to parse config: {e}, using defaults");
                    BotConfig::default()
                },
            },
            Err(_) => {
                tracing::info!(%path, "No config file found, using defaults");
                BotConfig::default()
            },
        };

        if let Ok(url) = std::env::var("WHISTLE_GATEWAY_URL")
            && !url.is_empty()
        {
            config.gateway_url = url;
        }
        if let Ok(name) = std::env::var("WHISTLE_BOT_NAME")
            && !name.is_empty()
        {
            config.bot_name = name;
        }
        if let Ok(val) = std::env::var("WHISTLE_DEV_MODE")
            && let Ok(flag) = val.parse::<bool>()
        {
            config.dev_mode = flag;
        }

        config
    }
}
