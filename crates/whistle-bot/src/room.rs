//! One task per room: opens the room, feeds host events into the
//! engine, and drives the once-per-second pass.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use whistle_core::engine::{RoomEngine, RoomRules};
use whistle_core::net::messages::{GatewayCommand, GatewayEvent, RoomSettings};

use crate::config::{BotConfig, RoomDefinition};
use crate::gateway::{self, GatewayError};
use crate::host::GatewayHost;

#[derive(Debug)]
pub enum RoomError {
    Denied(String),
    ConnectionLost,
}

impl fmt::Display for RoomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomError::Denied(reason) => write!(f, "host refused the room: {reason}"),
            RoomError::ConnectionLost => write!(f, "gateway connection lost before confirmation"),
        }
    }
}

impl std::error::Error for RoomError {}

/// Handle to a spawned room: its confirmation channel and its task.
pub struct RoomTask {
    pub name: String,
    pub ready: oneshot::Receiver<Result<String, RoomError>>,
    pub handle: JoinHandle<()>,
}

/// Connects to the gateway and spawns the room's event loop. The
/// returned `ready` resolves with the public room link, or the reason
/// the host refused.
pub async fn spawn_room(
    config: &BotConfig,
    definition: RoomDefinition,
) -> Result<RoomTask, GatewayError> {
    let connection = gateway::connect(&config.gateway_url).await?;
    let (ready_tx, ready_rx) = oneshot::channel();
    let name = definition.name.clone();
    let rules = definition.rules(config.dev_mode);
    let settings = definition.settings(&config.bot_name);

    let handle = tokio::spawn(run_room(
        rules,
        settings,
        connection.command_tx,
        connection.event_rx,
        ready_tx,
    ));
    Ok(RoomTask {
        name,
        ready: ready_rx,
        handle,
    })
}

pub(crate) async fn run_room(
    rules: RoomRules,
    settings: RoomSettings,
    command_tx: mpsc::UnboundedSender<GatewayCommand>,
    mut event_rx: mpsc::UnboundedReceiver<GatewayEvent>,
    ready: oneshot::Sender<Result<String, RoomError>>,
) {
    let room_name = rules.room_name.clone();
    let mut engine = RoomEngine::new(rules);
    let mut host = GatewayHost::new(command_tx);
    host.send(GatewayCommand::OpenRoom { settings });

    // The host may confirm more than once; only the first counts.
    let mut ready = Some(ready);

    let mut second = tokio::time::interval(Duration::from_secs(1));
    second.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            event = event_rx.recv() => {
                let Some(event) = event else { break };
                match event {
                    GatewayEvent::RoomLink { url } => {
                        match ready.take() {
                            Some(tx) => {
                                tracing::info!(room = %room_name, %url, "room confirmed");
                                let _ = tx.send(Ok(url));
                            }
                            None => tracing::debug!(room = %room_name, "duplicate room link ignored"),
                        }
                    }
                    GatewayEvent::RoomDenied { reason } => {
                        if let Some(tx) = ready.take() {
                            let _ = tx.send(Err(RoomError::Denied(reason)));
                        }
                        break;
                    }
                    GatewayEvent::RoomClosed => {
                        tracing::info!(room = %room_name, "room closed by host");
                        break;
                    }
                    GatewayEvent::PlayerJoin { player } => engine.on_player_join(&mut host, player),
                    GatewayEvent::PlayerLeave { player_id } => engine.on_player_leave(&mut host, player_id),
                    GatewayEvent::InputChange { player_id } => engine.on_input_change(player_id),
                    GatewayEvent::Chat { player_id, text } => {
                        engine.on_chat(&mut host, player_id, &text, epoch_millis());
                    }
                    GatewayEvent::BallKick { player_id } => engine.on_ball_kick(player_id),
                    GatewayEvent::GameStart => {
                        host.on_game_started();
                        engine.on_game_start(&mut host);
                    }
                    GatewayEvent::GameStop => {
                        host.on_game_stopped();
                        engine.on_game_stop();
                    }
                    GatewayEvent::TeamGoal { team } => engine.on_team_goal(&mut host, team),
                    GatewayEvent::TeamChange { player_id, team } => {
                        engine.on_team_change(&mut host, player_id, team);
                    }
                    GatewayEvent::Tick { snapshot } => {
                        host.apply_snapshot(snapshot);
                        engine.on_tick(&mut host);
                    }
                }
            }
            _ = second.tick() => engine.on_second(&mut host),
        }
    }

    if let Some(tx) = ready.take() {
        let _ = tx.send(Err(RoomError::ConnectionLost));
    }
}

fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
