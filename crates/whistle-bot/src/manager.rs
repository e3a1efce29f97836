//! Startup orchestration: every configured room must confirm before
//! the process is considered up.

use std::fmt;

use futures::future::try_join_all;

use crate::config::BotConfig;
use crate::gateway::GatewayError;
use crate::room::{self, RoomError, RoomTask};

#[derive(Debug)]
pub enum StartupError {
    Gateway(GatewayError),
    Room { name: String, source: RoomError },
    Canceled { name: String },
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupError::Gateway(e) => write!(f, "{e}"),
            StartupError::Room { name, source } => write!(f, "room {name}: {source}"),
            StartupError::Canceled { name } => write!(f, "room {name}: task ended during startup"),
        }
    }
}

impl std::error::Error for StartupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StartupError::Gateway(e) => Some(e),
            StartupError::Room { source, .. } => Some(source),
            StartupError::Canceled { .. } => None,
        }
    }
}

pub struct RoomManager {
    tasks: Vec<RoomTask>,
}

impl RoomManager {
    /// Spawns every configured room and waits for all of them to
    /// confirm. One refusal fails the whole startup.
    pub async fn start(config: &BotConfig) -> Result<Self, StartupError> {
        let mut tasks = Vec::with_capacity(config.rooms.len());
        for definition in config.rooms.clone() {
            let task = room::spawn_room(config, definition)
                .await
                .map_err(StartupError::Gateway)?;
            tasks.push(task);
        }

        let confirmations = tasks.iter_mut().map(|task| {
            let name = task.name.clone();
            let ready = &mut task.ready;
            async move {
                match ready.await {
                    Ok(Ok(url)) => {
                        tracing::info!(room = %name, %url, "room open");
                        Ok(())
                    }
                    Ok(Err(source)) => Err(StartupError::Room { name, source }),
                    Err(_) => Err(StartupError::Canceled { name }),
                }
            }
        });
        try_join_all(confirmations).await?;

        Ok(Self { tasks })
    }

    /// Runs until every room task finishes.
    pub async fn run(self) {
        for task in self.tasks {
            match task.handle.await {
                Ok(()) => tracing::info!(room = %task.name, "room shut down"),
                Err(e) => tracing::error!(room = %task.name, error = %e, "room task failed"),
            }
        }
    }
}
