//! WebSocket client for the hosting gateway. One connection per room.

use std::fmt;

use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use whistle_core::net::messages::{GatewayCommand, GatewayEvent};
use whistle_core::net::protocol;

#[derive(Debug)]
pub enum GatewayError {
    Connect(tokio_tungstenite::tungstenite::Error),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Connect(e) => write!(f, "failed to connect to gateway: {e}"),
        }
    }
}

impl std::error::Error for GatewayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GatewayError::Connect(e) => Some(e),
        }
    }
}

/// Channel pair backing one room's connection. Closing either side
/// tears the room down.
pub struct GatewayConnection {
    pub command_tx: mpsc::UnboundedSender<GatewayCommand>,
    pub event_rx: mpsc::UnboundedReceiver<GatewayEvent>,
}

/// Opens the socket and spawns the writer and reader pumps. Malformed
/// frames are logged and dropped; a closed socket surfaces to the room
/// as a `RoomClosed` event.
pub async fn connect(url: &str) -> Result<GatewayConnection, GatewayError> {
    let (stream, _) = connect_async(url).await.map_err(GatewayError::Connect)?;
    let (mut sink, mut source) = stream.split();

    let (command_tx, mut command_rx) = mpsc::unbounded_channel::<GatewayCommand>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<GatewayEvent>();

    tokio::spawn(async move {
        while let Some(command) = command_rx.recv().await {
            let text = match protocol::encode_command(&command) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!(error = %e, "dropping unencodable command");
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                tracing::debug!("gateway sink closed");
                break;
            }
        }
    });

    tokio::spawn(async move {
        while let Some(frame) = source.next().await {
            let text = match frame {
                Ok(Message::Text(text)) => text,
                Ok(Message::Close(_)) => break,
                Ok(_) => continue,
                Err(e) => {
                    tracing::debug!(error = %e, "gateway read failed");
                    break;
                }
            };
            match protocol::decode_event(text.as_str()) {
                Ok(event) => {
                    if event_tx.send(event).is_err() {
                        break;
                    }
                }
                Err(e) => tracing::warn!(error = %e, "dropping malformed gateway frame"),
            }
        }
        let _ = event_tx.send(GatewayEvent::RoomClosed);
    });

    Ok(GatewayConnection {
        command_tx,
        event_rx,
    })
}
