//! JSON framing for the gateway connection.

use std::fmt;

use crate::net::messages::{GatewayCommand, GatewayEvent};

/// Frames beyond this size are rejected before parsing.
pub const MAX_MESSAGE_SIZE: usize = 256 * 1024;

#[derive(Debug)]
pub enum ProtocolError {
    MessageTooLarge { size: usize },
    Encode(serde_json::Error),
    Decode(serde_json::Error),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::MessageTooLarge { size } => {
                write!(f, "message of {size} bytes exceeds {MAX_MESSAGE_SIZE}")
            }
            ProtocolError::Encode(e) => write!(f, "failed to encode command: {e}"),
            ProtocolError::Decode(e) => write!(f, "failed to decode event: {e}"),
        }
    }
}

impl std::error::Error for ProtocolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProtocolError::MessageTooLarge { .. } => None,
            ProtocolError::Encode(e) | ProtocolError::Decode(e) => Some(e),
        }
    }
}

pub fn encode_command(command: &GatewayCommand) -> Result<String, ProtocolError> {
    serde_json::to_string(command).map_err(ProtocolError::Encode)
}

pub fn decode_event(text: &str) -> Result<GatewayEvent, ProtocolError> {
    if text.len() > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge { size: text.len() });
    }
    serde_json::from_str(text).map_err(ProtocolError::Decode)
}
