//! Wire types shared between rooms and the hosting gateway.

pub mod messages;
pub mod protocol;
