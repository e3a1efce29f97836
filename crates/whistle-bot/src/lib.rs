pub mod config;
pub mod gateway;
pub mod host;
pub mod manager;
pub mod room;
