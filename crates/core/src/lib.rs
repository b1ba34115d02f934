#![deny(rust_2018_idioms)]

pub mod chat;
pub mod config;
pub mod participant;
pub mod permissions;

pub use chat::{Chat, ChatOutcome, MessageClass};
pub use config::{ChatConfig, ConfigError};
pub use participant::{Participant, Uid, SERVER_CONSOLE_UID};
pub use permissions::Permissions;
