//! Builds the colored text shown to players for each kind of chat line.

use crate::participant::Participant;
use chrono::{DateTime, Local};
use mcchat_text::ColorCode;
use std::fmt;

/// Wall clock time of a chat invocation, rendered as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp(DateTime<Local>);

impl Timestamp {
    pub fn now() -> Timestamp {
        Timestamp(Local::now())
    }

    pub fn datetime(&self) -> DateTime<Local> {
        self.0
    }
}

impl From<DateTime<Local>> for Timestamp {
    fn from(time: DateTime<Local>) -> Self {
        Timestamp(time)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

/// Finished message text. Built once and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedMessage(String);

impl FormattedMessage {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for FormattedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a sender's name is decorated in normal chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    Console,
    Admin,
    Regular,
}

impl ChatRole {
    pub fn of(participant: &Participant) -> ChatRole {
        if participant.is_server_console() {
            ChatRole::Console
        } else if participant.is_admin() {
            ChatRole::Admin
        } else {
            ChatRole::Regular
        }
    }
}

pub fn server_broadcast(text: &str) -> FormattedMessage {
    FormattedMessage(format!("{}[!] {}{}", ColorCode::Red, ColorCode::Green, text))
}

pub fn admin_channel(timestamp: &Timestamp, name: &str, text: &str) -> FormattedMessage {
    FormattedMessage(format!(
        "{}{} [@]{} <{}{}{}> {}",
        timestamp,
        ColorCode::Red,
        ColorCode::White,
        ColorCode::DarkPurple,
        name,
        ColorCode::White,
        text
    ))
}

pub fn chat_line(
    timestamp: &Timestamp,
    role: ChatRole,
    name: &str,
    text: &str,
) -> FormattedMessage {
    let line = match role {
        ChatRole::Console => format!(
            "{} {}{}{} {}",
            timestamp,
            ColorCode::Red,
            name,
            ColorCode::White,
            text
        ),
        ChatRole::Admin => format!(
            "{} <{}{}{}> {}",
            timestamp,
            ColorCode::DarkPurple,
            name,
            ColorCode::White,
            text
        ),
        ChatRole::Regular => format!("{} <{}> {}", timestamp, name, text),
    };
    FormattedMessage(line)
}

pub fn auth_confirmation() -> FormattedMessage {
    FormattedMessage(format!(
        "{}[!] {}You have been authed as admin!",
        ColorCode::Red,
        ColorCode::Green
    ))
}

pub fn userlist_header(online: usize, user_limit: i64) -> FormattedMessage {
    FormattedMessage(format!(
        "{}[ {} / {} players online ]",
        ColorCode::Blue,
        online,
        user_limit
    ))
}

pub fn userlist<'a>(participants: impl IntoIterator<Item = &'a Participant>) -> FormattedMessage {
    let mut desc = String::new();
    for participant in participants {
        if !participant.is_logged_in() {
            continue;
        }
        desc += &participant.name;
        if participant.is_muted() {
            desc += &format!("{} (muted)", ColorCode::Yellow);
        }
        if participant.is_dnd() {
            desc += &format!("{} (dnd)", ColorCode::Yellow);
        }
        desc += ", ";
    }
    FormattedMessage(desc)
}
