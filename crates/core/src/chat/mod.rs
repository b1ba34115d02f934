//! Chat line handling: classifies a line typed by a participant, runs the
//! chat hooks, checks permissions and sends the decorated result to the
//! right audience.

pub mod audience;
pub mod format;
pub mod hooks;
pub mod tokenize;

use crate::config::ChatConfig;
use crate::participant::Participant;
use crate::permissions;
use audience::{send_msg, Audience, Delivery};
use format::{ChatRole, Timestamp};
use hooks::{ChatHooks, HookRegistry};
use std::sync::Arc;
use tracing::{debug, info};

pub const SERVER_MSG_PREFIX: char = '!';
pub const ADMIN_CHAT_PREFIX: char = '@';
pub const CHAT_CMD_PREFIX: char = '/';

pub const AUTH_COMMAND: &str = "auth";
/// The factory default admin password. `/auth` never accepts it.
pub const PLACEHOLDER_PASSWORD: &str = "CHANGEME";

/// Capability checked before a normal chat line is sent.
const CHAT_CATEGORY: &str = "chat";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageClass {
    ServerBroadcast,
    AdminChannel,
    Command,
    NormalChat,
}

impl MessageClass {
    /// Classifies a line by its first character.
    pub fn classify(msg: &str) -> MessageClass {
        match msg.chars().next() {
            Some(SERVER_MSG_PREFIX) => MessageClass::ServerBroadcast,
            Some(ADMIN_CHAT_PREFIX) => MessageClass::AdminChannel,
            Some(CHAT_CMD_PREFIX) => MessageClass::Command,
            _ => MessageClass::NormalChat,
        }
    }
}

/// What happened to a single chat line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatOutcome {
    /// The line was empty.
    Empty,
    /// A `pre_chat` hook rejected the line.
    Vetoed,
    /// The sender lacks the permission the class requires. Nothing is sent.
    Unauthorized(MessageClass),
    /// The sender may not chat right now, e.g. because they are muted.
    Silenced,
    /// A command line with no command name.
    NoCommand,
    /// `/auth` with the right password; the sender is now admin.
    Authenticated,
    /// The command was handed to the command hooks.
    CommandForwarded,
    Delivered(MessageClass),
}

impl ChatOutcome {
    /// Only a veto counts as a failure; drops are handled silently.
    pub fn is_success(self) -> bool {
        self != ChatOutcome::Vetoed
    }
}

type Clock = Box<dyn Fn() -> Timestamp + Send + Sync>;

/// Strips the one character sentinel off the front of `msg`.
fn strip_sentinel(msg: &str) -> &str {
    let mut chars = msg.chars();
    chars.next();
    chars.as_str()
}

pub struct Chat {
    config: ChatConfig,
    hooks: HookRegistry,
    clock: Clock,
}

impl std::fmt::Debug for Chat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chat")
            .field("user_limit", &self.config.user_limit)
            .field("hooks", &self.hooks)
            .finish()
    }
}

impl Chat {
    pub fn new(config: ChatConfig) -> Chat {
        Chat {
            config,
            hooks: HookRegistry::new(),
            clock: Box::new(Timestamp::now),
        }
    }

    /// Replaces the clock used to stamp each line.
    pub fn with_clock(mut self, clock: impl Fn() -> Timestamp + Send + Sync + 'static) -> Chat {
        self.clock = Box::new(clock);
        self
    }

    pub fn register_hooks(&mut self, hooks: impl ChatHooks + 'static) {
        self.hooks.register(hooks);
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Handles one line typed by `sender`.
    pub fn handle_msg<D: Delivery + ?Sized>(
        &self,
        sender: &Participant,
        delivery: &D,
        msg: &str,
    ) -> ChatOutcome {
        if msg.is_empty() {
            return ChatOutcome::Empty;
        }

        let timestamp = (self.clock)();

        if self.hooks.run_pre_chat(&sender.name, &timestamp, msg) {
            debug!("Chat from {} was vetoed", sender.name);
            return ChatOutcome::Vetoed;
        }
        self.hooks.run_post_chat(&sender.name, &timestamp, msg);

        let class = MessageClass::classify(msg);
        if !permissions::allows(sender, class) {
            debug!("Dropped {:?} from {}: permission denied", class, sender.name);
            return ChatOutcome::Unauthorized(class);
        }

        match class {
            MessageClass::ServerBroadcast => self.handle_server_msg(sender, delivery, msg),
            MessageClass::AdminChannel => {
                self.handle_admin_chat_msg(sender, delivery, msg, &timestamp)
            }
            MessageClass::Command => self.handle_command(sender, delivery, msg),
            MessageClass::NormalChat => self.handle_chat_msg(sender, delivery, msg, &timestamp),
        }
    }

    fn handle_server_msg<D: Delivery + ?Sized>(
        &self,
        sender: &Participant,
        delivery: &D,
        msg: &str,
    ) -> ChatOutcome {
        let text = strip_sentinel(msg);
        info!("[!] {}", text);
        send_msg(delivery, sender, &format::server_broadcast(text), Audience::Everyone);
        ChatOutcome::Delivered(MessageClass::ServerBroadcast)
    }

    fn handle_admin_chat_msg<D: Delivery + ?Sized>(
        &self,
        sender: &Participant,
        delivery: &D,
        msg: &str,
        timestamp: &Timestamp,
    ) -> ChatOutcome {
        let text = strip_sentinel(msg);
        info!("[@] <{}> {}", sender.name, text);
        let message = format::admin_channel(timestamp, &sender.name, text);
        send_msg(delivery, sender, &message, Audience::Admins);
        ChatOutcome::Delivered(MessageClass::AdminChannel)
    }

    fn handle_command<D: Delivery + ?Sized>(
        &self,
        sender: &Participant,
        delivery: &D,
        msg: &str,
    ) -> ChatOutcome {
        let command = tokenize::parse_cmd(strip_sentinel(msg));
        if command.is_empty_marker() {
            return ChatOutcome::NoCommand;
        }

        if command.name() == AUTH_COMMAND && self.is_admin_password(command.args().first()) {
            sender.set_admin(true);
            info!("{} authenticated as admin", sender.name);
            send_msg(delivery, sender, &format::auth_confirmation(), Audience::SenderOnly);
            return ChatOutcome::Authenticated;
        }

        self.hooks
            .run_command(&sender.name, command.name(), command.args());
        ChatOutcome::CommandForwarded
    }

    fn is_admin_password(&self, candidate: Option<&String>) -> bool {
        match candidate {
            Some(password) => {
                password != PLACEHOLDER_PASSWORD && *password == self.config.admin_password
            }
            None => false,
        }
    }

    fn handle_chat_msg<D: Delivery + ?Sized>(
        &self,
        sender: &Participant,
        delivery: &D,
        msg: &str,
        timestamp: &Timestamp,
    ) -> ChatOutcome {
        if !sender.can_communicate(CHAT_CATEGORY) {
            return ChatOutcome::Silenced;
        }

        let role = ChatRole::of(sender);
        match role {
            ChatRole::Console => info!("{} {}", sender.name, msg),
            ChatRole::Admin | ChatRole::Regular => info!("<{}> {}", sender.name, msg),
        }
        let message = format::chat_line(timestamp, role, &sender.name, msg);
        send_msg(delivery, sender, &message, Audience::Everyone);
        ChatOutcome::Delivered(MessageClass::NormalChat)
    }

    /// Sends `participant` the number of players online and their names.
    pub fn send_userlist<D: Delivery + ?Sized>(
        &self,
        participant: &Participant,
        delivery: &D,
    ) -> bool {
        let roster = delivery.roster();
        let online = roster.iter().filter(|p| p.is_logged_in()).count();

        let header = format::userlist_header(online, self.config.user_limit);
        let names = format::userlist(roster.iter().map(Arc::as_ref));
        send_msg(delivery, participant, &header, Audience::SenderOnly)
            && send_msg(delivery, participant, &names, Audience::SenderOnly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_first_character() {
        assert_eq!(MessageClass::classify("!restart"), MessageClass::ServerBroadcast);
        assert_eq!(MessageClass::classify("@psst"), MessageClass::AdminChannel);
        assert_eq!(MessageClass::classify("/auth x"), MessageClass::Command);
        assert_eq!(MessageClass::classify("hello"), MessageClass::NormalChat);
        assert_eq!(MessageClass::classify(" /not a command"), MessageClass::NormalChat);
        assert_eq!(MessageClass::classify("émoi"), MessageClass::NormalChat);
    }

    #[test]
    fn strips_one_sentinel() {
        assert_eq!(strip_sentinel("!!twice"), "!twice");
        assert_eq!(strip_sentinel("/"), "");
    }

    #[test]
    fn only_veto_is_failure() {
        assert!(!ChatOutcome::Vetoed.is_success());
        assert!(ChatOutcome::Empty.is_success());
        assert!(ChatOutcome::Unauthorized(MessageClass::AdminChannel).is_success());
        assert!(ChatOutcome::Delivered(MessageClass::NormalChat).is_success());
    }

    #[test]
    fn placeholder_password_is_never_accepted() {
        let chat = Chat::new(ChatConfig::default());
        let placeholder = PLACEHOLDER_PASSWORD.to_string();
        assert!(!chat.is_admin_password(Some(&placeholder)));
        assert!(!chat.is_admin_password(None));

        let chat = Chat::new(ChatConfig {
            admin_password: "hunter2".to_string(),
            ..Default::default()
        });
        assert!(chat.is_admin_password(Some(&"hunter2".to_string())));
        assert!(!chat.is_admin_password(Some(&"hunter3".to_string())));
    }
}
