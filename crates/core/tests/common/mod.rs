#![allow(dead_code)]

use chrono::{Local, TimeZone};
use mcchat_core::chat::audience::Delivery;
use mcchat_core::chat::format::Timestamp;
use mcchat_core::chat::hooks::ChatHooks;
use mcchat_core::{Chat, ChatConfig, Participant, Permissions, Uid};
use mcchat_text::ChatEnvelope;
use std::io;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A message as it reached one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
    pub to: Uid,
    pub text: String,
}

pub struct TestServer {
    pub roster: Vec<Arc<Participant>>,
    sent: Mutex<Vec<Sent>>,
}

impl TestServer {
    pub fn new(roster: Vec<Participant>) -> TestServer {
        TestServer {
            roster: roster.into_iter().map(Arc::new).collect(),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Alice (member), Bob (admin), Olga (operator) and Gus (guest).
    pub fn with_regulars() -> TestServer {
        TestServer::new(vec![
            Participant::new(1, "Alice", Permissions::MEMBER),
            Participant::new(2, "Bob", Permissions::MEMBER | Permissions::ADMIN),
            Participant::new(3, "Olga", Permissions::MEMBER | Permissions::OPERATOR),
            Participant::new(4, "Gus", Permissions::GUEST),
        ])
    }

    pub fn get(&self, name: &str) -> Arc<Participant> {
        self.roster
            .iter()
            .find(|p| p.name == name)
            .cloned()
            .unwrap_or_else(|| panic!("{} is not online", name))
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn recipients(&self) -> Vec<Uid> {
        self.sent().into_iter().map(|s| s.to).collect()
    }
}

impl Delivery for TestServer {
    fn roster(&self) -> Vec<Arc<Participant>> {
        self.roster.clone()
    }

    fn send_packet(&self, recipient: &Participant, envelope: &ChatEnvelope) {
        let body: serde_json::Value = serde_json::from_str(envelope.json()).unwrap();
        let text = body["text"].as_str().unwrap().to_owned();
        self.sent.lock().unwrap().push(Sent {
            to: recipient.uid,
            text,
        });
    }
}

#[derive(Debug, Default)]
pub struct HookLog {
    pub pre: Vec<(String, String, String)>,
    pub post: Vec<(String, String, String)>,
    pub commands: Vec<(String, String, Vec<String>)>,
}

#[derive(Clone, Default)]
pub struct RecordingHooks {
    pub log: Arc<Mutex<HookLog>>,
    pub veto: bool,
}

impl RecordingHooks {
    pub fn vetoing() -> RecordingHooks {
        RecordingHooks {
            veto: true,
            ..Default::default()
        }
    }

    pub fn pre_count(&self) -> usize {
        self.log.lock().unwrap().pre.len()
    }

    pub fn post_count(&self) -> usize {
        self.log.lock().unwrap().post.len()
    }

    pub fn commands(&self) -> Vec<(String, String, Vec<String>)> {
        self.log.lock().unwrap().commands.clone()
    }
}

impl ChatHooks for RecordingHooks {
    fn pre_chat(&self, name: &str, timestamp: &Timestamp, text: &str) -> bool {
        self.log
            .lock()
            .unwrap()
            .pre
            .push((name.to_owned(), timestamp.to_string(), text.to_owned()));
        self.veto
    }

    fn post_chat(&self, name: &str, timestamp: &Timestamp, text: &str) {
        self.log
            .lock()
            .unwrap()
            .post
            .push((name.to_owned(), timestamp.to_string(), text.to_owned()));
    }

    fn on_command(&self, name: &str, command: &str, args: &[String]) {
        self.log
            .lock()
            .unwrap()
            .commands
            .push((name.to_owned(), command.to_owned(), args.to_vec()));
    }
}

pub fn at(hour: u32, minute: u32) -> Timestamp {
    Local
        .with_ymd_and_hms(2024, 3, 9, hour, minute, 0)
        .unwrap()
        .into()
}

/// A clock stuck at 07:05.
pub fn fixed_clock() -> impl Fn() -> Timestamp + Send + Sync + 'static {
    || at(7, 5)
}

/// A clock that moves forward one minute every time it is read, from 07:05.
pub fn ticking_clock() -> impl Fn() -> Timestamp + Send + Sync + 'static {
    let minute = AtomicU32::new(5);
    move || at(7, minute.fetch_add(1, Ordering::SeqCst))
}

pub fn chat_with(config: ChatConfig, hooks: &RecordingHooks) -> Chat {
    let mut chat = Chat::new(config).with_clock(fixed_clock());
    chat.register_hooks(hooks.clone());
    chat
}

pub fn password_config(password: &str) -> ChatConfig {
    ChatConfig {
        admin_password: password.to_owned(),
        ..Default::default()
    }
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Runs `f` with an INFO level subscriber and returns the lines it logged.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);

    let bytes = buffer.0.lock().unwrap().clone();
    let lines = String::from_utf8(bytes)
        .unwrap()
        .lines()
        .map(str::to_owned)
        .collect();
    (result, lines)
}
