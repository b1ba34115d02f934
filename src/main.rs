use anyhow::{Context, Result};
use clap::Parser;
use mcchat_core::chat::audience::Delivery;
use mcchat_core::chat::hooks::ChatHooks;
use mcchat_core::{Chat, ChatConfig, Participant};
use mcchat_text::{strip_legacy, ChatEnvelope};
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Type chat lines and commands as the server console")]
struct Args {
    /// Config file to load. Missing keys are added with their defaults.
    #[arg(long, default_value = "Config.toml")]
    config: PathBuf,
    /// Name shown for lines typed into the console.
    #[arg(long, default_value = "Server")]
    name: String,
}

/// The only connection is the console itself, which prints what it receives.
struct ConsoleServer {
    roster: Vec<Arc<Participant>>,
}

impl Delivery for ConsoleServer {
    fn roster(&self) -> Vec<Arc<Participant>> {
        self.roster.clone()
    }

    fn send_packet(&self, recipient: &Participant, envelope: &ChatEnvelope) {
        if recipient.is_server_console() {
            println!("{}", strip_legacy(envelope.text()));
        }
    }
}

#[derive(Debug)]
struct ConsoleCommand {
    name: String,
    args: Vec<String>,
}

/// Queues commands so they run after the chat line has been handled.
struct ConsoleCommands {
    sender: Sender<ConsoleCommand>,
}

impl ChatHooks for ConsoleCommands {
    fn on_command(&self, _name: &str, command: &str, args: &[String]) {
        let queued = self.sender.send(ConsoleCommand {
            name: command.to_owned(),
            args: args.to_vec(),
        });
        if let Err(err) = queued {
            warn!("Dropped console command /{}: {}", err.0.name, err);
        }
    }
}

/// Returns `false` once the console asked to stop.
fn run_queued_commands(
    chat: &Chat,
    console: &Participant,
    server: &ConsoleServer,
    receiver: &Receiver<ConsoleCommand>,
) -> bool {
    while let Ok(command) = receiver.try_recv() {
        match command.name.as_str() {
            "list" => {
                chat.send_userlist(console, server);
            }
            "stop" => return false,
            _ => warn!(
                "Unknown command /{} ({} arguments)",
                command.name,
                command.args.len()
            ),
        }
    }
    true
}

fn main() -> Result<()> {
    // Setup logging
    let logfile = tracing_appender::rolling::daily("./logs", "mcchat.log");
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var("MCCHAT_LOG")
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_writer(logfile.and(std::io::stdout))
        .with_env_filter(env_filter)
        .init();

    let args = Args::parse();
    let config = ChatConfig::load(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;

    let console = Arc::new(Participant::console(args.name));
    let server = ConsoleServer {
        roster: vec![console.clone()],
    };

    let (sender, receiver) = mpsc::channel();
    let mut chat = Chat::new(config);
    chat.register_hooks(ConsoleCommands { sender });

    info!("Console chat ready. /list shows who is online, /stop exits.");
    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read console input")?;
        chat.handle_msg(&console, &server, line.trim_end());
        if !run_queued_commands(&chat, &console, &server, &receiver) {
            break;
        }
    }

    info!("Console closed");
    Ok(())
}
