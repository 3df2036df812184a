//! Interactive launchpad session.

use crate::config::Config;
use crate::render;
use anyhow::Result;
use launchpad_core::{
    AgentManager, ChatSession, LaunchEvent, LaunchOrchestrator, LaunchOutcome, RejectReason,
};
use launchpad_providers::HttpBackend;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Launch(String),
    Reset,
    Status,
    Agents,
    CreateAgent(String),
    LoadAgent(String),
    Chat(String),
    ClearChat,
    Help,
    Exit,
}

/// Parses one input line. Text that is not a command is a launch prompt,
/// including text that merely starts with an argumentless keyword
/// ("help me launch ...").
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim().to_string()),
        None => (line, String::new()),
    };

    let has_args = !rest.is_empty();
    let bare = |command: Command| {
        if !has_args {
            command
        } else {
            Command::Launch(line.to_string())
        }
    };

    let command = match head {
        "launch" => Command::Launch(rest),
        "create-agent" => Command::CreateAgent(rest),
        "load-agent" => Command::LoadAgent(rest),
        "chat" => Command::Chat(rest),
        "reset" => bare(Command::Reset),
        "status" => bare(Command::Status),
        "agents" => bare(Command::Agents),
        "clear" => bare(Command::ClearChat),
        "help" => bare(Command::Help),
        "exit" | "quit" => bare(Command::Exit),
        _ => Command::Launch(line.to_string()),
    };
    Some(command)
}

/// Runs one launch and hands every event it emits to `on_event`.
///
/// Returns only after the last event of the run has been delivered.
pub async fn launch_with_events<F>(
    orchestrator: &LaunchOrchestrator,
    prompt: &str,
    mut on_event: F,
) -> LaunchOutcome
where
    F: FnMut(&LaunchEvent),
{
    let mut events = orchestrator.subscribe();
    let launch = orchestrator.run_launch(prompt);
    tokio::pin!(launch);

    let outcome = loop {
        tokio::select! {
            outcome = &mut launch => break outcome,
            event = events.recv() => match event {
                Ok(event) => on_event(&event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Skipped {} launch events", skipped);
                }
                Err(RecvError::Closed) => break (&mut launch).await,
            },
        }
    };

    loop {
        match events.try_recv() {
            Ok(event) => on_event(&event),
            Err(TryRecvError::Lagged(skipped)) => {
                warn!("Skipped {} launch events", skipped);
            }
            Err(_) => break,
        }
    }

    outcome
}

pub struct Repl {
    orchestrator: Arc<LaunchOrchestrator>,
    agents: AgentManager,
    chat: ChatSession,
}

impl Repl {
    pub fn new(config: &Config) -> Self {
        let backend = Arc::new(HttpBackend::new(&config.backend));
        let orchestrator = LaunchOrchestrator::new(backend.clone())
            .with_explorer_url(config.explorer_url.clone());

        Self {
            orchestrator: Arc::new(orchestrator),
            agents: AgentManager::new(backend.clone()),
            chat: ChatSession::new(backend),
        }
    }

    pub async fn run(mut self) -> Result<()> {
        println!("╔══════════════════════════════════════════════════════════════════╗");
        println!("║              Launchpad · AI token launch console                 ║");
        println!("║  Describe your token, or type 'help' for commands                ║");
        println!("╚══════════════════════════════════════════════════════════════════╝");
        println!();
        println!("Example: Create a token named Rocket with symbol RKT and supply of 100,000");
        println!();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        loop {
            stdout.write_all(b"launchpad> ").await?;
            stdout.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let Some(command) = parse_command(&line) else {
                continue;
            };

            if command == Command::Exit {
                println!("👋 Goodbye!");
                break;
            }
            self.execute(command).await;
        }

        Ok(())
    }

    async fn execute(&mut self, command: Command) {
        match command {
            Command::Launch(prompt) => {
                let outcome = launch_with_events(&self.orchestrator, &prompt, print_event).await;
                match outcome {
                    LaunchOutcome::Rejected(RejectReason::EmptyPrompt) => {
                        println!("💡 Usage: launch <description of your token>");
                    }
                    LaunchOutcome::Rejected(RejectReason::AlreadyRunning) => {
                        println!("⏳ A launch is already in progress");
                    }
                    _ => {}
                }
            }
            Command::Reset => {
                self.orchestrator.reset();
                print_event(&LaunchEvent::Reset);
            }
            Command::Status => {
                println!("\n{}", render::status(&self.orchestrator.snapshot()));
                let metrics = self.orchestrator.metrics().snapshot();
                println!(
                    "  Launches: {} started, {} succeeded, {} aborted, {} failed",
                    metrics.launches_started,
                    metrics.launches_succeeded,
                    metrics.launches_aborted,
                    metrics.launches_failed
                );
                println!(
                    "  Backend success rate: {:.1}%\n",
                    metrics.backend_success_rate() * 100.0
                );
            }
            Command::Agents => match self.agents.list_agents().await {
                Ok(agents) if agents.is_empty() => println!("No agents found"),
                Ok(agents) => {
                    println!("\n🤖 Agents:");
                    for agent in agents {
                        println!("  • {}", agent);
                    }
                    println!();
                }
                Err(e) => eprintln!("❌ Failed to fetch agents: {}", e),
            },
            Command::CreateAgent(prompt) => match self.agents.create_agent(&prompt).await {
                Ok(config) => println!("✅ Agent {} created successfully!", config.name),
                Err(e) => eprintln!("❌ Failed to create agent: {}", e),
            },
            Command::LoadAgent(name) => match self.agents.load_agent(&name).await {
                Ok(_) => println!("✅ Agent {} loaded successfully!", name),
                Err(e) => eprintln!("❌ Failed to load agent {}: {}", name, e),
            },
            Command::Chat(prompt) => match self.chat.ask(&prompt).await {
                Some(reply) => println!("\n{}\n", render::chat_reply(&reply)),
                None => println!("💡 Usage: chat <message>"),
            },
            Command::ClearChat => {
                self.chat.clear();
                println!("Chat cleared");
            }
            Command::Help => print_help(),
            Command::Exit => {}
        }
    }
}

fn print_event(event: &LaunchEvent) {
    if let Some(line) = render::launch_event(event) {
        println!("{}", line);
    }
}

fn print_help() {
    println!("\n📖 Available Commands:");
    println!("  launch <prompt>        - Launch a token (plain text works too)");
    println!("  reset                  - Clear the launchpad");
    println!("  status                 - Show launch progress");
    println!("  agents                 - List agents");
    println!("  create-agent <prompt>  - Generate and register an agent");
    println!("  load-agent <name>      - Load an agent");
    println!("  chat <message>         - Talk to the loaded agent");
    println!("  clear                  - Clear the chat history");
    println!("  exit, quit             - Leave");
    println!();
    println!("  Any other text is a launch prompt. Keywords followed by more text");
    println!("  (\"help me launch ...\") are launch prompts too.");
    println!();
}
