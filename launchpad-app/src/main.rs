use anyhow::{bail, Result};
use launchpad_app::commands;
use launchpad_app::config::Config;
use launchpad_app::repl::Repl;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("init") => commands::init::run(),
        Some("health") => commands::health::run().await,
        Some("help") | Some("--help") | Some("-h") => {
            print_usage();
            Ok(())
        }
        Some(other) => {
            print_usage();
            bail!("Unknown command: {}", other)
        }
        None => {
            let config = match Config::load() {
                Ok(cfg) => cfg,
                Err(e) => {
                    eprintln!("❌ Failed to load config: {:#}", e);
                    eprintln!("💡 Tip: Run 'launchpad init' to write a default configuration");
                    return Err(e);
                }
            };
            Repl::new(&config).run().await
        }
    }
}

fn print_usage() {
    println!("Usage: launchpad [init | health | help]");
    println!();
    println!("  (no command)  Start the interactive launchpad");
    println!("  init          Write a default launchpad.yaml");
    println!("  health        Check configuration and backend reachability");
}
