use crate::config::Config;
use anyhow::{bail, Context, Result};
use launchpad_providers::{AgentDirectory, HttpBackend};

pub async fn run() -> Result<()> {
    println!("🏥 Health Check\n");

    let config = Config::load().context("Invalid configuration. Run 'launchpad init' first.")?;
    let backend = HttpBackend::new(&config.backend);

    let mut healthy = true;

    print!("⚙️  Configuration... ");
    println!("✓ ({})", Config::path().display());

    print!("🌐 Backend {}... ", backend.base_url());
    match backend.ping().await {
        Ok(status) => println!("✓ (HTTP {})", status),
        Err(e) => {
            println!("✗ ({})", e);
            healthy = false;
        }
    }

    print!("🤖 Agent directory... ");
    match backend.list_agents().await {
        Ok(agents) => println!("✓ ({} agents)", agents.len()),
        Err(e) => {
            println!("✗ ({})", e);
            healthy = false;
        }
    }

    println!();
    if !healthy {
        bail!("Health check failed");
    }
    println!("✅ All checks passed");
    Ok(())
}
