use crate::config::Config;
use anyhow::Result;

pub fn run() -> Result<()> {
    let path = Config::path();
    if path.exists() {
        println!("ℹ️  {} already exists, leaving it untouched", path.display());
        return Ok(());
    }

    Config::default().save_to(&path)?;
    println!("✅ Wrote default configuration to {}", path.display());
    Ok(())
}
