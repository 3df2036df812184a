//! Terminal rendering of launch events and chat replies.

use launchpad_core::chat::{FAILED_MESSAGE, UNPROCESSED_MESSAGE};
use launchpad_core::format::{format_amount, format_balance};
use launchpad_core::{ChatReply, LaunchEvent, LaunchResult, LaunchSnapshot, Role, Stage};
use rand::seq::SliceRandom;

const BALANCE_CAPTIONS: &[&str] = &[
    "Your wallet is looking healthy! 🌟",
    "Here's what you're holding! 💰",
    "Behold, your crypto treasury! ✨",
    "Portfolio snapshot ready! 🎯",
    "Your digital assets, visualized! 📊",
];

pub fn launch_event(event: &LaunchEvent) -> Option<String> {
    match event {
        LaunchEvent::Message(message) if message.role == Role::Bot => {
            Some(format!("🚀 {}", message.content))
        }
        LaunchEvent::Message(_) => None,
        LaunchEvent::TokenInfo(token) => Some(format!(
            "🪙 {} (${}) · initial supply {} · max supply {}",
            token.name,
            token.symbol,
            format_amount(token.initial_supply),
            token
                .max_supply
                .map(format_amount)
                .unwrap_or_else(|| "Unlimited".to_string())
        )),
        LaunchEvent::StageStarted(stage) => Some(format!(
            "{} {}: {}…",
            step_bar(*stage),
            stage.title(),
            stage.description()
        )),
        LaunchEvent::StageCompleted(stage) => Some(format!("   ✓ {}", stage.title())),
        LaunchEvent::Aborted => Some("⏹  Launch stopped".to_string()),
        LaunchEvent::Failed(stage) => Some(format!("❌ Launch failed during {}", stage.title())),
        LaunchEvent::Succeeded(result) => Some(success_summary(result)),
        LaunchEvent::Reset => Some("↺  Launchpad reset".to_string()),
    }
}

/// `[■■□□]` style indicator with the given stage in progress.
fn step_bar(current: Stage) -> String {
    let cells: String = Stage::ALL
        .iter()
        .map(|stage| if stage.index() <= current.index() { '■' } else { '□' })
        .collect();
    format!("[{}]", cells)
}

pub fn success_summary(result: &LaunchResult) -> String {
    format!(
        "\n✅ Token Launch Successful!\n   Token:            {} (${})\n   Contract address: {}\n   Minted supply:    {} ${}\n   Explorer:         {}\n",
        result.name,
        result.symbol,
        result.contract_address,
        format_amount(result.minted_amount),
        result.symbol,
        result.explorer_url
    )
}

pub fn status(snapshot: &LaunchSnapshot) -> String {
    let mut lines = vec!["📊 Launch Status:".to_string()];
    lines.push(format!(
        "  Running: {}",
        if snapshot.in_progress { "yes" } else { "no" }
    ));
    lines.push(format!(
        "  Current stage: {}",
        snapshot
            .current_stage
            .map(|s| s.title().to_string())
            .unwrap_or_else(|| "-".to_string())
    ));
    let completed: Vec<&str> = snapshot.completed_stages.iter().map(|s| s.id()).collect();
    lines.push(format!("  Completed: [{}]", completed.join(", ")));
    if let Some(address) = &snapshot.contract_address {
        lines.push(format!("  Contract: {}", address));
    }
    lines.push(format!("  Messages: {}", snapshot.messages.len()));
    lines.join("\n")
}

pub fn chat_reply(reply: &ChatReply) -> String {
    match reply {
        ChatReply::Text { content, links } => {
            let mut out = content.trim().to_string();
            for link in links {
                out.push_str(&format!("\n  🔗 {}", link));
            }
            out
        }
        ChatReply::Balance(balance) => {
            let caption = BALANCE_CAPTIONS
                .choose(&mut rand::thread_rng())
                .copied()
                .unwrap_or(BALANCE_CAPTIONS[0]);
            format!("{}\n  💰 {}", caption, format_balance(*balance))
        }
        ChatReply::Protocol(value) => {
            let name = value
                .get("protocol_name")
                .and_then(|v| v.as_str())
                .unwrap_or("Protocol");
            let details = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
            format!("📘 {}\n{}", name, details)
        }
        ChatReply::Unprocessed => UNPROCESSED_MESSAGE.to_string(),
        ChatReply::Failed => FAILED_MESSAGE.to_string(),
    }
}
