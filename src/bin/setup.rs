//! notebridge setup wizard.
//!
//! Prompts for the bot token, the Telegram user whose messages get archived
//! and the notes directory, then writes `config.toml` to the project root.
//! An existing config is left alone unless `--force` is given.

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

// ── Config formatting ──────────────────────────────────────────────────────────

struct ConfigParams<'a> {
    bot_token: &'a str,
    user_id: u64,
    notes_dir: &'a str,
}

/// Quote a value as a TOML string, escaping whatever needs it.
fn toml_string(value: &str) -> String {
    toml::Value::String(value.to_owned()).to_string()
}

/// Produces a valid config.toml string. Extracted so it can be unit-tested.
fn format_config(p: &ConfigParams<'_>) -> String {
    let bot_token = toml_string(p.bot_token);
    let user_id = p.user_id;
    let notes_dir = toml_string(p.notes_dir);

    format!(
        r#"[telegram]
bot_token = {bot_token}
authorized_user_id = {user_id}
# poll_timeout_secs = 60

[notes]
directory = {notes_dir}
"#
    )
}

fn parse_user_id(input: &str) -> Result<u64> {
    input
        .trim()
        .parse()
        .with_context(|| format!("Telegram user ID must be a number, got '{}'", input.trim()))
}

// ── CLI ────────────────────────────────────────────────────────────────────────

fn run_cli(project_root: &Path, force: bool) -> Result<()> {
    let config_path = project_root.join("config.toml");
    if config_path.exists() && !force {
        println!(
            "{} already exists. Re-run with --force to replace it.",
            config_path.display()
        );
        return Ok(());
    }

    println!("=== notebridge setup ===\n");

    let read_line = |prompt: &str| -> Result<String> {
        print!("{prompt}");
        io::stdout().flush()?;
        let mut buf = String::new();
        io::stdin().read_line(&mut buf)?;
        Ok(buf.trim().to_owned())
    };

    let bot_token = read_line("Telegram bot token: ")?;
    let user_id = parse_user_id(&read_line("Your Telegram user ID: ")?)?;
    let notes_dir = match read_line("Notes directory [notes]: ")? {
        s if s.is_empty() => "notes".to_owned(),
        s => s,
    };

    let config = format_config(&ConfigParams {
        bot_token: &bot_token,
        user_id,
        notes_dir: &notes_dir,
    });

    std::fs::write(&config_path, &config)
        .with_context(|| format!("Could not write {}", config_path.display()))?;

    println!("\n✓  config.toml saved to {}", config_path.display());
    println!("   Run the bridge with:  cargo run");
    Ok(())
}

fn main() -> Result<()> {
    let force = std::env::args().any(|a| a == "--force");

    // Resolve project root: prefer NOTEBRIDGE_ROOT env, fall back to cwd.
    let project_root =
        PathBuf::from(std::env::var("NOTEBRIDGE_ROOT").unwrap_or_else(|_| ".".to_string()));

    run_cli(&project_root, force)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
