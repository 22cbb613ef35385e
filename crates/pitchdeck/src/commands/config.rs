use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> Result<()> {
    let path = Config::path()?;
    println!("{} {}", "Config file:".bold(), path.display());
    println!();

    let config = if path.exists() {
        Config::load_from(&path)?
    } else {
        println!("{}", "No config file yet, showing defaults.".dimmed());
        println!();
        Config::default()
    };

    println!("  defaults.theme          {}", config.theme_name());
    println!(
        "  defaults.transition_ms  {}",
        config.transition().as_millis()
    );
    println!(
        "  defaults.start_slide    {}",
        config
            .start_slide()
            .map(|n| n.to_string())
            .unwrap_or_else(|| "1".to_string())
    );
    println!(
        "  defaults.font           {}",
        config
            .font()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(built-in)".dimmed().to_string())
    );
    println!("  audio.volume            {:.2}", config.volume());
    Ok(())
}

fn set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load_or_default();
    config.set(key, value)?;
    let path = config.save()?;
    println!(
        "{} {key} = {value} ({})",
        "Saved".green().bold(),
        path.display()
    );
    Ok(())
}
