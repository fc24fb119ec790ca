use anyhow::Result;
use clap::{CommandFactory, Parser};
use dubash::app::run_translate_command;
use dubash::cli::{Cli, Commands, ConfigAction};
use dubash::config::Config;
use owo_colors::OwoColorize;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => {
            let config = load_config(cli.config.as_deref());
            run_translate_command(
                config,
                cli.input,
                cli.target,
                cli.device,
                cli.model,
                cli.play,
                cli.output,
                cli.limit,
                cli.quiet,
                cli.verbose,
            )?;
        }
        Some(Commands::Languages) => {
            list_languages();
        }
        Some(Commands::Devices) => {
            list_audio_devices()?;
        }
        Some(Commands::Config { action }) => {
            handle_config_command(action, cli.config.as_deref())?;
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "dubash", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Config {
    match path {
        Some(p) => Config::load_or_default(p),
        None => Config::load_or_default(&Config::default_path()),
    }
    .with_env_overrides()
}

fn list_languages() {
    println!("Supported languages:");
    for language in dubash::lang::SUPPORTED {
        println!("  {}  {}", language.as_code().bold(), language.display_name());
    }
}

#[cfg(feature = "cpal-audio")]
fn list_audio_devices() -> Result<()> {
    let devices = dubash::audio::capture::list_devices()?;
    if devices.is_empty() {
        println!("No audio input devices found.");
    } else {
        println!("Available audio input devices:");
        for device in devices {
            println!("  {}", device);
        }
    }
    Ok(())
}

#[cfg(not(feature = "cpal-audio"))]
fn list_audio_devices() -> Result<()> {
    anyhow::bail!(
        "This binary was built without audio capture.\n\
        To fix: cargo build --release --features cpal-audio"
    )
}

fn handle_config_command(action: ConfigAction, path: Option<&Path>) -> Result<()> {
    let default_path = Config::default_path();
    let path = path.unwrap_or(&default_path);

    match action {
        ConfigAction::Show => {
            let config = Config::load_or_default(path).with_env_overrides();
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::Init => {
            if path.exists() {
                anyhow::bail!("Config file already exists at {}", path.display());
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, toml::to_string_pretty(&Config::default())?)?;
            println!("Wrote default configuration to {}", path.display());
        }
    }

    Ok(())
}
