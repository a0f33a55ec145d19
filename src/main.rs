use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use evy::{lexer, Config, Lexer, Token};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(author, version, about = "evy language tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the token stream of an evy source file
    Tokenize {
        /// Source file to scan
        file: PathBuf,
        /// Print tokens as a JSON array instead of one per line
        #[arg(long)]
        json: bool,
    },
    /// Manage evy configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Write a config file with defaults
    Init,
    /// Print the config file location
    Path,
}

fn tokenize(file: &Path, json: bool) -> Result<()> {
    let source = fs::read_to_string(file)
        .with_context(|| format!("cannot read {}", file.display()))?;
    debug!(file = %file.display(), chars = source.chars().count(), "scanning");

    if json {
        let mut scanner = Lexer::new(&source);
        let mut tokens: Vec<Token> = scanner.by_ref().collect();
        tokens.push(scanner.next_token());
        println!("{}", serde_json::to_string_pretty(&tokens)?);
    } else {
        print!("{}", lexer::run(&source));
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Tokenize { file, json } => tokenize(&file, json)?,
        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
            ConfigCommands::Init => {
                let path = Config::get_config_path();
                if path.exists() {
                    println!("Config file already exists at: {}", path.display());
                } else {
                    Config::default().save(&path)?;
                    println!("Initialized new config file at: {}", path.display());
                }
            }
            ConfigCommands::Path => {
                println!("{}", Config::get_config_path().display());
            }
        },
    }

    Ok(())
}
