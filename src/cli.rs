use anyhow::{anyhow, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use dialoguer::{theme::ColorfulTheme, Select};
use std::time::Duration;
use tracing::warn;

use crate::console::{self, ConsolePlayer};
use crate::core::lobby::{self, validate_username, DEFAULT_HOST_NAME};
use crate::game::{role, SessionReport};

#[derive(Parser)]
#[command(name = "lantoe")]
#[command(about = "Two-player tic-tac-toe over a TCP connection")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub options: SessionOptions,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Wait for a player to join. The host plays O.
    Host {
        /// Address to bind to
        #[arg(short, long, default_value = "0.0.0.0:4000")]
        addr: String,

        /// Your username (prompted for if omitted)
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Join a host. The joining player plays X, moves first and decides on rematches.
    Join {
        /// Host address, e.g. "127.0.0.1:4000"
        addr: String,

        /// Your username (prompted for if omitted)
        #[arg(short, long)]
        name: Option<String>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct SessionOptions {
    /// Give up on a silent peer after this many seconds (default: wait forever)
    #[arg(long, global = true, value_name = "SECS")]
    pub recv_timeout: Option<u64>,

    /// Also print the final statistics as JSON
    #[arg(long, global = true)]
    pub stats_json: bool,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

impl SessionOptions {
    pub fn recv_timeout(&self) -> Option<Duration> {
        self.recv_timeout.map(Duration::from_secs)
    }
}

pub async fn run_cli(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Host { addr, name }) => host(&addr, name, &cli.options).await,
        Some(Commands::Join { addr, name }) => join(&addr, name, &cli.options).await,
        None => show_main_menu(&cli.options).await,
    }
}

fn username(given: Option<String>, default: Option<&str>) -> Result<String> {
    match given {
        Some(name) => {
            validate_username(&name)?;
            Ok(name)
        }
        None => Ok(console::prompt_username(default)?),
    }
}

async fn host(addr: &str, name: Option<String>, options: &SessionOptions) -> Result<()> {
    let name = username(name, Some(DEFAULT_HOST_NAME))?;
    let stream = lobby::accept_one(addr).await?;
    let (net, identities) = lobby::establish(stream, &name, true, options.recv_timeout()).await?;
    println!("{} has connected", identities.peer);

    let report = role::responder(net, ConsolePlayer::new(), identities).run().await;
    finish(report, options)
}

async fn join(addr: &str, name: Option<String>, options: &SessionOptions) -> Result<()> {
    let stream = loop {
        match lobby::connect(addr).await {
            Ok(stream) => break stream,
            Err(e) => {
                warn!(error = %e, %addr, "connection failed");
                if !console::confirm("Connection failed, try again?")? {
                    println!("Ending program");
                    return Ok(());
                }
            }
        }
    };
    println!("Connected to host successfully");

    let name = username(name, None)?;
    let (net, identities) = lobby::establish(stream, &name, false, options.recv_timeout()).await?;
    println!("Host's username is: {}", identities.peer);

    let report = role::initiator(net, ConsolePlayer::new(), identities).run().await;
    finish(report, options)
}

fn finish(report: SessionReport, options: &SessionOptions) -> Result<()> {
    if options.stats_json {
        let json = serde_json::json!({
            "identities": report.identities,
            "stats": report.stats,
            "error": report.error.as_ref().map(|e| e.to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
    }

    match report.error {
        Some(e) => Err(anyhow!(e)),
        None => Ok(()),
    }
}

async fn show_main_menu(options: &SessionOptions) -> Result<()> {
    println!("Welcome to lantoe!");
    println!("   Tic-tac-toe for two over the network");
    println!();

    let choices = vec!["Host a game", "Join a game", "Exit"];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("What would you like to do?")
        .items(&choices)
        .default(0)
        .interact()?;

    match selection {
        0 => {
            let addr = console::prompt_address("0.0.0.0:4000")?;
            host(&addr, None, options).await
        }
        1 => {
            let addr = console::prompt_address("127.0.0.1:4000")?;
            join(&addr, None, options).await
        }
        _ => {
            println!("Goodbye!");
            Ok(())
        }
    }
}
