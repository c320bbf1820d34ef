use std::io::{self, Write};

use chat_core::Config;
use clap::{Parser, Subcommand};
use colored::Colorize;
use session_manager::ChatSession;

#[derive(Parser)]
#[command(name = "fusion-cli")]
#[command(about = "Terminal front-end for the fusion engine")]
#[command(version)]
struct Cli {
    /// Backend base URL (overrides config file and environment)
    #[arg(long)]
    base_url: Option<String>,

    /// Use the batch endpoint instead of the streaming one
    #[arg(long, default_value = "false")]
    batch: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start interactive chat
    Chat,
    /// Send a single message and print the reply
    Send {
        /// Message content
        message: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = Config::load();
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if cli.batch {
        config.streaming = false;
    }
    log::debug!(
        "backend: {} ({})",
        config.base_url,
        if config.streaming { "streaming" } else { "batch" }
    );

    let mut chat = ChatSession::new(&config);

    match cli.command {
        Commands::Chat => run_interactive_chat(&mut chat).await,
        Commands::Send { message } => send_message(&mut chat, &message).await,
    }
}

async fn send_message(chat: &mut ChatSession, message: &str) -> anyhow::Result<()> {
    if !chat.submit(message).await {
        println!("{}", "Nothing to send.".dimmed());
        return Ok(());
    }
    render_turn(chat);
    Ok(())
}

/// Print the status feed and the assistant reply of the last turn. This is
/// the rendering layer: it only reads session state, it never mutates it.
fn render_turn(chat: &ChatSession) {
    for status in chat.status_feed() {
        println!("{}", format!("· {}", status).dimmed());
    }
    if let Some(reply) = chat.messages().last() {
        println!("{}", reply.content);
    }
}

async fn run_interactive_chat(chat: &mut ChatSession) -> anyhow::Result<()> {
    println!("{}", "Fusion engine chat".cyan().bold());
    println!("{}", format!("Session: {}", chat.session().id()).dimmed());
    println!("{}", "Type 'exit' or 'quit' to leave".dimmed());
    println!();

    loop {
        print!("{} ", "You:".cyan().bold());
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            println!("{}", "Goodbye!".cyan());
            break;
        }

        if input.is_empty() {
            continue;
        }

        if chat.submit(input).await {
            println!("{}", "Assistant:".green().bold());
            render_turn(chat);
        }
        println!();
    }

    Ok(())
}
