use std::io::IsTerminal;

use chatcart::config::{
    ClientConfig, ConfigError, DEFAULT_BASE_URL, DEFAULT_CHAT_PATH, DEFAULT_CONNECT_TIMEOUT_SECS,
};
use chatcart::controller::{DEFAULT_EMPTY_REPLY, DEFAULT_EXCHANGE_FAILED, DEFAULT_GREETING};
use chatcart::net::HttpChatClient;
use chatcart::opener::SystemOpener;
use chatcart::render::TerminalSurface;
use chatcart::repl::{self, Mode};
use chatcart::{TurnController, TurnMessages};
use clap::Parser;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Parser, Debug)]
#[command(name = "chatcart", about = "Terminal client for a conversational shopping endpoint")]
struct Cli {
    #[arg(long, env = "CHATCART_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[arg(long, env = "CHATCART_CHAT_PATH", default_value = DEFAULT_CHAT_PATH)]
    chat_path: String,

    #[arg(long, env = "CHATCART_CONNECT_TIMEOUT_SECS", default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS)]
    connect_timeout_secs: u64,

    #[arg(long, env = "CHATCART_REQUEST_TIMEOUT_SECS", help = "Give up on a reply after this long (default: wait)")]
    request_timeout_secs: Option<u64>,

    #[arg(long, help = "Log checkout links instead of opening them")]
    no_open_checkout: bool,

    #[arg(long, env = "CHATCART_GREETING", default_value = DEFAULT_GREETING)]
    greeting: String,

    #[arg(long, env = "CHATCART_EMPTY_REPLY", default_value = DEFAULT_EMPTY_REPLY)]
    empty_reply: String,

    #[arg(long, env = "CHATCART_ERROR_TEXT", default_value = DEFAULT_EXCHANGE_FAILED)]
    error_text: String,

    #[arg(long, env = "CHATCART_LOG", default_value = "warn")]
    log_level: tracing::Level,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .init();

    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(error) if error.not_found() => {}
        Err(error) => tracing::warn!(%error, ".env not loaded"),
    }

    let config = ClientConfig {
        base_url: cli.base_url,
        chat_path: cli.chat_path,
        connect_timeout_secs: cli.connect_timeout_secs,
        request_timeout_secs: cli.request_timeout_secs,
        open_checkout: !cli.no_open_checkout,
    };
    let transport = HttpChatClient::new(&config)?;
    let opener = SystemOpener::new(config.base()?).with_launch(config.open_checkout);
    tracing::info!(endpoint = %transport.endpoint(), "chatcart starting");

    let interactive = std::io::stdin().is_terminal();
    let surface = TerminalSurface::new(std::io::stdout()).with_overwrite_echo(interactive);
    let messages = TurnMessages { empty_reply: cli.empty_reply, exchange_failed: cli.error_text };
    let controller = TurnController::new(transport, surface, opener).with_messages(messages);

    controller.greet(&cli.greeting);
    let mode = if interactive { Mode::Interactive } else { Mode::Sequential };
    repl::run(&controller, repl::spawn_stdin_reader(), mode).await;

    tracing::info!(session_id = ?controller.session_id(), "chatcart exiting");
    Ok(())
}
