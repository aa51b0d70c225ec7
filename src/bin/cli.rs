//! kvcache CLI Client
//!
//! Issues a single get/set/del against a cache server and prints the result.

use std::process::ExitCode;

use clap::Parser;
use kvcache::config::DEFAULT_PORT;
use kvcache::{Client, ClientConfig, Command, Request, Response, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// kvcache CLI
#[derive(Parser, Debug)]
#[command(name = "kvcache-cli")]
#[command(about = "CLI for a length-prefixed key-value cache server")]
#[command(version)]
struct Args {
    /// Cache server host
    #[arg(short, long, default_value = "localhost")]
    server: String,

    /// Cache server port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Command to run: get, set or del
    #[arg(short, long, default_value = "get")]
    command: String,

    /// Key
    #[arg(short, long, default_value = "")]
    key: String,

    /// Value (set only)
    #[arg(short, long, default_value = "")]
    value: String,

    /// Connect timeout in milliseconds (0 = OS default)
    #[arg(long, default_value = "0")]
    connect_timeout_ms: u64,

    /// Read/write timeout in milliseconds (0 = none)
    #[arg(long, default_value = "0")]
    timeout_ms: u64,
}

fn main() -> ExitCode {
    // Logs go to stderr so stdout only carries results
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(Response::Value(value)) => {
            println!("{}", String::from_utf8_lossy(&value));
            ExitCode::SUCCESS
        }
        Ok(Response::Empty) => {
            println!();
            ExitCode::SUCCESS
        }
        Ok(Response::Failure(message)) => {
            println!("error: {}", String::from_utf8_lossy(&message));
            ExitCode::FAILURE
        }
        Err(e) => {
            println!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<Response> {
    let command = Command::new(&args.command, &args.key, &args.value);

    // Reject unknown operations before dialing
    let request = Request::from_command(&command)?;

    let config = ClientConfig::builder()
        .host(&args.server)
        .port(args.port)
        .connect_timeout_ms(args.connect_timeout_ms)
        .read_timeout_ms(args.timeout_ms)
        .write_timeout_ms(args.timeout_ms)
        .build()?;

    tracing::debug!("kvcache-cli v{} -> {}", kvcache::VERSION, config.server_addr());

    let mut client = Client::connect(&config)?;
    client.execute(&request)
}
