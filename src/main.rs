use std::io;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rentbuy::api::{parse_raw_record, run_http_server};
use rentbuy::core::{AnalysisError, analyze, example_record};

#[derive(Parser, Debug)]
#[command(
    name = "rentbuy",
    about = "Compare the long-run cost of buying a home against renting"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON API
    Serve {
        #[arg(long, env = "RENTBUY_BIND", default_value = "0.0.0.0")]
        bind: IpAddr,
        #[arg(long, env = "RENTBUY_PORT", default_value_t = 8080)]
        port: u16,
    },
    /// Analyze one raw input record (JSON object) and print the result
    Analyze {
        #[arg(long, help = "JSON file with the input record; reads stdin when omitted")]
        input: Option<PathBuf>,
        #[arg(long)]
        pretty: bool,
    },
    /// Print the example input record
    Example,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { bind, port } => {
            run_http_server(SocketAddr::new(bind, port))
                .await
                .context("HTTP server failed")?;
        }
        Command::Analyze { input, pretty } => run_analyze(input, pretty)?,
        Command::Example => {
            println!("{}", serde_json::to_string_pretty(&example_record())?);
        }
    }
    Ok(())
}

fn run_analyze(input: Option<PathBuf>, pretty: bool) -> anyhow::Result<()> {
    let json = match &input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => io::read_to_string(io::stdin()).context("failed to read stdin")?,
    };
    let raw = parse_raw_record(&json).context("input must be a JSON object")?;

    let result = match analyze(&raw) {
        Ok(result) => result,
        Err(AnalysisError::Validation(fields)) => {
            for (field, message) in fields.iter() {
                eprintln!("{field}: {message}");
            }
            std::process::exit(2);
        }
        Err(err) => return Err(err.into()),
    };

    let out = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{out}");
    Ok(())
}
