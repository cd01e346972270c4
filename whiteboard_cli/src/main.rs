use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use comfy_table::Table;
use error::CliError;
use futures_util::SinkExt;
use serde::Deserialize;
use spinners::{Spinner, Spinners};
use std::path::PathBuf;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use whiteboard_canvas::{Brush, Color, EXPORT_FILE_NAME, Point, Segment, WsMessage};

mod error;
mod watch;

// The default base URL for the relay server.
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// A headless client for the collaborative whiteboard.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the relay server.
    #[arg(long, global = true, env = "WHITEBOARD_SERVER", default_value = DEFAULT_SERVER_URL)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show whether the relay is up and how many clients are connected.
    Status,
    /// Draw a single line on every connected board.
    /// Example: whiteboard line 0 0 10 10 --color '#ff0000' --size 4
    Line {
        #[arg(allow_negative_numbers = true)]
        x0: f64,
        #[arg(allow_negative_numbers = true)]
        y0: f64,
        #[arg(allow_negative_numbers = true)]
        x1: f64,
        #[arg(allow_negative_numbers = true)]
        y1: f64,
        /// Stroke color as hex.
        #[arg(long, default_value = "#000000")]
        color: String,
        /// Stroke width, 1 to 10.
        #[arg(long, default_value_t = 2.0)]
        size: f64,
    },
    /// Render everything drawn from now on, and save it as PNG on Ctrl-C.
    Watch {
        /// Where to write the image.
        #[arg(long, default_value = EXPORT_FILE_NAME)]
        out: PathBuf,
        #[arg(long, default_value_t = 800)]
        width: u32,
        #[arg(long, default_value_t = 384)]
        height: u32,
    },
}

// This struct is used to deserialize the JSON response from the health endpoint.
#[derive(Deserialize, Debug)]
struct HealthResponse {
    status: String,
    version: String,
    connections: usize,
    started_at: DateTime<Utc>,
}

/// Maps the server's base URL onto its relay socket URL.
fn ws_url(server: &str) -> Result<String, CliError> {
    let base = server.trim().trim_end_matches('/');
    let socket_base = if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if base.starts_with("ws://") || base.starts_with("wss://") {
        base.to_string()
    } else {
        return Err(CliError::InvalidServerUrl(server.to_string()));
    };
    Ok(format!("{socket_base}/ws"))
}

/// Maps the server's base URL onto its health endpoint.
fn health_url(server: &str) -> Result<String, CliError> {
    let base = server.trim().trim_end_matches('/');
    let http_base = if let Some(rest) = base.strip_prefix("ws://") {
        format!("http://{rest}")
    } else if let Some(rest) = base.strip_prefix("wss://") {
        format!("https://{rest}")
    } else if base.starts_with("http://") || base.starts_with("https://") {
        base.to_string()
    } else {
        return Err(CliError::InvalidServerUrl(server.to_string()));
    };
    Ok(format!("{http_base}/health"))
}

fn format_uptime(started_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - started_at).num_seconds().max(0);
    format!("{}h {:02}m {:02}s", secs / 3600, (secs % 3600) / 60, secs % 60)
}

async fn status(server: &str) -> Result<(), CliError> {
    let mut sp = Spinner::new(Spinners::Dots9, "Checking the relay...".into());

    let res = match reqwest::get(health_url(server)?).await {
        Ok(res) => res,
        Err(e) => {
            sp.stop_with_message("✗ Could not connect to the server.".into());
            return Err(e.into());
        }
    };
    if !res.status().is_success() {
        sp.stop_with_message("✗ Relay is unhealthy.".into());
        return Err(CliError::Status(res.status()));
    }
    let health = res.json::<HealthResponse>().await?;
    sp.stop_with_message("✓ Relay is up!".into());

    let mut table = Table::new();
    table.set_header(vec!["Server", "Status", "Version", "Clients", "Uptime"]);
    table.add_row(vec![
        server.to_string(),
        health.status,
        health.version,
        health.connections.to_string(),
        format_uptime(health.started_at, Utc::now()),
    ]);
    println!("\n{table}");
    Ok(())
}

async fn line(server: &str, from: Point, to: Point, brush: Brush) -> Result<(), CliError> {
    // Peers would silently drop a stroke they cannot parse.
    brush.color.parse::<Color>()?;
    let segment = Segment::between(from, to, &brush);

    let (mut ws, _) = connect_async(ws_url(server)?).await?;
    ws.send(Message::Text(WsMessage::Draw(segment).to_json()?.into()))
        .await?;
    ws.close(None).await?;

    println!(
        "✓ Drew ({}, {}) → ({}, {}) in {} at size {}",
        from.x, from.y, to.x, to.y, brush.color, brush.size
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "whiteboard=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Status => status(&cli.server).await?,
        Commands::Line {
            x0,
            y0,
            x1,
            y1,
            color,
            size,
        } => {
            line(
                &cli.server,
                Point::new(x0, y0),
                Point::new(x1, y1),
                Brush::new(color, size),
            )
            .await?
        }
        Commands::Watch { out, width, height } => {
            let recorder = watch::run(&ws_url(&cli.server)?, &out, width, height).await?;
            println!("\n--- 🖼  Board saved ---");
            println!("File:     {}", out.display());
            println!("Segments: {}", recorder.drawn());
            if recorder.skipped() > 0 {
                println!("Skipped:  {}", recorder.skipped());
            }
            println!("----------------------");
        }
    }

    Ok(())
}
