mod app;
mod coauthor;
mod records;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::app::ForceConfig;
use crate::records::InputFormat;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// CSV or JSON export of bibliographic records.
    input: PathBuf,

    /// Input format; inferred from the file extension when omitted.
    #[arg(long, value_enum)]
    format: Option<InputFormat>,

    /// Print a JSON summary of the co-authorship graph and exit without a window.
    #[arg(long)]
    summary: bool,

    #[arg(long, env = "RUST_LOG", default_value = "info")]
    log_level: String,

    #[arg(long)]
    json_logs: bool,

    #[arg(
        long,
        default_value_t = ForceConfig::default().charge_strength,
        allow_negative_numbers = true
    )]
    charge_strength: f32,

    #[arg(long, default_value_t = ForceConfig::default().collide_factor)]
    collide_factor: f32,

    #[arg(long, default_value_t = ForceConfig::default().link_strength)]
    link_strength: f32,

    #[arg(long, default_value_t = 1440.0)]
    width: f32,

    #[arg(long, default_value_t = 920.0)]
    height: f32,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

fn print_summary(args: &Args) -> Result<()> {
    let dataset = coauthor::collect_dataset(&args.input, args.format)?;
    let summary = serde_json::to_string_pretty(&dataset.summary())
        .context("failed to serialize graph summary")?;
    println!("{summary}");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level, args.json_logs);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        input = %args.input.display(),
        "starting co-authorship network"
    );

    if args.summary {
        return print_summary(&args);
    }

    let forces =
        ForceConfig::validated(args.charge_strength, args.collide_factor, args.link_strength);
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([args.width.max(320.0), args.height.max(240.0)]),
        ..Default::default()
    };

    let input = args.input;
    let format = args.format;
    eframe::run_native(
        "Co-authorship network",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::CoauthorApp::new(
                cc,
                input.clone(),
                format,
                forces,
            )))
        }),
    )
    .map_err(|error| anyhow!("failed to start the viewer: {error}"))
}
