mod app;

use std::path::PathBuf;

use clap::Parser;
use physics_charts::build::JoinStyle;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use app::AppConfig;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON record file to load instead of the bundled copy
    #[arg(long)]
    data: Option<PathBuf>,

    /// Seed for row sampling and row colors
    #[arg(long)]
    seed: Option<u64>,

    /// Joint used between the inner bodies of a row
    #[arg(long, default_value = "pin")]
    join_style: JoinStyle,

    /// Disable the three-finger pan that slides the whole view
    #[arg(long)]
    no_screen_pan: bool,

    /// Logging verbosity: trace, debug, info, warn or error
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    fn into_config(self) -> AppConfig {
        AppConfig {
            data_path: self.data,
            seed: self.seed,
            join_style: self.join_style,
            screen_pan: !self.no_screen_pan,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.level())
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = args.into_config();
    info!(?config, "starting physics-charts v{}", env!("CARGO_PKG_VERSION"));

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };

    eframe::run_native(
        "physics-charts",
        options,
        Box::new(move |cc| Ok(Box::new(app::PhysicsChartsApp::new(cc, config)))),
    )
    .map_err(|error| anyhow::anyhow!("window closed with an error: {error}"))
}
