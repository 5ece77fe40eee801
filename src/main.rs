//! Crop Recommender server and CLI
//!
//! Serves the recommendation web front-end by default. The `predict` and
//! `inspect` subcommands run the same pipeline and loader from the terminal.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing::{info, warn};

use crop_recommender::model::{load_model, Classifier, FEATURE_NAMES};
use crop_recommender::utils::{format_duration, init_logging, LogConfig, LogLevel};
use crop_recommender::{
    routes, AppState, PredictionOutcome, PredictionService, ServerConfig, DEFAULT_HOST,
    DEFAULT_MODEL_PATH, DEFAULT_PORT, VERSION,
};

/// Crop Recommender
///
/// Recommends a crop from soil nutrients and climate measurements using a
/// pre-trained classifier.
#[derive(Parser, Debug)]
#[command(name = "crop_recommender")]
#[command(version)]
#[command(about = "Web front-end for crop recommendation", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true, default_value = "false")]
    verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "CROP_LOG_LEVEL")]
    log_level: Option<LogLevel>,

    /// Plain log output without ANSI colors, for log files and collectors
    #[arg(long, global = true, default_value = "false")]
    no_color: bool,

    /// Subcommand to execute (defaults to `serve`)
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the web server
    Serve(ServeArgs),

    /// Predict a crop for one set of measurements
    Predict(PredictArgs),

    /// Load a model artifact and describe it
    Inspect {
        /// Path to the model artifact
        #[arg(short, long, env = "CROP_MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
struct ServeArgs {
    /// Host to bind to
    #[arg(long, env = "CROP_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "CROP_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Path to the model artifact
    #[arg(short, long, env = "CROP_MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    model: PathBuf,

    /// Answer 422/500 for failed predictions instead of 200
    #[arg(long, default_value = "false")]
    strict_status: bool,
}

impl From<ServeArgs> for ServerConfig {
    fn from(args: ServeArgs) -> Self {
        ServerConfig {
            host: args.host,
            port: args.port,
            model_path: args.model,
            strict_status: args.strict_status,
        }
    }
}

#[derive(Args, Debug)]
struct PredictArgs {
    /// Path to the model artifact
    #[arg(short, long, env = "CROP_MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    model: PathBuf,

    /// Nitrogen content of the soil (N)
    #[arg(long, allow_hyphen_values = true)]
    nitrogen: String,

    /// Phosphorus content of the soil (P)
    #[arg(long, allow_hyphen_values = true)]
    phosphorus: String,

    /// Potassium content of the soil (K)
    #[arg(long, allow_hyphen_values = true)]
    potassium: String,

    /// Temperature in degrees Celsius
    #[arg(long, allow_hyphen_values = true)]
    temperature: String,

    /// Relative humidity in percent
    #[arg(long, allow_hyphen_values = true)]
    humidity: String,

    /// Soil pH
    #[arg(long, allow_hyphen_values = true)]
    ph: String,

    /// Rainfall in mm
    #[arg(long, allow_hyphen_values = true)]
    rainfall: String,
}

impl PredictArgs {
    /// Form fields keyed the same way the web form submits them
    fn fields(&self) -> HashMap<String, String> {
        [
            ("N", &self.nitrogen),
            ("P", &self.phosphorus),
            ("K", &self.potassium),
            ("temperature", &self.temperature),
            ("humidity", &self.humidity),
            ("ph", &self.ph),
            ("rainfall", &self.rainfall),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
    }
}

fn log_config(cli: &Cli) -> LogConfig {
    let mut config = if cli.verbose {
        LogConfig::verbose()
    } else if cli.no_color {
        LogConfig::production()
    } else {
        LogConfig::default()
    };
    if cli.no_color {
        config.ansi_colors = false;
    }
    if let Some(level) = cli.log_level {
        config = config.with_level(level);
    }
    config
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _ = init_logging(&log_config(&cli));

    match cli.command {
        None => serve(cli.serve.into()).await,
        Some(Commands::Serve(args)) => serve(args.into()).await,
        Some(Commands::Predict(args)) => cmd_predict(&args),
        Some(Commands::Inspect { model }) => cmd_inspect(&model),
    }
}

async fn serve(config: ServerConfig) -> Result<()> {
    config.validate()?;

    info!("Crop Recommender v{}", VERSION);
    info!("Configuration:");
    info!("  Model path:    {:?}", config.model_path);
    info!("  Bind address:  {}:{}", config.host, config.port);
    info!("  Strict status: {}", config.strict_status);

    // A server without a model must never start
    let model = load_model(&config.model_path)
        .with_context(|| format!("Failed to load model from {:?}", config.model_path))?;

    let addr = config.socket_addr()?;
    let state = Arc::new(AppState::new(config, Arc::new(model)));
    let app = routes::router(state.clone());

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(
        "Server stopped after {}",
        format_duration(state.started_at.elapsed().as_secs_f64())
    );
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!("Could not listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

fn cmd_predict(args: &PredictArgs) -> Result<()> {
    let model = load_model(&args.model)
        .with_context(|| format!("Failed to load model from {:?}", args.model))?;
    let service = PredictionService::new(Arc::new(model));

    match service.handle_predict(&args.fields()) {
        PredictionOutcome::Success { label } => {
            println!("{} {}", "Recommended crop:".bold(), label.green().bold());
            Ok(())
        }
        PredictionOutcome::Failure { error } => {
            bail!("Prediction failed ({}): {}", error.kind(), error)
        }
    }
}

fn cmd_inspect(path: &Path) -> Result<()> {
    let model = load_model(path).with_context(|| format!("Failed to load model from {:?}", path))?;

    println!("{}", "Model artifact".bold());
    println!("  Path:     {}", path.display());
    println!("  Family:   {}", model.family().cyan());
    println!("  Features: {}", FEATURE_NAMES.join(", "));
    println!("  Classes:  {}", model.classes().len());
    for (i, class) in model.classes().iter().enumerate() {
        println!("    {:>3}. {}", i, class);
    }
    Ok(())
}
