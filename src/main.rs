mod data;
mod server;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use data::encoder::EncoderRegistry;
use data::filter::RecommendEngine;
use data::model::CATEGORICAL_COLUMNS;

#[derive(Parser)]
#[command(name = "yatra")]
#[command(about = "Indian tourist destination recommender")]
#[command(version)]
struct Cli {
    /// Path to the destination dataset (.csv or .json)
    #[arg(long, default_value = "Top Indian Places to Visit.csv")]
    dataset: PathBuf,

    /// Path of the persisted label encoder registry
    #[arg(long, default_value = "label_encoders.json")]
    encoders: PathBuf,

    /// Bind address
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Bind port
    #[arg(short, long, default_value = "3000")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    // Reuse the persisted registry only when it covers exactly the columns
    // this dataset encodes; anything else gets a fresh fit.
    let mut registry = if cli.encoders.exists() {
        match EncoderRegistry::load(&cli.encoders) {
            Ok(registry) if registry.is_compatible(&CATEGORICAL_COLUMNS) => {
                log::info!("loaded encoder registry from {}", cli.encoders.display());
                registry
            }
            Ok(_) => {
                log::warn!(
                    "{} does not match the expected column set, refitting",
                    cli.encoders.display()
                );
                EncoderRegistry::default()
            }
            Err(err) => {
                log::warn!("could not load {}: {err:#}, refitting", cli.encoders.display());
                EncoderRegistry::default()
            }
        }
    } else {
        EncoderRegistry::default()
    };

    let dataset = data::loader::load_file(&cli.dataset, &mut registry)
        .with_context(|| format!("loading dataset {}", cli.dataset.display()))?;
    log::info!(
        "loaded {} destinations from {}",
        dataset.len(),
        cli.dataset.display()
    );

    // The registry file is written at most once, here, before the listener
    // binds; request handlers only ever read it.
    if registry.is_dirty() {
        registry
            .save(&cli.encoders)
            .with_context(|| format!("saving encoder registry {}", cli.encoders.display()))?;
        log::info!("saved encoder registry to {}", cli.encoders.display());
    }

    let engine = Arc::new(RecommendEngine::new(dataset, registry));
    let app = server::router(engine).layer(CorsLayer::permissive());

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    log::info!("listening on http://{addr}");

    axum::serve(listener, app).await.context("serving HTTP")?;

    Ok(())
}
