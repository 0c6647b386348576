use anyhow::Context;
use tracing_subscriber::EnvFilter;

use heart_safe::{config::AppConfig, server, PredictionPipeline, TrainingDataset};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = AppConfig::load()?;

    let dataset = TrainingDataset::load(&cfg.dataset_path, &cfg.outcome_column)
        .with_context(|| format!("failed to load dataset {}", cfg.dataset_path.display()))?;
    tracing::info!(
        "loaded {} rows from {}; label counts {:?}",
        dataset.len(),
        cfg.dataset_path.display(),
        dataset.label_counts()
    );

    let pipeline = PredictionPipeline::fit(&dataset, cfg.neighbors, cfg.schema)
        .context("failed to fit prediction pipeline")?;

    // Warmup on the lowest observed value of every feature
    let probe = *pipeline.scaler().data_min();
    let label = pipeline.predict_label(&probe);
    tracing::info!(
        "fitted k={} over {} samples, schema={}; warmup label={}",
        pipeline.k(),
        pipeline.n_samples(),
        pipeline.schema().as_str(),
        label
    );

    let app = server::router(server::AppState::new(pipeline));

    tracing::info!("listening on {}", cfg.bind_addr);
    let listener = tokio::net::TcpListener::bind(cfg.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.bind_addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}
