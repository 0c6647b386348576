use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{fs, net::SocketAddr, path::PathBuf};

use crate::dataset::DEFAULT_OUTCOME_COLUMN;
use crate::knn::DEFAULT_NEIGHBORS;
use crate::risk::RiskSchema;

pub const CONFIG_ENV: &str = "HEART_SAFE_CONFIG";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub dataset_path: PathBuf,
    pub neighbors: usize,
    pub schema: RiskSchema,
    pub outcome_column: String,
    pub bind_addr: SocketAddr,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("heart.csv"),
            neighbors: DEFAULT_NEIGHBORS,
            schema: RiskSchema::Binary,
            outcome_column: DEFAULT_OUTCOME_COLUMN.to_string(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
        }
    }
}

impl AppConfig {
    /// Defaults, then the JSON file named by `HEART_SAFE_CONFIG`, then env vars.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path))?;
        serde_json::from_str(&data).with_context(|| format!("invalid config JSON in {}", path))
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = match get(CONFIG_ENV) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        if let Some(p) = get("DATASET_PATH") {
            cfg.dataset_path = PathBuf::from(p);
        }
        if let Some(k) = get("KNN_K") {
            cfg.neighbors = k
                .trim()
                .parse()
                .with_context(|| format!("KNN_K must be a positive integer, got '{}'", k))?;
        }
        if let Some(s) = get("RISK_SCHEMA") {
            cfg.schema = s.parse::<RiskSchema>().map_err(anyhow::Error::msg)?;
        }
        if let Some(c) = get("OUTCOME_COLUMN") {
            cfg.outcome_column = c;
        }
        if let Some(addr) = get("BIND_ADDR") {
            cfg.bind_addr = addr
                .parse()
                .with_context(|| format!("BIND_ADDR is not a socket address: '{}'", addr))?;
        } else if let Some(port) = get("PORT") {
            let port: u16 = port
                .trim()
                .parse()
                .with_context(|| format!("PORT is not a port number: '{}'", port))?;
            cfg.bind_addr = SocketAddr::from(([0, 0, 0, 0], port));
        }

        if cfg.neighbors == 0 {
            bail!("neighbors (k) must be at least 1");
        }
        Ok(cfg)
    }
}
