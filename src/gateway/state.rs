use std::sync::Arc;

use anyhow::Context;

use crate::config::GatewayConfig;

/// The gateway holds no database pool and no signing key.
#[derive(Clone)]
pub struct GatewayState {
    pub config: Arc<GatewayConfig>,
    pub client: reqwest::Client,
}

impl GatewayState {
    pub fn new(config: GatewayConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .build()
            .context("build gateway http client")?;
        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }
}
