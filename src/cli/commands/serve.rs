//! Implementation of the `bible2ppt serve` command.

use anyhow::{anyhow, Result};
use clap::Args;

use crate::adapters::http::{ApiHttpConfig, ApiHttpServer};
use crate::domain::models::Config;
use crate::services::AppServices;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Host to bind to (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides server.port)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Disable CORS headers
    #[arg(long)]
    pub no_cors: bool,
}

impl ServeArgs {
    fn http_config(&self, config: &Config) -> ApiHttpConfig {
        let mut http = ApiHttpConfig::from(&config.server);
        if let Some(host) = &self.host {
            http.host.clone_from(host);
        }
        if let Some(port) = self.port {
            http.port = port;
        }
        if self.no_cors {
            http.enable_cors = false;
        }
        http
    }
}

pub async fn execute(args: ServeArgs, config: &Config) -> Result<()> {
    let services = AppServices::from_config(config).await?;
    let server = ApiHttpServer::new(services, args.http_config(config));

    server
        .serve_with_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %err, "failed to listen for shutdown signal");
            }
            tracing::info!("shutting down");
        })
        .await
        .map_err(|e| anyhow!("HTTP server failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_override_server_config() {
        let args = ServeArgs {
            host: Some("0.0.0.0".to_string()),
            port: None,
            no_cors: true,
        };
        let http = args.http_config(&Config::default());
        assert_eq!(http.host, "0.0.0.0");
        assert_eq!(http.port, 8000);
        assert!(!http.enable_cors);
    }
}
