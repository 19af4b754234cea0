/*
 *  Copyright 2025 Colliery Software
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::info;

use forgefit::config::{ConfigLoader, Validate};
use forgefit_server::{build_router, logging, AppState};

#[derive(Parser, Debug)]
#[command(name = "forgefit-server", about = "HTTP API server for the ForgeFit content platform", version)]
struct Cli {
    /// Path to the configuration file (defaults to search paths)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured bind port
    #[arg(short, long, env = "FORGEFIT_PORT")]
    port: Option<u16>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    /// Print a default configuration file to stdout and exit
    #[arg(long)]
    print_default_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if cli.print_default_config {
        let template = forgefit::config::generate_default_config_toml()
            .context("failed to render default configuration")?;
        print!("{}", template);
        return Ok(());
    }

    let config = ConfigLoader::new()
        .load_config(cli.config.as_deref())
        .context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    let _log_guard = logging::init_logging(&config.server.log_level, cli.log_json);

    let state = AppState::from_config(&config).context("failed to wire services")?;
    let app = build_router(state);

    let port = cli.port.unwrap_or(config.server.port);
    let bind_addr = format!("{}:{}", config.server.bind_address, port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!(addr = %bind_addr, "forgefit server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("shutdown signal received");
        })
        .await
        .context("server terminated unexpectedly")?;

    Ok(())
}
