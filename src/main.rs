mod annotations;
mod config;
mod handlers;
mod models;
mod snapshot;
mod table;
mod timeline;
mod upstream;

use axum::{
    response::Redirect,
    routing::{get, get_service},
    Router,
};
use chrono::Utc;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};
use tower_http::services::ServeDir;

use crate::config::load_config;
use crate::config::AppConfig;
use crate::handlers::{get_chart, get_latest_validators, get_validators, AppState};
use crate::upstream::RequestSequencer;

/// CLI arguments
#[derive(Parser)]
#[command(name = "Validators Health", about = "Validator uptime dashboard")]
struct Cli {
    /// IP address to bind the server to
    #[arg(long)]
    listen_ip: Option<String>,

    /// Port to bind the server to
    #[arg(long)]
    port: Option<u16>,

    /// Base URL of the validators-health backend API
    #[arg(long)]
    upstream_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();
    let mut config: AppConfig = load_config()?;

    // CLI arguments win over the TOML config
    if let Some(ip) = args.listen_ip {
        config.server.listen_ip = Some(ip);
    }
    if let Some(port) = args.port {
        config.server.port = Some(port);
    }
    if let Some(url) = args.upstream_url {
        config.upstream.base_url = url;
    }

    std::fs::create_dir_all("static")?;
    std::fs::write("static/index.html", include_str!("static/index.html"))?;
    std::fs::write("static/dashboard.js", include_str!("static/dashboard.js"))?;
    std::fs::write("static/styles.css", include_str!("static/styles.css"))?;

    let state = Arc::new(AppState {
        upstream_url: config.upstream.base_url.clone(),
        sequencer: RequestSequencer::default(),
        latest: RwLock::new(None),
    });

    let app = Router::new()
        .route("/", get(|| async { Redirect::to("/static/index.html") }))
        .route("/api/validators", get(get_validators))
        .route("/api/validators/latest", get(get_latest_validators))
        .route("/api/chart", get(get_chart))
        .nest_service("/static", get_service(ServeDir::new("static")))
        .with_state(state);

    let ip = config
        .server
        .listen_ip
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let port = config.server.port.unwrap_or(3000);
    let addr_str = format!("{}:{}", ip, port);

    let addr: SocketAddr = addr_str.parse()?;
    println!(
        "[{}] dashboard on http://{} (backend {})",
        Utc::now().to_rfc3339(),
        addr,
        config.upstream.base_url
    );
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
