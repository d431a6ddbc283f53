// SCF Casebook - Web Server
// Thin binary around scf_casebook::server

use anyhow::{Context, Result};
use clap::Parser;
use scf_casebook::server::{router, AppState};
use scf_casebook::{Config, ConfigArgs, Presenter};

/// 🌐 Serve the casebook exhibits over HTTP
#[derive(Debug, Parser)]
#[command(name = "casebook-server", version)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from(Cli::parse().config);

    println!("🌐 SCF Casebook - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let addr = config.addr.clone();
    let app = router(AppState::new(Presenter::new(), config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    println!("\n🚀 Server running on http://{}", addr);
    println!("   API: http://{}/api/exhibits", addr);
    println!("   UI:  http://{}", addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
