// src/main.rs
//! Cargohold: cargo stowage and retrieval service.
//!
//! A Rust service that places cargo items into containers considering:
//! - Zone affinity and item priority
//! - Retrieval-path obstruction
//! - Expiry and usage-based waste lifecycle

mod api;
mod audit;
mod config;
mod csv_io;
mod error;
mod free_space;
mod geometry;
mod lifecycle;
mod model;
mod obstruction;
mod packer;
mod planner;
mod simulate;
mod store;
pub mod types;

use chrono::Utc;
use config::AppConfig;
use store::Store;

#[tokio::main]
async fn main() {
    if let Err(err) = dotenvy::dotenv() {
        if !matches!(err, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("⚠️ Could not load .env: {}", err);
        }
    }

    env_logger::init();

    let app_config = AppConfig::from_env();
    let api_config = app_config.api.clone();
    let core_config = app_config.core;

    println!("🚀 Cargohold starting...");
    println!("📦 API Endpoints:");
    println!("   - POST /api/placement");
    println!("   - GET  /api/search");
    println!("   - POST /api/place");
    println!("   - POST /api/retrieve");
    println!("   - GET  /api/waste/identify");
    println!("   - POST /api/waste/return-plan");
    println!("   - POST /api/waste/complete-undocking");
    println!("   - POST /api/simulate/day");
    println!("   - POST /api/import/items");
    println!("   - POST /api/import/containers");
    println!("   - GET  /api/export/arrangement");
    println!("   - GET  /api/logs");
    println!("📑 Documentation:");
    println!("   - GET /docs");
    println!("   - GET /docs/openapi.json");

    let store = Store::new(Utc::now().date_naive());
    api::start_api_server(api_config, core_config, store).await;
}
