use studydesk_api::{config, server};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting Studydesk API in {:?} mode", config.environment);

    let port = server::port_from_env();
    if let Err(e) = server::serve(port).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
