use actix_web::{web, App, HttpServer};
use clap::Parser;
use hotentry_voice::{callback, AppState, Args};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let address = format!("{}:{}", args.ip, args.port);

    let app_state = AppState::from_args(args).map_err(|e| {
        error!(error = %e, "Failed to build HTTP client");
        std::io::Error::other("HTTP client initialization failed")
    })?;
    let data = web::Data::new(app_state);

    info!("Server running at http://{}", address);
    HttpServer::new(move || App::new().app_data(data.clone()).service(callback))
        .bind(&address)?
        .run()
        .await
}
