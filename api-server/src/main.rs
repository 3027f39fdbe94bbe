use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use score_store::ScoreStore;

mod config;
mod routes;

use config::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = Config::from_env().map_err(|e| {
        tracing::error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    tracing::info!("Starting high-score API server");
    tracing::info!("Scores file: {}", config.scores_path().display());

    // Create or recover the file up front so problems show at startup
    let store = web::Data::new(ScoreStore::new(config.scores_path()));
    match store.load() {
        Ok(entries) => tracing::info!("Loaded {} stored scores", entries.len()),
        Err(e) => tracing::error!("Score store is not usable yet: {}", e),
    }

    let bind_address = config.bind_address();
    tracing::info!("Binding to {}", bind_address);
    tracing::info!("url: http://localhost:{}", config.port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(86400);

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(store.clone())
            .app_data(routes::json_config())
            .configure(routes::configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
