#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the pest map application.
//!
//! Serves the generated observation dataset and the threat ranking and
//! dashboard aggregations as a JSON REST API. The dataset is generated on
//! first use and shared through a time-bounded [`DatasetCache`].

mod handlers;

use std::time::Duration;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use pest_map_generate::{DEFAULT_SEED, DatasetCache, GeneratorConfig, cache::DEFAULT_TTL};

/// Shared application state.
pub struct AppState {
    /// Generated datasets, keyed by seed.
    pub cache: DatasetCache,
}

/// Server settings, normally read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind_addr: String,
    /// Port to listen on.
    pub port: u16,
    /// Seed of the served dataset.
    pub seed: u64,
    /// How long a generated dataset is reused.
    pub cache_ttl: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
            seed: DEFAULT_SEED,
            cache_ttl: DEFAULT_TTL,
        }
    }
}

impl ServerConfig {
    /// Reads `BIND_ADDR`, `PORT`, `PEST_MAP_SEED` and
    /// `PEST_MAP_CACHE_TTL_SECS`, falling back to the defaults for unset or
    /// unparsable values.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            seed: std::env::var("PEST_MAP_SEED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.seed),
            cache_ttl: std::env::var("PEST_MAP_CACHE_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map_or(defaults.cache_ttl, Duration::from_secs),
        }
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/catalog", web::get().to(handlers::catalog))
            .route("/observations", web::get().to(handlers::observations))
            .route("/summary", web::get().to(handlers::summary))
            .route("/rankings", web::get().to(handlers::rankings))
            .route("/trend/monthly", web::get().to(handlers::monthly))
            .route("/trend/severity", web::get().to(handlers::severity))
            .route("/towns", web::get().to(handlers::towns))
            .route("/cost-benefit", web::get().to(handlers::cost_benefit)),
    );
}

/// Generates the configured dataset before the server accepts requests.
fn warm_cache(cache: &DatasetCache) -> std::io::Result<usize> {
    let dataset = cache.get().map_err(|e| {
        log::error!("Failed to generate dataset: {e}");
        std::io::Error::other(e)
    })?;
    log::info!(
        "Serving {} observations (seed {})",
        dataset.len(),
        cache.config().seed
    );
    Ok(dataset.len())
}

/// Starts the pest map API server.
///
/// This is a regular async function; the caller provides the runtime
/// (e.g. via `#[actix_web::main]`) and initializes logging.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the dataset cannot be generated,
/// or if the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let generator = GeneratorConfig::default().with_seed(config.seed);
    let cache = DatasetCache::new(generator, config.cache_ttl);

    warm_cache(&cache)?;

    let state = web::Data::new(AppState { cache });

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr, config.port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.seed, 42);
        assert_eq!(config.cache_ttl, Duration::from_secs(3600));
    }

    #[test]
    fn warm_cache_fails_on_invalid_generator_config() {
        let invalid = GeneratorConfig {
            horizon_months: 0,
            ..GeneratorConfig::default()
        };
        assert!(warm_cache(&DatasetCache::new(invalid, DEFAULT_TTL)).is_err());

        let count = warm_cache(&DatasetCache::default()).unwrap();
        assert!(count > 0);
    }
}
