use std::{env, sync::Arc, time::Duration};

use quillbox_auth::{AuthService, JwtService};
use quillbox_cache::{Cache, DisabledCache, LocalCache, RedisCache};
use quillbox_db_postgres::PgStore;
use quillbox_notes::NotesService;
use quillbox_server::config::{CacheBackendKind, CacheConfig, load_config};
use quillbox_server::metrics::TelemetrySink;
use quillbox_server::state::AppState;
use quillbox_server::{QuillboxServer, build_router};
use quillbox_storage::{NoteStore, UserStore};

/// How the configuration path was determined.
#[derive(Debug, Clone, Copy)]
enum ConfigSource {
    /// From --config CLI argument
    CliArgument,
    /// From QUILLBOX_CONFIG environment variable
    EnvironmentVariable,
    /// Default path (quillbox.toml)
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CliArgument => write!(f, "CLI argument (--config)"),
            Self::EnvironmentVariable => write!(f, "environment variable (QUILLBOX_CONFIG)"),
            Self::Default => write!(f, "default"),
        }
    }
}

#[tokio::main]
async fn main() {
    // Load .env file if present (before anything else)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist - it's optional
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    // Initialize tracing early with the default level
    quillbox_server::observability::init_tracing();

    // Parse config path from CLI, environment, or use default
    let (config_path, source) = resolve_config_path();

    let cfg = match load_config(Some(&config_path)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    tracing::info!(
        path = %config_path,
        source = %source,
        "Configuration loaded"
    );

    quillbox_server::observability::apply_logging_level(&cfg.logging.level);
    quillbox_server::metrics::init_metrics();

    let store = match PgStore::new(cfg.postgres.clone()).await {
        Ok(s) => Arc::new(s),
        Err(e) => {
            eprintln!("Storage initialization failed: {e}");
            std::process::exit(2);
        }
    };

    let cache = build_cache(&cfg.cache);
    tracing::info!(
        cache_backend = cache.backend_name(),
        store_backend = "postgres",
        "Backends initialized"
    );

    let notes = Arc::new(
        NotesService::new(
            store.clone() as Arc<dyn NoteStore>,
            cache,
            Arc::new(TelemetrySink),
        )
        .with_cache_ttl(Duration::from_secs(cfg.cache.ttl_secs)),
    );
    let auth = Arc::new(AuthService::new(
        store as Arc<dyn UserStore>,
        JwtService::new(&cfg.auth.jwt_secret, cfg.auth.token_ttl_secs),
    ));

    let app = build_router(
        AppState::new(notes, auth),
        &cfg.http.cors_allowed_origins,
    );

    if let Err(err) = QuillboxServer::new(cfg.addr(), app).run().await {
        eprintln!("Server error: {err}");
    }
}

/// Selects the cache backend from configuration. An unavailable Redis pool
/// degrades to the disabled backend rather than failing startup.
fn build_cache(cfg: &CacheConfig) -> Arc<dyn Cache> {
    match cfg.backend {
        CacheBackendKind::Redis => match RedisCache::new(&cfg.redis) {
            Ok(cache) => Arc::new(cache),
            Err(e) => {
                tracing::warn!(error = %e, "Redis cache unavailable, caching disabled");
                Arc::new(DisabledCache::new())
            }
        },
        CacheBackendKind::Local => Arc::new(LocalCache::new()),
        CacheBackendKind::Disabled => Arc::new(DisabledCache::new()),
    }
}

/// Resolve the configuration file path.
///
/// Priority order:
/// 1. CLI argument: --config <path>
/// 2. Environment variable: QUILLBOX_CONFIG
/// 3. Default: quillbox.toml
fn resolve_config_path() -> (String, ConfigSource) {
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            if let Some(path) = args.next() {
                return (path, ConfigSource::CliArgument);
            }
        }
    }

    if let Ok(path) = env::var("QUILLBOX_CONFIG") {
        return (path, ConfigSource::EnvironmentVariable);
    }

    ("quillbox.toml".to_string(), ConfigSource::Default)
}
