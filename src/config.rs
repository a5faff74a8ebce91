use serde::Deserialize;

use crate::analyzer::MAX_INITIAL_CAPACITY;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StaticFilesConfig {
    pub dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzerConfig {
    pub initial_capacity: usize,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SecurityConfig {
    pub enable_hsts: Option<bool>,
    pub hsts_max_age: Option<u64>,
    pub hsts_include_subdomains: Option<bool>,
    pub csp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
    pub analyzer: AnalyzerConfig,
    pub security: Option<SecurityConfig>,
}

const DEFAULTS: &str = include_str!("../config/default.toml");

impl Default for AppConfig {
    fn default() -> Self {
        // Fallback: parse the embedded default TOML
        match ::config::Config::builder()
            .add_source(::config::File::from_str(DEFAULTS, ::config::FileFormat::Toml))
            .build()
        {
            Ok(cfg) => match cfg.try_deserialize() {
                Ok(app_cfg) => app_cfg,
                Err(e) => {
                    eprintln!("FATAL: Failed to deserialize default config: {}", e);
                    panic!("Failed to deserialize default config: {}", e);
                }
            },
            Err(e) => {
                eprintln!("FATAL: Failed to parse default config: {}", e);
                panic!("Failed to parse default config: {}", e);
            }
        }
    }
}

/// Loads the configuration: embedded defaults -> `diskview.toml` -> `DISKVIEW_CONFIG` -> env.
pub fn load() -> anyhow::Result<AppConfig> {
    // Load .env first (optional)
    let _ = dotenvy::dotenv();

    let custom_path = std::env::var("DISKVIEW_CONFIG").ok();
    load_from(custom_path.as_deref())
}

/// Same layering as [`load`], with an explicit optional override file instead of
/// `DISKVIEW_CONFIG`.
pub fn load_from(custom_path: Option<&str>) -> anyhow::Result<AppConfig> {
    let mut builder = ::config::Config::builder()
        .add_source(::config::File::from_str(DEFAULTS, ::config::FileFormat::Toml))
        // Optional local file: diskview.toml (in CWD)
        .add_source(::config::File::with_name("diskview").required(false));

    if let Some(path) = custom_path {
        builder = builder.add_source(::config::File::with_name(path).required(false));
    }
    // Environment variables last to have highest precedence
    builder = builder.add_source(::config::Environment::with_prefix("DISKVIEW").separator("__"));

    let cfg = builder.build()?;
    let app_cfg: AppConfig = cfg.try_deserialize()?;
    validate(&app_cfg)?;
    Ok(app_cfg)
}

pub fn validate(cfg: &AppConfig) -> anyhow::Result<()> {
    if cfg.server.port == 0 {
        return Err(anyhow::anyhow!("invalid server.port: {}", cfg.server.port));
    }
    if cfg.server.host.trim().is_empty() {
        return Err(anyhow::anyhow!("server.host must not be empty"));
    }
    // Warn for privileged ports on Unix-like systems
    #[cfg(unix)]
    if cfg.server.port < 1024 {
        tracing::warn!("Using privileged port {} - may require elevated permissions", cfg.server.port);
    }

    if cfg.static_files.dir.trim().is_empty() {
        return Err(anyhow::anyhow!("static_files.dir must not be empty"));
    }

    if cfg.analyzer.initial_capacity > MAX_INITIAL_CAPACITY {
        return Err(anyhow::anyhow!(
            "analyzer.initial_capacity must be at most {} (got {})",
            MAX_INITIAL_CAPACITY,
            cfg.analyzer.initial_capacity
        ));
    }

    Ok(())
}
