use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct BuilderConfig {
    pub server: ServerSettings,
    pub api: ApiSettings,
    pub log: LogSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
    /// Builder sessions untouched this long are dropped
    pub session_idle_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    /// Root of the analytics backend API, e.g. `http://localhost:8000/api`
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    /// Default tracing filter; `RUST_LOG` takes precedence
    pub filter: String,
}

/// Load `config/builder.*` (optional) overlaid with `BUILDER__SECTION__KEY` variables.
pub fn load_builder_config() -> anyhow::Result<BuilderConfig> {
    build_config(config::File::with_name("config/builder").required(false))
}

fn build_config<S>(file: S) -> anyhow::Result<BuilderConfig>
where
    S: config::Source + Send + Sync + 'static,
{
    let settings = config::Config::builder()
        .set_default("server.bind", "0.0.0.0:8080")?
        .set_default("server.session_idle_secs", 1800)?
        .set_default("api.base_url", "http://localhost:8000/api")?
        .set_default("api.timeout_secs", 10)?
        .set_default("log.filter", "info")?
        .add_source(file)
        .add_source(
            config::Environment::with_prefix("BUILDER")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Join the API root and a relative endpoint path.
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
