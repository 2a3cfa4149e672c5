use serde::Deserialize;

/// Configuration options for the catalog service, read from an optional
/// `config.yaml` with environment-variable overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Path of the SQLite database file.
    pub database_url: String,
    /// Directory uploaded product images are written to.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
}

impl ServerConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::default())
            .build()?
            .try_deserialize()
    }
}

fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_upload_dir() -> String {
    "uploads/images".to_string()
}
