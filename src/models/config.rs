//! Configuration model loaded from external sources.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// Root directory for uploaded files; `temp/` and `avatars/` live below.
    pub upload_dir: String,
    /// Identity stamped into created_by/updated_by. Stands in for a real
    /// authentication layer, which stays pluggable at this boundary.
    #[serde(default = "default_actor")]
    pub actor: String,
}

fn default_actor() -> String {
    "admin".to_string()
}
