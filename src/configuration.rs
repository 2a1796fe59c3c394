use chrono::Duration;
use std::path::PathBuf;

pub trait Configuration: Clone + Send + Sync + 'static {
    fn port(&self) -> String;
    fn database_url(&self) -> Option<String>;
    fn access_token_secret(&self) -> String;
    fn allowed_origins(&self) -> Vec<String>;
    fn secure_cookies(&self) -> bool;
    fn token_lifetime(&self) -> Duration;
    fn services_file(&self) -> Option<PathBuf>;
}
