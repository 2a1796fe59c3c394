use crate::configuration::Configuration;
use chrono::Duration;
use clap::Parser;
use std::path::PathBuf;

/// Car Doctor booking backend
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct ConfigurationHandler {
    /// Port the HTTP server listens on
    #[arg(long, env = "PORT", default_value = "5000")]
    port: u16,

    /// Full PostgreSQL connection URL. Takes precedence over the DB_* settings
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[arg(long, env = "DB_USER")]
    db_user: Option<String>,

    #[arg(long, env = "DB_PASS", hide_env_values = true)]
    db_pass: Option<String>,

    #[arg(long, env = "DB_HOST", default_value = "localhost")]
    db_host: String,

    #[arg(long, env = "DB_NAME", default_value = "car_doctor")]
    db_name: String,

    /// Secret used to sign and verify access tokens
    #[arg(long, env = "ACCESS_TOKEN_SECRET", hide_env_values = true)]
    access_token_secret: String,

    /// Origins allowed to make credentialed cross-origin requests
    #[arg(
        long,
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "https://cars-doctor-1f496.web.app,https://cars-doctor-1f496.firebaseapp.com"
    )]
    allowed_origins: Vec<String>,

    /// Mark the token cookie as Secure
    #[arg(long, env = "SECURE_COOKIES", default_value_t = false)]
    secure_cookies: bool,

    #[arg(long, env = "TOKEN_LIFETIME_SECS", default_value_t = 3600)]
    token_lifetime_secs: i64,

    /// JSON array of service documents inserted at startup
    #[arg(long, env = "SERVICES_FILE")]
    services_file: Option<PathBuf>,
}

impl ConfigurationHandler {
    pub fn parse_arguments() -> Self {
        Self::parse()
    }
}

impl Configuration for ConfigurationHandler {
    fn port(&self) -> String {
        self.port.to_string()
    }

    fn database_url(&self) -> Option<String> {
        if let Some(database_url) = &self.database_url {
            return Some(database_url.clone());
        }
        match (&self.db_user, &self.db_pass) {
            (Some(user), Some(pass)) => Some(format!(
                "postgres://{user}:{pass}@{}/{}",
                self.db_host, self.db_name
            )),
            _ => None,
        }
    }

    fn access_token_secret(&self) -> String {
        self.access_token_secret.clone()
    }

    fn allowed_origins(&self) -> Vec<String> {
        self.allowed_origins.clone()
    }

    fn secure_cookies(&self) -> bool {
        self.secure_cookies
    }

    fn token_lifetime(&self) -> Duration {
        Duration::seconds(self.token_lifetime_secs)
    }

    fn services_file(&self) -> Option<PathBuf> {
        self.services_file.clone()
    }
}
