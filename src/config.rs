use std::net::IpAddr;
use std::path::PathBuf;

use ipnet::IpNet;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    /// Deployment environment name. Error detail is echoed to clients only
    /// when this is not "production".
    pub environment: String,
    pub brevo_api_key: Option<String>,
    pub from_email: String,
    pub to_email: String,
    pub allowed_origins: Vec<String>,
    pub leads_file: PathBuf,
    pub trusted_proxies: Vec<IpNet>,
    pub log_level: String,
    pub max_body_size: usize,
    pub quote_rate_limit: u32,
    pub lead_rate_limit: u32,
    pub rate_window_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host: IpAddr = env_or("HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid HOST: {e}"))?;

        let port: u16 = env_or("PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid PORT: {e}"))?;

        let environment = env_or("APP_ENV", "production");

        let brevo_api_key = std::env::var("BREVO_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let from_email = env_required("QUOTES_FROM_EMAIL")?;
        let to_email = env_required("QUOTES_TO_EMAIL")?;

        let allowed_origins: Vec<String> = env_or(
            "ALLOWED_ORIGIN",
            "http://localhost:8000,http://127.0.0.1:8000",
        )
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

        let leads_file = PathBuf::from(env_or("LEADS_FILE", "data/leads.ndjson"));

        let trusted_proxies: Vec<IpNet> = env_or("TRUSTED_PROXIES", "")
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                s.trim()
                    .parse()
                    .map_err(|e| format!("Invalid TRUSTED_PROXIES entry '{s}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let log_level = env_or("LOG_LEVEL", "info");

        let max_body_size: usize = env_or("MAX_BODY_SIZE", "65536")
            .parse()
            .map_err(|e| format!("Invalid MAX_BODY_SIZE: {e}"))?;

        let quote_rate_limit: u32 = env_or("QUOTE_RATE_LIMIT", "5")
            .parse()
            .map_err(|e| format!("Invalid QUOTE_RATE_LIMIT: {e}"))?;

        let lead_rate_limit: u32 = env_or("LEAD_RATE_LIMIT", "10")
            .parse()
            .map_err(|e| format!("Invalid LEAD_RATE_LIMIT: {e}"))?;

        let rate_window_secs: u64 = env_or("RATE_WINDOW_SECS", "900")
            .parse()
            .map_err(|e| format!("Invalid RATE_WINDOW_SECS: {e}"))?;

        Ok(Config {
            host,
            port,
            environment,
            brevo_api_key,
            from_email,
            to_email,
            allowed_origins,
            leads_file,
            trusted_proxies,
            log_level,
            max_body_size,
            quote_rate_limit,
            lead_rate_limit,
            rate_window_secs,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn brevo_configured(&self) -> bool {
        self.brevo_api_key.is_some()
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ALL_VARS: [&str; 14] = [
        "HOST",
        "PORT",
        "APP_ENV",
        "BREVO_API_KEY",
        "QUOTES_FROM_EMAIL",
        "QUOTES_TO_EMAIL",
        "ALLOWED_ORIGIN",
        "LEADS_FILE",
        "TRUSTED_PROXIES",
        "LOG_LEVEL",
        "MAX_BODY_SIZE",
        "QUOTE_RATE_LIMIT",
        "LEAD_RATE_LIMIT",
        "RATE_WINDOW_SECS",
    ];

    fn clear_env() {
        for key in ALL_VARS {
            unsafe { std::env::remove_var(key) };
        }
    }

    fn set_required() {
        unsafe {
            std::env::set_var("QUOTES_FROM_EMAIL", "quotes@example.com");
            std::env::set_var("QUOTES_TO_EMAIL", "admin@example.com");
        }
    }

    #[test]
    #[serial]
    fn applies_defaults_when_env_is_sparse() {
        clear_env();
        set_required();

        let config = Config::from_env().unwrap();
        assert_eq!(config.port, 3000);
        assert!(config.is_production());
        assert!(!config.brevo_configured());
        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:8000", "http://127.0.0.1:8000"]
        );
        assert_eq!(config.quote_rate_limit, 5);
        assert_eq!(config.lead_rate_limit, 10);
        assert_eq!(config.rate_window_secs, 900);
        assert!(config.trusted_proxies.is_empty());
    }

    #[test]
    #[serial]
    fn reads_overrides_and_splits_origin_list() {
        clear_env();
        set_required();
        unsafe {
            std::env::set_var("ALLOWED_ORIGIN", "https://a.example, https://b.example");
            std::env::set_var("APP_ENV", "development");
            std::env::set_var("BREVO_API_KEY", "  xkeysib-123  ");
            std::env::set_var("TRUSTED_PROXIES", "10.0.0.0/8, 192.168.0.0/16");
        }

        let config = Config::from_env().unwrap();
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert!(!config.is_production());
        assert_eq!(config.brevo_api_key.as_deref(), Some("xkeysib-123"));
        assert_eq!(config.trusted_proxies.len(), 2);

        clear_env();
    }

    #[test]
    #[serial]
    fn missing_recipient_is_an_error() {
        clear_env();
        unsafe { std::env::set_var("QUOTES_FROM_EMAIL", "quotes@example.com") };

        let err = Config::from_env().unwrap_err();
        assert!(err.contains("QUOTES_TO_EMAIL"));

        clear_env();
    }
}
