//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use blog_core::services::BlogSettings;
use blog_infra::database::DatabaseConfig;

/// Where outgoing mail goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailBackend {
    /// Log messages instead of sending them.
    Console,
    Smtp {
        host: String,
        port: u16,
        username: Option<String>,
        password: Option<String>,
    },
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    /// Apply pending migrations on startup.
    pub run_migrations: bool,
    /// Load demo posts when running on the in-memory store.
    pub seed_demo_data: bool,
    pub mail: MailBackend,
    pub blog: BlogSettings,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |key: &str, default: bool| {
            var(key)
                .map(|v| !matches!(v.trim().to_lowercase().as_str(), "false" | "0" | "no" | ""))
                .unwrap_or(default)
        };

        let database = var("DATABASE_URL").map(|url| DatabaseConfig {
            url,
            max_connections: parsed(&var, "DB_MAX_CONNECTIONS").unwrap_or(100),
            min_connections: parsed(&var, "DB_MIN_CONNECTIONS").unwrap_or(10),
        });

        let mail = match var("MAIL_BACKEND").map(|v| v.to_lowercase()).as_deref() {
            Some("smtp") => MailBackend::Smtp {
                host: var("SMTP_HOST").unwrap_or_else(|| "localhost".to_string()),
                port: parsed(&var, "SMTP_PORT").unwrap_or(587),
                username: var("SMTP_USERNAME"),
                password: var("SMTP_PASSWORD"),
            },
            _ => MailBackend::Console,
        };

        let defaults = BlogSettings::default();
        let blog = BlogSettings {
            mail_from: var("MAIL_FROM").unwrap_or(defaults.mail_from),
            ..defaults
        };

        Self {
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parsed(&var, "PORT").unwrap_or(8080),
            run_migrations: flag("RUN_MIGRATIONS", false),
            seed_demo_data: flag("SEED_DEMO_DATA", database.is_none()),
            database,
            mail,
            blog,
        }
    }
}

fn parsed<T: FromStr>(var: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    var(key).and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert!(config.database.is_none());
        assert!(config.seed_demo_data);
        assert!(!config.run_migrations);
        assert_eq!(config.mail, MailBackend::Console);
        assert_eq!(config.blog.mail_from, "admin@myblog.com");
        assert_eq!(config.blog.posts_per_page, 3);
    }

    #[test]
    fn test_database_disables_seeding_by_default() {
        let config = config(&[
            ("DATABASE_URL", "postgres://localhost/blog"),
            ("DB_MAX_CONNECTIONS", "20"),
            ("PORT", "not-a-port"),
        ]);

        let database = config.database.unwrap();
        assert_eq!(database.max_connections, 20);
        assert_eq!(database.min_connections, 10);
        assert!(!config.seed_demo_data);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_smtp_backend() {
        let config = config(&[
            ("MAIL_BACKEND", "SMTP"),
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_USERNAME", "mailer"),
            ("MAIL_FROM", "news@example.com"),
        ]);

        assert_eq!(
            config.mail,
            MailBackend::Smtp {
                host: "smtp.example.com".to_string(),
                port: 587,
                username: Some("mailer".to_string()),
                password: None,
            }
        );
        assert_eq!(config.blog.mail_from, "news@example.com");
    }
}
