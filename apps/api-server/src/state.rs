//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::BlogService;
use blog_core::ports::Mailer;
use blog_core::services::BlogSettings;
use blog_infra::database::DatabaseConnections;
use blog_infra::{ConsoleMailer, InMemoryStore};

#[cfg(feature = "postgres")]
use blog_infra::database::{
    PostgresCommentRepository, PostgresPostRepository, PostgresTagRepository,
    PostgresUserRepository,
};

use crate::config::{AppConfig, MailBackend};
use crate::seed;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: Arc<BlogService>,
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let mailer = build_mailer(&config.mail);

        if let Some(state) = Self::connect(config, mailer.clone()).await {
            return state;
        }

        let (state, store) = Self::in_memory(mailer, config.blog.clone());
        if config.seed_demo_data {
            if let Err(e) = seed::demo_data(&state.blog, &store).await {
                tracing::error!(error = %e, "Failed to seed demo data");
            }
        }

        tracing::info!("Application state initialized (in-memory)");
        state
    }

    /// State backed by a fresh in-memory store. The store handle is returned
    /// for seeding and moderation.
    pub fn in_memory(mailer: Arc<dyn Mailer>, settings: BlogSettings) -> (Self, InMemoryStore) {
        let store = InMemoryStore::new();
        let blog = BlogService::new(
            Arc::new(store.posts()),
            Arc::new(store.comments()),
            Arc::new(store.tags()),
            Arc::new(store.users()),
            mailer,
            settings,
        );

        let state = Self {
            blog: Arc::new(blog),
            db: None,
        };
        (state, store)
    }

    #[cfg(feature = "postgres")]
    async fn connect(config: &AppConfig, mailer: Arc<dyn Mailer>) -> Option<Self> {
        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return None;
        };

        match DatabaseConnections::init(db_config).await {
            Ok(connections) => {
                let state = Self::postgres(connections, mailer, config.blog.clone());
                if config.run_migrations {
                    state.migrate().await;
                }
                tracing::info!("Application state initialized (postgres)");
                Some(state)
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                None
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn connect(_config: &AppConfig, _mailer: Arc<dyn Mailer>) -> Option<Self> {
        tracing::info!("Running without postgres feature - using in-memory repositories");
        None
    }

    #[cfg(feature = "postgres")]
    fn postgres(
        connections: DatabaseConnections,
        mailer: Arc<dyn Mailer>,
        settings: BlogSettings,
    ) -> Self {
        let db = connections.main.clone();
        let blog = BlogService::new(
            Arc::new(PostgresPostRepository::new(db.clone())),
            Arc::new(PostgresCommentRepository::new(db.clone())),
            Arc::new(PostgresTagRepository::new(db.clone())),
            Arc::new(PostgresUserRepository::new(db)),
            mailer,
            settings,
        );

        Self {
            blog: Arc::new(blog),
            db: Some(Arc::new(connections)),
        }
    }

    #[cfg(feature = "postgres")]
    async fn migrate(&self) {
        use migration::MigratorTrait;

        let Some(db) = &self.db else {
            return;
        };
        match migration::Migrator::up(&db.main, None).await {
            Ok(()) => tracing::info!("Database migrations applied"),
            Err(e) => tracing::error!(error = %e, "Failed to apply database migrations"),
        }
    }
}

fn build_mailer(backend: &MailBackend) -> Arc<dyn Mailer> {
    match backend {
        MailBackend::Console => Arc::new(ConsoleMailer::new()),
        #[cfg(feature = "smtp")]
        MailBackend::Smtp {
            host,
            port,
            username,
            password,
        } => {
            let config = blog_infra::SmtpConfig {
                host: host.clone(),
                port: *port,
                username: username.clone(),
                password: password.clone(),
            };
            match blog_infra::SmtpMailer::new(&config) {
                Ok(mailer) => Arc::new(mailer),
                Err(e) => {
                    tracing::error!(error = %e, "Invalid SMTP settings. Using console mailer.");
                    Arc::new(ConsoleMailer::new())
                }
            }
        }
        #[cfg(not(feature = "smtp"))]
        MailBackend::Smtp { .. } => {
            tracing::warn!("MAIL_BACKEND=smtp requires the smtp feature. Using console mailer.");
            Arc::new(ConsoleMailer::new())
        }
    }
}
