use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use auth::Authenticator;
use auth::PasswordHasher;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use crate::config::BootstrapUser;
use crate::config::Config;
use crate::config::StorageBackend;
use crate::config::UserBackend;
use crate::domain::data::ports::DataServicePort;
use crate::domain::data::ports::KeyValueStore;
use crate::domain::data::service::DataService;
use crate::domain::user::ports::CredentialServicePort;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::service::CredentialService;
use crate::inbound::http::router::create_router;
use crate::outbound::repositories::MemoryUserRepository;
use crate::outbound::repositories::PostgresUserRepository;
use crate::outbound::storage::CassandraBackend;
use crate::outbound::storage::MemoryBackend;
use crate::outbound::storage::StorageGateway;

/// Fully wired service, bound to its listen address but not yet serving.
pub struct App {
    listener: TcpListener,
    router: Router,
    store: Arc<dyn KeyValueStore>,
    writes: CancellationToken,
    shutdown_grace: Duration,
}

impl App {
    /// Connect every backend, seed bootstrap users and bind the listener.
    pub async fn build(config: &Config) -> Result<Self, anyhow::Error> {
        let password_hasher = PasswordHasher::with_work_factor(
            config.password.memory_kib,
            config.password.iterations,
            config.password.parallelism,
        )?;
        let authenticator = Arc::new(Authenticator::with_password_hasher(
            config.jwt.secret.as_bytes(),
            password_hasher,
        ));

        let bootstrap = hash_bootstrap_users(
            Arc::clone(&authenticator),
            config.users.bootstrap.clone(),
        )
        .await?;

        let credential_service: Arc<dyn CredentialServicePort> = match config.users.backend {
            UserBackend::Memory => {
                tracing::info!(users = bootstrap.len(), "Using in-memory user directory");
                wire_credentials(
                    MemoryUserRepository::new(bootstrap),
                    &authenticator,
                    config,
                )
            }
            UserBackend::Postgres => {
                let database_url = config
                    .users
                    .database_url
                    .as_deref()
                    .context("users.database_url is required for the postgres backend")?;

                let pg_pool = PgPoolOptions::new()
                    .max_connections(5)
                    .connect(database_url)
                    .await?;
                tracing::info!(
                    max_connections = 5,
                    database = "postgresql",
                    "Database connection pool created"
                );

                sqlx::migrate!("./migrations").run(&pg_pool).await?;
                tracing::info!(database = "postgresql", "Database migrations completed");

                let repository = PostgresUserRepository::new(pg_pool);
                repository.seed(&bootstrap).await?;

                wire_credentials(repository, &authenticator, config)
            }
        };

        let writes = CancellationToken::new();
        let write_timeout = config.storage.write_timeout();

        let (data_service, store) = match config.storage.backend {
            StorageBackend::Memory => {
                tracing::info!("Using in-memory key-value storage");
                wire_data(
                    StorageGateway::new(MemoryBackend::new()).with_write_timeout(write_timeout),
                    writes.clone(),
                )
            }
            StorageBackend::Cassandra => {
                let backend = CassandraBackend::connect(&config.storage).await?;
                wire_data(
                    StorageGateway::new(backend).with_write_timeout(write_timeout),
                    writes.clone(),
                )
            }
        };

        let listener = TcpListener::bind(&config.server.address)
            .await
            .with_context(|| format!("failed to bind {}", config.server.address))?;

        let router = create_router(credential_service, data_service, authenticator);

        Ok(Self {
            listener,
            router,
            store,
            writes,
            shutdown_grace: config.server.shutdown_grace(),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, anyhow::Error> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until `shutdown` resolves, then drain and release the storage.
    ///
    /// In-flight requests get `shutdown_grace` to finish. Writes still
    /// pending after that are cancelled, and the storage session is closed
    /// only once the server task is gone.
    pub async fn run<F>(self, shutdown: F) -> Result<(), anyhow::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let address = self.local_addr()?;
        tracing::info!(address = %address, protocol = "http", "Http server listening");

        let stop = CancellationToken::new();
        let server_stop = stop.clone();
        let listener = self.listener;
        let router = self.router;

        let mut server = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move { server_stop.cancelled().await })
                .await
        });

        let finished = tokio::select! {
            joined = &mut server => Some(joined),
            _ = shutdown => None,
        };

        let served = match finished {
            Some(joined) => joined,
            None => {
                tracing::info!(grace = ?self.shutdown_grace, "Shutdown requested, draining requests");
                stop.cancel();

                match tokio::time::timeout(self.shutdown_grace, &mut server).await {
                    Ok(joined) => joined,
                    Err(_) => {
                        tracing::warn!("Grace period elapsed, aborting remaining requests");
                        server.abort();
                        Ok(Ok(()))
                    }
                }
            }
        };

        self.writes.cancel();

        if let Err(e) = self.store.close().await {
            tracing::error!(error = %e, "Failed to close storage");
        }

        tracing::info!("Http server stopped");

        served.context("server task failed")??;
        Ok(())
    }
}

fn wire_credentials<UR>(
    repository: UR,
    authenticator: &Arc<Authenticator>,
    config: &Config,
) -> Arc<dyn CredentialServicePort>
where
    UR: UserRepository,
{
    Arc::new(CredentialService::new(
        Arc::new(repository),
        Arc::clone(authenticator),
        config.jwt.token_ttl(),
    ))
}

fn wire_data<S>(
    store: S,
    writes: CancellationToken,
) -> (Arc<dyn DataServicePort>, Arc<dyn KeyValueStore>)
where
    S: KeyValueStore,
{
    let store = Arc::new(store);
    let service = DataService::new(Arc::clone(&store), writes);
    (Arc::new(service), store)
}

/// Hash bootstrap passwords off the reactor, yielding `(username, hash)` pairs.
async fn hash_bootstrap_users(
    authenticator: Arc<Authenticator>,
    users: Vec<BootstrapUser>,
) -> Result<Vec<(String, String)>, anyhow::Error> {
    let hashed = tokio::task::spawn_blocking(move || {
        users
            .into_iter()
            .map(|user| {
                authenticator
                    .hash_password(&user.password)
                    .map(|hash| (user.username, hash))
            })
            .collect::<Result<Vec<_>, _>>()
    })
    .await??;

    Ok(hashed)
}

/// Resolves on SIGINT or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received SIGINT, starting graceful shutdown"),
            Err(e) => tracing::error!(error = %e, "Failed to listen for SIGINT"),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received SIGTERM, starting graceful shutdown");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
