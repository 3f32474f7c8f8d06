//! Connection lifecycle: one API handle per configuration generation plus
//! the caller identity resolved through it.
//!
//! [`ConnectionManager::initialize`] installs a configuration and drops the
//! previous connection. [`ConnectionManager::instance`] builds the connection
//! lazily and hands out the same `Arc` until the next `initialize`.
//!
//! Call `initialize` before dispatching requests concurrently. A request that
//! already holds a connection keeps using it after a re-initialization.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::config::CodingConfig;
use crate::error::{Error, Result};
use crate::provider::CodingApi;

/// Builds an API handle for a configuration.
pub type ApiFactory = dyn Fn(&CodingConfig) -> Result<Arc<dyn CodingApi>> + Send + Sync;

/// A live API handle with its cached caller identity.
pub struct Connection {
    config: Arc<CodingConfig>,
    api: Arc<dyn CodingApi>,
    identity: OnceCell<u64>,
}

impl Connection {
    /// Wrap an API handle for the given configuration.
    pub fn new(config: Arc<CodingConfig>, api: Arc<dyn CodingApi>) -> Self {
        Self {
            config,
            api,
            identity: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &CodingConfig {
        &self.config
    }

    pub fn api(&self) -> &dyn CodingApi {
        self.api.as_ref()
    }

    /// Numeric id of the caller.
    ///
    /// The first call performs one remote lookup; later calls return the
    /// cached value. A failed lookup is returned as-is and not cached.
    pub async fn resolve_identity(&self) -> Result<u64> {
        self.identity
            .get_or_try_init(|| async {
                let id = self.api.current_user_id().await?;
                debug!(user_id = id, "Caller identity resolved");
                Ok::<u64, Error>(id)
            })
            .await
            .copied()
    }

    /// Identity if it has already been resolved.
    pub fn cached_identity(&self) -> Option<u64> {
        self.identity.get().copied()
    }
}

struct Slot {
    config: Arc<CodingConfig>,
    connection: Option<Arc<Connection>>,
}

/// Owns the active configuration and the connection bound to it.
pub struct ConnectionManager {
    factory: Box<ApiFactory>,
    slot: Mutex<Option<Slot>>,
}

impl ConnectionManager {
    /// Create an uninitialized manager.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&CodingConfig) -> Result<Arc<dyn CodingApi>> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            slot: Mutex::new(None),
        }
    }

    /// Install a configuration, discarding any existing connection and its
    /// cached identity.
    pub fn initialize(&self, config: CodingConfig) {
        info!(api_url = config.api_url(), "Initializing connection");
        *self.lock() = Some(Slot {
            config: Arc::new(config),
            connection: None,
        });
    }

    /// Connection for the most recent configuration.
    ///
    /// Fails with [`Error::NotInitialized`] before the first `initialize`.
    pub fn instance(&self) -> Result<Arc<Connection>> {
        let mut guard = self.lock();
        let slot = guard.as_mut().ok_or(Error::NotInitialized)?;

        if let Some(connection) = &slot.connection {
            return Ok(Arc::clone(connection));
        }

        debug!("Creating connection");
        let api = (self.factory)(&slot.config)?;
        let connection = Arc::new(Connection::new(Arc::clone(&slot.config), api));
        slot.connection = Some(Arc::clone(&connection));
        Ok(connection)
    }

    /// Whether a configuration has been installed.
    pub fn is_initialized(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Slot>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        Commit, CommitQuery, CreateIssueInput, CreateMergeRequestInput, CreateProjectInput, Depot,
        DepotListQuery, Issue, IssueListFilter, MergeRequest, Page, Project,
    };
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers only the identity lookup; counts calls and can fail first.
    struct IdentityApi {
        user_id: u64,
        calls: AtomicUsize,
        fail_first: bool,
    }

    impl IdentityApi {
        fn new(user_id: u64) -> Self {
            Self {
                user_id,
                calls: AtomicUsize::new(0),
                fail_first: false,
            }
        }
    }

    #[async_trait]
    impl CodingApi for IdentityApi {
        async fn current_user_id(&self) -> Result<u64> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_first && n == 0 {
                return Err(Error::Http("connection reset".into()));
            }
            Ok(self.user_id)
        }
        async fn list_projects(&self, _: u64, _: Option<&str>) -> Result<Vec<Project>> {
            unimplemented!()
        }
        async fn create_project(&self, _: CreateProjectInput) -> Result<u64> {
            unimplemented!()
        }
        async fn delete_project(&self, _: u64) -> Result<()> {
            unimplemented!()
        }
        async fn list_issues(&self, _: IssueListFilter) -> Result<Vec<Issue>> {
            unimplemented!()
        }
        async fn create_issue(&self, _: CreateIssueInput) -> Result<Issue> {
            unimplemented!()
        }
        async fn delete_issue(&self, _: &str, _: u64) -> Result<()> {
            unimplemented!()
        }
        async fn describe_issue(&self, _: &str, _: u64) -> Result<Issue> {
            unimplemented!()
        }
        async fn list_depots(&self, _: DepotListQuery) -> Result<Page<Depot>> {
            unimplemented!()
        }
        async fn list_commits(&self, _: CommitQuery) -> Result<Page<Commit>> {
            unimplemented!()
        }
        async fn create_merge_request(&self, _: CreateMergeRequestInput) -> Result<MergeRequest> {
            unimplemented!()
        }
    }

    fn counting_manager(built: Arc<AtomicUsize>) -> ConnectionManager {
        ConnectionManager::new(move |_config| {
            built.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(IdentityApi::new(7)) as Arc<dyn CodingApi>)
        })
    }

    #[test]
    fn test_instance_before_initialize() {
        let manager = counting_manager(Arc::new(AtomicUsize::new(0)));
        assert!(!manager.is_initialized());
        assert!(matches!(manager.instance(), Err(Error::NotInitialized)));
    }

    #[test]
    fn test_instance_is_stable_until_reinitialized() {
        let built = Arc::new(AtomicUsize::new(0));
        let manager = counting_manager(Arc::clone(&built));
        manager.initialize(CodingConfig::new("token-a").unwrap());

        // Construction is lazy
        assert_eq!(built.load(Ordering::SeqCst), 0);

        let first = manager.instance().unwrap();
        let second = manager.instance().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(built.load(Ordering::SeqCst), 1);
        assert_eq!(first.config().token(), "token-a");

        manager.initialize(CodingConfig::new("token-b").unwrap());
        let third = manager.instance().unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(third.config().token(), "token-b");
        assert_eq!(built.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_factory_error_propagates() {
        let manager = ConnectionManager::new(|_| Err(Error::Http("no TLS backend".into())));
        manager.initialize(CodingConfig::new("t").unwrap());
        assert!(matches!(manager.instance(), Err(Error::Http(_))));
    }

    #[tokio::test]
    async fn test_identity_resolved_once() {
        let api = Arc::new(IdentityApi::new(42));
        let config = Arc::new(CodingConfig::new("t").unwrap());
        let connection = Connection::new(config, Arc::clone(&api) as Arc<dyn CodingApi>);

        assert_eq!(connection.cached_identity(), None);
        assert_eq!(connection.resolve_identity().await.unwrap(), 42);
        assert_eq!(connection.resolve_identity().await.unwrap(), 42);
        assert_eq!(connection.cached_identity(), Some(42));
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_identity_failure_not_cached() {
        let api = Arc::new(IdentityApi {
            fail_first: true,
            ..IdentityApi::new(9)
        });
        let config = Arc::new(CodingConfig::new("t").unwrap());
        let connection = Connection::new(config, Arc::clone(&api) as Arc<dyn CodingApi>);

        assert!(matches!(
            connection.resolve_identity().await,
            Err(Error::Http(_))
        ));
        assert_eq!(connection.cached_identity(), None);

        assert_eq!(connection.resolve_identity().await.unwrap(), 9);
        assert_eq!(api.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_reinitialize_discards_identity() {
        let manager = counting_manager(Arc::new(AtomicUsize::new(0)));
        manager.initialize(CodingConfig::new("a").unwrap());
        let first = manager.instance().unwrap();
        first.resolve_identity().await.unwrap();
        assert_eq!(first.cached_identity(), Some(7));

        manager.initialize(CodingConfig::new("b").unwrap());
        let second = manager.instance().unwrap();
        assert_eq!(second.cached_identity(), None);
    }
}
