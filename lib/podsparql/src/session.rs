use crate::config::{QueryConfig, ServiceOptions};
use crate::error::PodQueryError;
use crate::fetch::{AuthenticatedFetch, HttpFetch};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// An initialized Pod session: the config it was created from and the fetch capability acting
/// under its identity.
pub struct Session {
    config: QueryConfig,
    fetch: Arc<dyn AuthenticatedFetch>,
    generation: u64,
}

impl Session {
    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    pub fn fetch(&self) -> &dyn AuthenticatedFetch {
        self.fetch.as_ref()
    }

    /// Increases by one with every initialization of the owning [`SessionManager`].
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

/// Owns the current [`Session`] and replaces it on re-initialization.
///
/// Callers take a snapshot with [`SessionManager::current`] once per operation and use it until
/// the operation completes. Re-initializing while operations are in flight does not affect them,
/// they finish under the session they started with.
///
/// Re-initialization is not synchronized against in-flight calls. Which session a call sees
/// depends on whether it took its snapshot before or after the swap. This is a known race.
#[derive(Default)]
pub struct SessionManager {
    current: RwLock<Option<Arc<Session>>>,
    generations: AtomicU64,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session using the default HTTP transport.
    pub fn initialize(
        &self,
        config: QueryConfig,
        options: &ServiceOptions,
    ) -> Result<Arc<Session>, PodQueryError> {
        let fetch = HttpFetch::new(&config, options)?;
        Ok(self.install(config, Arc::new(fetch)))
    }

    /// Creates a session around an already built fetch capability, replacing any previous one.
    pub fn install(&self, config: QueryConfig, fetch: Arc<dyn AuthenticatedFetch>) -> Arc<Session> {
        let generation = self.generations.fetch_add(1, Ordering::Relaxed) + 1;
        let session = Arc::new(Session {
            config,
            fetch,
            generation,
        });
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&session));
        tracing::info!(
            pod_url = session.config.pod_url(),
            web_id = session.config.web_id(),
            generation,
            "Initialized Solid session"
        );
        session
    }

    /// The current session.
    pub fn current(&self) -> Result<Arc<Session>, PodQueryError> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(PodQueryError::SessionNotInitialized)
    }
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("generations", &self.generations.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
