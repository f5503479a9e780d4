pub mod auth;
pub mod config;
pub mod query;

pub use auth::{AuthEvent, AuthStateSubscription, Session};
pub use config::BackendConfig;
pub use query::{OrderDirection, QueryBuilder};

use futures::channel::mpsc::UnboundedSender;
use shared_types::AppError;
use std::sync::{Arc, Mutex};

/// Handle to the hosted auth + row-query service.
///
/// Constructed once at startup from the environment config. Session
/// persistence and automatic token refresh are deliberately disabled: the
/// session lives only inside this handle, so authentication state does not
/// survive a page reload and must be re-established each session.
///
/// Cloning is cheap; all clones share the same session and subscriber list.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: BackendConfig,
    http: reqwest::Client,
    session: Mutex<Option<Session>>,
    listeners: Mutex<Vec<UnboundedSender<AuthEvent>>>,
}

impl PartialEq for BackendClient {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::internal(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            inner: Arc::new(ClientInner {
                config,
                http,
                session: Mutex::new(None),
                listeners: Mutex::new(Vec::new()),
            }),
        })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.inner.config
    }

    /// The current in-memory session, if signed in.
    pub fn session(&self) -> Option<Session> {
        lock(&self.inner.session).clone()
    }

    /// Start a row query against a named table.
    pub fn from(&self, table: &str) -> QueryBuilder {
        QueryBuilder::new(self.clone(), table)
    }

    /// Build a request carrying the service headers: the public API key, and
    /// a bearer token (the signed-in user's access token when present, the
    /// anon key otherwise). The configured timeout applies to every request
    /// so an unresponsive backend cannot hang a caller indefinitely.
    pub(crate) fn request(&self, method: reqwest::Method, url: reqwest::Url) -> reqwest::RequestBuilder {
        let bearer = lock(&self.inner.session)
            .as_ref()
            .map(|s| s.access_token.clone())
            .unwrap_or_else(|| self.inner.config.anon_key.clone());
        let builder = self
            .inner
            .http
            .request(method, url)
            .header("apikey", &self.inner.config.anon_key)
            .bearer_auth(bearer);
        self.apply_timeout(builder)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn apply_timeout(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.timeout(self.inner.config.timeout)
    }

    // Request timeouts are unsupported on wasm; the browser's fetch limits apply.
    #[cfg(target_arch = "wasm32")]
    fn apply_timeout(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
    }

    pub(crate) fn set_session(&self, session: Option<Session>) {
        *lock(&self.inner.session) = session;
    }

    pub(crate) fn subscribe(&self, sender: UnboundedSender<AuthEvent>) {
        lock(&self.inner.listeners).push(sender);
    }

    /// Deliver an auth event to every live subscriber, dropping the ones
    /// whose receiving end has gone away.
    pub(crate) fn emit(&self, event: AuthEvent) {
        lock(&self.inner.listeners).retain(|sender| sender.unbounded_send(event.clone()).is_ok());
    }
}

/// Lock a mutex, recovering the data if a panicking thread poisoned it.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Map a transport-level failure onto the error taxonomy. Timeouts are the
/// one transience we distinguish, since the per-request deadline is ours.
pub(crate) fn transport_error(error: reqwest::Error) -> AppError {
    if error.is_timeout() {
        AppError::timeout("Request timed out")
    } else {
        AppError::network(format!("Request failed: {}", error))
    }
}
