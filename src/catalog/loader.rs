use std::path::PathBuf;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::Duration;

use tracing::{debug, info, warn};

use super::Catalog;
use crate::error::{CatalogError, ResolveError, ResolveResult};

pub const LICENSE_LIST_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/spdx/license-list-data/main/json/licenses.json";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the license vocabulary comes from.
pub trait CatalogSource: Send + Sync {
    fn fetch(&self) -> Result<Catalog, CatalogError>;

    /// Human-readable origin, used in logs.
    fn describe(&self) -> String;
}

/// Fetches `licenses.json` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    url: String,
    timeout: Duration,
}

impl HttpCatalogSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self { url: url.into(), timeout }
    }
}

impl Default for HttpCatalogSource {
    fn default() -> Self {
        Self::new(LICENSE_LIST_SOURCE_URL, DEFAULT_TIMEOUT)
    }
}

impl CatalogSource for HttpCatalogSource {
    fn fetch(&self) -> Result<Catalog, CatalogError> {
        let transport = |source| CatalogError::Transport { url: self.url.clone(), source };

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(transport)?;

        let response = client.get(&self.url).send().map_err(transport)?;
        if !response.status().is_success() {
            return Err(CatalogError::Status {
                url: self.url.clone(),
                status: response.status().as_u16(),
            });
        }

        let body = response.text().map_err(transport)?;
        Catalog::from_json(&body).map_err(|source| CatalogError::Decode {
            origin: self.url.clone(),
            source,
        })
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Reads a `licenses.json` document from disk, for offline use.
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for FileCatalogSource {
    fn fetch(&self) -> Result<Catalog, CatalogError> {
        let origin = self.path.display().to_string();
        let content = std::fs::read_to_string(&self.path).map_err(|source| CatalogError::Io {
            path: origin.clone(),
            source,
        })?;
        Catalog::from_json(&content).map_err(|source| CatalogError::Decode { origin, source })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

enum Slot {
    Empty,
    Loading,
    Ready(Arc<Catalog>),
}

type Outcome = Result<Arc<Catalog>, Arc<CatalogError>>;

struct State {
    slot: Slot,
    /// Bumped every time a fetch finishes, successful or not.
    generation: u64,
    last_outcome: Option<Outcome>,
}

/// Owns the lazily-loaded catalog and the source it comes from.
///
/// Loading is single-flight: when several callers find the catalog empty,
/// one of them fetches while the rest wait and share its outcome, including
/// a failure. A failed load leaves the slot empty so a later call retries.
pub struct CatalogHandle {
    source: Box<dyn CatalogSource>,
    state: Mutex<State>,
    loaded: Condvar,
}

impl CatalogHandle {
    pub fn new(source: impl CatalogSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            state: Mutex::new(State {
                slot: Slot::Empty,
                generation: 0,
                last_outcome: None,
            }),
            loaded: Condvar::new(),
        }
    }

    /// Handle over an already loaded catalog. The source is only consulted
    /// on [`reload`](Self::reload).
    pub fn preloaded(catalog: Catalog, source: impl CatalogSource + 'static) -> Self {
        let handle = Self::new(source);
        if !catalog.is_empty() {
            handle.lock().slot = Slot::Ready(Arc::new(catalog));
        }
        handle
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.lock().slot, Slot::Ready(_))
    }

    /// Return the catalog, fetching it first if nobody has yet.
    pub fn ensure_loaded(&self) -> ResolveResult<Arc<Catalog>> {
        let mut state = self.lock();
        loop {
            if let Slot::Ready(catalog) = &state.slot {
                return Ok(Arc::clone(catalog));
            }
            if matches!(state.slot, Slot::Empty) {
                return self.load(state, None);
            }

            let waiting_on = state.generation;
            debug!("catalog load already in flight, waiting");
            while matches!(state.slot, Slot::Loading) && state.generation == waiting_on {
                state = self.loaded.wait(state).unwrap_or_else(|e| e.into_inner());
            }
            if state.generation != waiting_on {
                return match state.last_outcome.clone() {
                    Some(Ok(catalog)) => Ok(catalog),
                    Some(Err(cause)) => Err(ResolveError::CatalogUnavailable(cause)),
                    None => Err(ResolveError::CatalogUnavailable(Arc::new(CatalogError::Aborted))),
                };
            }
        }
    }

    /// Fetch again regardless of the current state and swap in the result.
    ///
    /// On failure the previously loaded catalog, if any, stays in place.
    pub fn reload(&self) -> ResolveResult<Arc<Catalog>> {
        let mut state = self.lock();
        while matches!(state.slot, Slot::Loading) {
            state = self.loaded.wait(state).unwrap_or_else(|e| e.into_inner());
        }
        let previous = match &state.slot {
            Slot::Ready(catalog) => Some(Arc::clone(catalog)),
            _ => None,
        };
        self.load(state, previous)
    }

    fn load(
        &self,
        mut state: MutexGuard<'_, State>,
        fallback: Option<Arc<Catalog>>,
    ) -> ResolveResult<Arc<Catalog>> {
        state.slot = Slot::Loading;
        drop(state);

        let origin = self.source.describe();
        debug!(source = %origin, "fetching license catalog");

        let mut guard = LoadGuard { handle: self, finished: false };
        let fetched = self.source.fetch();
        guard.finished = true;

        let outcome: Outcome = match fetched {
            Ok(catalog) => {
                if catalog.is_empty() {
                    warn!(source = %origin, "license catalog contains no entries");
                } else {
                    info!(
                        source = %origin,
                        version = %catalog.format_version,
                        entries = catalog.len(),
                        "loaded license catalog"
                    );
                }
                Ok(Arc::new(catalog))
            }
            Err(e) => {
                warn!(source = %origin, error = %e, "failed to load license catalog");
                Err(Arc::new(e))
            }
        };

        let mut state = self.lock();
        state.generation += 1;
        state.slot = match (&outcome, fallback) {
            (Ok(catalog), _) if !catalog.is_empty() => Slot::Ready(Arc::clone(catalog)),
            (_, Some(previous)) => Slot::Ready(previous),
            _ => Slot::Empty,
        };
        state.last_outcome = Some(outcome.clone());
        drop(state);
        self.loaded.notify_all();

        outcome.map_err(ResolveError::CatalogUnavailable)
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Resets the slot if a fetch unwinds, so waiters are released.
struct LoadGuard<'a> {
    handle: &'a CatalogHandle,
    finished: bool,
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let mut state = self.handle.lock();
        state.slot = Slot::Empty;
        state.generation += 1;
        state.last_outcome = Some(Err(Arc::new(CatalogError::Aborted)));
        drop(state);
        self.handle.loaded.notify_all();
    }
}
