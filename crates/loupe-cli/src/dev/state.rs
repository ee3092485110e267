//! Shared state for the preview server.
//!
//! Build status, bundle contents and live-reload clients behind
//! parking_lot locks.

use crate::startup::{HtmlSource, StartupConfig};
use loupe_render::OutputAliases;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Build status tracking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStatus {
    /// No build has been performed yet
    NotStarted,
    /// Build is currently in progress
    InProgress { started_at: Instant },
    /// Build completed successfully
    Success { duration_ms: u64 },
    /// Build failed with error
    Failed { error: String },
}

impl BuildStatus {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, BuildStatus::InProgress { .. })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BuildStatus::Success { .. })
    }

    /// Get error message if failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            BuildStatus::Failed { error } => Some(error),
            _ => None,
        }
    }
}

/// Built bundles kept in memory: URL path -> (content, content-type).
#[derive(Debug, Clone, Default)]
pub struct BundleCache {
    files: HashMap<String, (Vec<u8>, String)>,
}

impl BundleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, content: Vec<u8>, content_type: &str) {
        self.files
            .insert(path.into(), (content, content_type.to_string()));
    }

    pub fn get(&self, path: &str) -> Option<&(Vec<u8>, String)> {
        self.files.get(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Combined size of all bundles in bytes.
    pub fn total_size(&self) -> u64 {
        self.files.values().map(|(content, _)| content.len() as u64).sum()
    }
}

/// Live-reload clients: id -> event sender.
pub type ClientRegistry = Arc<RwLock<HashMap<usize, tokio::sync::mpsc::Sender<String>>>>;

/// Shared preview server state.
pub struct DevServerState {
    /// Current build status
    pub status: RwLock<BuildStatus>,

    /// Built bundles
    pub cache: RwLock<BundleCache>,

    /// Connected SSE clients
    pub clients: ClientRegistry,

    next_client_id: RwLock<usize>,

    /// HTML source fixed at startup
    pub html: HtmlSource,

    /// Bundle URLs written into assembled documents
    pub aliases: OutputAliases,

    /// Example directory served as static files
    pub static_dir: PathBuf,

    pub spa_mode: bool,

    pub live_reload_port: u16,

    /// Fallback document title
    pub project_name: String,
}

impl DevServerState {
    pub fn new(startup: &StartupConfig) -> Self {
        let aliases = OutputAliases::new(
            startup.js.as_ref().map(|js| js.alias.clone()),
            startup.css.as_ref().map(|css| css.alias.clone()),
        );
        let project_name = startup
            .entries
            .dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            status: RwLock::new(BuildStatus::NotStarted),
            cache: RwLock::new(BundleCache::new()),
            clients: Arc::new(RwLock::new(HashMap::new())),
            next_client_id: RwLock::new(0),
            html: startup.server.html.clone(),
            aliases,
            static_dir: startup.static_dir(),
            spa_mode: startup.server.spa_mode,
            live_reload_port: startup.server.live_reload_port,
            project_name,
        }
    }

    pub fn start_build(&self) {
        *self.status.write() = BuildStatus::InProgress {
            started_at: Instant::now(),
        };
    }

    pub fn complete_build(&self, duration_ms: u64) {
        *self.status.write() = BuildStatus::Success { duration_ms };
    }

    pub fn fail_build(&self, error: String) {
        *self.status.write() = BuildStatus::Failed { error };
    }

    pub fn get_status(&self) -> BuildStatus {
        self.status.read().clone()
    }

    /// Replace all bundles.
    pub fn update_cache(&self, new_cache: BundleCache) {
        *self.cache.write() = new_cache;
    }

    pub fn get_cached_file(&self, path: &str) -> Option<(Vec<u8>, String)> {
        self.cache.read().get(path).cloned()
    }

    /// Register a new SSE client.
    pub fn register_client(&self) -> (usize, tokio::sync::mpsc::Receiver<String>) {
        let id = {
            let mut next_id = self.next_client_id.write();
            let id = *next_id;
            *next_id += 1;
            id
        };

        let (tx, rx) = tokio::sync::mpsc::channel(100);
        self.clients.write().insert(id, tx);

        (id, rx)
    }

    pub fn unregister_client(&self, id: usize) {
        self.clients.write().remove(&id);
    }

    /// Send an event to every connected client, dropping the ones that went
    /// away.
    pub async fn broadcast(&self, event: &crate::dev::DevEvent) {
        let json = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string());

        let clients = self.clients.read().clone();

        let mut failed_ids = Vec::new();
        for (id, tx) in clients {
            if tx.send(json.clone()).await.is_err() {
                failed_ids.push(id);
            }
        }

        for id in failed_ids {
            self.unregister_client(id);
        }
    }

    pub fn client_count(&self) -> usize {
        self.clients.read().len()
    }
}

pub type SharedState = Arc<DevServerState>;
