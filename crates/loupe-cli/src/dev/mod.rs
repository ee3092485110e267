//! Preview server with live reload.
//!
//! - Main server: renders or serves HTML, bundles and example assets
//! - Live-reload server: Server-Sent Events on a separate port
//! - File watching with debouncing, bundle rebuild on change
//! - Error overlay in the browser when a bundle fails to build

pub mod builder;
pub mod error_overlay;
pub mod server;
pub mod state;
pub mod watcher;

pub use builder::BundleBuilder;
pub use server::{PreviewServer, build_live_reload_router, build_router};
pub use state::{BuildStatus, BundleCache, DevServerState, SharedState};
pub use watcher::{FileChange, FileWatcher};

use serde::{Deserialize, Serialize};

/// Events pushed to live-reload clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DevEvent {
    /// Bundles are being rebuilt
    BuildStarted,

    /// Bundles rebuilt, clients reload
    BuildCompleted { duration_ms: u64 },

    /// A bundle failed, clients reload into the error overlay
    BuildFailed { error: String },

    /// Client connected
    ClientConnected { id: usize },
}

impl DevEvent {
    /// Whether clients reload the page on this event.
    pub fn triggers_reload(&self) -> bool {
        matches!(
            self,
            DevEvent::BuildCompleted { .. } | DevEvent::BuildFailed { .. }
        )
    }
}
