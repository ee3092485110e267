//! # loupe-render
//!
//! Render core of the loupe preview server: renders a component to a full
//! HTML document on every request, after discarding exactly the cached
//! modules that may have changed since the previous request.
//!
//! ## Example
//!
//! ```no_run
//! use loupe_render::{
//!     EntrySet, InvalidationPolicy, OutputAliases, RenderOptions, RenderPipeline, RenderRequest,
//! };
//!
//! # async fn run() -> Result<(), loupe_render::PipelineError> {
//! let entries = EntrySet::resolve("src/button");
//! let policy = InvalidationPolicy::new(".").with_framework_path("node_modules/loupe");
//! let pipeline = RenderPipeline::from_entries(&entries, policy, RenderOptions::default())
//!     .expect("button has an entry component");
//!
//! let aliases = OutputAliases::new(Some("/bundle.js".into()), Some("/bundle.css".into()));
//! let html = pipeline.render(&RenderRequest::new("/", aliases)).await?;
//! println!("{html}");
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod completion;
pub mod diagnostic;
pub mod engine;
pub mod entry;
pub mod error;
pub mod html;
pub mod invalidate;
pub mod lint;
pub mod loader;
pub mod module;
pub mod module_id;
pub mod pipeline;
pub mod router;

pub use cache::ModuleCache;
pub use completion::{Abandoned, Completion, CompletionReceiver};
pub use diagnostic::htmlify_error;
pub use engine::{DocumentHead, EngineOptions, RenderContext, Renderer};
pub use entry::{EntryKind, EntrySet, find_entry, find_first_file};
pub use error::{LoadError, PipelineError, RenderError};
pub use html::{DocumentOptions, OutputAliases, assemble, html_escape};
pub use invalidate::{InvalidationPolicy, VENDOR_DIR};
pub use loader::{FsModuleLoader, ModuleLoader};
pub use module::{Component, Module, ModuleBody, ModuleKind};
pub use module_id::{ModuleId, ModuleIdError};
pub use pipeline::{RenderOptions, RenderOutcome, RenderPipeline, RenderRequest};
pub use router::{ROUTE_MARKER, RouteTable, RouterMode, RoutingLayer, detect_router};
