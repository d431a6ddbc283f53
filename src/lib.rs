// SCF Casebook - Core Library
// Exposes all modules for use in CLI, TUI, web server, and tests

pub mod config;
pub mod data;
pub mod error;
pub mod exhibit;
pub mod export;
pub mod integrity; // Recomputes hand-calculated figures
pub mod presenter;
pub mod tables; // Column/row previews + CSV
pub mod template; // KEY_PLACEHOLDER substitution

#[cfg(feature = "server")]
pub mod server;

// Re-export commonly used types
pub use config::{clamp_height, Config, ConfigArgs};
pub use data::{DataStore, TableInfo, Topic, TABLES};
pub use error::{CasebookError, Result};
pub use exhibit::Exhibit;
pub use export::{export_all, export_exhibit, Manifest, ManifestEntry};
pub use integrity::{audit, audit_exhibit, IntegrityFinding, IntegrityReport, Severity};
pub use presenter::{DebugPanel, Presentation, PresentationError, Presenter, ViewOptions};
pub use tables::TableView;
pub use template::{
    placeholder_for, Bindings, RenderReport, Rendered, Substitution, SubstitutionStatus,
    TemplateRenderer,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
