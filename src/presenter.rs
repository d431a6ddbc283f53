// 🎬 Presenter - selector dispatch and display options
//
// Turns one of the 14 selectors into a `Presentation`: the embeddable
// document, the viewer height, and optionally the backing tables and a debug
// panel. Errors stop here and come back as a message, never as a panic or an
// `Err` the surface has to handle.

use crate::config::{clamp_height, DEFAULT_HEIGHT};
use crate::data::DataStore;
use crate::error::Result;
use crate::exhibit::Exhibit;
use crate::integrity::{self, IntegrityReport};
use crate::tables::TableView;
use crate::template::RenderReport;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Characters of the document shown in the debug panel
pub const DOCUMENT_HEAD_CHARS: usize = 1000;

// ============================================================================
// VIEW OPTIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewOptions {
    pub debug: bool,

    /// Requested viewer height; only honored in debug mode
    pub height: u32,

    pub show_tables: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        ViewOptions {
            debug: false,
            height: DEFAULT_HEIGHT,
            show_tables: false,
        }
    }
}

impl ViewOptions {
    pub fn debug() -> Self {
        ViewOptions {
            debug: true,
            ..Default::default()
        }
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    pub fn with_tables(mut self, show_tables: bool) -> Self {
        self.show_tables = show_tables;
        self
    }

    pub fn effective_height(&self) -> u32 {
        if self.debug {
            clamp_height(self.height)
        } else {
            DEFAULT_HEIGHT
        }
    }
}

// ============================================================================
// PRESENTATION
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct DebugPanel {
    /// Every table the exhibit binds, keyed by binding key
    pub data_preview: Map<String, Value>,

    /// Document length in characters
    pub document_length: usize,

    pub document_head: String,
    pub integrity: IntegrityReport,
    pub render_report: RenderReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct PresentationError {
    pub message: String,

    /// Full error chain, debug mode only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traceback: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Presentation {
    pub exhibit: Option<Exhibit>,
    pub title: String,

    /// Empty when rendering failed
    pub document: String,
    pub height: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tables: Option<Vec<TableView>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugPanel>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<PresentationError>,
}

impl Presentation {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    fn failed(
        exhibit: Option<Exhibit>,
        title: String,
        err: &dyn std::error::Error,
        options: &ViewOptions,
    ) -> Self {
        Presentation {
            exhibit,
            title,
            document: String::new(),
            height: options.effective_height(),
            tables: None,
            debug: None,
            error: Some(PresentationError {
                message: format!("Could not display this exhibit: {}", err),
                traceback: options.debug.then(|| error_chain(err)),
            }),
        }
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut lines = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        lines.push(format!("caused by: {}", cause));
        source = cause.source();
    }
    lines.join("\n")
}

// ============================================================================
// PRESENTER
// ============================================================================

pub struct Presenter {
    store: DataStore,
}

impl Presenter {
    pub fn new() -> Self {
        Presenter {
            store: DataStore::new(),
        }
    }

    pub fn with_store(store: DataStore) -> Self {
        Presenter { store }
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    pub fn exhibits(&self) -> &'static [Exhibit] {
        &Exhibit::ALL
    }

    pub fn render(&self, exhibit: Exhibit, options: &ViewOptions) -> Presentation {
        log::info!("Rendering {} ({})", exhibit, exhibit.slug());

        match self.build(exhibit, options) {
            Ok(presentation) => presentation,
            Err(e) => {
                log::error!("Rendering {} failed: {}", exhibit, e);
                Presentation::failed(Some(exhibit), exhibit.title().to_string(), &e, options)
            }
        }
    }

    /// Parse a selector (`q1`, `Exhibit 8`, `e8`, ...) and render it
    pub fn render_by_id(&self, id: &str, options: &ViewOptions) -> Presentation {
        match id.parse::<Exhibit>() {
            Ok(exhibit) => self.render(exhibit, options),
            Err(e) => {
                log::warn!("{}", e);
                Presentation::failed(None, id.to_string(), &e, options)
            }
        }
    }

    fn build(&self, exhibit: Exhibit, options: &ViewOptions) -> Result<Presentation> {
        let rendered = exhibit.render(&self.store)?;

        let tables = if options.show_tables {
            Some(TableView::for_exhibit(&self.store, exhibit)?)
        } else {
            None
        };

        let debug = options.debug.then(|| DebugPanel {
            data_preview: self.data_preview(exhibit),
            document_length: rendered.document.chars().count(),
            document_head: rendered.document.chars().take(DOCUMENT_HEAD_CHARS).collect(),
            integrity: integrity::audit_exhibit(&self.store, exhibit),
            render_report: rendered.report.clone(),
        });

        if !rendered.report.is_clean() {
            log::warn!("{}", rendered.report.summary());
        }

        Ok(Presentation {
            exhibit: Some(exhibit),
            title: exhibit.title().to_string(),
            document: rendered.document,
            height: options.effective_height(),
            tables,
            debug,
            error: None,
        })
    }

    fn data_preview(&self, exhibit: Exhibit) -> Map<String, Value> {
        let mut preview = Map::new();
        for key in exhibit.tables() {
            let value = match self.store.table(key) {
                Ok(value) => value,
                Err(e) => {
                    log::warn!("preview of {} unavailable: {}", key, e);
                    Value::Null
                }
            };
            preview.insert(key.to_string(), value);
        }
        preview
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_selector_presents_a_document() {
        let presenter = Presenter::new();

        for exhibit in presenter.exhibits() {
            let p = presenter.render(*exhibit, &ViewOptions::default());
            assert!(p.is_ok(), "{}: {:?}", exhibit, p.error);
            assert!(!p.document.is_empty());
            assert_eq!(p.title, exhibit.title());
            assert_eq!(p.height, 3000);
            assert!(p.tables.is_none());
            assert!(p.debug.is_none());
        }
    }

    #[test]
    fn test_height_ignored_outside_debug() {
        let options = ViewOptions::default().with_height(4500);
        assert_eq!(options.effective_height(), 3000);

        let p = Presenter::new().render(Exhibit::Q1, &options);
        assert_eq!(p.height, 3000);
    }

    #[test]
    fn test_height_clamped_in_debug() {
        assert_eq!(ViewOptions::debug().with_height(4500).effective_height(), 4500);
        assert_eq!(ViewOptions::debug().with_height(4520).effective_height(), 4500);
        assert_eq!(ViewOptions::debug().with_height(1200).effective_height(), 2000);
        assert_eq!(ViewOptions::debug().with_height(8000).effective_height(), 5000);
    }

    #[test]
    fn test_debug_panel() {
        let p = Presenter::new().render(Exhibit::Exhibit4, &ViewOptions::debug());
        let panel = p.debug.unwrap();

        assert_eq!(panel.document_length, p.document.chars().count());
        assert_eq!(panel.document_head.chars().count(), DOCUMENT_HEAD_CHARS);
        assert!(p.document.starts_with(&panel.document_head));

        let keys: Vec<&String> = panel.data_preview.keys().collect();
        assert_eq!(keys.len(), Exhibit::Exhibit4.tables().len());
        assert!(panel.data_preview["scfTableBData"].is_object());

        assert!(panel.render_report.is_clean());
        assert_eq!(panel.integrity.findings.len(), 3);
    }

    #[test]
    fn test_table_views_on_request() {
        let options = ViewOptions::default().with_tables(true);
        let p = Presenter::new().render(Exhibit::Exhibit3, &options);
        let tables = p.tables.unwrap();

        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].name, "pgCashCycleData");
        assert_eq!(tables[0].len(), 16);
    }

    #[test]
    fn test_render_by_id() {
        let presenter = Presenter::new();

        let p = presenter.render_by_id("exhibit-8", &ViewOptions::default());
        assert_eq!(p.exhibit, Some(Exhibit::Exhibit8));
        assert!(p.document.contains("Market Interest Rates (Exhibit 8)"));

        let p = presenter.render_by_id("e2", &ViewOptions::default());
        assert_eq!(p.exhibit, Some(Exhibit::Exhibit2));
    }

    #[test]
    fn test_unknown_selector_becomes_message() {
        let presenter = Presenter::new();

        let p = presenter.render_by_id("q9", &ViewOptions::default());
        assert!(!p.is_ok());
        assert!(p.document.is_empty());
        assert!(p.exhibit.is_none());
        let error = p.error.unwrap();
        assert!(error.message.contains("q9"));
        assert!(error.traceback.is_none());

        let p = presenter.render_by_id("q9", &ViewOptions::debug());
        assert!(p.error.unwrap().traceback.unwrap().contains("Unknown exhibit"));
    }

    #[test]
    fn test_presentation_serializes_without_empty_sections() {
        let p = Presenter::new().render(Exhibit::Q2, &ViewOptions::default());
        let json = serde_json::to_value(&p).unwrap();

        assert_eq!(json["exhibit"], "Q2");
        assert_eq!(json["height"], 3000);
        assert!(json.get("debug").is_none());
        assert!(json.get("error").is_none());
    }
}
