// 🧩 TemplateRenderer - JSON placeholder substitution
//
// A template is static markup with tokens of the form `KEY_PLACEHOLDER`,
// where KEY is the binding key uppercased (`treasuryYieldsData` becomes
// `TREASURYYIELDSDATA_PLACEHOLDER`). Rendering replaces every occurrence of
// each bound token with the JSON text of its value.
//
// Rendering never fails: a value that cannot be serialized becomes `[]` and
// a token missing from the template is skipped. Both are logged and recorded
// in the returned `RenderReport`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const PLACEHOLDER_SUFFIX: &str = "_PLACEHOLDER";

/// Substituted when a value fails to serialize
pub const EMPTY_FALLBACK: &str = "[]";

/// Token a binding key maps to
pub fn placeholder_for(key: &str) -> String {
    format!("{}{}", key.to_uppercase(), PLACEHOLDER_SUFFIX)
}

/// Escape JSON text for embedding inside a `<script>` element.
///
/// `</` becomes `<\/`, which JSON parsers read back as the same string.
pub fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

// ============================================================================
// BINDINGS
// ============================================================================

#[derive(Debug, Clone)]
struct Binding {
    key: String,
    json: Result<String, String>,
}

/// Ordered key → JSON text mapping, serialized eagerly
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    entries: Vec<Binding>,
}

impl Bindings {
    pub fn new() -> Self {
        Bindings {
            entries: Vec::new(),
        }
    }

    /// Bind any serializable value; a serialization error is kept and
    /// reported at render time
    pub fn bind<T: Serialize + ?Sized>(mut self, key: &str, value: &T) -> Self {
        let json = serde_json::to_string(value).map_err(|e| e.to_string());
        self.push(key, json);
        self
    }

    /// Bind an already converted value
    pub fn bind_json(mut self, key: &str, value: serde_json::Result<serde_json::Value>) -> Self {
        let json = value
            .and_then(|v| serde_json::to_string(&v))
            .map_err(|e| e.to_string());
        self.push(key, json);
        self
    }

    fn push(&mut self, key: &str, json: Result<String, String>) {
        // A later binding for the same key wins
        self.entries.retain(|b| b.key != key);
        self.entries.push(Binding {
            key: key.to_string(),
            json,
        });
    }

    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|b| b.key.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// RENDER REPORT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubstitutionStatus {
    /// Token found and replaced with the value's JSON
    Substituted,

    /// Value failed to serialize; `[]` was substituted
    Fallback,

    /// Token not present in the template; nothing replaced
    MissingPlaceholder,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Substitution {
    pub key: String,
    pub placeholder: String,
    pub status: SubstitutionStatus,
    pub occurrences: usize,
    pub bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderReport {
    pub template: String,
    pub substitutions: Vec<Substitution>,

    /// Tokens left in the output that no binding covered
    pub unbound: Vec<String>,
}

impl RenderReport {
    pub fn is_clean(&self) -> bool {
        self.unbound.is_empty()
            && self
                .substitutions
                .iter()
                .all(|s| s.status == SubstitutionStatus::Substituted)
    }

    pub fn fallback_count(&self) -> usize {
        self.count(SubstitutionStatus::Fallback)
    }

    pub fn missing_count(&self) -> usize {
        self.count(SubstitutionStatus::MissingPlaceholder)
    }

    fn count(&self, status: SubstitutionStatus) -> usize {
        self.substitutions.iter().filter(|s| s.status == status).count()
    }

    pub fn summary(&self) -> String {
        format!(
            "{}: {} bound, {} fallback, {} missing, {} unbound",
            self.template,
            self.substitutions.len(),
            self.fallback_count(),
            self.missing_count(),
            self.unbound.len()
        )
    }
}

#[derive(Debug, Clone)]
pub struct Rendered {
    pub document: String,
    pub report: RenderReport,
}

// ============================================================================
// TEMPLATE RENDERER
// ============================================================================

#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    name: String,
    source: String,
}

impl TemplateRenderer {
    pub fn new(name: &str, source: impl Into<String>) -> Self {
        TemplateRenderer {
            name: name.to_string(),
            source: source.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Placeholder tokens declared by the template, first occurrence order
    pub fn placeholders(&self) -> Vec<String> {
        find_placeholders(&self.source)
    }

    /// Keys that have no token, and tokens that have no key
    pub fn check(&self, bindings: &Bindings) -> (Vec<String>, Vec<String>) {
        let declared = self.placeholders();
        let bound: Vec<String> = bindings.keys().iter().map(|k| placeholder_for(k)).collect();

        let unused = bindings
            .keys()
            .into_iter()
            .filter(|k| !declared.contains(&placeholder_for(k)))
            .map(str::to_string)
            .collect();
        let unbound = declared.into_iter().filter(|p| !bound.contains(p)).collect();

        (unused, unbound)
    }

    pub fn render(&self, bindings: &Bindings) -> Rendered {
        let mut document = self.source.clone();
        let mut substitutions = Vec::with_capacity(bindings.len());

        for binding in &bindings.entries {
            let placeholder = placeholder_for(&binding.key);
            let (json, status, error) = match &binding.json {
                Ok(json) => (script_safe(json), SubstitutionStatus::Substituted, None),
                Err(e) => {
                    log::warn!(
                        "[{}] JSON serialization failed for {}: {}; substituting []",
                        self.name,
                        binding.key,
                        e
                    );
                    (
                        EMPTY_FALLBACK.to_string(),
                        SubstitutionStatus::Fallback,
                        Some(e.clone()),
                    )
                }
            };

            let occurrences = document.matches(placeholder.as_str()).count();
            if occurrences == 0 {
                log::warn!("[{}] placeholder {} not found", self.name, placeholder);
                substitutions.push(Substitution {
                    key: binding.key.clone(),
                    placeholder,
                    status: SubstitutionStatus::MissingPlaceholder,
                    occurrences: 0,
                    bytes: 0,
                    error,
                });
                continue;
            }

            document = document.replace(placeholder.as_str(), &json);
            log::debug!(
                "[{}] substituted {} ({} bytes, {}x)",
                self.name,
                placeholder,
                json.len(),
                occurrences
            );

            substitutions.push(Substitution {
                key: binding.key.clone(),
                placeholder,
                status,
                occurrences,
                bytes: json.len(),
                error,
            });
        }

        let unbound = find_placeholders(&document);
        for token in &unbound {
            log::warn!("[{}] placeholder {} left unbound", self.name, token);
        }

        Rendered {
            document,
            report: RenderReport {
                template: self.name.clone(),
                substitutions,
                unbound,
            },
        }
    }
}

/// Uppercase key (underscores allowed) followed by the suffix, as a whole word
fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\b[A-Z0-9_]*[A-Z0-9]_PLACEHOLDER\b")
            .expect("BUG: invalid placeholder regex literal")
    })
}

/// Placeholder tokens in `text`, deduplicated in first-occurrence order
fn find_placeholders(text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for token in placeholder_pattern().find_iter(text) {
        if !found.iter().any(|t| t == token.as_str()) {
            found.push(token.as_str().to_string());
        }
    }
    found
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;
    use serde::Serializer;

    struct Broken;

    impl Serialize for Broken {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("table is corrupted"))
        }
    }

    #[derive(Serialize)]
    struct Point {
        year: &'static str,
        value: i64,
    }

    const TEMPLATE: &str = r#"<html><body>
<script id="a" type="application/json">ALPHADATA_PLACEHOLDER</script>
<script>const beta = BETADATA_PLACEHOLDER; const again = ALPHADATA_PLACEHOLDER;</script>
</body></html>"#;

    #[test]
    fn test_placeholder_for_key() {
        assert_eq!(placeholder_for("treasuryYieldsData"), "TREASURYYIELDSDATA_PLACEHOLDER");
        assert_eq!(placeholder_for("pgFinancialData"), "PGFINANCIALDATA_PLACEHOLDER");
    }

    #[test]
    fn test_find_placeholders_dedups_in_order() {
        let renderer = TemplateRenderer::new("t", TEMPLATE);
        assert_eq!(
            renderer.placeholders(),
            vec!["ALPHADATA_PLACEHOLDER", "BETADATA_PLACEHOLDER"]
        );
    }

    #[test]
    fn test_find_placeholders_ignores_prose() {
        let text = "if (content.includes('PLACEHOLDER')) {} x_PLACEHOLDER fooBAR_PLACEHOLDER";
        assert!(find_placeholders(text).is_empty());
    }

    #[test]
    fn test_underscore_keys_keep_their_full_token() {
        let renderer =
            TemplateRenderer::new("t", "x = MY_KEY_PLACEHOLDER; y = RATE_2015_PLACEHOLDER;");
        assert_eq!(
            renderer.placeholders(),
            vec!["MY_KEY_PLACEHOLDER", "RATE_2015_PLACEHOLDER"]
        );

        let bindings = Bindings::new().bind("my_key", &1);
        let (unused, unbound) = renderer.check(&bindings);
        assert!(unused.is_empty());
        assert_eq!(unbound, vec!["RATE_2015_PLACEHOLDER"]);

        let rendered = renderer.render(&bindings);
        assert!(rendered.document.starts_with("x = 1;"));
        assert_eq!(rendered.report.unbound, vec!["RATE_2015_PLACEHOLDER"]);
    }

    #[test]
    fn test_render_replaces_every_occurrence() {
        let renderer = TemplateRenderer::new("t", TEMPLATE);
        let bindings = Bindings::new()
            .bind("alphaData", &vec![Point { year: "2011", value: 1 }])
            .bind("betaData", &vec![1, 2, 3]);

        let rendered = renderer.render(&bindings);

        assert!(!rendered.document.contains(PLACEHOLDER_SUFFIX));
        assert_eq!(rendered.document.matches(r#"[{"year":"2011","value":1}]"#).count(), 2);
        assert!(rendered.document.contains("const beta = [1,2,3];"));
        assert!(rendered.report.is_clean());
        assert_eq!(rendered.report.substitutions[0].occurrences, 2);
    }

    #[test]
    fn test_serialization_failure_falls_back_to_empty_array() {
        let renderer = TemplateRenderer::new("t", TEMPLATE);
        let bindings = Bindings::new()
            .bind("alphaData", &Broken)
            .bind("betaData", &vec![1]);

        let rendered = renderer.render(&bindings);

        let empty = r#"<script id="a" type="application/json">[]</script>"#;
        assert!(rendered.document.contains(empty));
        assert!(rendered.document.contains("const beta = [1];"));
        assert_eq!(rendered.report.fallback_count(), 1);
        assert!(rendered.report.substitutions[0]
            .error
            .as_deref()
            .unwrap()
            .contains("corrupted"));
        assert!(!rendered.report.is_clean());
    }

    #[test]
    fn test_missing_placeholder_is_skipped() {
        let renderer = TemplateRenderer::new("t", TEMPLATE);
        let bindings = Bindings::new()
            .bind("alphaData", &vec![1])
            .bind("betaData", &vec![2])
            .bind("gammaData", &vec![3]);

        let rendered = renderer.render(&bindings);

        assert_eq!(rendered.report.missing_count(), 1);
        assert_eq!(rendered.report.substitutions[2].key, "gammaData");
        assert!(!rendered.document.contains("[3]"));
    }

    #[test]
    fn test_unbound_placeholders_are_reported() {
        let renderer = TemplateRenderer::new("t", TEMPLATE);
        let rendered = renderer.render(&Bindings::new().bind("alphaData", &vec![1]));

        assert_eq!(rendered.report.unbound, vec!["BETADATA_PLACEHOLDER"]);

        let (unused, unbound) = renderer.check(&Bindings::new().bind("gammaData", &0));
        assert_eq!(unused, vec!["gammaData"]);
        assert_eq!(unbound.len(), 2);
    }

    #[test]
    fn test_script_safe_output_stays_valid_json() {
        let renderer = TemplateRenderer::new("t", "<script>ALPHADATA_PLACEHOLDER</script>");
        let rendered = renderer.render(&Bindings::new().bind("alphaData", &vec!["</script><b>"]));

        assert_eq!(rendered.document.matches("</script>").count(), 1);

        let inner = rendered
            .document
            .trim_start_matches("<script>")
            .trim_end_matches("</script>");
        let parsed: Vec<String> = serde_json::from_str(inner).unwrap();
        assert_eq!(parsed, vec!["</script><b>"]);
    }

    #[test]
    fn test_later_binding_replaces_earlier() {
        let bindings = Bindings::new().bind("alphaData", &1).bind("alphaData", &2);
        assert_eq!(bindings.len(), 1);

        let rendered = TemplateRenderer::new("t", "ALPHADATA_PLACEHOLDER").render(&bindings);
        assert_eq!(rendered.document, "2");
    }

    #[test]
    fn test_non_ascii_is_kept_verbatim() {
        let renderer = TemplateRenderer::new("t", "ALPHADATA_PLACEHOLDER");
        let rendered = renderer.render(&Bindings::new().bind("alphaData", &vec!["3개월 LIBOR"]));
        assert_eq!(rendered.document, r#"["3개월 LIBOR"]"#);
    }
}
