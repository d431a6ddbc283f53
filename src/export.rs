// 📦 Export - write rendered exhibits to disk
//
// Each exhibit becomes `<slug>.html`. A full export also writes
// `manifest.json` listing every file with its length and SHA-256.

use crate::data::DataStore;
use crate::error::Result;
use crate::exhibit::Exhibit;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub slug: String,
    pub title: String,
    pub file: String,

    /// Document length in characters
    pub length: usize,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub generated_at: DateTime<Utc>,
    pub version: String,
    pub exhibits: Vec<ManifestEntry>,
}

pub fn sha256_hex(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// Render one exhibit into `dir/<slug>.html`
pub fn export_exhibit(store: &DataStore, exhibit: Exhibit, dir: &Path) -> Result<ManifestEntry> {
    std::fs::create_dir_all(dir)?;

    let rendered = exhibit.render(store)?;
    if !rendered.report.is_clean() {
        log::warn!("{}", rendered.report.summary());
    }

    let file = format!("{}.html", exhibit.slug());
    std::fs::write(dir.join(&file), &rendered.document)?;
    log::info!("Exported {} to {}", exhibit, dir.join(&file).display());

    Ok(ManifestEntry {
        slug: exhibit.slug().to_string(),
        title: exhibit.title().to_string(),
        file,
        length: rendered.document.chars().count(),
        sha256: sha256_hex(&rendered.document),
    })
}

/// Render all 14 exhibits and write the manifest
pub fn export_all(store: &DataStore, dir: &Path) -> Result<Manifest> {
    let exhibits = Exhibit::ALL
        .iter()
        .map(|exhibit| export_exhibit(store, *exhibit, dir))
        .collect::<Result<Vec<_>>>()?;

    let manifest = Manifest {
        generated_at: Utc::now(),
        version: crate::VERSION.to_string(),
        exhibits,
    };

    std::fs::write(dir.join(MANIFEST_FILE), serde_json::to_string_pretty(&manifest)?)?;
    Ok(manifest)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_export_exhibit() {
        let dir = TempDir::new().unwrap();
        let store = DataStore::new();

        let entry = export_exhibit(&store, Exhibit::Exhibit8, dir.path()).unwrap();
        assert_eq!(entry.file, "exhibit-8.html");

        let written = std::fs::read_to_string(dir.path().join("exhibit-8.html")).unwrap();
        assert_eq!(written.chars().count(), entry.length);
        assert_eq!(sha256_hex(&written), entry.sha256);
        assert!(!dir.path().join(MANIFEST_FILE).exists());
    }

    #[test]
    fn test_export_all_writes_manifest() {
        let dir = TempDir::new().unwrap();
        let store = DataStore::new();

        let manifest = export_all(&store, dir.path()).unwrap();
        assert_eq!(manifest.exhibits.len(), 14);

        for entry in &manifest.exhibits {
            assert!(dir.path().join(&entry.file).exists(), "{} missing", entry.file);
        }

        let text = std::fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap();
        let parsed: Manifest = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.exhibits, manifest.exhibits);
        assert_eq!(parsed.exhibits[0].slug, "q1");
    }
}
