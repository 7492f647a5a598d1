//! Recognized option surface for the URL asset transform.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::filter::FilterRule;

/// Default inline size threshold in bytes.
pub const DEFAULT_LIMIT: u64 = 10 * 1024;

/// Extensions transformed when no include rules are configured.
const DEFAULT_INCLUDE: &[&str] = &["**/*.svg", "**/*.png", "**/*.jpg", "**/*.gif"];

/// Options recognized by [`crate::UrlTransform`].
///
/// Field names deserialize in camelCase so the same JSON shape a bundler
/// config would use works unchanged.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransformOptions {
    /// Inline size threshold in bytes. Files strictly larger than the limit
    /// are externalized. `Some(0)` is a sentinel meaning "always
    /// externalize"; `None` disables the check entirely and inlines
    /// everything. The two are distinct policies, not points on one scale.
    pub limit: Option<u64>,
    /// Paths must match one of these rules to be transformed; anything else
    /// passes through to the rest of the pipeline.
    pub include: Vec<FilterRule>,
    /// Paths matching any of these rules pass through even when included.
    pub exclude: Vec<FilterRule>,
    /// Prefix prepended to the on-disk destination of externalized assets.
    pub output_path: String,
    /// Prefix prepended to the reference string emitted into generated
    /// source.
    pub public_path: String,
    /// When false, finalization performs no filesystem writes at all. Used
    /// for build targets that never serve files from disk.
    pub emit_files: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            limit: Some(DEFAULT_LIMIT),
            include: DEFAULT_INCLUDE.iter().copied().map(FilterRule::from).collect(),
            exclude: Vec::new(),
            output_path: String::new(),
            public_path: String::new(),
            emit_files: true,
        }
    }
}

impl TransformOptions {
    /// Read options from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::filter::Filter;

    #[test]
    fn defaults_match_the_documented_surface() {
        let options = TransformOptions::default();
        assert_eq!(options.limit, Some(DEFAULT_LIMIT));
        assert!(options.exclude.is_empty());
        assert!(options.emit_files);
        assert_eq!(options.output_path, "");
        assert_eq!(options.public_path, "");

        let filter = Filter::new(&options.include, &options.exclude).unwrap();
        for matched in ["a.svg", "b.png", "c.jpg", "d.gif"] {
            assert!(filter.matches(&PathBuf::from(matched)), "{matched}");
        }
        assert!(!filter.matches(&PathBuf::from("e.webp")));
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let options: TransformOptions =
            serde_json::from_str(r#"{"limit": 0, "publicPath": "/static/"}"#).unwrap();
        assert_eq!(options.limit, Some(0));
        assert_eq!(options.public_path, "/static/");
        assert!(options.emit_files);
        assert!(!options.include.is_empty());
    }

    #[test]
    fn null_limit_disables_the_size_check() {
        let options: TransformOptions = serde_json::from_str(r#"{"limit": null}"#).unwrap();
        assert_eq!(options.limit, None);
    }

    #[test]
    fn from_path_loads_a_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("url.config.json");
        fs::write(&path, r#"{"include": ["**/*.webp"], "outputPath": "assets/"}"#).unwrap();

        let options = TransformOptions::from_path(&path).unwrap();
        assert_eq!(options.output_path, "assets/");

        let filter = Filter::new(&options.include, &options.exclude).unwrap();
        assert!(filter.matches(&PathBuf::from("x.webp")));
        assert!(!filter.matches(&PathBuf::from("x.png")));
    }

    #[test]
    fn from_path_reports_missing_files_with_context() {
        let err = TransformOptions::from_path(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
