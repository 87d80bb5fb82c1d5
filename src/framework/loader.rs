//! Framework Loader
//!
//! Discovers framework documents on disk and turns them into a
//! [`FrameworkStore`]. A document that cannot be read or parsed is logged
//! and skipped; its provider simply does not exist afterwards.

use super::document::{parse, Node};
use super::store::FrameworkStore;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Load every framework document matching a glob pattern
pub fn load_from_pattern(pattern: &str) -> FrameworkStore {
    let paths = match discover(pattern) {
        Ok(paths) => paths,
        Err(e) => {
            tracing::error!("Framework discovery failed for '{}': {:#}", pattern, e);
            return FrameworkStore::default();
        }
    };

    if paths.is_empty() {
        tracing::warn!("No framework documents match '{}'", pattern);
    }

    FrameworkStore::load(paths.iter().filter_map(|path| match load_document(path) {
        Ok(source) => Some(source),
        Err(e) => {
            tracing::warn!("Skipping framework {}: {:#}", path.display(), e);
            None
        }
    }))
}

/// Resolve a glob pattern to a sorted list of files
pub fn discover(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for entry in glob::glob(pattern).with_context(|| format!("Invalid pattern '{}'", pattern))? {
        match entry {
            Ok(path) if path.is_file() => paths.push(path),
            Ok(_) => {}
            Err(e) => tracing::warn!("Unreadable framework path: {}", e),
        }
    }

    paths.sort();
    Ok(paths)
}

/// Read and parse one framework document; the provider is the file stem
pub fn load_document(path: &Path) -> Result<(String, Node)> {
    let provider = provider_name(path)
        .with_context(|| format!("Cannot derive provider name from {}", path.display()))?;

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let root = parse(&content).with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::debug!("Parsed framework {} for provider {}", path.display(), provider);
    Ok((provider, root))
}

fn provider_name(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?.trim().to_lowercase();
    (!stem.is_empty()).then_some(stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_name_from_stem() {
        assert_eq!(provider_name(Path::new("/x/Amazon.xml")).as_deref(), Some("amazon"));
        assert_eq!(provider_name(Path::new("google.xml")).as_deref(), Some("google"));
    }

    #[test]
    fn test_malformed_document_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("amazon.xml"),
            r#"<framework><servers><server type="smt" region="us-east-1"/></servers></framework>"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("google.xml"), "<framework><servers>").unwrap();

        let pattern = format!("{}/*.xml", dir.path().display());
        let store = load_from_pattern(&pattern);

        assert_eq!(store.providers(), vec!["amazon"]);
    }

    #[test]
    fn test_discover_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested.xml")).unwrap();
        std::fs::write(dir.path().join("oracle.xml"), "<framework/>").unwrap();

        let paths = discover(&format!("{}/*.xml", dir.path().display())).unwrap();
        assert_eq!(paths, vec![dir.path().join("oracle.xml")]);
    }

    #[test]
    fn test_invalid_pattern_gives_empty_store() {
        let store = load_from_pattern("[");
        assert!(store.is_empty());
    }

    #[test]
    fn test_no_matches_gives_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = load_from_pattern(&format!("{}/*.xml", dir.path().display()));
        assert!(store.is_empty());
    }
}
