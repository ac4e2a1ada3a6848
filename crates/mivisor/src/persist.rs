//! YAML document persistence shared by project configs and registries.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;

use crate::error::{MivisorError, Result};

/// Read a document, returning `None` if the file does not exist.
pub(crate) fn read_document(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(MivisorError::io(path, e)),
    }
}

/// Parse YAML text, attributing failures to `path`.
///
/// An empty or comment-only document parses as `T::default()`.
pub(crate) fn parse_yaml<T>(path: &Path, text: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if text.lines().all(|l| l.trim().is_empty() || l.trim_start().starts_with('#')) {
        return Ok(T::default());
    }
    match serde_yaml::from_str::<Option<T>>(text) {
        Ok(value) => Ok(value.unwrap_or_default()),
        Err(e) => Err(MivisorError::parse(path, e)),
    }
}

/// Serialize `value` as YAML and replace `path` with it atomically.
///
/// The document is written to a temporary file next to the target and
/// renamed into place, so a failed write never leaves a truncated file. The
/// temporary file is removed if anything fails before the rename.
pub(crate) fn write_yaml_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let text = serde_yaml::to_string(value).map_err(|e| MivisorError::parse(path, e))?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(parent).map_err(|e| MivisorError::io(path, e))?;
    file.write_all(text.as_bytes())
        .and_then(|_| file.as_file().sync_all())
        .map_err(|e| MivisorError::io(path, e))?;
    file.persist(path).map_err(|e| MivisorError::io(path, e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use tempfile::TempDir;

    #[test]
    fn test_missing_document_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(read_document(&dir.path().join("absent.yml")).unwrap().is_none());
    }

    #[test]
    fn test_empty_document_is_default() {
        let parsed: IndexMap<String, String> = parse_yaml(Path::new("x.yml"), "\n# nothing\n").unwrap();
        assert!(parsed.is_empty());
        let parsed: IndexMap<String, String> = parse_yaml(Path::new("x.yml"), "~\n").unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_malformed_document_is_parse_error() {
        let result: Result<IndexMap<String, String>> = parse_yaml(Path::new("x.yml"), "a: [1, 2");
        assert!(matches!(result, Err(MivisorError::Parse { .. })));
    }

    #[test]
    fn test_overwrite_replaces_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.yaml");
        fs::write(&path, "old: content\nwith: more lines\n").unwrap();

        let mut doc = IndexMap::new();
        doc.insert("new".to_string(), "value".to_string());
        write_yaml_atomic(&path, &doc).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new: value\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_failed_write_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be replaced by a file.
        let target = dir.path().join("occupied");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep.txt"), "x").unwrap();

        let doc: IndexMap<String, String> = IndexMap::new();
        let result = write_yaml_atomic(&target, &doc);

        assert!(matches!(result, Err(MivisorError::Io { .. })));
        assert!(target.is_dir());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    struct Unwritable;

    impl Serialize for Unwritable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> std::result::Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("value cannot be written"))
        }
    }

    #[test]
    fn test_failed_serialize_keeps_existing_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.yaml");
        fs::write(&path, "old: content\n").unwrap();

        let result = write_yaml_atomic(&path, &Unwritable);

        assert!(matches!(result, Err(MivisorError::Parse { .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), "old: content\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_read_only_directory_keeps_existing_document() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.yaml");
        fs::write(&path, "old: content\n").unwrap();
        fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o555)).unwrap();

        let mut doc = IndexMap::new();
        doc.insert("new".to_string(), "value".to_string());
        let result = write_yaml_atomic(&path, &doc);
        fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o755)).unwrap();

        // root ignores directory permissions.
        if result.is_err() {
            assert!(matches!(result, Err(MivisorError::Io { .. })));
            assert_eq!(fs::read_to_string(&path).unwrap(), "old: content\n");
            assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
        }
    }
}
