//! Flat-file course catalog store.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// A single course record. All fields are free-form strings; `code` is the
/// lookup key but uniqueness is not enforced by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Course {
    pub code: String,
    pub name: String,
    pub instructor: String,
    pub semester: String,
    pub schedule: String,
    pub classroom: String,
    pub prerequisites: String,
    pub grading: String,
    pub description: String,
}

impl Course {
    /// Field names in form order, used to drive required-field validation.
    pub const FIELD_NAMES: [&'static str; 9] = [
        "code",
        "name",
        "instructor",
        "semester",
        "schedule",
        "classroom",
        "prerequisites",
        "grading",
        "description",
    ];

    /// Look up a field value by its form name.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "code" => Some(&self.code),
            "name" => Some(&self.name),
            "instructor" => Some(&self.instructor),
            "semester" => Some(&self.semester),
            "schedule" => Some(&self.schedule),
            "classroom" => Some(&self.classroom),
            "prerequisites" => Some(&self.prerequisites),
            "grading" => Some(&self.grading),
            "description" => Some(&self.description),
            _ => None,
        }
    }
}

/// Error type for catalog store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("catalog store at {path} could not be read: {reason}")]
    Unavailable { path: PathBuf, reason: String },

    #[error("catalog store at {path} could not be written: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Flat-file store holding the ordered course catalog.
///
/// The backing document is a single JSON array. Reads load it in full;
/// `append` rewrites it in full under a mutex.
pub struct CatalogStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CatalogStore {
    /// Create a store over the given file path. The file is created lazily
    /// on the first `append`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every course in file arrival order.
    ///
    /// A missing file is an empty catalog, not an error. A file that exists
    /// but cannot be read or parsed is `StoreError::Unavailable`.
    pub async fn read_all(&self) -> Result<Vec<Course>, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|e| StoreError::Unavailable {
                    path: self.path.clone(),
                    reason: e.to_string(),
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(StoreError::Unavailable {
                path: self.path.clone(),
                reason: e.to_string(),
            }),
        }
    }

    /// Append one course: read the full catalog, push the record, rewrite
    /// the document. The mutex serializes concurrent appends.
    pub async fn append(&self, course: Course) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut courses = self.read_all().await?;
        courses.push(course);

        let content = serde_json::to_string_pretty(&courses).map_err(|e| {
            StoreError::Unavailable {
                path: self.path.clone(),
                reason: e.to_string(),
            }
        })?;

        tokio::fs::write(&self.path, content)
            .await
            .map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(code: &str, name: &str) -> Course {
        Course {
            code: code.to_string(),
            name: name.to_string(),
            ..Course::default()
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let store = CatalogStore::new(dir.path().join("catalog.json"));

        let courses = store.read_all().await.unwrap();
        assert!(courses.is_empty());
    }

    #[tokio::test]
    async fn test_append_then_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = CatalogStore::new(dir.path().join("catalog.json"));

        store.append(course("CS101", "Intro")).await.unwrap();
        store.append(course("CS201", "Data Structures")).await.unwrap();

        let courses = store.read_all().await.unwrap();
        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].code, "CS101");
        assert_eq!(courses.last().unwrap().code, "CS201");
    }

    #[tokio::test]
    async fn test_read_all_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = CatalogStore::new(dir.path().join("catalog.json"));
        store.append(course("CS101", "Intro")).await.unwrap();

        let first = store.read_all().await.unwrap();
        let second = store.read_all().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_duplicate_codes_are_permitted() {
        let dir = tempfile::tempdir().unwrap();
        let store = CatalogStore::new(dir.path().join("catalog.json"));

        store.append(course("CS101", "Intro")).await.unwrap();
        store.append(course("CS101", "Intro (again)")).await.unwrap();

        let courses = store.read_all().await.unwrap();
        assert_eq!(courses.len(), 2);
    }

    #[tokio::test]
    async fn test_unparseable_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, "not json at all").unwrap();

        let store = CatalogStore::new(&path);
        let err = store.read_all().await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable { .. }));
    }

    #[test]
    fn test_field_lookup_by_name() {
        let c = course("CS101", "Intro");
        assert_eq!(c.field("code"), Some("CS101"));
        assert_eq!(c.field("semester"), Some(""));
        assert_eq!(c.field("no_such_field"), None);
    }
}
