use crate::Result;
use anyhow::Context;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Write a file.
pub(crate) async fn write(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    tokio::fs::write(path, contents)
        .await
        .context(format!("Unable to write to {}", path.to_string_lossy()))
}

/// Read a file to a `String`.
pub(crate) async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read file at {}", path.display()))
}

/// Deserialize a JSON file into type `T`.
pub(crate) async fn deserialize<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned,
{
    let content = read(path).await?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON file at {}", path.display()))
}

/// Create a directory and its parents if they do not exist.
pub(crate) async fn make_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .with_context(|| format!("Unable to create directory at {}", path.display()))
}

pub(crate) async fn canonicalize(path: &Path) -> Result<PathBuf> {
    tokio::fs::canonicalize(path)
        .await
        .with_context(|| format!("Unable to canonicalize the path {}", path.display()))
}

/// Set owner-only permissions (0600) on Unix. Does nothing elsewhere.
pub(crate) fn restrict_permissions(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions)
            .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

/// An id for a transaction the service accepted without returning one. The `local-` prefix keeps
/// it apart from ids assigned by the service.
pub(crate) fn local_transaction_id() -> String {
    format!("local-{}", uuid::Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_transaction_id() {
        let a = local_transaction_id();
        let b = local_transaction_id();
        assert!(a.starts_with("local-"));
        assert_eq!(a.len(), "local-".len() + 32);
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_write_read_deserialize() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("a").join("b.json");
        make_dir(path.parent().unwrap()).await.unwrap();
        write(&path, r#"{"x": 1}"#).await.unwrap();
        assert_eq!(read(&path).await.unwrap(), r#"{"x": 1}"#);
        let value: serde_json::Value = deserialize(&path).await.unwrap();
        assert_eq!(value["x"], 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_restrict_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("secret");
        write(&path, "x").await.unwrap();
        restrict_permissions(&path).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
