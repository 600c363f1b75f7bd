use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// On-disk avatar blob store. Each upload is written once under a fresh
/// server-chosen name and served back read-only; the store also answers
/// whether an avatar_url submitted later was actually issued by it.
pub struct AvatarStore {
    dir: PathBuf,
    public_base: String,
}

impl AvatarStore {
    /// `public_base` is prepended to issued URLs (empty for same-origin
    /// relative URLs). A trailing slash is stripped so joins stay clean.
    pub async fn new(dir: PathBuf, public_base: &str) -> Result<Self> {
        fs::create_dir_all(&dir).await?;
        info!("Avatar storage directory: {}", dir.display());
        Ok(Self {
            dir,
            public_base: public_base.trim_end_matches('/').to_string(),
        })
    }

    /// Directory to mount for read-back serving.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn public_url(&self, name: &str) -> String {
        format!("{}/avatars/{}", self.public_base, name)
    }

    pub async fn store(&self, name: &str, bytes: &[u8]) -> Result<String> {
        let path = self.dir.join(name);
        fs::write(&path, bytes).await?;
        info!("Stored avatar {} ({} bytes)", name, bytes.len());
        Ok(self.public_url(name))
    }

    /// True only for URLs this store issued: correct prefix, a sane file
    /// name, and the blob still present on disk.
    pub async fn validate_url(&self, url: &str) -> bool {
        let prefix = format!("{}/avatars/", self.public_base);
        let Some(name) = url.strip_prefix(&prefix) else {
            return false;
        };
        if name.is_empty() || name.contains('/') || name.contains("..") {
            return false;
        }
        fs::try_exists(self.dir.join(name)).await.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> AvatarStore {
        let dir = std::env::temp_dir().join(format!("foyer-avatars-{}", uuid::Uuid::new_v4()));
        AvatarStore::new(dir, "").await.unwrap()
    }

    #[tokio::test]
    async fn issued_url_validates() {
        let store = store().await;
        let url = store.store("abc.png", b"png bytes").await.unwrap();
        assert_eq!(url, "/avatars/abc.png");
        assert!(store.validate_url(&url).await);
    }

    #[tokio::test]
    async fn foreign_urls_rejected() {
        let store = store().await;
        store.store("abc.png", b"png bytes").await.unwrap();

        assert!(!store.validate_url("/avatars/missing.png").await);
        assert!(!store.validate_url("https://elsewhere.example/abc.png").await);
        assert!(!store.validate_url("/avatars/../abc.png").await);
        assert!(!store.validate_url("/avatars/").await);
    }

    #[tokio::test]
    async fn public_base_is_part_of_the_prefix() {
        let dir = std::env::temp_dir().join(format!("foyer-avatars-{}", uuid::Uuid::new_v4()));
        let store = AvatarStore::new(dir, "https://cdn.example.com/").await.unwrap();

        let url = store.store("a.jpg", b"jpeg").await.unwrap();
        assert_eq!(url, "https://cdn.example.com/avatars/a.jpg");
        assert!(store.validate_url(&url).await);
        assert!(!store.validate_url("/avatars/a.jpg").await);
    }
}
