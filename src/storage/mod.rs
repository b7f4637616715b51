//! Object storage boundary: a named blob goes into a named bucket and comes
//! back as a publicly resolvable URL. Upload retry and path collision handling
//! stay with the caller; keys are expected to be collision-resistant already
//! (see the uploads service).

use std::path::PathBuf;

use anyhow::Context;

#[async_trait::async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` under `bucket/key` and return the public URL.
    async fn put(&self, bucket: &str, key: &str, bytes: &[u8]) -> anyhow::Result<String>;

    /// The URL a successfully stored object resolves to. Derivable without a
    /// request.
    fn public_url(&self, bucket: &str, key: &str) -> String;
}

/// Filesystem-backed implementation. Objects live under `root/<bucket>/<key>`
/// and are served statically below `<public_base_url>/files/`.
#[derive(Debug, Clone)]
pub struct FsObjectStorage {
    root: PathBuf,
    public_base_url: String,
}

impl FsObjectStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        let public_base_url = public_base_url.into();
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait::async_trait]
impl ObjectStorage for FsObjectStorage {
    #[tracing::instrument(level = "debug", skip(self, bytes), fields(size = bytes.len()))]
    async fn put(&self, bucket: &str, key: &str, bytes: &[u8]) -> anyhow::Result<String> {
        let dir = self.root.join(bucket);
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("failed to create bucket dir {}", dir.display()))?;

        let path = dir.join(key);
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("failed to write object {}", path.display()))?;

        let url = self.public_url(bucket, key);
        tracing::debug!(%url, "stored object");
        Ok(url)
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/files/{}/{}", self.public_base_url, bucket, key)
    }
}
