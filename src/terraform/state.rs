//! In-memory state and plan blobs, and the scoped temp files that carry them
//! to the terraform process.

use crate::error::Result;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Serialized terraform state, opaque to this crate
#[derive(Clone, PartialEq, Eq, Default)]
pub struct State(Vec<u8>);

impl State {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub async fn from_file(path: &Path) -> Result<Self> {
        Ok(Self(tokio::fs::read(path).await?))
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State({} bytes)", self.0.len())
    }
}

/// Saved plan file contents, as written by `terraform plan -out=...`
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Plan(Vec<u8>);

impl Plan {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub async fn from_file(path: &Path) -> Result<Self> {
        Ok(Self(tokio::fs::read(path).await?))
    }
}

impl fmt::Debug for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Plan({} bytes)", self.0.len())
    }
}

/// A file in its own private temp directory, removed together with the
/// directory when dropped.
///
/// The directory also swallows any `*.backup` files terraform writes next to
/// the state it was given.
pub(crate) struct TempBlob {
    _dir: TempDir,
    path: PathBuf,
}

impl TempBlob {
    /// Write `bytes` to a fresh file named `file_name`
    pub(crate) fn write(file_name: &str, bytes: &[u8]) -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("tfexec-").tempdir()?;
        let path = dir.path().join(file_name);

        let mut file = std::fs::File::create(&path)?;
        file.write_all(bytes)?;
        file.flush()?;

        tracing::trace!(path = %path.display(), len = bytes.len(), "wrote temp blob");
        Ok(Self { _dir: dir, path })
    }

    /// Reserve a path for terraform to write into; the file itself is not created
    pub(crate) fn reserve(file_name: &str) -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("tfexec-").tempdir()?;
        let path = dir.path().join(file_name);
        Ok(Self { _dir: dir, path })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// `-state=` + path
    pub(crate) fn flag(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.path.display())
    }

    pub(crate) async fn read(&self) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(&self.path).await?)
    }
}
