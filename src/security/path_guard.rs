//! Path Containment Module
//!
//! Resolves untrusted path segments against a trusted base directory and
//! rejects anything that escapes it. Containment is checked twice: lexically
//! after normalization (catches `..` traversal without touching the
//! filesystem) and again after canonicalization (catches symlink escapes).

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{AppError, Result};

/// A contained, existing file under a sandbox base directory.
///
/// The raw OS path is deliberately not exposed; the handle is only usable
/// for the subsequent read.
#[derive(Clone, PartialEq, Eq)]
pub struct SafePath {
    path: PathBuf,
}

impl SafePath {
    /// Final file name component, for response headers and logs.
    pub fn file_name(&self) -> Option<String> {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }

    /// Read the file contents.
    pub fn read(&self) -> Result<Vec<u8>> {
        fs::read(&self.path).map_err(|e| {
            tracing::debug!(reason = %e, "contained file became unreadable");
            AppError::PathRejected
        })
    }

    /// File size in bytes.
    pub fn size(&self) -> Result<u64> {
        let metadata = fs::metadata(&self.path).map_err(|e| {
            tracing::debug!(reason = %e, "contained file became unreadable");
            AppError::PathRejected
        })?;
        Ok(metadata.len())
    }
}

impl std::fmt::Debug for SafePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SafePath")
            .field("file_name", &self.file_name())
            .finish_non_exhaustive()
    }
}

/// Sandbox rooted at a trusted, server-controlled base directory.
#[derive(Debug, Clone)]
pub struct FileSandbox {
    base: PathBuf,
}

impl FileSandbox {
    /// Create a sandbox rooted at `base`.
    ///
    /// The base is canonicalized once so later containment checks compare
    /// against its real location. A missing base is a deployment error.
    pub fn new<P: AsRef<Path>>(base: P) -> Result<Self> {
        let base = fs::canonicalize(base.as_ref()).map_err(|e| {
            AppError::Config(format!(
                "downloads directory '{}' is not usable: {}",
                base.as_ref().display(),
                e
            ))
        })?;

        if !base.is_dir() {
            return Err(AppError::Config(format!(
                "downloads directory '{}' is not a directory",
                base.display()
            )));
        }

        Ok(Self { base })
    }

    /// Resolve an untrusted segment to a contained, existing file.
    ///
    /// Rejections are opaque to the caller; the concrete reason is logged.
    pub fn resolve(&self, requested: &str) -> Result<SafePath> {
        if requested.is_empty() || requested.contains('\0') {
            tracing::debug!("path request empty or contains null byte");
            return Err(AppError::PathRejected);
        }

        // Lexical pass: join, collapse `.`/`..`, then require the result to
        // still sit under the base. `Path::starts_with` compares whole
        // components, so `/base` never matches `/basement`.
        let joined = self.base.join(requested);
        let normalized = normalize(&joined);
        if !normalized.starts_with(&self.base) {
            tracing::debug!(segment = %requested, "path traversal attempt rejected");
            return Err(AppError::PathRejected);
        }

        // Filesystem pass: canonicalize the target and re-check containment,
        // closing symlink escapes. Canonicalization also fails for missing
        // files, which is rejected the same way.
        let canonical = fs::canonicalize(&normalized).map_err(|e| {
            tracing::debug!(segment = %requested, reason = %e, "requested file not resolvable");
            AppError::PathRejected
        })?;

        if !canonical.starts_with(&self.base) {
            tracing::debug!(segment = %requested, "symlink escape rejected");
            return Err(AppError::PathRejected);
        }

        if !canonical.is_file() {
            tracing::debug!(segment = %requested, "requested path is not a regular file");
            return Err(AppError::PathRejected);
        }

        Ok(SafePath { path: canonical })
    }
}

/// Collapse `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(p) => normalized.push(p.as_os_str()),
            Component::RootDir => normalized.push(Component::RootDir),
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(name) => normalized.push(name),
        }
    }

    normalized
}
