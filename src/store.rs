//! Durable persistence for issued certificates.
//!
//! The core only needs `put`/`get`/`ensure_directory`; everything else
//! about storage is the collaborator's business. [`FsBlobStore`] is the
//! plain-filesystem implementation used by tests and tooling.

use std::fs;
use std::io;
use std::path::Path;

use crate::cert::Certificate;
use crate::error::CertMintError;

/// File mode for persisted certificates. Certificates are public
/// material: world-readable, owner-writable.
pub const CERTIFICATE_FILE_MODE: u32 = 0o644;

/// Minimal blob-store surface the certificate core depends on.
pub trait BlobStore {
    fn ensure_directory(&self, path: &Path) -> io::Result<()>;
    fn put(&self, path: &Path, bytes: &[u8], mode: u32) -> io::Result<()>;
    fn get(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Stores blobs as plain files, creating parent directories as needed.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsBlobStore;

impl BlobStore for FsBlobStore {
    fn ensure_directory(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn put(&self, path: &Path, bytes: &[u8], mode: u32) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, bytes)?;
        set_mode(path, mode)
    }

    fn get(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

/// Persists a certificate as one world-readable PEM file.
pub fn save_certificate_pem<S: BlobStore>(
    store: &S,
    path: &Path,
    cert: &Certificate,
) -> Result<(), CertMintError> {
    let pem = cert.to_pem()?;
    store
        .put(path, pem.as_bytes(), CERTIFICATE_FILE_MODE)
        .map_err(CertMintError::from)
}

/// Loads a certificate previously persisted with [`save_certificate_pem`].
pub fn load_certificate_pem<S: BlobStore>(
    store: &S,
    path: &Path,
) -> Result<Certificate, CertMintError> {
    let bytes = store.get(path).map_err(CertMintError::from)?;
    let pem = String::from_utf8(bytes).map_err(|_| {
        CertMintError::MalformedInput("certificate file is not valid UTF-8".to_string())
    })?;
    Certificate::from_pem(&pem)
}
