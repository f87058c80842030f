//! UTF-16 interchange file codec and file-I/O seam.
//!
//! Interchange files are UTF-16 encoded for compatibility with the files
//! already in circulation. Written files are little-endian without a byte
//! order mark; reads tolerate either endianness when a BOM is present.
//!
//! File I/O goes through the [`InterchangeFiles`] trait so the host can root
//! the file wherever its data path lives; [`FsInterchangeFiles`] is the
//! plain filesystem implementation.

use async_trait::async_trait;
use std::path::Path;
use waymark_core::SyncError;

/// Encode text as UTF-16LE bytes, no BOM.
pub fn encode_utf16le(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

/// Decode UTF-16 bytes, honoring a leading BOM if present.
///
/// Byte streams that cannot be UTF-16 cannot hold a snapshot in any shape,
/// so decode failures surface as [`SyncError::MalformedSnapshot`].
pub fn decode_utf16(bytes: &[u8]) -> Result<String, SyncError> {
    if bytes.len() % 2 != 0 {
        return Err(SyncError::malformed_snapshot(
            "odd-length UTF-16 interchange payload",
        ));
    }

    let le_units = |bytes: &[u8]| -> Vec<u16> {
        bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect()
    };

    let units: Vec<u16> = match bytes {
        [0xFF, 0xFE, rest @ ..] => le_units(rest),
        [0xFE, 0xFF, rest @ ..] => rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect(),
        _ => le_units(bytes),
    };

    String::from_utf16(&units).map_err(SyncError::malformed_snapshot)
}

/// Injected reader/writer for the interchange file.
#[async_trait]
pub trait InterchangeFiles: Send + Sync {
    /// Read the full contents of `path`.
    async fn read(&self, path: &Path) -> Result<Vec<u8>, SyncError>;

    /// Create or truncate `path` and write `bytes`, creating parent
    /// directories as needed.
    async fn write(&self, path: &Path, bytes: Vec<u8>) -> Result<(), SyncError>;
}

/// [`InterchangeFiles`] backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsInterchangeFiles;

#[async_trait]
impl InterchangeFiles for FsInterchangeFiles {
    async fn read(&self, path: &Path) -> Result<Vec<u8>, SyncError> {
        Ok(tokio::fs::read(path).await?)
    }

    async fn write(&self, path: &Path, bytes: Vec<u8>) -> Result<(), SyncError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(tokio::fs::write(path, bytes).await?)
    }
}
