use thiserror::Error;

/// Errors that can occur while attaching extensions to [`crate::Capabilities`].
#[derive(Debug, Error)]
pub enum CapabilitiesError {
    /// Reading a packed extension failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Packing an unpacked extension directory failed.
    #[error("extension packaging failed: {0}")]
    Package(#[from] crx_format::Error),
}

/// Result type for crx-capabilities operations.
pub type Result<T> = std::result::Result<T, CapabilitiesError>;
