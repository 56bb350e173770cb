use thiserror::Error;

/// Errors that can occur while packaging or reading CRX3 containers.
///
/// Each variant names the pipeline stage that failed. Packaging is
/// fail-fast: the first error ends the call and no output is produced.
#[derive(Debug, Error)]
pub enum Error {
    /// The key provider could not produce a keypair.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// Key material could not be parsed or serialized.
    #[error("invalid key material: {0}")]
    KeyFormat(String),

    /// The source directory could not be archived.
    #[error("archive build failed: {0}")]
    ArchiveBuild(String),

    /// A header message could not be encoded.
    #[error("header encoding failed: {0}")]
    Encoding(String),

    /// The signature could not be computed.
    #[error("signing failed: {0}")]
    Signing(String),

    /// The container bytes could not be written.
    #[error("container assembly failed: {0}")]
    Assembly(String),

    /// The input is not a well-formed CRX3 container.
    #[error("invalid crx format: {0}")]
    InvalidFormat(String),

    /// I/O error, displayed as the underlying OS error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for crx-format operations.
pub type Result<T> = std::result::Result<T, Error>;
