//! # crx-format
//!
//! Core library for packaging directories as signed CRX3 containers.
//!
//! This crate provides:
//! - Zip archiving of an extension directory
//! - RSA key generation and PEM loading
//! - `SignedData` / `CrxFileHeader` encoding
//! - RSASSA-PKCS1-v1.5 / SHA-256 signing of the archive and signed header
//! - Container assembly, parsing and verification
//!
//! ## Features
//!
//! - `cli`: builds the `crx-pack` binary
//!
//! ## Example
//!
//! ```ignore
//! use crx_format::{package_with_key, package_with_new_key, verify_crx};
//!
//! // Pack with a fresh key and keep the key for the next release
//! let (bytes, key) = package_with_new_key("my-extension")?;
//! std::fs::write("key.pem", key.to_pem()?)?;
//!
//! // Later builds reuse the key so the extension id stays stable
//! let bytes = package_with_key("my-extension", &key)?;
//! assert!(verify_crx(&bytes)?.valid);
//! ```

pub mod archive;
mod builder;
pub mod container;
mod error;
pub mod header;
mod key;
pub mod proto;
pub mod signer;
pub mod verification;

pub use archive::{build_archive, ArchiveOptions, CompressionLevel};
pub use builder::{package_with_key, package_with_new_key, CrxBuilder, PackagedCrx};
pub use container::{CrxFile, CRX_MAGIC, CRX_VERSION};
pub use error::{Error, Result};
pub use key::{CrxId, KeyPair, CRX_ID_LEN, DEFAULT_KEY_BITS};
pub use verification::{verify_crx, verify_crx_file, VerificationResult};

// Re-export rsa for callers constructing keys directly
pub use rsa;
