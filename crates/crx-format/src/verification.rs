//! Signature verification for CRX3 containers.
//!
//! Recomputes the signing input from a parsed container and checks every
//! embedded RSA proof against it.

use crate::container::CrxFile;
use crate::key::CrxId;
use crate::proto::{self, SignedData};
use crate::{signer, Result};
use std::path::Path;

/// Verification result with details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    /// Whether every proof verified and one of them owns the crx id
    pub valid: bool,
    /// Identity declared in the signed header (if it decoded)
    pub crx_id: Option<CrxId>,
    /// Number of RSA proofs in the header
    pub proof_count: usize,
    /// Error message (if invalid)
    pub error: Option<String>,
}

impl VerificationResult {
    fn invalid(crx_id: Option<CrxId>, proof_count: usize, error: impl Into<String>) -> Self {
        Self {
            valid: false,
            crx_id,
            proof_count,
            error: Some(error.into()),
        }
    }
}

/// Verify container bytes.
///
/// Returns `Err` when the bytes are not a well-formed container and
/// `Ok` with `valid == false` when they are but the proofs do not hold.
///
/// # Example
///
/// ```ignore
/// use crx_format::{package_with_new_key, verify_crx};
///
/// let (bytes, _key) = package_with_new_key("my-extension")?;
/// let result = verify_crx(&bytes)?;
/// assert!(result.valid);
/// ```
pub fn verify_crx(bytes: &[u8]) -> Result<VerificationResult> {
    let crx = CrxFile::parse(bytes)?;
    let header = crx.decode_header()?;
    let proofs = &header.sha256_with_rsa;

    if proofs.is_empty() {
        return Ok(VerificationResult::invalid(None, 0, "no RSA proofs in header"));
    }

    let signed_data: SignedData = match proto::decode(&header.signed_header_data) {
        Ok(data) => data,
        Err(e) => return Ok(VerificationResult::invalid(None, proofs.len(), e.to_string())),
    };

    let crx_id = match CrxId::from_slice(&signed_data.crx_id) {
        Some(id) => id,
        None => {
            return Ok(VerificationResult::invalid(
                None,
                proofs.len(),
                format!(
                    "crx id must be 16 bytes, got {}",
                    signed_data.crx_id.len()
                ),
            ));
        }
    };

    if !proofs
        .iter()
        .any(|proof| CrxId::from_public_key_der(&proof.public_key) == crx_id)
    {
        return Ok(VerificationResult::invalid(
            Some(crx_id),
            proofs.len(),
            "no proof key matches the crx id",
        ));
    }

    for (index, proof) in proofs.iter().enumerate() {
        let verified = match signer::verify_signature(
            &proof.public_key,
            &proof.signature,
            &header.signed_header_data,
            crx.archive(),
        ) {
            Ok(verified) => verified,
            Err(e) => {
                return Ok(VerificationResult::invalid(
                    Some(crx_id),
                    proofs.len(),
                    format!("proof {index}: {e}"),
                ));
            }
        };

        if !verified {
            return Ok(VerificationResult::invalid(
                Some(crx_id),
                proofs.len(),
                format!("proof {index}: signature verification failed"),
            ));
        }
    }

    log::debug!("verified {crx_id} with {} proof(s)", proofs.len());
    Ok(VerificationResult {
        valid: true,
        crx_id: Some(crx_id),
        proof_count: proofs.len(),
        error: None,
    })
}

/// Verify a container file on disk.
pub fn verify_crx_file(path: impl AsRef<Path>) -> Result<VerificationResult> {
    let bytes = std::fs::read(path)?;
    verify_crx(&bytes)
}
