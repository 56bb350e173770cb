//! Container signatures.
//!
//! Every proof signs the SHA-256 digest of
//!
//! ```text
//! "CRX3 SignedData\0" || u32_le(len(signed_header_data)) || signed_header_data || archive
//! ```
//!
//! using RSASSA-PKCS1-v1.5. The archive is streamed into the digest rather
//! than copied next to the header.

use crate::key::KeyPair;
use crate::{Error, Result};
use rsa::pkcs8::DecodePublicKey;
use rsa::{Pkcs1v15Sign, RsaPublicKey};
use sha2::{Digest, Sha256};
use std::io::{self, Read};

/// Literal that opens the signing input.
pub const SIGNATURE_CONTEXT: &[u8; 16] = b"CRX3 SignedData\0";

/// Compute the digest a proof signs.
pub fn signing_digest(signed_header_data: &[u8], mut archive: impl Read) -> Result<[u8; 32]> {
    let header_len = u32::try_from(signed_header_data.len())
        .map_err(|_| Error::Signing("signed header data exceeds 4 GiB".into()))?;

    let mut hasher = Sha256::new();
    hasher.update(SIGNATURE_CONTEXT);
    hasher.update(header_len.to_le_bytes());
    hasher.update(signed_header_data);
    let archive_len = io::copy(&mut archive, &mut hasher)
        .map_err(|e| Error::Signing(format!("failed to read archive: {e}")))?;

    log::trace!("hashed {archive_len} archive bytes for signing");
    Ok(hasher.finalize().into())
}

/// Sign `signed_header_data` and `archive` with the keypair's private key.
pub fn sign(signed_header_data: &[u8], archive: impl Read, key: &KeyPair) -> Result<Vec<u8>> {
    let digest = signing_digest(signed_header_data, archive)?;
    let signature = key
        .private_key()
        .sign(Pkcs1v15Sign::new::<Sha256>(), &digest)
        .map_err(|e| Error::Signing(e.to_string()))?;

    log::debug!("produced {}-byte signature", signature.len());
    Ok(signature)
}

/// Check a proof against the signing input it claims to cover.
///
/// Returns `Ok(false)` when the signature does not match and an error only
/// when the public key itself cannot be decoded.
pub fn verify_signature(
    public_key_der: &[u8],
    signature: &[u8],
    signed_header_data: &[u8],
    archive: impl Read,
) -> Result<bool> {
    let public_key = RsaPublicKey::from_public_key_der(public_key_der)
        .map_err(|e| Error::KeyFormat(format!("invalid public key: {e}")))?;
    let digest = signing_digest(signed_header_data, archive)?;

    Ok(public_key
        .verify(Pkcs1v15Sign::new::<Sha256>(), &digest, signature)
        .is_ok())
}
