//! Signing keys and the identity derived from them.
//!
//! A [`KeyPair`] is either generated fresh or supplied by the caller. Its
//! public half, DER-encoded as SubjectPublicKeyInfo, is what ends up in the
//! container header and what the [`CrxId`] is derived from.

use crate::{Error, Result};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::{DecodePrivateKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use std::fmt;

/// Modulus size used for generated keys.
pub const DEFAULT_KEY_BITS: usize = 2048;

/// Length of a [`CrxId`] in bytes.
pub const CRX_ID_LEN: usize = 16;

/// 16-byte container identity: the leading half of SHA-256 over the DER
/// public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CrxId([u8; CRX_ID_LEN]);

impl CrxId {
    /// Derive the identity of a DER-encoded public key.
    pub fn from_public_key_der(public_key_der: &[u8]) -> Self {
        let digest = Sha256::digest(public_key_der);
        let mut id = [0u8; CRX_ID_LEN];
        id.copy_from_slice(&digest[..CRX_ID_LEN]);
        Self(id)
    }

    /// Wrap raw bytes taken from a decoded header.
    ///
    /// Returns `None` unless exactly 16 bytes are given.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let id: [u8; CRX_ID_LEN] = bytes.try_into().ok()?;
        Some(Self(id))
    }

    pub fn as_bytes(&self) -> &[u8; CRX_ID_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The 32-character extension id browsers display, with each hex
    /// nibble mapped onto `a..=p`.
    pub fn to_extension_id(&self) -> String {
        self.0
            .iter()
            .flat_map(|byte| [byte >> 4, byte & 0x0f])
            .map(|nibble| char::from(b'a' + nibble))
            .collect()
    }
}

impl fmt::Display for CrxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_extension_id())
    }
}

/// RSA keypair used to sign a container.
///
/// Private material lives only as long as the value; nothing here writes it
/// anywhere unless [`KeyPair::to_pem`] is called explicitly.
#[derive(Clone)]
pub struct KeyPair {
    private_key: RsaPrivateKey,
}

impl KeyPair {
    /// Generate a fresh 2048-bit keypair from the operating system RNG.
    pub fn generate() -> Result<Self> {
        Self::generate_with_rng(&mut OsRng, DEFAULT_KEY_BITS)
    }

    /// Generate a keypair of `bits` modulus size from the given RNG.
    pub fn generate_with_rng<R: CryptoRng + RngCore>(rng: &mut R, bits: usize) -> Result<Self> {
        let private_key =
            RsaPrivateKey::new(rng, bits).map_err(|e| Error::KeyGeneration(e.to_string()))?;
        log::debug!("generated {bits}-bit RSA key");
        Ok(Self { private_key })
    }

    /// Use an existing private key.
    pub fn from_private_key(private_key: RsaPrivateKey) -> Self {
        Self { private_key }
    }

    /// Parse a PKCS#8 (`PRIVATE KEY`) or PKCS#1 (`RSA PRIVATE KEY`) PEM.
    pub fn from_pem(pem: &str) -> Result<Self> {
        if let Ok(private_key) = RsaPrivateKey::from_pkcs8_pem(pem) {
            return Ok(Self { private_key });
        }

        RsaPrivateKey::from_pkcs1_pem(pem)
            .map(|private_key| Self { private_key })
            .map_err(|_| {
                Error::KeyFormat("failed to parse private key as PKCS#8 or PKCS#1 PEM".into())
            })
    }

    /// Serialize the private key as PKCS#8 PEM.
    pub fn to_pem(&self) -> Result<String> {
        let pem = self
            .private_key
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| Error::KeyFormat(e.to_string()))?;
        Ok(pem.as_str().to_owned())
    }

    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private_key
    }

    pub fn public_key(&self) -> RsaPublicKey {
        self.private_key.to_public_key()
    }

    /// SubjectPublicKeyInfo DER encoding of the public key.
    pub fn public_key_der(&self) -> Result<Vec<u8>> {
        let document = self
            .public_key()
            .to_public_key_der()
            .map_err(|e| Error::KeyFormat(e.to_string()))?;
        Ok(document.as_bytes().to_vec())
    }

    pub fn crx_id(&self) -> Result<CrxId> {
        Ok(CrxId::from_public_key_der(&self.public_key_der()?))
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use rsa::traits::PublicKeyParts;

        f.debug_struct("KeyPair")
            .field("bits", &(self.private_key.size() * 8))
            .finish_non_exhaustive()
    }
}
