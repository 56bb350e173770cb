//! Header message schemas.
//!
//! Field numbers follow the upstream `crx3.proto` so encoded headers are
//! byte-compatible with what browsers expect.

use crate::{Error, Result};
use prost::Message;

/// The signed portion of the header.
#[derive(Clone, PartialEq, Message)]
pub struct SignedData {
    /// First 16 bytes of SHA-256 over the DER public key.
    #[prost(bytes = "vec", tag = "1")]
    pub crx_id: Vec<u8>,
}

/// A public key together with its signature over the signing input.
#[derive(Clone, PartialEq, Message)]
pub struct AsymmetricKeyProof {
    /// SubjectPublicKeyInfo DER bytes.
    #[prost(bytes = "vec", tag = "1")]
    pub public_key: Vec<u8>,
    /// Raw signature bytes.
    #[prost(bytes = "vec", tag = "2")]
    pub signature: Vec<u8>,
}

/// The complete header stored between the prefix and the archive.
#[derive(Clone, PartialEq, Message)]
pub struct CrxFileHeader {
    /// RSASSA-PKCS1-v1.5 / SHA-256 proofs.
    #[prost(message, repeated, tag = "2")]
    pub sha256_with_rsa: Vec<AsymmetricKeyProof>,
    /// Encoded [`SignedData`].
    #[prost(bytes = "vec", tag = "10000")]
    pub signed_header_data: Vec<u8>,
}

/// Encode a message into a freshly sized buffer.
pub(crate) fn encode<M: Message>(message: &M) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(message.encoded_len());
    message
        .encode(&mut buf)
        .map_err(|e| Error::Encoding(e.to_string()))?;
    Ok(buf)
}

/// Decode a message, reporting failures as a malformed container.
pub(crate) fn decode<M: Message + Default>(bytes: &[u8]) -> Result<M> {
    M::decode(bytes).map_err(|e| Error::InvalidFormat(format!("undecodable header: {e}")))
}
