//! Header construction: the signed identity record and the outer header
//! that carries the proof.

use crate::key::CrxId;
use crate::proto::{self, AsymmetricKeyProof, CrxFileHeader, SignedData};
use crate::Result;

/// Derive the container identity from a DER-encoded public key.
pub fn crx_id(public_key_der: &[u8]) -> CrxId {
    CrxId::from_public_key_der(public_key_der)
}

/// Encode `SignedData { crx_id }`, the bytes covered by the signature.
pub fn signed_header_data(crx_id: &CrxId) -> Result<Vec<u8>> {
    proto::encode(&SignedData {
        crx_id: crx_id.as_bytes().to_vec(),
    })
}

/// Encode the complete header with a single RSA proof.
pub fn assemble_header(
    public_key_der: &[u8],
    signature: &[u8],
    signed_header_data: &[u8],
) -> Result<Vec<u8>> {
    let header = CrxFileHeader {
        sha256_with_rsa: vec![AsymmetricKeyProof {
            public_key: public_key_der.to_vec(),
            signature: signature.to_vec(),
        }],
        signed_header_data: signed_header_data.to_vec(),
    };
    proto::encode(&header)
}
