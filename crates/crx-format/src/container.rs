//! The CRX3 file layout.
//!
//! ```text
//! offset  size  field
//! 0       4     magic "Cr24"
//! 4       4     version, u32 little-endian, 3
//! 8       4     header length H, u32 little-endian
//! 12      H     encoded CrxFileHeader
//! 12+H    *     archive
//! ```

use crate::proto::{self, CrxFileHeader};
use crate::{Error, Result};
use std::io::Write;

/// Magic number opening every container.
pub const CRX_MAGIC: &[u8; 4] = b"Cr24";

/// The only format version produced or accepted.
pub const CRX_VERSION: u32 = 3;

/// Bytes before the header: magic, version and header length.
pub const PREFIX_LEN: usize = 12;

/// Write a complete container to `out`.
pub fn assemble<W: Write>(header: &[u8], archive: &[u8], mut out: W) -> Result<()> {
    let header_len = u32::try_from(header.len())
        .map_err(|_| Error::Assembly("header exceeds 4 GiB".into()))?;

    let write = |out: &mut W, bytes: &[u8]| {
        out.write_all(bytes)
            .map_err(|e| Error::Assembly(e.to_string()))
    };

    write(&mut out, CRX_MAGIC)?;
    write(&mut out, &CRX_VERSION.to_le_bytes())?;
    write(&mut out, &header_len.to_le_bytes())?;
    write(&mut out, header)?;
    write(&mut out, archive)?;
    out.flush().map_err(|e| Error::Assembly(e.to_string()))
}

/// Assemble a container into a new buffer.
pub fn assemble_to_vec(header: &[u8], archive: &[u8]) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(PREFIX_LEN + header.len() + archive.len());
    assemble(header, archive, &mut buf)?;
    Ok(buf)
}

/// A parsed view over container bytes.
#[derive(Debug, Clone, Copy)]
pub struct CrxFile<'a> {
    header: &'a [u8],
    archive: &'a [u8],
}

impl<'a> CrxFile<'a> {
    /// Split `bytes` into header and archive, checking the fixed prefix.
    pub fn parse(bytes: &'a [u8]) -> Result<Self> {
        if bytes.len() < PREFIX_LEN {
            return Err(Error::InvalidFormat(format!(
                "truncated prefix: {} bytes",
                bytes.len()
            )));
        }

        if &bytes[..4] != CRX_MAGIC {
            return Err(Error::InvalidFormat("missing Cr24 magic".to_string()));
        }

        let version = read_u32_le(&bytes[4..8]);
        if version != CRX_VERSION {
            return Err(Error::InvalidFormat(format!(
                "unsupported version {version}"
            )));
        }

        let header_len = read_u32_le(&bytes[8..12]) as usize;
        let rest = &bytes[PREFIX_LEN..];
        if header_len > rest.len() {
            return Err(Error::InvalidFormat(format!(
                "header length {header_len} exceeds remaining {} bytes",
                rest.len()
            )));
        }

        let (header, archive) = rest.split_at(header_len);
        Ok(Self { header, archive })
    }

    /// Encoded header bytes.
    pub fn header(&self) -> &'a [u8] {
        self.header
    }

    /// Archive bytes following the header.
    pub fn archive(&self) -> &'a [u8] {
        self.archive
    }

    pub fn header_len(&self) -> usize {
        self.header.len()
    }

    /// Offset of the first archive byte within the container.
    pub fn archive_offset(&self) -> usize {
        PREFIX_LEN + self.header.len()
    }

    pub fn decode_header(&self) -> Result<CrxFileHeader> {
        proto::decode(self.header)
    }
}

fn read_u32_le(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(buf)
}
