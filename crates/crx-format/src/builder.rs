use crate::archive::{build_archive, ArchiveOptions, CompressionLevel};
use crate::key::{CrxId, KeyPair};
use crate::{container, header, signer, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Package `dir` with a freshly generated key.
///
/// The key is returned alongside the container so the caller can reuse it
/// for later builds of the same extension.
pub fn package_with_new_key(dir: impl AsRef<Path>) -> Result<(Vec<u8>, KeyPair)> {
    let packaged = CrxBuilder::new().build(dir)?;
    Ok((packaged.bytes, packaged.key))
}

/// Package `dir` signed by `key`.
pub fn package_with_key(dir: impl AsRef<Path>, key: &KeyPair) -> Result<Vec<u8>> {
    let packaged = CrxBuilder::new().with_key(key.clone()).build(dir)?;
    Ok(packaged.bytes)
}

/// Output of a packaging run.
#[derive(Debug, Clone)]
pub struct PackagedCrx {
    /// Complete container bytes.
    pub bytes: Vec<u8>,
    /// Key that signed the container.
    pub key: KeyPair,
    /// Identity embedded in the signed header.
    pub crx_id: CrxId,
}

impl PackagedCrx {
    /// Write the container bytes to `output`, creating parent directories.
    pub fn write(&self, output: impl AsRef<Path>) -> Result<PathBuf> {
        let output = output.as_ref();
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(output, &self.bytes)?;
        Ok(output.to_path_buf())
    }
}

/// Builder for CRX3 containers.
#[derive(Debug, Default, Clone)]
pub struct CrxBuilder {
    key: Option<KeyPair>,
    options: ArchiveOptions,
}

impl CrxBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sign with an existing key instead of generating one.
    pub fn with_key(mut self, key: KeyPair) -> Self {
        self.key = Some(key);
        self
    }

    /// Set the zip compression level of the archive segment.
    pub fn with_compression(mut self, compression: impl Into<CompressionLevel>) -> Self {
        self.options.compression = compression.into();
        self
    }

    /// Replace all archive options.
    pub fn with_options(mut self, options: ArchiveOptions) -> Self {
        self.options = options;
        self
    }

    /// Archive, sign and assemble `dir` into container bytes.
    ///
    /// The archive is built before any key material is touched, so an
    /// unreadable directory fails without generating a key.
    pub fn build(&self, dir: impl AsRef<Path>) -> Result<PackagedCrx> {
        self.build_with(dir.as_ref(), || match &self.key {
            Some(key) => Ok(key.clone()),
            None => KeyPair::generate(),
        })
    }

    /// Run the pipeline, asking `supply_key` for the signing key only once
    /// the archive exists.
    fn build_with(
        &self,
        dir: &Path,
        supply_key: impl FnOnce() -> Result<KeyPair>,
    ) -> Result<PackagedCrx> {
        let archive = build_archive(dir, &self.options)?;
        let key = supply_key()?;

        let public_key_der = key.public_key_der()?;
        let crx_id = header::crx_id(&public_key_der);
        let signed_header_data = header::signed_header_data(&crx_id)?;
        let signature = signer::sign(&signed_header_data, archive.as_slice(), &key)?;
        let header = header::assemble_header(&public_key_der, &signature, &signed_header_data)?;
        let bytes = container::assemble_to_vec(&header, &archive)?;

        log::debug!(
            "packaged {} as {crx_id}: header {} bytes, archive {} bytes",
            dir.display(),
            header.len(),
            archive.len()
        );

        Ok(PackagedCrx { bytes, key, crx_id })
    }

    /// Build the container and write it to `output`.
    ///
    /// Nothing is written unless the whole pipeline succeeds.
    pub fn write_to(
        &self,
        dir: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<(PathBuf, PackagedCrx)> {
        let packaged = self.build(dir)?;
        let path = packaged.write(output)?;
        Ok((path, packaged))
    }
}
