use crate::{Capabilities, Result};
use base64::engine::general_purpose::STANDARD;
use base64::write::EncoderStringWriter;
use crx_format::{package_with_key, package_with_new_key, KeyPair};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

impl Capabilities {
    /// Install the packed extension at `path` (typically a `.crx` file) on
    /// startup.
    ///
    /// The whole file is read into memory, since the driver protocol carries
    /// it inline.
    pub fn add_extension(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::open(path.as_ref())?;
        self.add_extension_reader(BufReader::new(file))
    }

    /// Base64-encode an extension read from `reader` and attach it.
    ///
    /// `extensions` is left untouched if reading fails.
    pub fn add_extension_reader(&mut self, mut reader: impl Read) -> Result<()> {
        let mut encoder = EncoderStringWriter::new(&STANDARD);
        let read = io::copy(&mut reader, &mut encoder)?;
        self.extensions.push(encoder.into_inner());

        log::debug!("attached extension of {read} bytes");
        Ok(())
    }

    /// Pack the directory at `dir` with a fresh key and install it on
    /// startup.
    pub fn add_unpacked_extension(&mut self, dir: impl AsRef<Path>) -> Result<()> {
        let (bytes, _key) = package_with_new_key(dir)?;
        self.add_extension_reader(bytes.as_slice())
    }

    /// Pack the directory at `dir` signed by `key` and install it on
    /// startup, keeping the extension id stable across sessions.
    pub fn add_unpacked_extension_with_key(
        &mut self,
        dir: impl AsRef<Path>,
        key: &KeyPair,
    ) -> Result<()> {
        let bytes = package_with_key(dir, key)?;
        self.add_extension_reader(bytes.as_slice())
    }
}
