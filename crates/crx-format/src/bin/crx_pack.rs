//! crx-pack: Package extension directories as signed CRX3 files.
//!
//! # Usage
//!
//! ```bash
//! # Pack with a new key and keep it for later releases
//! crx-pack pack my-extension --key-out my-extension.pem
//!
//! # Re-pack with the same key
//! crx-pack pack my-extension -k my-extension.pem -o dist/my-extension.crx
//!
//! # Check a container
//! crx-pack verify dist/my-extension.crx
//! ```

use anyhow::{bail, Context, Result};
use base64::Engine;
use clap::{Parser, Subcommand};
use crx_format::{verify_crx_file, CrxBuilder, KeyPair};
use env_logger::Env;
use log::{error, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

/// Package extension directories as signed CRX3 files.
#[derive(Parser, Debug)]
#[command(name = "crx-pack")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pack a directory into a .crx file
    Pack {
        /// Extension directory
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Output file (default: <DIR>.crx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Private key (PKCS#8 or PKCS#1 PEM); a new key is generated if omitted
        #[arg(short = 'k', long)]
        key: Option<PathBuf>,

        /// Where to save a newly generated key
        #[arg(long, conflicts_with = "key")]
        key_out: Option<PathBuf>,

        /// ZIP compression level (0-9)
        #[arg(short = 'z', long, default_value = "6")]
        zip_level: u32,

        /// Print the base64-encoded container instead of writing a file
        #[arg(long, conflicts_with = "output")]
        base64: bool,
    },

    /// Verify the signature of a .crx file
    Verify {
        /// Container file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Generate a 2048-bit RSA key as PKCS#8 PEM
    Keygen {
        /// Output PEM file
        #[arg(value_name = "OUT")]
        output: PathBuf,
    },
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    match run(args.command) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            error!("{e:#}");
            process::exit(1);
        }
    }
}

fn run(command: Command) -> Result<bool> {
    match command {
        Command::Pack {
            dir,
            output,
            key,
            key_out,
            zip_level,
            base64,
        } => {
            pack(
                &dir,
                output,
                key.as_deref(),
                key_out.as_deref(),
                zip_level,
                base64,
            )?;
            Ok(true)
        }
        Command::Verify { file } => verify(&file),
        Command::Keygen { output } => {
            let key = KeyPair::generate()?;
            write_key(&key, &output)?;
            info!("Key written: {}", output.display());
            Ok(true)
        }
    }
}

fn pack(
    dir: &Path,
    output: Option<PathBuf>,
    key_path: Option<&Path>,
    key_out: Option<&Path>,
    zip_level: u32,
    print_base64: bool,
) -> Result<()> {
    if let Some(path) = key_out {
        if path.exists() {
            bail!("refusing to overwrite existing key {}", path.display());
        }
    }

    let mut builder = CrxBuilder::new().with_compression(zip_level);
    if let Some(path) = key_path {
        let pem = fs::read_to_string(path)
            .with_context(|| format!("failed to read key {}", path.display()))?;
        builder = builder.with_key(KeyPair::from_pem(&pem)?);
    }

    let output = match (print_base64, output) {
        (true, _) => None,
        (false, Some(output)) => Some(output),
        (false, None) => Some(default_output(dir)?),
    };
    if let Some(output) = &output {
        if output.is_dir() {
            bail!("output {} is a directory", output.display());
        }
    }

    let packaged = builder.build(dir)?;
    info!("Extension id: {}", packaged.crx_id);

    // The key goes to disk first so a container never outlives its key.
    if let Some(path) = key_out {
        write_key(&packaged.key, path)?;
        info!("Key written: {}", path.display());
    }

    match output {
        Some(output) => {
            let path = packaged
                .write(&output)
                .with_context(|| format!("failed to write {}", output.display()))?;
            info!("Packed: {} ({} bytes)", path.display(), packaged.bytes.len());
        }
        None => println!(
            "{}",
            base64::engine::general_purpose::STANDARD.encode(&packaged.bytes)
        ),
    }
    Ok(())
}

/// `<DIR>.crx` next to the directory, resolving `.` and `..` first so the
/// container never lands on the directory itself.
fn default_output(dir: &Path) -> Result<PathBuf> {
    let dir = dir
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", dir.display()))?;
    if dir.file_name().is_none() {
        bail!("cannot derive an output name for {}; pass -o", dir.display());
    }
    Ok(dir.with_extension("crx"))
}

fn verify(file: &Path) -> Result<bool> {
    let result = verify_crx_file(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    if result.valid {
        if let Some(id) = result.crx_id {
            info!("Valid: {} (extension id {id})", file.display());
        }
        Ok(true)
    } else {
        error!(
            "Invalid: {}: {}",
            file.display(),
            result.error.as_deref().unwrap_or("unknown reason")
        );
        Ok(false)
    }
}

fn write_key(key: &KeyPair, path: &Path) -> Result<()> {
    if path.exists() {
        bail!("refusing to overwrite existing key {}", path.display());
    }
    fs::write(path, key.to_pem()?)
        .with_context(|| format!("failed to write key {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use crx_format::Error;
    use std::io;
    use tempfile::TempDir;

    fn create_extension(dir: &Path) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join("manifest.json"), br#"{"name":"t"}"#).unwrap();
    }

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_default_output_resolves_dot() {
        let cwd = std::env::current_dir().unwrap().canonicalize().unwrap();

        let output = default_output(Path::new(".")).unwrap();

        assert_ne!(output, PathBuf::from("."));
        assert_eq!(output, cwd.with_extension("crx"));
    }

    #[test]
    fn test_default_output_is_sibling_of_dir() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        fs::create_dir_all(root.join("ext/sub")).unwrap();

        assert_eq!(
            default_output(&root.join("ext/.")).unwrap(),
            root.join("ext.crx")
        );
        assert_eq!(
            default_output(&root.join("ext/sub/..")).unwrap(),
            root.join("ext.crx")
        );
        assert_eq!(
            default_output(&root.join("ext/")).unwrap(),
            root.join("ext.crx")
        );
    }

    #[test]
    fn test_default_output_rejects_filesystem_root() {
        assert!(default_output(Path::new("/")).is_err());
    }

    #[test]
    fn test_pack_dot_style_dir_writes_sibling_container() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        let ext = root.join("ext");
        create_extension(&ext);
        let key_out = root.join("ext.pem");

        pack(&ext.join("."), None, None, Some(&key_out), 6, false).unwrap();

        let result = verify_crx_file(root.join("ext.crx")).unwrap();
        assert!(result.valid);
        let key = KeyPair::from_pem(&fs::read_to_string(&key_out).unwrap()).unwrap();
        assert_eq!(result.crx_id, Some(key.crx_id().unwrap()));
    }

    #[test]
    fn test_pack_rejects_directory_output_before_building() {
        let temp = TempDir::new().unwrap();
        let ext = temp.path().join("ext");
        create_extension(&ext);
        let key_out = temp.path().join("ext.pem");

        let result = pack(
            &ext,
            Some(temp.path().to_path_buf()),
            None,
            Some(&key_out),
            6,
            false,
        );

        assert!(result.is_err());
        assert!(!key_out.exists());
    }

    #[test]
    fn test_pack_key_out_failure_leaves_no_container() {
        let temp = TempDir::new().unwrap();
        let ext = temp.path().join("ext");
        create_extension(&ext);
        let output = temp.path().join("ext.crx");
        let key_out = temp.path().join("missing/dir/ext.pem");

        let result = pack(&ext, Some(output.clone()), None, Some(&key_out), 6, false);

        assert!(result.is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_base64_conflicts_with_output() {
        let result =
            Args::try_parse_from(["crx-pack", "pack", "ext", "--base64", "-o", "ext.crx"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::ArgumentConflict
        );

        assert!(Args::try_parse_from(["crx-pack", "pack", "ext", "--base64"]).is_ok());
    }

    #[test]
    fn test_io_errors_print_once_with_context() {
        let err = anyhow::Error::new(Error::from(io::Error::other("Is a directory")))
            .context("failed to write ext.crx");

        assert_eq!(format!("{err:#}"), "failed to write ext.crx: Is a directory");
    }
}
