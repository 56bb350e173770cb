use crx_format::{KeyPair, DEFAULT_KEY_BITS};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Fixed 2048-bit key derived from a seeded RNG.
pub fn fixed_key() -> &'static KeyPair {
    static KEY: OnceLock<KeyPair> = OnceLock::new();
    KEY.get_or_init(|| seeded_key(0x00c0_ffee))
}

/// A second fixed key, distinct from [`fixed_key`].
pub fn other_key() -> &'static KeyPair {
    static KEY: OnceLock<KeyPair> = OnceLock::new();
    KEY.get_or_init(|| seeded_key(0x0bad_f00d))
}

fn seeded_key(seed: u64) -> KeyPair {
    let mut rng = StdRng::seed_from_u64(seed);
    KeyPair::generate_with_rng(&mut rng, DEFAULT_KEY_BITS).unwrap()
}

/// Directory with a single `manifest.json` containing `{"name":"t"}`.
pub fn write_minimal_extension(dir: &Path) {
    fs::write(dir.join("manifest.json"), br#"{"name":"t"}"#).unwrap();
}
