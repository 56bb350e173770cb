//! # crx-capabilities
//!
//! Browser-session capabilities that carry extensions inline.
//!
//! Extensions are embedded as base64 CRX3 containers. Unpacked extension
//! directories are packed and signed on the fly through [`crx_format`].
//!
//! ## Example
//!
//! ```ignore
//! use crx_capabilities::{Capabilities, CAPABILITIES_KEY};
//!
//! let mut caps = Capabilities::default();
//! caps.args.push("--headless=new".to_string());
//! caps.add_unpacked_extension("my-extension")?;
//!
//! let session = serde_json::json!({ CAPABILITIES_KEY: caps });
//! ```

mod capabilities;
mod error;
mod extension;

pub use capabilities::{
    Capabilities, DeviceMetrics, MobileEmulation, PerfLoggingPreferences, CAPABILITIES_KEY,
    DEPRECATED_CAPABILITIES_KEY,
};
pub use error::{CapabilitiesError, Result};
