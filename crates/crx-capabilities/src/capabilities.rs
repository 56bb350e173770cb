use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key in the top-level session capabilities map under which the browser
/// driver expects [`Capabilities`].
pub const CAPABILITIES_KEY: &str = "goog:chromeOptions";

/// Legacy spelling of [`CAPABILITIES_KEY`].
pub const DEPRECATED_CAPABILITIES_KEY: &str = "chromeOptions";

/// Browser-specific desired capabilities for a driver session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Path to the browser binary.
    #[serde(rename = "binary", default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Extra command-line arguments for the browser.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// Default driver switches to drop, without the leading `--`.
    #[serde(
        rename = "excludeSwitches",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub exclude_switches: Vec<String>,
    /// Base64 (standard, padded) contents of `.crx` files to install at
    /// startup.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<String>,
    /// Entries applied to the `Local State` file.
    #[serde(rename = "localState", default, skip_serializing_if = "Map::is_empty")]
    pub local_state: Map<String, Value>,
    /// Entries applied to the profile preferences.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub prefs: Map<String, Value>,
    /// Keep the browser running after the driver quits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detach: Option<bool>,
    /// Address of an already running debugger server.
    #[serde(
        rename = "debuggerAddress",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub debugger_address: Option<String>,
    /// Directory for minidumps (Linux only).
    #[serde(rename = "minidumpPath", default, skip_serializing_if = "Option::is_none")]
    pub minidump_path: Option<String>,
    #[serde(
        rename = "mobileEmulation",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub mobile_emulation: Option<MobileEmulation>,
    #[serde(
        rename = "perfLoggingPrefs",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub perf_logging_prefs: Option<PerfLoggingPreferences>,
    /// Window types listed among window handles; include `"webview"` to
    /// reach `<webview>` elements.
    #[serde(rename = "windowTypes", default, skip_serializing_if = "Vec::is_empty")]
    pub window_types: Vec<String>,
    /// Android package to drive, e.g. `com.android.chrome`.
    #[serde(
        rename = "androidPackage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub android_package: Option<String>,
    /// Use W3C mode.
    #[serde(default)]
    pub w3c: bool,
}

/// Mobile emulation options. Set either `device_name` or both
/// `device_metrics` and `user_agent`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MobileEmulation {
    #[serde(rename = "deviceName", default, skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
    #[serde(
        rename = "deviceMetrics",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub device_metrics: Option<DeviceMetrics>,
    #[serde(rename = "userAgent", default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// Emulated screen attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceMetrics {
    pub width: u32,
    pub height: u32,
    #[serde(rename = "pixelRatio")]
    pub pixel_ratio: f64,
    /// Emulate touch events; the browser defaults to `true` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub touch: Option<bool>,
}

/// Performance logging options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerfLoggingPreferences {
    #[serde(
        rename = "enableNetwork",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub enable_network: Option<bool>,
    #[serde(rename = "enablePage", default, skip_serializing_if = "Option::is_none")]
    pub enable_page: Option<bool>,
    #[serde(
        rename = "enableTimeline",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub enable_timeline: Option<bool>,
    /// Comma-separated tracing categories; empty disables tracing.
    #[serde(
        rename = "traceCategories",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub trace_categories: String,
    /// Milliseconds between trace buffer usage events; zero leaves the
    /// browser default.
    #[serde(
        rename = "bufferUsageReportingInterval",
        default,
        skip_serializing_if = "is_zero"
    )]
    pub buffer_usage_reporting_interval_millis: u64,
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}
