//! Resolved artifacts.

use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Modules archive name, next to the kernel image.
pub const MODULES_ARCHIVE: &str = "modules.tar.xz";

/// References to everything a job boots.
///
/// Each reference is either a URL or a `file://` path as seen by the
/// test device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSet {
    pub kernel: String,
    pub dtb: String,
    pub modules: Option<String>,
    pub rootfs: String,
}

/// Kernel image file name for an architecture.
///
/// # Examples
///
/// ```rust
/// use bci_crawler::artifacts::image_name;
///
/// assert_eq!(image_name("arm").unwrap(), "zImage");
/// assert_eq!(image_name("arm64").unwrap(), "Image");
/// assert!(image_name("mips").is_err());
/// ```
pub fn image_name(arch: &str) -> Result<&'static str> {
    match arch {
        "arm" => Ok("zImage"),
        "arm64" => Ok("Image"),
        other => Err(Error::UnknownArchitecture(other.to_string())),
    }
}

/// Device tree blob path, relative to a build directory.
pub fn dtb_path(dt: &str) -> String {
    format!("dtbs/{dt}.dtb")
}
