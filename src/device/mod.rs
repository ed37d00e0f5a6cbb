//! Device access
//!
//! The extraction and rendering code never talks to a device directly. It
//! consumes a hierarchy dump and a screenshot through [`DeviceBridge`];
//! [`AdbBridge`] is the implementation backed by the adb command line tool.

pub mod adb;

pub use adb::{AdbBridge, extract_hierarchy, parse_devices_output};

use crate::config::PuppeteerConfig;
use crate::error::Result;
use crate::hierarchy::{ElementMap, extract_elements};
use serde::{Deserialize, Serialize};

/// Source of UI snapshots for a single device
pub trait DeviceBridge {
    /// Accessibility hierarchy as uiautomator XML
    fn hierarchy_xml(&self) -> Result<String>;

    /// Full-resolution screenshot as encoded image bytes (PNG)
    fn screenshot_png(&self) -> Result<Vec<u8>>;
}

/// Whether a serial belongs to an emulator or a physical device
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Emulator,
    Device,
}

impl DeviceKind {
    pub fn from_serial(serial: &str) -> Self {
        if serial.starts_with("emulator-") {
            DeviceKind::Emulator
        } else {
            DeviceKind::Device
        }
    }
}

/// A device reported by `adb devices`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Device {
    pub id: String,
    /// AVD name or product model
    pub name: String,
    /// adb state, e.g. "device", "offline", "unauthorized"
    pub status: String,
    #[serde(rename = "type")]
    pub kind: DeviceKind,
}

/// Devices plus their count, as returned to callers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceList {
    pub devices: Vec<Device>,
    pub count: usize,
}

impl DeviceList {
    pub fn new(devices: Vec<Device>) -> Self {
        let count = devices.len();
        Self { devices, count }
    }
}

/// Everything captured in one inspection pass
#[derive(Debug, Clone)]
pub struct Inspection {
    /// Interactive elements, indexed as labelled on the image
    pub elements: ElementMap,

    /// Annotated PNG, or the raw screenshot if annotation failed
    pub image_png: Vec<u8>,

    /// False when `image_png` is the unannotated screenshot
    pub annotated: bool,
}

/// Capture hierarchy and screenshot, extract elements and annotate
///
/// Connection and hierarchy parse failures abort; a rendering failure only
/// downgrades the image to the plain screenshot.
pub fn inspect<B: DeviceBridge + ?Sized>(bridge: &B, config: &PuppeteerConfig) -> Result<Inspection> {
    let xml = bridge.hierarchy_xml()?;
    let elements = extract_elements(&xml, &config.registry())?;
    let screenshot = bridge.screenshot_png()?;

    let outcome = config
        .annotator()
        .render_or_original(&screenshot, &elements, config.scale, config.padding);
    let annotated = outcome.is_annotated();

    let (image_png, annotated) = match outcome.into_bytes() {
        Ok(bytes) => (bytes, annotated),
        Err(e) => {
            log::warn!("Could not encode annotated image: {}", e);
            (screenshot, false)
        }
    };

    Ok(Inspection {
        elements,
        image_png,
        annotated,
    })
}
