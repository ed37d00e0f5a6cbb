//! # android-puppeteer
//!
//! A Rust library for driving Android UI automation from AI agents: it reads the
//! accessibility hierarchy of the current screen, indexes the elements a user could
//! interact with, and draws those indices onto a screenshot.
//!
//! ## Features
//!
//! - **Element Extraction**: Parse uiautomator dumps into indexed interactive elements
//!   with display names, bounding boxes and tap centers
//! - **Annotated Screenshots**: Outline every element and label it `"{index}: {name}"`
//! - **Coordinate Grids**: Overlay a labelled pixel grid for manual point picking
//! - **Device Bridge**: List devices and capture hierarchy/screenshots via adb
//!
//! ## Library Usage
//!
//! ### Extracting Elements
//!
//! ```rust
//! use android_puppeteer::{InteractiveRegistry, extract_elements};
//!
//! # fn main() -> android_puppeteer::Result<()> {
//! let xml = r#"<hierarchy>
//!   <node class="android.widget.Button" text="Sign in" clickable="true" bounds="[10,20][110,220]" />
//! </hierarchy>"#;
//!
//! let elements = extract_elements(xml, &InteractiveRegistry::default())?;
//! let sign_in = elements.get(0).unwrap();
//! assert_eq!(sign_in.name(), "Sign in");
//! assert_eq!((sign_in.center().x, sign_in.center().y), (60, 120));
//! # Ok(())
//! # }
//! ```
//!
//! ### Annotating a Live Device
//!
//! ```rust,no_run
//! use android_puppeteer::{AdbBridge, PuppeteerConfig, inspect};
//!
//! # fn main() -> android_puppeteer::Result<()> {
//! let config = PuppeteerConfig::new().serial("emulator-5554");
//! let bridge = AdbBridge::from_config(&config);
//!
//! let inspection = inspect(&bridge, &config)?;
//! std::fs::write("screen.png", &inspection.image_png)?;
//! println!("{}", inspection.elements.to_json().unwrap());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`hierarchy`]: Hierarchy parsing, interactivity rules, naming and element indexing
//! - [`render`]: Annotated screenshots and coordinate grids
//! - [`device`]: Device discovery and the adb-backed snapshot bridge
//! - [`config`]: Configuration loading and defaults
//! - [`error`]: Error types and result aliases

pub mod config;
pub mod device;
pub mod error;
pub mod hierarchy;
pub mod render;

pub use config::PuppeteerConfig;
pub use device::{AdbBridge, Device, DeviceBridge, DeviceKind, DeviceList, Inspection, inspect};
pub use error::{PuppeteerError, Result};
pub use hierarchy::{
    BoundingBox, ElementMap, ElementNode, ElementRecord, InteractiveRegistry, Point, RawNode, Snapshot, UiTree,
    extract_elements,
};
pub use render::{AnnotatedImage, Annotator, GridOverlay, GridRenderer, LabelFont, RenderOutcome};
