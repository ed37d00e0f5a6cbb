//! Android Puppeteer CLI
//!
//! Thin command line wrapper around the library: lists devices, dumps indexed
//! elements as JSON and writes annotated or gridded screenshots. Hierarchy and
//! screenshot inputs come from files when given, otherwise from the device.

use android_puppeteer::render::encode_png;
use android_puppeteer::{AdbBridge, DeviceBridge, PuppeteerConfig, extract_elements};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "android-puppeteer", version, about = "Android UI inspection for AI agents")]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Device serial (defaults to the only connected device)
    #[arg(short, long, global = true)]
    serial: Option<String>,

    /// adb executable
    #[arg(long, global = true)]
    adb: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List connected emulators and devices
    Devices,
    /// Print interactive elements as JSON
    Elements(SourceArgs),
    /// Write a screenshot with every interactive element labelled
    Annotate {
        #[command(flatten)]
        source: SourceArgs,

        /// Output PNG path
        #[arg(short, long)]
        out: PathBuf,

        /// Color seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Write a screenshot with a coordinate grid
    Grid {
        /// Read the screenshot from this file instead of the device
        #[arg(long)]
        screenshot: Option<PathBuf>,

        /// Output PNG path
        #[arg(short, long)]
        out: PathBuf,

        /// Grid spacing in pixels
        #[arg(long)]
        cell_size: Option<u32>,

        /// Place the original and gridded screenshots side by side
        #[arg(long)]
        compare: bool,
    },
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Read the hierarchy dump from this file instead of the device
    #[arg(long)]
    xml: Option<PathBuf>,

    /// Read the screenshot from this file instead of the device
    #[arg(long)]
    screenshot: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => PuppeteerConfig::load(path)?,
        None => PuppeteerConfig::default(),
    };
    if let Some(serial) = cli.serial {
        config = config.serial(serial);
    }
    if let Some(adb) = cli.adb {
        config = config.adb_path(adb);
    }
    let bridge = AdbBridge::from_config(&config);

    match cli.command {
        Commands::Devices => {
            let devices = bridge.list_devices()?;
            println!("{}", serde_json::to_string_pretty(&devices)?);
        }
        Commands::Elements(source) => {
            let xml = load_hierarchy(&bridge, source.xml.as_deref())?;
            let elements = extract_elements(&xml, &config.registry())?;
            println!("{}", elements.to_json()?);
        }
        Commands::Annotate { source, out, seed } => {
            if let Some(seed) = seed {
                config = config.color_seed(seed);
            }
            let xml = load_hierarchy(&bridge, source.xml.as_deref())?;
            let screenshot = load_screenshot(&bridge, source.screenshot.as_deref())?;
            let elements = extract_elements(&xml, &config.registry())?;

            let outcome = config
                .annotator()
                .render_or_original(&screenshot, &elements, config.scale, config.padding);
            if !outcome.is_annotated() {
                eprintln!("Annotation failed; writing the plain screenshot");
            }
            write_output(&out, &outcome.into_bytes()?)?;
            println!("{}", elements.to_json()?);
        }
        Commands::Grid {
            screenshot,
            out,
            cell_size,
            compare,
        } => {
            let screenshot = load_screenshot(&bridge, screenshot.as_deref())?;
            let cell_size = cell_size.unwrap_or(config.grid_cell_size);
            let renderer = config.grid_renderer();

            let png = if compare {
                encode_png(&renderer.render_comparison(&screenshot, cell_size)?)?
            } else {
                renderer.render_grid(&screenshot, cell_size)?.to_png()?
            };
            write_output(&out, &png)?;
        }
    }

    Ok(())
}

fn load_hierarchy(bridge: &AdbBridge, path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read hierarchy {}", path.display())),
        None => Ok(bridge.hierarchy_xml()?),
    }
}

fn load_screenshot(bridge: &AdbBridge, path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("Failed to read screenshot {}", path.display()))
        }
        None => Ok(bridge.screenshot_png()?),
    }
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    eprintln!("Wrote {}", path.display());
    Ok(())
}
