use crate::config::PuppeteerConfig;
use crate::device::{Device, DeviceBridge, DeviceKind, DeviceList};
use crate::error::{PuppeteerError, Result};
use std::io::{ErrorKind, Read};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;
use wait_timeout::ChildExt;

const ADB_NOT_FOUND: &str = "ADB not found. Please ensure Android SDK is installed and adb is in PATH.";

/// Header printed by `adb devices`
const DEVICES_HEADER: &str = "List of devices attached";

/// Fallback location for devices that cannot dump to /dev/tty
const DUMP_FILE: &str = "/sdcard/window_dump.xml";

/// adb stderr fragments that mean the device itself is unreachable
const UNREACHABLE_MARKERS: &[&str] = &["not found", "offline", "unauthorized", "no devices", "no emulators"];

/// Shells out to the adb executable, one bounded call per operation
#[derive(Debug, Clone)]
pub struct AdbBridge {
    adb_path: PathBuf,
    serial: Option<String>,
    timeout: Duration,
}

impl AdbBridge {
    /// Create a bridge for the default device with a 5 second timeout
    pub fn new(adb_path: impl Into<PathBuf>) -> Self {
        Self {
            adb_path: adb_path.into(),
            serial: None,
            timeout: Duration::from_secs(5),
        }
    }

    /// Bridge configured from [`PuppeteerConfig`]
    pub fn from_config(config: &PuppeteerConfig) -> Self {
        let bridge = Self::new(&config.adb_path).timeout(config.timeout_duration());
        match &config.serial {
            Some(serial) => bridge.serial(serial.clone()),
            None => bridge,
        }
    }

    /// Target a specific device
    pub fn serial(mut self, serial: impl Into<String>) -> Self {
        self.serial = Some(serial.into());
        self
    }

    /// Set the limit for each adb invocation
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Same bridge pointed at another device
    pub fn for_device(&self, serial: &str) -> Self {
        self.clone().serial(serial)
    }

    /// Enumerate connected emulators and devices with a human-readable name
    pub fn list_devices(&self) -> Result<DeviceList> {
        let output = self.run_global(&["devices"])?;
        let entries = parse_devices_output(&String::from_utf8_lossy(&output));

        let devices: Vec<Device> = entries
            .into_iter()
            .map(|(id, status)| {
                let kind = DeviceKind::from_serial(&id);
                let name = self.for_device(&id).describe(kind);
                Device { id, name, status, kind }
            })
            .collect();

        log::info!("Found {} device(s)", devices.len());
        Ok(DeviceList::new(devices))
    }

    /// AVD name for emulators, model for physical devices, "Unknown" if neither answers
    fn describe(&self, kind: DeviceKind) -> String {
        let result = match kind {
            DeviceKind::Emulator => self.run(&["emu", "avd", "name"]),
            DeviceKind::Device => self.run(&["shell", "getprop", "ro.product.model"]),
        };

        match result {
            Ok(output) => first_line(&String::from_utf8_lossy(&output))
                .map(str::to_string)
                .unwrap_or_else(|| "Unknown".to_string()),
            Err(e) => {
                log::debug!("Could not name {:?}: {}", self.serial, e);
                "Unknown".to_string()
            }
        }
    }

    /// Run adb against the selected device (`-s <serial>` when set)
    fn run(&self, args: &[&str]) -> Result<Vec<u8>> {
        let mut full: Vec<&str> = Vec::with_capacity(args.len() + 2);
        if let Some(serial) = &self.serial {
            full.push("-s");
            full.push(serial);
        }
        full.extend_from_slice(args);
        self.run_global(&full)
    }

    /// Run adb with exactly these arguments, killing it after the timeout
    fn run_global(&self, args: &[&str]) -> Result<Vec<u8>> {
        let command = format!("{} {}", self.adb_path.display(), args.join(" "));
        log::debug!("Running {}", command);

        let mut child = Command::new(&self.adb_path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => PuppeteerError::ConnectionFailed(ADB_NOT_FOUND.to_string()),
                _ => PuppeteerError::Io(e),
            })?;

        // Drain pipes on their own threads; screenshots overflow the pipe buffer
        let stdout = child.stdout.take().map(spawn_reader);
        let stderr = child.stderr.take().map(spawn_reader);

        let status = match child.wait_timeout(self.timeout)? {
            Some(status) => status,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(PuppeteerError::Timeout {
                    command,
                    seconds: self.timeout.as_secs(),
                });
            }
        };

        let stdout = stdout.map(join_reader).unwrap_or_default();
        let stderr = stderr.map(join_reader).unwrap_or_default();

        if !status.success() {
            let reason = String::from_utf8_lossy(&stderr).trim().to_string();
            let reason = if reason.is_empty() { status.to_string() } else { reason };
            let lowered = reason.to_lowercase();
            if UNREACHABLE_MARKERS.iter().any(|m| lowered.contains(m)) {
                return Err(PuppeteerError::ConnectionFailed(reason));
            }
            return Err(PuppeteerError::CommandFailed { command, reason });
        }

        Ok(stdout)
    }
}

impl Default for AdbBridge {
    fn default() -> Self {
        Self::new("adb")
    }
}

impl DeviceBridge for AdbBridge {
    fn hierarchy_xml(&self) -> Result<String> {
        let output = self.run(&["exec-out", "uiautomator", "dump", "/dev/tty"])?;
        if let Ok(xml) = extract_hierarchy(&String::from_utf8_lossy(&output)) {
            return Ok(xml.to_string());
        }

        log::debug!("Direct dump unavailable, dumping via {}", DUMP_FILE);
        self.run(&["shell", "uiautomator", "dump", DUMP_FILE])?;
        let output = self.run(&["exec-out", "cat", DUMP_FILE])?;
        extract_hierarchy(&String::from_utf8_lossy(&output)).map(str::to_string)
    }

    fn screenshot_png(&self) -> Result<Vec<u8>> {
        let png = self.run(&["exec-out", "screencap", "-p"])?;
        if png.is_empty() {
            return Err(PuppeteerError::ConnectionFailed("screencap returned no data".to_string()));
        }
        Ok(png)
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

fn join_reader(handle: thread::JoinHandle<Vec<u8>>) -> Vec<u8> {
    handle.join().unwrap_or_default()
}

fn first_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|line| !line.is_empty())
}

/// Parse `adb devices` output into (serial, status) pairs
pub fn parse_devices_output(output: &str) -> Vec<(String, String)> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('*') && *line != DEVICES_HEADER)
        .filter_map(|line| {
            let mut parts = line.split('\t');
            let id = parts.next()?.trim();
            let status = parts.next()?.trim();
            if id.is_empty() || status.is_empty() {
                return None;
            }
            Some((id.to_string(), status.to_string()))
        })
        .collect()
}

/// Cut the XML document out of uiautomator output
///
/// `uiautomator dump /dev/tty` appends a "UI hierchary dumped to" banner after
/// the document; anything outside `<?xml ...` / `<hierarchy` ... `</hierarchy>`
/// is dropped.
pub fn extract_hierarchy(output: &str) -> Result<&str> {
    const CLOSE: &str = "</hierarchy>";

    let start = output
        .find("<?xml")
        .or_else(|| output.find("<hierarchy"))
        .ok_or_else(|| PuppeteerError::ParseFailed("No hierarchy in uiautomator output".to_string()))?;
    let end = output
        .rfind(CLOSE)
        .filter(|&end| end >= start)
        .ok_or_else(|| PuppeteerError::ParseFailed("Truncated hierarchy in uiautomator output".to_string()))?;

    Ok(&output[start..end + CLOSE.len()])
}
