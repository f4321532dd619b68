//! Configuration loading and parsing.
//!
//! Parses `ox-login.toml` (or an override path provided by the binary):
//!
//! ```toml
//! [form]
//! debounce_ms = 500
//! [runtime]
//! tick_ms = 250
//! ```
//!
//! Every field is optional. Unknown fields are ignored. A missing file yields
//! defaults; a malformed file yields defaults plus a warning. Raw values are
//! kept as parsed and `Config::apply_limits` computes the clamped effective
//! values the runtime uses.

use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;
use std::{fs, io, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "ox-login.toml";

pub const DEBOUNCE_MS_MIN: u64 = 50;
pub const DEBOUNCE_MS_MAX: u64 = 10_000;
pub const TICK_MS_MIN: u64 = 10;
pub const TICK_MS_MAX: u64 = 1_000;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct FormConfig {
    #[serde(default = "FormConfig::default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            debounce_ms: Self::default_debounce_ms(),
        }
    }
}

impl FormConfig {
    const fn default_debounce_ms() -> u64 {
        500
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    #[serde(default = "RuntimeConfig::default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_ms: Self::default_tick_ms(),
        }
    }
}

impl RuntimeConfig {
    const fn default_tick_ms() -> u64 {
        250
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub file: ConfigFile,
    pub effective_debounce_ms: u64,
    pub effective_tick_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_file(ConfigFile::default())
    }
}

/// Config path following platform conventions: working directory first, then
/// the platform config dir (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("ox-login").join(CONFIG_FILE_NAME);
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!(target: "config", path = %path.display(), "config_missing_using_defaults");
            return Ok(Config::default());
        }
        Err(e) => return Err(e.into()),
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => Ok(Config::from_file(file)),
        Err(e) => {
            warn!(
                target: "config",
                path = %path.display(),
                error = %e,
                "config_parse_failed_using_defaults"
            );
            Ok(Config::default())
        }
    }
}

impl Config {
    pub fn from_file(file: ConfigFile) -> Self {
        let mut cfg = Self {
            file,
            effective_debounce_ms: 0,
            effective_tick_ms: 0,
        };
        cfg.apply_limits();
        cfg
    }

    /// Clamp raw values into supported ranges. Returns true when anything was clamped.
    pub fn apply_limits(&mut self) -> bool {
        let raw_debounce = self.file.form.debounce_ms;
        let raw_tick = self.file.runtime.tick_ms;
        self.effective_debounce_ms = raw_debounce.clamp(DEBOUNCE_MS_MIN, DEBOUNCE_MS_MAX);
        self.effective_tick_ms = raw_tick.clamp(TICK_MS_MIN, TICK_MS_MAX);

        let clamped =
            self.effective_debounce_ms != raw_debounce || self.effective_tick_ms != raw_tick;
        if clamped {
            info!(
                target: "config",
                raw_debounce,
                debounce = self.effective_debounce_ms,
                raw_tick,
                tick = self.effective_tick_ms,
                "limits_clamped"
            );
        }
        clamped
    }

    /// Debounce quiet period for the login form.
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.effective_debounce_ms)
    }

    /// Interval of the periodic tick source.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.effective_tick_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl<'a> Write for LockedWriter<'a> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), contents).unwrap();
        tmp
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert_eq!(cfg.file.form.debounce_ms, 500);
        assert_eq!(cfg.quiet_period(), Duration::from_millis(500));
        assert_eq!(cfg.tick_interval(), Duration::from_millis(250));
        assert_eq!(cfg.file, ConfigFile::default());
    }

    #[test]
    fn parses_form_and_runtime_values() {
        let tmp = write_config("[form]\ndebounce_ms = 300\n[runtime]\ntick_ms = 40\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file.form.debounce_ms, 300);
        assert_eq!(cfg.effective_debounce_ms, 300);
        assert_eq!(cfg.effective_tick_ms, 40);
        assert_eq!(cfg.file.runtime.tick_ms, 40);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let tmp = write_config("[runtime]\ntick_ms = 100\nunknown_key = true\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.effective_debounce_ms, 500);
        assert_eq!(cfg.effective_tick_ms, 100);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let tmp = write_config("[form\ndebounce_ms = ");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file, ConfigFile::default());
        assert_eq!(cfg.effective_debounce_ms, 500);
    }

    #[test]
    fn clamps_out_of_range_values() {
        let tmp = write_config("[form]\ndebounce_ms = 1\n[runtime]\ntick_ms = 99999\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file.form.debounce_ms, 1, "raw value retained");
        assert_eq!(cfg.effective_debounce_ms, DEBOUNCE_MS_MIN);
        assert_eq!(cfg.effective_tick_ms, TICK_MS_MAX);
    }

    #[test]
    fn clamp_logging_uses_config_target() {
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();

        let mut file = ConfigFile::default();
        file.form.debounce_ms = 60_000;
        let cfg = with_default(subscriber, || Config::from_file(file));

        let log_output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(log_output.contains("INFO config:"));
        assert!(log_output.contains("limits_clamped"));
        assert_eq!(cfg.effective_debounce_ms, DEBOUNCE_MS_MAX);
    }

    #[test]
    fn in_range_values_do_not_clamp() {
        let mut cfg = Config::default();
        assert!(!cfg.apply_limits());
    }
}
