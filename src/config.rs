use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use cross_xdg::BaseDirs;

use crate::interpreter::{EofPolicy, InterpreterConfig};
use crate::tape::PointerPolicy;

/// Environment variables consulted by [`from_env`].
pub const ENV_TAPE_SIZE: &str = "BF_TAPE_SIZE";
pub const ENV_POINTER_POLICY: &str = "BF_POINTER_POLICY";
pub const ENV_EOF: &str = "BF_EOF";
pub const ENV_DEBUG_TRACE: &str = "BF_DEBUG_TRACE";
/// Overrides the location of the settings file.
pub const ENV_CONFIG: &str = "BF_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: invalid value for `{key}`: {message}")]
    InvalidValue { line: usize, key: String, message: String },

    #[error("invalid value for {var}: {message}")]
    InvalidEnv { var: &'static str, message: String },
}

/// One layer of interpreter settings. `None` leaves the value to a lower layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub tape_size: Option<usize>,
    pub pointer_policy: Option<PointerPolicy>,
    pub eof: Option<EofPolicy>,
    pub debug_trace: Option<bool>,
}

impl Settings {
    /// Lay `upper` over `self`; values present in `upper` win.
    pub fn overlay(self, upper: &Settings) -> Settings {
        Settings {
            tape_size: upper.tape_size.or(self.tape_size),
            pointer_policy: upper.pointer_policy.or(self.pointer_policy),
            eof: upper.eof.or(self.eof),
            debug_trace: upper.debug_trace.or(self.debug_trace),
        }
    }

    pub fn apply_to(&self, config: &mut InterpreterConfig) {
        if let Some(v) = self.tape_size { config.tape_size = v; }
        if let Some(v) = self.pointer_policy { config.pointer_policy = v; }
        if let Some(v) = self.eof { config.eof = v; }
        if let Some(v) = self.debug_trace { config.debug_trace = v; }
    }
}

/// Location of `bf.toml`: `$BF_CONFIG` if set, otherwise the XDG config home.
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(ENV_CONFIG) {
        return Some(PathBuf::from(path));
    }

    // On Linux: resolves to /home/<user>/.config
    // On Windows: resolves to C:\Users\<user>\.config
    // On macOS: resolves to /Users/<user>/.config
    let base_dirs = BaseDirs::new().ok()?;
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push("bf.toml");
    Some(path)
}

/// Read settings from `path`. A missing file yields empty settings.
pub fn load_file(path: &Path) -> Result<Settings, ConfigError> {
    match fs::read_to_string(path) {
        Ok(content) => parse_settings(&content),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Settings::default()),
        Err(source) => Err(ConfigError::Read { path: path.to_path_buf(), source }),
    }
}

/// Parse the `[interpreter]` section of a `bf.toml` document.
///
/// This is a small line-oriented reader, not a full TOML parser: it understands
/// section headers, `key = value` pairs with optional double quotes, and `#`
/// comment lines. Other sections and unknown keys are skipped.
pub fn parse_settings(content: &str) -> Result<Settings, ConfigError> {
    let mut in_interpreter = false;
    let mut settings = Settings::default();

    for (index, line) in content.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') { continue; }
        if line.starts_with('[') && line.ends_with(']') {
            in_interpreter = line[1..line.len() - 1].trim() == "interpreter";
            continue;
        }
        if !in_interpreter { continue; }

        let Some(eq) = line.find('=') else { continue };
        let key = line[..eq].trim();
        let val_raw = line[eq + 1..].trim();
        // Accept quoted or unquoted
        let val = if val_raw.len() >= 2 && val_raw.starts_with('"') && val_raw.ends_with('"') {
            &val_raw[1..val_raw.len() - 1]
        } else {
            val_raw
        };

        let invalid = |message: String| ConfigError::InvalidValue {
            line: line_no,
            key: key.to_string(),
            message,
        };

        match key {
            "tape_size" => settings.tape_size = Some(parse_tape_size(val).map_err(invalid)?),
            "pointer_policy" => settings.pointer_policy = Some(val.parse().map_err(invalid)?),
            "eof" => settings.eof = Some(val.parse().map_err(invalid)?),
            "debug_trace" => settings.debug_trace = Some(parse_flag(val).map_err(invalid)?),
            _ => {}
        }
    }

    Ok(settings)
}

/// Collect settings from `BF_*` variables through `lookup`.
pub fn from_env<F>(lookup: F) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    fn read<T, F>(lookup: &F, var: &'static str, parse: impl Fn(&str) -> Result<T, String>) -> Result<Option<T>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(var) {
            Some(raw) if !raw.trim().is_empty() => parse(&raw)
                .map(Some)
                .map_err(|message| ConfigError::InvalidEnv { var, message }),
            _ => Ok(None),
        }
    }

    Ok(Settings {
        tape_size: read(&lookup, ENV_TAPE_SIZE, parse_tape_size)?,
        pointer_policy: read(&lookup, ENV_POINTER_POLICY, PointerPolicy::from_str)?,
        eof: read(&lookup, ENV_EOF, EofPolicy::from_str)?,
        debug_trace: read(&lookup, ENV_DEBUG_TRACE, parse_flag)?,
    })
}

/// Fold the layers in priority order: flags, then env, then file, then defaults.
pub fn resolve_layers(file: &Settings, env: &Settings, flags: &Settings) -> InterpreterConfig {
    let merged = file.clone().overlay(env).overlay(flags);
    let mut config = InterpreterConfig::default();
    merged.apply_to(&mut config);
    config
}

/// Resolve the effective configuration for this process.
pub fn resolve(flags: &Settings) -> Result<InterpreterConfig, ConfigError> {
    let file = match config_path() {
        Some(path) => load_file(&path)?,
        None => Settings::default(),
    };
    let env = from_env(|var| env::var(var).ok())?;
    Ok(resolve_layers(&file, &env, flags))
}

pub fn parse_tape_size(raw: &str) -> Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err("tape size must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("not a cell count: {e}")),
    }
}

fn parse_flag(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(format!("expected true or false, got {other}")),
    }
}
