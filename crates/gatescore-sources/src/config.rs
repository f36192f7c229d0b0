//! Configuration loading and source factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use gatescore_core::layout::ExamLayout;
use gatescore_core::traits::DocumentSource;

use crate::file::FileSource;
use crate::ghostscript::{is_pdf, GhostscriptSource};
use crate::http::{is_url, HttpSource};

/// HTTP client settings for response sheets fetched by URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Skip certificate verification. Some result portals serve broken chains.
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

fn default_http_timeout() -> u64 {
    30
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X) AppleWebKit/537.36 (KHTML, like Gecko) Chrome Safari"
        .to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_http_timeout(),
            user_agent: default_user_agent(),
            accept_invalid_certs: false,
        }
    }
}

/// Ghostscript settings for PDF answer keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GhostscriptConfig {
    #[serde(default = "default_gs_binary")]
    pub binary: String,
    #[serde(default = "default_gs_timeout")]
    pub timeout_secs: u64,
}

fn default_gs_binary() -> String {
    "gs".to_string()
}
fn default_gs_timeout() -> u64 {
    60
}

impl Default for GhostscriptConfig {
    fn default() -> Self {
        Self {
            binary: default_gs_binary(),
            timeout_secs: default_gs_timeout(),
        }
    }
}

/// Top-level gatescore configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatescoreConfig {
    /// Answer key used when `--answer-key` is not given.
    #[serde(default)]
    pub answer_key: Option<String>,
    /// Leaderboard file updated by `gatescore score`.
    #[serde(default)]
    pub leaderboard: Option<PathBuf>,
    /// Output directory for score cards and reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub layout: ExamLayout,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub ghostscript: GhostscriptConfig,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./gatescore-results")
}

impl Default for GatescoreConfig {
    fn default() -> Self {
        Self {
            answer_key: None,
            leaderboard: None,
            output_dir: default_output_dir(),
            layout: ExamLayout::default(),
            http: HttpConfig::default(),
            ghostscript: GhostscriptConfig::default(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
/// Unset variables expand to the empty string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    // single pass: substituted values are never rescanned
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(&rest[start + 2..start + end]).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Expand `${VAR}` references in every string-valued field.
fn resolve_config(config: GatescoreConfig) -> GatescoreConfig {
    GatescoreConfig {
        answer_key: config.answer_key.as_deref().map(resolve_env_vars),
        leaderboard: config.leaderboard.as_deref().map(resolve_path),
        output_dir: resolve_path(&config.output_dir),
        http: HttpConfig {
            user_agent: resolve_env_vars(&config.http.user_agent),
            ..config.http
        },
        ghostscript: GhostscriptConfig {
            binary: resolve_env_vars(&config.ghostscript.binary),
            ..config.ghostscript
        },
        layout: config.layout,
    }
}

/// Apply `GATESCORE_ANSWER_KEY` / `GATESCORE_LEADERBOARD`.
fn apply_env_overrides(
    config: &mut GatescoreConfig,
    lookup: impl Fn(&str) -> Option<String>,
) {
    if let Some(key) = lookup("GATESCORE_ANSWER_KEY").filter(|v| !v.is_empty()) {
        config.answer_key = Some(key);
    }
    if let Some(path) = lookup("GATESCORE_LEADERBOARD").filter(|v| !v.is_empty()) {
        config.leaderboard = Some(PathBuf::from(path));
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `gatescore.toml` in the current directory
/// 2. `~/.config/gatescore/config.toml`
///
/// Environment variable overrides: `GATESCORE_ANSWER_KEY`, `GATESCORE_LEADERBOARD`.
pub fn load_config() -> Result<GatescoreConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<GatescoreConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("gatescore.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<GatescoreConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => GatescoreConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());

    Ok(resolve_config(config))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("gatescore"))
}

/// Pick a source for a key or response location.
///
/// `http(s)://` locations are fetched over the network, `.pdf` files go
/// through Ghostscript, anything else is read from disk.
pub fn create_source(location: &str, config: &GatescoreConfig) -> Result<Arc<dyn DocumentSource>> {
    if is_url(location) {
        let source = HttpSource::new(location, &config.http)
            .with_context(|| format!("cannot fetch {location}"))?;
        Ok(Arc::new(source))
    } else if is_pdf(location) {
        Ok(Arc::new(GhostscriptSource::new(location, &config.ghostscript)))
    } else {
        Ok(Arc::new(FileSource::new(location)))
    }
}
