//! Layered configuration.
//!
//! Sources, lowest to highest precedence:
//! 1. Bundled defaults (`learnsphere.toml` shipped with the library)
//! 2. `~/.config/learnsphere/learnsphere.toml`
//! 3. `./learnsphere.toml`
//! 4. An explicit file passed to [`LearnSphereConfig::load_with`]
//! 5. `LEARNSPHERE__SECTION__KEY` environment variables
//!
//! API keys are deliberately absent: only the *name* of the variable that
//! holds them is configurable.

use config::{Config, Environment, File, FileFormat};
use learnsphere_error::{ConfigError, LearnSphereError, LearnSphereResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../learnsphere.toml");

/// Backend endpoint and model names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeminiSettings {
    /// API root, without a trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model for text, chat and structured output
    #[serde(default = "default_text_model")]
    pub text_model: String,
    /// Model for image generation
    #[serde(default = "default_image_model")]
    pub image_model: String,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            text_model: default_text_model(),
            image_model: default_image_model(),
        }
    }
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_text_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_image_model() -> String {
    "imagen-3.0-generate-002".to_string()
}

/// Where the key list comes from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CredentialSettings {
    /// Environment variable holding the comma-separated keys
    #[serde(default = "default_env_var")]
    pub env_var: String,
}

impl Default for CredentialSettings {
    fn default() -> Self {
        Self {
            env_var: default_env_var(),
        }
    }
}

fn default_env_var() -> String {
    "API_KEY".to_string()
}

/// Retry-loop tuning.
///
/// # Example
///
/// ```toml
/// [rotation]
/// request_timeout_secs = 60
/// rotation_delay_ms = 250
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct RotationSettings {
    /// Per-attempt deadline; no deadline when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    /// Pause before retrying on the next credential
    #[serde(default)]
    pub rotation_delay_ms: u64,
}

impl RotationSettings {
    /// Per-attempt deadline.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Delay between rotations.
    pub fn rotation_delay(&self) -> Duration {
        Duration::from_millis(self.rotation_delay_ms)
    }
}

/// Top-level LearnSphere configuration.
///
/// # Example
///
/// ```no_run
/// use learnsphere_rate_limit::LearnSphereConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = LearnSphereConfig::load()?;
/// println!("Text model: {}", config.gemini.text_model);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct LearnSphereConfig {
    /// Backend settings
    #[serde(default)]
    pub gemini: GeminiSettings,
    /// Credential source
    #[serde(default)]
    pub credentials: CredentialSettings,
    /// Rotation tuning
    #[serde(default)]
    pub rotation: RotationSettings,
}

impl LearnSphereConfig {
    /// Load configuration from a single file, ignoring all other sources.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> LearnSphereResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                LearnSphereError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                LearnSphereError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Load with the full precedence chain.
    ///
    /// User config files are optional and silently skipped if not found.
    pub fn load() -> LearnSphereResult<Self> {
        Self::load_with(None::<&Path>)
    }

    /// Load with the full precedence chain plus an optional explicit file,
    /// which must exist when given.
    #[instrument(skip(explicit))]
    pub fn load_with(explicit: Option<impl AsRef<Path>>) -> LearnSphereResult<Self> {
        debug!("Loading configuration with precedence: env > explicit > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/learnsphere/learnsphere.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("learnsphere").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path.as_ref()).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("LEARNSPHERE")
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .map_err(|e| {
                LearnSphereError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                LearnSphereError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }
}
