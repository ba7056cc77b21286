use crate::error::{Error, Result};
use crate::hub::{FileResolver, HubResolver, LoadOptions};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantMethod {
    #[default]
    Awq,
}

impl fmt::Display for QuantMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantMethod::Awq => write!(f, "awq"),
        }
    }
}

impl FromStr for QuantMethod {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "awq" => Ok(QuantMethod::Awq),
            other => Err(Error::UnsupportedQuantMethod(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantFormat {
    #[default]
    Gemm,
    Gemv,
    GemmvFast,
    Marlin,
}

impl fmt::Display for QuantFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantFormat::Gemm => write!(f, "gemm"),
            QuantFormat::Gemv => write!(f, "gemv"),
            QuantFormat::GemmvFast => write!(f, "gemmv_fast"),
            QuantFormat::Marlin => write!(f, "marlin"),
        }
    }
}

impl FromStr for QuantFormat {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "gemm" => Ok(QuantFormat::Gemm),
            "gemv" => Ok(QuantFormat::Gemv),
            "gemmv_fast" => Ok(QuantFormat::GemmvFast),
            "marlin" => Ok(QuantFormat::Marlin),
            other => Err(Error::UnsupportedQuantFormat(other.to_owned())),
        }
    }
}

fn lowered_entry(cfg: &Map<String, Value>, keys: &[&str], default: &str) -> String {
    keys.iter()
        .find_map(|key| cfg.get(*key))
        .map(|value| match value {
            Value::String(text) => text.to_lowercase(),
            other => other.to_string(),
        })
        .unwrap_or_else(|| default.to_owned())
}

/// Lower-cases and validates `method` and `format` in a raw mapping,
/// accepting the `quant_method`/`version` key spelling as fallback.
/// The input is left untouched; all unrelated keys pass through.
pub fn normalize_mapping(raw: &Map<String, Value>) -> Result<Map<String, Value>> {
    let mut cfg = raw.clone();

    let method = lowered_entry(&cfg, &["method", "quant_method"], "awq");
    method.parse::<QuantMethod>()?;
    cfg.insert("method".to_owned(), Value::String(method));

    let format = lowered_entry(&cfg, &["format", "version"], "gemm");
    format.parse::<QuantFormat>()?;
    cfg.insert("format".to_owned(), Value::String(format));

    Ok(cfg)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AwqConfig {
    pub method: QuantMethod,
    pub format: QuantFormat,
    pub zero_point: bool,
    pub q_group_size: u32,
    pub w_bit: u32,
    pub modules_to_not_convert: Option<Vec<String>>,
}

impl Default for AwqConfig {
    fn default() -> Self {
        AwqConfig {
            method: QuantMethod::Awq,
            format: QuantFormat::Gemm,
            zero_point: true,
            q_group_size: 128,
            w_bit: 4,
            modules_to_not_convert: None,
        }
    }
}

impl AwqConfig {
    /// Builds a config from a mapping in canonical key naming. Missing keys
    /// take their defaults, unknown keys are rejected.
    pub fn from_mapping(raw: Option<&Map<String, Value>>) -> Result<Self> {
        let Some(raw) = raw else {
            return Ok(AwqConfig::default());
        };

        let cfg = normalize_mapping(raw)?;
        let config = serde_json::from_value(Value::Object(cfg))?;
        Ok(config)
    }

    /// Projects a mapping in the hub key naming (`group_size`, `bits`, ...)
    /// onto the canonical keys. Keys absent from the input stay absent so
    /// that construction applies the per-field defaults.
    pub fn from_legacy_mapping(raw: &Map<String, Value>) -> Result<Map<String, Value>> {
        let cfg = normalize_mapping(raw)?;

        let mut canonical = Map::new();
        for (source, target) in [
            ("method", "method"),
            ("format", "format"),
            ("zero_point", "zero_point"),
            ("group_size", "q_group_size"),
            ("bits", "w_bit"),
            ("modules_to_not_convert", "modules_to_not_convert"),
        ] {
            if let Some(value) = cfg.get(source) {
                canonical.insert(target.to_owned(), value.clone());
            }
        }
        Ok(canonical)
    }

    /// Loads the quantization section of a model's `config.json`.
    ///
    /// `source` is either a local model directory or a hub repository id;
    /// remote resolution goes through [`HubResolver`]. A missing file or a
    /// missing `quantization_config` section yields the default config.
    pub fn load(source: &str, options: &LoadOptions) -> Result<Self> {
        AwqConfig::load_with(source, options, &HubResolver::new())
    }

    pub fn load_with(
        source: &str,
        options: &LoadOptions,
        resolver: &dyn FileResolver,
    ) -> Result<Self> {
        let source_dir = Path::new(source);
        let resolved = if source_dir.is_dir() {
            Some(source_dir.join(CONFIG_FILE_NAME))
        } else {
            resolver.resolve(source, CONFIG_FILE_NAME, options)?
        };

        let Some(config_path) = resolved.filter(|path| path.exists()) else {
            debug!("No {} found for {}, using defaults", CONFIG_FILE_NAME, source);
            return Ok(AwqConfig::default());
        };

        let data = fs::read_to_string(&config_path)?;
        let document: Value = serde_json::from_str(&data)?;

        match document.get("quantization_config").and_then(Value::as_object) {
            Some(section) => {
                let canonical = AwqConfig::from_legacy_mapping(section)?;
                AwqConfig::from_mapping(Some(&canonical))
            }
            None => {
                debug!(
                    "No quantization_config section in {}, using defaults",
                    config_path.display()
                );
                Ok(AwqConfig::default())
            }
        }
    }

    /// Serializes the six canonical fields; an unset module list is kept as
    /// an explicit `null` entry.
    pub fn to_mapping(&self) -> Map<String, Value> {
        let mut mapping = Map::new();
        mapping.insert("method".to_owned(), Value::String(self.method.to_string()));
        mapping.insert("format".to_owned(), Value::String(self.format.to_string()));
        mapping.insert("zero_point".to_owned(), Value::Bool(self.zero_point));
        mapping.insert("q_group_size".to_owned(), Value::from(self.q_group_size));
        mapping.insert("w_bit".to_owned(), Value::from(self.w_bit));
        mapping.insert(
            "modules_to_not_convert".to_owned(),
            match &self.modules_to_not_convert {
                Some(modules) => Value::from(modules.clone()),
                None => Value::Null,
            },
        );
        mapping
    }
}
