//! Configuration for the visualizer.
//!
//! Settings are looked up key by key across an ordered list of sources; the
//! first source that knows a key wins. Environment variables are read with
//! the `DI_VIZ_` prefix, so `user_namespace_prefix` comes from
//! `DI_VIZ_USER_NAMESPACE_PREFIX`.

use std::collections::HashMap;
use std::env;
use std::fmt;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::error::{VizError, VizResult};
use crate::relevance::TypeRelevance;
use crate::viewer::{TreeStyle, TreeViewer};

/// Environment variable prefix used by [`EnvironmentConfigSource::new`].
pub const ENV_PREFIX: &str = "DI_VIZ";

pub const KEY_USER_NAMESPACE_PREFIX: &str = "user_namespace_prefix";
pub const KEY_ONLY_USER_CODE: &str = "only_user_code";
pub const KEY_TREE_STYLE: &str = "tree_style";
pub const KEY_INDENT_WIDTH: &str = "indent_width";
pub const KEY_SEPARATOR_WIDTH: &str = "separator_width";

/// A raw configuration value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(untagged))]
pub enum ConfigValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl ConfigValue {
    /// Parses a textual value the way environment variables are read:
    /// integer, then float, then boolean, else string.
    pub fn parse(value: &str) -> Self {
        if let Ok(int_val) = value.parse::<i64>() {
            ConfigValue::Integer(int_val)
        } else if let Ok(float_val) = value.parse::<f64>() {
            ConfigValue::Float(float_val)
        } else if let Ok(bool_val) = value.parse::<bool>() {
            ConfigValue::Boolean(bool_val)
        } else {
            ConfigValue::String(value.to_string())
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Booleans, plus the integers 0 and 1.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Boolean(b) => Some(*b),
            ConfigValue::Integer(0) => Some(false),
            ConfigValue::Integer(1) => Some(true),
            _ => None,
        }
    }

    pub fn as_usize(&self) -> Option<usize> {
        self.as_i64().and_then(|i| usize::try_from(i).ok())
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::String(s) => f.write_str(s),
            ConfigValue::Integer(i) => write!(f, "{}", i),
            ConfigValue::Float(x) => write!(f, "{}", x),
            ConfigValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Integer(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Boolean(value)
    }
}

/// Trait for configuration sources
pub trait ConfigSource: Send + Sync + fmt::Debug {
    /// Get a configuration value by key
    fn get(&self, key: &str) -> Option<ConfigValue>;

    /// List all available keys
    fn keys(&self) -> Vec<String>;

    /// Get a value as text, for keys that are never numbers or booleans
    fn get_text(&self, key: &str) -> Option<String> {
        self.get(key).map(|value| value.to_string())
    }
}

/// Environment variable configuration source
#[derive(Debug, Clone)]
pub struct EnvironmentConfigSource {
    /// Prefix to filter environment variables
    prefix: Option<String>,
}

impl EnvironmentConfigSource {
    /// Reads `DI_VIZ_*` variables.
    pub fn new() -> Self {
        Self::with_prefix(ENV_PREFIX)
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: Some(prefix.into()) }
    }

    /// Reads variables named exactly like the upper-cased key.
    pub fn unprefixed() -> Self {
        Self { prefix: None }
    }

    fn variable_name(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}_{}", prefix.to_uppercase(), key.to_uppercase()),
            None => key.to_uppercase(),
        }
    }
}

impl Default for EnvironmentConfigSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigSource for EnvironmentConfigSource {
    fn get(&self, key: &str) -> Option<ConfigValue> {
        env::var(self.variable_name(key)).ok().map(|value| ConfigValue::parse(&value))
    }

    fn get_text(&self, key: &str) -> Option<String> {
        env::var(self.variable_name(key)).ok()
    }

    fn keys(&self) -> Vec<String> {
        env::vars()
            .filter_map(|(key, _)| match &self.prefix {
                Some(prefix) => {
                    let prefix_upper = format!("{}_", prefix.to_uppercase());
                    key.strip_prefix(&prefix_upper).map(str::to_lowercase)
                }
                None => Some(key.to_lowercase()),
            })
            .collect()
    }
}

/// In-memory configuration source, handy for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigSource {
    values: HashMap<String, ConfigValue>,
}

impl MemoryConfigSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.values.insert(key.into(), value.into());
    }
}

impl ConfigSource for MemoryConfigSource {
    fn get(&self, key: &str) -> Option<ConfigValue> {
        self.values.get(key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }
}

/// Ordered set of configuration sources.
#[derive(Debug, Default)]
pub struct ConfigProvider {
    /// Configuration sources in priority order
    sources: Vec<Box<dyn ConfigSource>>,
}

impl ConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider reading `DI_VIZ_*` environment variables only.
    pub fn from_env() -> Self {
        Self::new().with_source(EnvironmentConfigSource::new())
    }

    /// Adds a source; sources added earlier take priority.
    pub fn add_source(&mut self, source: Box<dyn ConfigSource>) {
        self.sources.push(source);
    }

    pub fn with_source(mut self, source: impl ConfigSource + 'static) -> Self {
        self.add_source(Box::new(source));
        self
    }

    /// Get a configuration value, checking sources in priority order
    pub fn get(&self, key: &str) -> Option<ConfigValue> {
        self.sources.iter().find_map(|source| source.get(key))
    }

    /// Get a value as text, checking sources in priority order
    pub fn get_text(&self, key: &str) -> Option<String> {
        self.sources.iter().find_map(|source| source.get_text(key))
    }

    /// Get all configuration keys from all sources
    pub fn all_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.sources.iter().flat_map(|source| source.keys()).collect();
        keys.sort();
        keys.dedup();
        keys
    }

    fn read_text<T>(&self, key: &str, convert: impl Fn(&str) -> Option<T>) -> VizResult<Option<T>> {
        match self.get_text(key) {
            None => Ok(None),
            Some(value) => convert(&value).map(Some).ok_or(VizError::InvalidConfig {
                key: key.to_string(),
                value,
            }),
        }
    }

    fn read<T>(&self, key: &str, convert: impl Fn(&ConfigValue) -> Option<T>) -> VizResult<Option<T>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => convert(&value).map(Some).ok_or_else(|| VizError::InvalidConfig {
                key: key.to_string(),
                value: value.to_string(),
            }),
        }
    }
}

/// Settings for report rendering and user-code filtering.
///
/// # Examples
///
/// ```rust
/// use ferrous_di_viz::config::{ConfigProvider, MemoryConfigSource, VisualizerConfig};
/// use ferrous_di_viz::TreeStyle;
///
/// let provider = ConfigProvider::new().with_source(
///     MemoryConfigSource::new()
///         .with("user_namespace_prefix", "Shop")
///         .with("tree_style", "box"),
/// );
///
/// let config = VisualizerConfig::load(&provider).unwrap();
/// assert_eq!(config.user_namespace_prefix, "Shop");
/// assert_eq!(config.tree_style, TreeStyle::BoxDrawing);
/// assert_eq!(config.indent_width, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct VisualizerConfig {
    /// Namespace prefix identifying the application's own types
    pub user_namespace_prefix: String,
    /// Default for the `only_user_code` switch of the facade
    pub only_user_code: bool,
    pub tree_style: TreeStyle,
    /// Spaces per level in the indented tree view
    pub indent_width: usize,
    /// Width of the dashed rule under namespace headers
    pub separator_width: usize,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            user_namespace_prefix: String::new(),
            only_user_code: false,
            tree_style: TreeStyle::Indented,
            indent_width: 2,
            separator_width: 50,
        }
    }
}

impl VisualizerConfig {
    /// Reads every known key from `provider`, falling back to defaults.
    pub fn load(provider: &ConfigProvider) -> VizResult<Self> {
        let defaults = Self::default();

        let config = Self {
            user_namespace_prefix: provider
                .get_text(KEY_USER_NAMESPACE_PREFIX)
                .unwrap_or(defaults.user_namespace_prefix),
            only_user_code: provider
                .read(KEY_ONLY_USER_CODE, ConfigValue::as_bool)?
                .unwrap_or(defaults.only_user_code),
            tree_style: provider
                .read_text(KEY_TREE_STYLE, parse_tree_style)?
                .unwrap_or(defaults.tree_style),
            indent_width: provider
                .read(KEY_INDENT_WIDTH, ConfigValue::as_usize)?
                .unwrap_or(defaults.indent_width),
            separator_width: provider
                .read(KEY_SEPARATOR_WIDTH, ConfigValue::as_usize)?
                .unwrap_or(defaults.separator_width),
        };

        tracing::debug!(
            prefix = %config.user_namespace_prefix,
            only_user_code = config.only_user_code,
            tree_style = ?config.tree_style,
            "visualizer configuration loaded"
        );
        Ok(config)
    }

    /// Loads from `sources`, earlier sources taking priority.
    pub fn from_sources<I>(sources: I) -> VizResult<Self>
    where
        I: IntoIterator<Item = Box<dyn ConfigSource>>,
    {
        let mut provider = ConfigProvider::new();
        for source in sources {
            provider.add_source(source);
        }
        Self::load(&provider)
    }

    /// Loads from `DI_VIZ_*` environment variables.
    pub fn from_env() -> VizResult<Self> {
        Self::load(&ConfigProvider::from_env())
    }

    /// Parses a JSON document; missing fields take their defaults.
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> VizResult<Self> {
        serde_json::from_str(json).map_err(|e| VizError::Serialization(e.to_string()))
    }

    pub fn relevance(&self) -> TypeRelevance {
        TypeRelevance::new(self.user_namespace_prefix.clone())
    }

    pub fn viewer(&self) -> TreeViewer {
        TreeViewer::new()
            .with_style(self.tree_style)
            .with_indent_width(self.indent_width)
            .with_separator_width(self.separator_width)
    }
}

fn parse_tree_style(value: &str) -> Option<TreeStyle> {
    match value.to_ascii_lowercase().as_str() {
        "indented" | "indent" => Some(TreeStyle::Indented),
        "box" | "box_drawing" => Some(TreeStyle::BoxDrawing),
        _ => None,
    }
}
