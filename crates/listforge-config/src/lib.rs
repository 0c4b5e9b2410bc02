//! Configuration system for ListForge.
//!
//! Load move selector configuration from TOML or YAML so the neighborhoods
//! used during search can change without code changes.
//!
//! # Examples
//!
//! ```
//! use listforge_config::{ListForgeConfig, MoveSelectorConfig};
//!
//! let config = ListForgeConfig::from_toml_str(r#"
//!     random_seed = 7
//!
//!     [[move_selectors]]
//!     type = "list_change_move_selector"
//!     selection_order = "random"
//!
//!     [[move_selectors]]
//!     type = "k_opt_list_move_selector"
//!     minimum_k = 2
//!     maximum_k = 4
//! "#).unwrap();
//!
//! assert_eq!(config.random_seed, Some(7));
//! assert!(matches!(config.move_selectors[1], MoveSelectorConfig::KOptListMoveSelector(_)));
//! config.validate().unwrap();
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use listforge_config::ListForgeConfig;
//!
//! let config = ListForgeConfig::load("listforge.toml").unwrap_or_default();
//! assert!(config.move_selectors.is_empty());
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListForgeConfig {
    /// Random seed for reproducible results.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Move selectors, in the order the search loop should consult them.
    #[serde(default)]
    pub move_selectors: Vec<MoveSelectorConfig>,
}

impl ListForgeConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Appends a move selector.
    pub fn with_move_selector(mut self, selector: MoveSelectorConfig) -> Self {
        self.move_selectors.push(selector);
        self
    }

    /// Checks every move selector's bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.move_selectors
            .iter()
            .try_for_each(MoveSelectorConfig::validate)
    }
}

/// Order in which a selector produces its selections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionOrder {
    /// Finite, deterministic, restartable.
    Original,

    /// Endless i.i.d. draws.
    #[default]
    Random,
}

/// When a selector materializes its selections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionCacheType {
    /// Look positions up on every draw.
    #[default]
    JustInTime,

    /// Materialize once per step.
    Step,

    /// Materialize once per phase.
    Phase,
}

/// Move selector configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MoveSelectorConfig {
    /// Relocates a single element.
    ListChangeMoveSelector(ListChangeMoveConfig),

    /// Swaps two elements.
    ListSwapMoveSelector(ListSwapMoveConfig),

    /// Relocates a sub-list.
    SubListChangeMoveSelector(SubListChangeMoveConfig),

    /// Swaps two sub-lists.
    SubListSwapMoveSelector(SubListSwapMoveConfig),

    /// Sequential edge exchange.
    KOptListMoveSelector(KOptMoveSelectorConfig),
}

impl MoveSelectorConfig {
    /// Checks this selector's bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            MoveSelectorConfig::ListChangeMoveSelector(config) => config
                .nearby_selection
                .as_ref()
                .map_or(Ok(()), NearbySelectionConfig::validate),
            MoveSelectorConfig::ListSwapMoveSelector(_) => Ok(()),
            MoveSelectorConfig::SubListChangeMoveSelector(config) => {
                config.sub_list_selector.validate()?;
                config
                    .nearby_selection
                    .as_ref()
                    .map_or(Ok(()), NearbySelectionConfig::validate)
            }
            MoveSelectorConfig::SubListSwapMoveSelector(config) => {
                config.sub_list_selector.validate()
            }
            MoveSelectorConfig::KOptListMoveSelector(config) => config.validate(),
        }
    }
}

/// List change move configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListChangeMoveConfig {
    #[serde(default)]
    pub selection_order: SelectionOrder,

    #[serde(default)]
    pub cache_type: SelectionCacheType,

    /// Bias destinations toward values near the moved element.
    #[serde(default)]
    pub nearby_selection: Option<NearbySelectionConfig>,
}

/// List swap move configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListSwapMoveConfig {
    #[serde(default)]
    pub selection_order: SelectionOrder,

    #[serde(default)]
    pub cache_type: SelectionCacheType,
}

/// Sub-list length bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SubListSelectorConfig {
    #[serde(default = "default_minimum_sub_list_size")]
    pub minimum_sub_list_size: usize,

    #[serde(default = "default_maximum_sub_list_size")]
    pub maximum_sub_list_size: usize,
}

fn default_minimum_sub_list_size() -> usize {
    1
}

fn default_maximum_sub_list_size() -> usize {
    usize::MAX
}

impl Default for SubListSelectorConfig {
    fn default() -> Self {
        Self {
            minimum_sub_list_size: default_minimum_sub_list_size(),
            maximum_sub_list_size: default_maximum_sub_list_size(),
        }
    }
}

impl SubListSelectorConfig {
    /// Rejects empty or inverted length ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.minimum_sub_list_size == 0 {
            return Err(ConfigError::Invalid(
                "minimum_sub_list_size must be at least 1".to_string(),
            ));
        }
        if self.minimum_sub_list_size > self.maximum_sub_list_size {
            return Err(ConfigError::Invalid(format!(
                "minimum_sub_list_size ({}) must not exceed maximum_sub_list_size ({})",
                self.minimum_sub_list_size, self.maximum_sub_list_size
            )));
        }
        Ok(())
    }
}

/// Sub-list change move configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SubListChangeMoveConfig {
    #[serde(default)]
    pub selection_order: SelectionOrder,

    #[serde(default)]
    pub sub_list_selector: SubListSelectorConfig,

    /// Also produce the reversed variant of each relocation.
    #[serde(default = "default_true")]
    pub select_reversing_move_too: bool,

    #[serde(default)]
    pub nearby_selection: Option<NearbySelectionConfig>,
}

impl Default for SubListChangeMoveConfig {
    fn default() -> Self {
        Self {
            selection_order: SelectionOrder::default(),
            sub_list_selector: SubListSelectorConfig::default(),
            select_reversing_move_too: true,
            nearby_selection: None,
        }
    }
}

/// Sub-list swap move configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SubListSwapMoveConfig {
    #[serde(default)]
    pub selection_order: SelectionOrder,

    #[serde(default)]
    pub sub_list_selector: SubListSelectorConfig,

    /// Also produce the reversed variant of each swap.
    #[serde(default = "default_true")]
    pub select_reversing_move_too: bool,
}

impl Default for SubListSwapMoveConfig {
    fn default() -> Self {
        Self {
            selection_order: SelectionOrder::default(),
            sub_list_selector: SubListSelectorConfig::default(),
            select_reversing_move_too: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// K-opt move configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct KOptMoveSelectorConfig {
    #[serde(default = "default_k")]
    pub minimum_k: usize,

    #[serde(default = "default_k")]
    pub maximum_k: usize,
}

fn default_k() -> usize {
    2
}

impl Default for KOptMoveSelectorConfig {
    fn default() -> Self {
        Self {
            minimum_k: default_k(),
            maximum_k: default_k(),
        }
    }
}

impl KOptMoveSelectorConfig {
    /// Rejects k below 2 or an inverted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.minimum_k < 2 {
            return Err(ConfigError::Invalid(format!(
                "minimum_k ({}) must be at least 2",
                self.minimum_k
            )));
        }
        if self.minimum_k > self.maximum_k {
            return Err(ConfigError::Invalid(format!(
                "minimum_k ({}) must not exceed maximum_k ({})",
                self.minimum_k, self.maximum_k
            )));
        }
        Ok(())
    }
}

/// Probability distribution used to pick among nearby candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NearbySelectionDistributionType {
    /// Probability decreases linearly with rank.
    #[default]
    Linear,

    /// Probability decreases quadratically with rank.
    Parabolic,

    /// Uniform over a block of the nearest candidates.
    Block,

    /// Rank fraction drawn from a Beta distribution.
    Beta,
}

/// Nearby selection configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct NearbySelectionConfig {
    #[serde(default)]
    pub distribution_type: NearbySelectionDistributionType,

    /// Block distribution only.
    #[serde(default)]
    pub distribution_size_minimum: Option<usize>,

    #[serde(default)]
    pub distribution_size_maximum: Option<usize>,

    /// Block distribution only; fraction of the candidates in the block.
    #[serde(default)]
    pub distribution_size_ratio: Option<f64>,

    /// Block distribution only; chance of ignoring the block.
    #[serde(default)]
    pub distribution_uniform_probability: Option<f64>,

    /// Beta distribution only; defaults to 1.
    #[serde(default)]
    pub beta_distribution_alpha: Option<f64>,

    /// Beta distribution only; defaults to 5.
    #[serde(default)]
    pub beta_distribution_beta: Option<f64>,
}

impl NearbySelectionConfig {
    /// Creates a linear distribution config with the given size maximum.
    pub fn linear(size_maximum: usize) -> Self {
        Self {
            distribution_type: NearbySelectionDistributionType::Linear,
            distribution_size_maximum: Some(size_maximum),
            ..Self::default()
        }
    }

    /// Rejects options that do not apply to the distribution or are out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let is_block = self.distribution_type == NearbySelectionDistributionType::Block;
        let is_beta = self.distribution_type == NearbySelectionDistributionType::Beta;
        if !is_block
            && (self.distribution_size_minimum.is_some()
                || self.distribution_size_ratio.is_some()
                || self.distribution_uniform_probability.is_some())
        {
            return Err(ConfigError::Invalid(format!(
                "distribution_type ({:?}) does not support block distribution options",
                self.distribution_type
            )));
        }
        if !is_beta && (self.beta_distribution_alpha.is_some() || self.beta_distribution_beta.is_some()) {
            return Err(ConfigError::Invalid(format!(
                "distribution_type ({:?}) does not support beta distribution options",
                self.distribution_type
            )));
        }
        for (name, value) in [
            ("beta_distribution_alpha", self.beta_distribution_alpha),
            ("beta_distribution_beta", self.beta_distribution_beta),
        ] {
            if let Some(value) = value {
                if !(value > 0.0 && value.is_finite()) {
                    return Err(ConfigError::Invalid(format!(
                        "{name} ({value}) must be positive and finite"
                    )));
                }
            }
        }
        if let Some(maximum) = self.distribution_size_maximum {
            if maximum == 0 {
                return Err(ConfigError::Invalid(
                    "distribution_size_maximum must be at least 1".to_string(),
                ));
            }
        }
        if let Some(minimum) = self.distribution_size_minimum {
            if minimum == 0 {
                return Err(ConfigError::Invalid(
                    "distribution_size_minimum must be at least 1".to_string(),
                ));
            }
            if minimum > self.distribution_size_maximum.unwrap_or(usize::MAX) {
                return Err(ConfigError::Invalid(format!(
                    "distribution_size_minimum ({}) must not exceed distribution_size_maximum",
                    minimum
                )));
            }
        }
        if let Some(ratio) = self.distribution_size_ratio {
            if !(ratio > 0.0 && ratio <= 1.0) {
                return Err(ConfigError::Invalid(format!(
                    "distribution_size_ratio ({}) must be in (0, 1]",
                    ratio
                )));
            }
        }
        if let Some(probability) = self.distribution_uniform_probability {
            if !(0.0..=1.0).contains(&probability) {
                return Err(ConfigError::Invalid(format!(
                    "distribution_uniform_probability ({}) must be in [0, 1]",
                    probability
                )));
            }
        }
        Ok(())
    }
}
