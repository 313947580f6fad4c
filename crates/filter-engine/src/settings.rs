use crate::error::{SchemaError, SchemaResult};
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Environment variable overriding [`CompilerSettings::max_depth`].
pub const ENV_MAX_DEPTH: &str = "FILTER_MAX_DEPTH";

/// Environment variable overriding [`CompilerSettings::case_insensitive_strings`].
pub const ENV_CASE_INSENSITIVE: &str = "FILTER_CASE_INSENSITIVE";

/// Function type for reading environment variables.
pub type EnvGetter = fn(&str) -> Option<String>;

/// Immutable compiler configuration, fixed once the schema is built.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerSettings {
    /// Deepest nesting of filter objects a request may use
    pub max_depth: usize,
    /// Whether `contains`/`startsWith`/`endsWith` ignore case
    pub case_insensitive_strings: bool,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            case_insensitive_strings: false,
        }
    }
}

impl CompilerSettings {
    pub fn from_builder(builder: CompilerSettingsBuilder) -> SchemaResult<Self> {
        let settings = Self {
            max_depth: builder.max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
            case_insensitive_strings: builder.case_insensitive_strings.unwrap_or(false),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json(json: &str) -> SchemaResult<Self> {
        let settings: Self = serde_json::from_str(json)
            .map_err(|e| SchemaError::InvalidSettings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads overrides from the environment; unset variables keep defaults.
    pub fn from_env(env_getter: EnvGetter) -> SchemaResult<Self> {
        let mut builder = CompilerSettingsBuilder::new();

        if let Some(raw) = env_getter(ENV_MAX_DEPTH) {
            let depth = raw.trim().parse::<usize>().map_err(|_| {
                SchemaError::InvalidSettings(format!("{ENV_MAX_DEPTH}='{raw}' is not a number"))
            })?;
            builder = builder.max_depth(depth);
        }

        if let Some(raw) = env_getter(ENV_CASE_INSENSITIVE) {
            let flag = raw.trim().to_lowercase().parse::<bool>().map_err(|_| {
                SchemaError::InvalidSettings(format!(
                    "{ENV_CASE_INSENSITIVE}='{raw}' is not a boolean"
                ))
            })?;
            builder = builder.case_insensitive_strings(flag);
        }

        let settings = builder.build()?;
        debug!(?settings, "Loaded compiler settings from environment");
        Ok(settings)
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn case_insensitive_strings(&self) -> bool {
        self.case_insensitive_strings
    }

    fn validate(&self) -> SchemaResult<()> {
        if self.max_depth == 0 {
            return Err(SchemaError::InvalidSettings(
                "max_depth must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct CompilerSettingsBuilder {
    pub max_depth: Option<usize>,
    pub case_insensitive_strings: Option<bool>,
}

impl CompilerSettingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn case_insensitive_strings(mut self, enabled: bool) -> Self {
        self.case_insensitive_strings = Some(enabled);
        self
    }

    pub fn build(self) -> SchemaResult<CompilerSettings> {
        CompilerSettings::from_builder(self)
    }
}
