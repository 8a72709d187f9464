//! Dialect configuration: the option set selecting a variant of a reading.
//!
//! Every reading declares an [`OptionSchema`] (option names, allowed values,
//! defaults). A [`DialectConfig`] is a complete, validated assignment of that
//! schema. Configs are immutable; deriving a variant creates a new value.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::Tone;
use crate::error::{ConfigError, UnsupportedError};

pub const STRICT_SEGMENTATION: &str = "strictSegmentation";
pub const MISSING_TONE_MARK: &str = "missingToneMark";
pub const TONE_MARK_TYPE: &str = "toneMarkType";
pub const STRICT_DIACRITIC_PLACEMENT: &str = "strictDiacriticPlacement";

/// Value of a single option.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Flag(bool),
    Text(String),
}

impl OptionValue {
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            OptionValue::Flag(b) => Some(*b),
            OptionValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            OptionValue::Text(s) => Some(s),
            OptionValue::Flag(_) => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Flag(b) => write!(f, "{b}"),
            OptionValue::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Flag(b)
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Text(s.to_owned())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Text(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionKind {
    Flag,
    Choice(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    pub name: String,
    pub kind: OptionKind,
    pub default: OptionValue,
}

impl OptionSpec {
    pub fn allows(&self, value: &OptionValue) -> bool {
        match (&self.kind, value) {
            (OptionKind::Flag, OptionValue::Flag(_)) => true,
            (OptionKind::Choice(allowed), OptionValue::Text(v)) => allowed.iter().any(|a| a == v),
            _ => false,
        }
    }
}

/// Declared options of a reading, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSchema {
    specs: Vec<OptionSpec>,
}

impl OptionSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flag(mut self, name: &str, default: bool) -> Self {
        self.specs.push(OptionSpec {
            name: name.to_owned(),
            kind: OptionKind::Flag,
            default: OptionValue::Flag(default),
        });
        self
    }

    pub fn choice(mut self, name: &str, allowed: &[&str], default: &str) -> Self {
        self.specs.push(OptionSpec {
            name: name.to_owned(),
            kind: OptionKind::Choice(allowed.iter().map(|s| (*s).to_owned()).collect()),
            default: OptionValue::Text(default.to_owned()),
        });
        self
    }

    /// Adds the options every reading carries: `strictSegmentation` and
    /// `missingToneMark` (`error`, `ignore` or one of `tones`).
    pub fn with_common(self, tones: &[Tone]) -> Self {
        self.with_common_defaults(tones, "error")
    }

    /// Like [`OptionSchema::with_common`] with another `missingToneMark`
    /// default.
    pub fn with_common_defaults(self, tones: &[Tone], missing_tone_mark: &str) -> Self {
        let mut allowed: Vec<&str> = vec!["error", "ignore"];
        allowed.extend(tones.iter().map(|t| t.name()));
        self.flag(STRICT_SEGMENTATION, false)
            .choice(MISSING_TONE_MARK, &allowed, missing_tone_mark)
    }

    pub fn get(&self, name: &str) -> Option<&OptionSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    pub fn specs(&self) -> &[OptionSpec] {
        &self.specs
    }

    /// Checks that names are unique and every default is allowed.
    pub fn validate(&self) -> Result<(), String> {
        for (i, spec) in self.specs.iter().enumerate() {
            if self.specs[..i].iter().any(|s| s.name == spec.name) {
                return Err(format!("option {:?} declared twice", spec.name));
            }
            if !spec.allows(&spec.default) {
                return Err(format!(
                    "default {} of option {:?} is not an allowed value",
                    spec.default, spec.name
                ));
            }
        }
        Ok(())
    }
}

/// Validated, immutable option assignment for one reading.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DialectConfig {
    reading: String,
    values: BTreeMap<String, OptionValue>,
}

impl DialectConfig {
    /// The reading's default options.
    pub fn defaults(reading: &str, schema: &OptionSchema) -> Self {
        let values = schema
            .specs()
            .iter()
            .map(|s| (s.name.clone(), s.default.clone()))
            .collect();
        Self {
            reading: reading.to_owned(),
            values,
        }
    }

    /// Defaults with `overrides` applied. Unknown names and disallowed values
    /// are rejected.
    pub fn new<I, K, V>(reading: &str, schema: &OptionSchema, overrides: I) -> Result<Self, UnsupportedError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<OptionValue>,
    {
        Self::defaults(reading, schema).with(schema, overrides)
    }

    /// A new config equal to this one with `overrides` applied.
    pub fn with<I, K, V>(&self, schema: &OptionSchema, overrides: I) -> Result<Self, UnsupportedError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<OptionValue>,
    {
        let mut values = self.values.clone();
        for (name, value) in overrides {
            let name = name.as_ref();
            let value = value.into();
            let spec = schema.get(name).ok_or_else(|| UnsupportedError::OptionName {
                reading: self.reading.clone(),
                name: name.to_owned(),
            })?;
            if !spec.allows(&value) {
                return Err(UnsupportedError::OptionValue {
                    reading: self.reading.clone(),
                    name: name.to_owned(),
                    value: value.to_string(),
                });
            }
            values.insert(name.to_owned(), value);
        }
        Ok(Self {
            reading: self.reading.clone(),
            values,
        })
    }

    /// Load overrides from a TOML table, e.g. `toneMarkType = "numbers"`.
    pub fn from_toml_str(reading: &str, schema: &OptionSchema, text: &str) -> Result<Self, ConfigError> {
        let overrides: BTreeMap<String, OptionValue> = toml::from_str(text)?;
        Ok(Self::new(reading, schema, overrides)?)
    }

    /// Load overrides from a JSON object.
    pub fn from_json_str(reading: &str, schema: &OptionSchema, text: &str) -> Result<Self, ConfigError> {
        let overrides: BTreeMap<String, OptionValue> = serde_json::from_str(text)?;
        Ok(Self::new(reading, schema, overrides)?)
    }

    pub fn reading(&self) -> &str {
        &self.reading
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    /// Boolean option value, `false` when absent.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).and_then(OptionValue::as_flag).unwrap_or(false)
    }

    /// Text option value, empty when absent.
    pub fn text(&self, name: &str) -> &str {
        self.get(name).and_then(OptionValue::as_text).unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn strict_segmentation(&self) -> bool {
        self.flag(STRICT_SEGMENTATION)
    }

    pub fn ensure_reading(&self, reading: &str) -> Result<(), UnsupportedError> {
        if self.reading == reading {
            Ok(())
        } else {
            Err(UnsupportedError::DialectMismatch {
                expected: reading.to_owned(),
                found: self.reading.clone(),
            })
        }
    }
}

/// Typed view of one reading's options, read from a validated
/// [`DialectConfig`] and written back as overrides.
pub trait DialectOptions: Sized {
    const READING: &'static str;

    /// Reads the typed options. Fails when `dialect` belongs to another
    /// reading.
    fn from_dialect(dialect: &DialectConfig) -> Result<Self, UnsupportedError>;

    fn overrides(&self) -> Vec<(String, OptionValue)>;
}

/// Options every reading carries. Language crates flatten this into their
/// typed dialect structs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonOptions {
    pub strict_segmentation: bool,
    pub missing_tone_mark: String,
}

impl Default for CommonOptions {
    fn default() -> Self {
        Self {
            strict_segmentation: false,
            missing_tone_mark: "error".to_owned(),
        }
    }
}

impl From<&DialectConfig> for CommonOptions {
    fn from(dialect: &DialectConfig) -> Self {
        Self {
            strict_segmentation: dialect.strict_segmentation(),
            missing_tone_mark: dialect.text(MISSING_TONE_MARK).to_owned(),
        }
    }
}

impl CommonOptions {
    pub fn overrides(&self) -> Vec<(String, OptionValue)> {
        vec![
            (STRICT_SEGMENTATION.to_owned(), self.strict_segmentation.into()),
            (MISSING_TONE_MARK.to_owned(), self.missing_tone_mark.clone().into()),
        ]
    }
}
