//! Typed failures of the conversion pipeline.
//!
//! Request-time failures are one of four kinds and surface through
//! [`ReadingError`]. Initialization failures (registry building, data
//! loading) are [`ConfigError`].

use std::fmt;

use crate::entity::ConversionDirection;

/// Pipeline stage a failure was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Decompose,
    ToneNormalize,
    Map,
    Compose,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Decompose => "decompose",
            Stage::ToneNormalize => "tone normalization",
            Stage::Map => "mapping",
            Stage::Compose => "compose",
        };
        f.write_str(name)
    }
}

/// Why a chunk could not be decomposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecompositionFailure {
    /// No sequence of entities covers the chunk.
    Unsegmentable,
    /// More than one sequence of entities covers the chunk.
    Ambiguous,
}

impl fmt::Display for DecompositionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecompositionFailure::Unsegmentable => f.write_str("no valid segmentation"),
            DecompositionFailure::Ambiguous => f.write_str("more than one valid segmentation"),
        }
    }
}

/// Input that cannot be segmented under strict segmentation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot decompose {chunk:?} at offset {offset} as {reading}: {failure}")]
pub struct DecompositionError {
    pub reading: String,
    pub chunk: String,
    /// Character offset of the chunk in the NFC-normalized input.
    pub offset: usize,
    pub failure: DecompositionFailure,
}

/// An entity with no mapping or a tone the target cannot express.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{stage} failed for {}: {message}", entity.as_deref().unwrap_or("<input>"))]
pub struct ConversionError {
    pub stage: Stage,
    pub entity: Option<String>,
    pub message: String,
}

impl ConversionError {
    pub fn new(stage: Stage, entity: Option<String>, message: impl Into<String>) -> Self {
        Self {
            stage,
            entity,
            message: message.into(),
        }
    }

    pub fn no_mapping(direction: &ConversionDirection, entity: impl fmt::Display) -> Self {
        Self::new(
            Stage::Map,
            Some(entity.to_string()),
            format!("no mapping entry for {direction}"),
        )
    }

    pub fn no_tone_mapping(direction: &ConversionDirection, entity: impl fmt::Display) -> Self {
        Self::new(
            Stage::Map,
            Some(entity.to_string()),
            format!("tone has no counterpart in {direction}"),
        )
    }

    pub fn tone_not_expressible(reading: &str, entity: impl fmt::Display) -> Self {
        Self::new(
            Stage::Compose,
            Some(entity.to_string()),
            format!("tone cannot be expressed by the selected {reading} tone marks"),
        )
    }

    pub fn not_in_vocabulary(reading: &str, entity: impl fmt::Display) -> Self {
        Self::new(
            Stage::Compose,
            Some(entity.to_string()),
            format!("not a syllable of {reading}"),
        )
    }
}

/// More than one candidate survived mapping for a single entity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("ambiguous conversion of {entity} ({direction}): {}", candidates.join(", "))]
pub struct AmbiguousConversionError {
    pub direction: ConversionDirection,
    pub entity: String,
    /// Candidates spelled in the target dialect, in table priority order.
    pub candidates: Vec<String>,
}

/// The request names something the registry or a reading does not know.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnsupportedError {
    #[error("unsupported reading {0:?}")]
    Reading(String),
    #[error("no conversion path from {from} to {to}")]
    Direction { from: String, to: String },
    #[error("option {name:?} is not defined for {reading}")]
    OptionName { reading: String, name: String },
    #[error("value {value} is not allowed for option {name:?} of {reading}")]
    OptionValue {
        reading: String,
        name: String,
        value: String,
    },
    #[error("dialect of {found} cannot be used with reading {expected}")]
    DialectMismatch { expected: String, found: String },
}

/// Coarse classification of a [`ReadingError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Decomposition,
    Conversion,
    Ambiguous,
    Unsupported,
}

/// Any request-time failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadingError {
    #[error(transparent)]
    Decomposition(#[from] DecompositionError),
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    #[error(transparent)]
    Ambiguous(#[from] AmbiguousConversionError),
    #[error(transparent)]
    Unsupported(#[from] UnsupportedError),
}

impl ReadingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReadingError::Decomposition(_) => ErrorKind::Decomposition,
            ReadingError::Conversion(_) => ErrorKind::Conversion,
            ReadingError::Ambiguous(_) => ErrorKind::Ambiguous,
            ReadingError::Unsupported(_) => ErrorKind::Unsupported,
        }
    }
}

/// Failures while registering readings and mappers or loading data.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading {0:?} is registered twice")]
    DuplicateReading(String),
    #[error("a direct mapper for {0} is already registered")]
    DuplicateMapper(ConversionDirection),
    #[error("mapper {direction} names unknown reading {reading:?}")]
    UnknownReading {
        direction: ConversionDirection,
        reading: String,
    },
    #[error("pivot reading {0:?} is not registered")]
    UnknownPivot(String),
    #[error("invalid option schema for {reading}: {message}")]
    InvalidSchema { reading: String, message: String },
    #[error("invalid mapping table {direction}: {message}")]
    InvalidTable {
        direction: ConversionDirection,
        message: String,
    },
    #[error(transparent)]
    Unsupported(#[from] UnsupportedError),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_error_kind_follows_variant() {
        let err: ReadingError = UnsupportedError::Reading("Klingon".into()).into();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
        assert_eq!(err.to_string(), "unsupported reading \"Klingon\"");

        let err: ReadingError = ConversionError::new(Stage::Map, None, "x").into();
        assert_eq!(err.kind(), ErrorKind::Conversion);
    }

    #[test]
    fn ambiguous_error_lists_candidates() {
        let err = AmbiguousConversionError {
            direction: ConversionDirection::new("WadeGiles", "Pinyin"),
            entity: "kuo".into(),
            candidates: vec!["guō".into(), "guó".into()],
        };
        let text = err.to_string();
        assert!(text.contains("kuo"));
        assert!(text.contains("guō, guó"));
    }

    #[test]
    fn decomposition_error_mentions_chunk_and_offset() {
        let err = DecompositionError {
            reading: "Jyutping".into(),
            chunk: "haam4".into(),
            offset: 3,
            failure: DecompositionFailure::Ambiguous,
        };
        let text = err.to_string();
        assert!(text.contains("\"haam4\""));
        assert!(text.contains("offset 3"));
    }
}
