// Expression value-type registry
// Maps single-character type codes to types and holds per-type validity patterns

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Closed set of expression value kinds found in save files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Missing or unrecognized type. Matches anything.
    Unset,

    /// Key into the Dict section
    DictionaryRef,

    /// Legacy escaped dictionary key. Accepted but deprecated.
    DictionaryRefEscaped,

    /// Another edict's id. Forms an edge in the record graph.
    TableRef,

    /// Player slot number
    PlayerRef,

    /// Three comma-separated decimals
    Angle,

    /// Like Angle, but each component may carry an `e-<digits>` suffix.
    /// The two numeric grammars intentionally differ.
    Vector,

    Boolean,
    QuotedString,
    Number,
}

static ANYTHING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^.*$").expect("invalid unset regex"));
static NON_EMPTY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^.+$").expect("invalid ref regex"));
static PLAYER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").expect("invalid player regex"));
static ANGLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(-?\d+(?:\.\d+)?),(-?\d+(?:\.\d+)?),(-?\d+(?:\.\d+)?)$")
        .expect("invalid angle regex")
});
static VECTOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(-?\d+(?:\.\d+)?(?:e-\d+)?),(-?\d+(?:\.\d+)?(?:e-\d+)?),(-?\d+(?:\.\d+)?(?:e-\d+)?)$")
        .expect("invalid vector regex")
});
// Historical pattern: the alternation anchors only one side, so any string
// starting with 't' or ending with 'f' is accepted. Existing saves rely on
// that accepted set.
static BOOLEAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^t|f$").expect("invalid boolean regex"));
static QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^"[^"]*"$"#).expect("invalid string regex"));
static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("invalid number regex"));

impl ValueType {
    /// Resolve a serialization code, case-insensitively. Unrecognized codes
    /// resolve to `Unset` rather than an error.
    pub fn from_code(chr: char) -> ValueType {
        match chr.to_ascii_uppercase() {
            'Y' => ValueType::DictionaryRef,
            'Z' => ValueType::DictionaryRefEscaped,
            'T' => ValueType::TableRef,
            'P' => ValueType::PlayerRef,
            'A' => ValueType::Angle,
            'V' => ValueType::Vector,
            'B' => ValueType::Boolean,
            'S' => ValueType::QuotedString,
            'N' => ValueType::Number,
            _ => ValueType::Unset,
        }
    }

    /// Canonical one-character serialization code. `Unset` has none.
    pub fn code(&self) -> &'static str {
        match self {
            ValueType::Unset => "",
            ValueType::DictionaryRef => "Y",
            ValueType::DictionaryRefEscaped => "Z",
            ValueType::TableRef => "T",
            ValueType::PlayerRef => "P",
            ValueType::Angle => "A",
            ValueType::Vector => "V",
            ValueType::Boolean => "B",
            ValueType::QuotedString => "S",
            ValueType::Number => "N",
        }
    }

    /// Validity pattern for raw values of this type.
    pub fn validator(&self) -> &'static Regex {
        match self {
            ValueType::Unset => &ANYTHING,
            ValueType::DictionaryRef | ValueType::DictionaryRefEscaped | ValueType::TableRef => {
                &NON_EMPTY
            }
            ValueType::PlayerRef => &PLAYER,
            ValueType::Angle => &ANGLE,
            ValueType::Vector => &VECTOR,
            ValueType::Boolean => &BOOLEAN,
            ValueType::QuotedString => &QUOTED,
            ValueType::Number => &NUMBER,
        }
    }

    /// Display category consumed by presentation layers.
    pub fn category(&self) -> &'static str {
        match self {
            ValueType::Unset => "unset",
            ValueType::DictionaryRef => "dict",
            ValueType::DictionaryRefEscaped => "dictesc",
            ValueType::TableRef => "table",
            ValueType::PlayerRef => "player",
            ValueType::Angle => "angle",
            ValueType::Vector => "vector",
            ValueType::Boolean => "boolean",
            ValueType::QuotedString => "string",
            ValueType::Number => "number",
        }
    }
}
