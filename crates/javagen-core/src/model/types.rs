use serde::{Deserialize, Serialize};

/// One half of a `Language` record: an identifier plus its wire spelling and
/// documentation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguageInfo {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub serialized_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The wire-derived (`default`) and emitted (`target`) names of one entity.
///
/// `default` comes straight from the parsed schema document and must never be
/// empty. `target` starts out `None` and is filled exactly once by the
/// renamer pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub default: LanguageInfo,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<LanguageInfo>,
}

impl Language {
    pub fn new(name: &str) -> Self {
        Language {
            default: LanguageInfo {
                name: name.to_string(),
                serialized_name: None,
                description: None,
            },
            target: None,
        }
    }

    /// The emitted identifier if the renamer has run, the wire-derived name
    /// otherwise.
    pub fn resolved_name(&self) -> &str {
        self.target
            .as_ref()
            .map(|t| t.name.as_str())
            .unwrap_or(&self.default.name)
    }
}

/// A type reference carried by properties, parameters, and responses.
///
/// Named kinds reference top-level schemas by their wire-derived default
/// name. Default names never change during transformation, so references
/// stay valid across every pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of", rename_all = "camelCase")]
pub enum SchemaType {
    String,
    Integer,
    Long,
    Number,
    Boolean,
    Binary,
    DateTime,
    #[default]
    Any,
    Array(Box<SchemaType>),
    Dictionary(Box<SchemaType>),
    Object(String),
    Choice(String),
    SealedChoice(String),
    Or(String),
    Group(String),
}

/// API metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Info {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}
