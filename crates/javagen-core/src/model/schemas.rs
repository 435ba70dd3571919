use serde::{Deserialize, Serialize};

use super::types::{Language, SchemaType};

/// By-kind schema collections owned by the code model.
///
/// `groups` holds parameter-group schemas straight from the wire; the schema
/// transformer folds them into `objects`, after which the collection stays
/// empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Schemas {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub objects: Vec<ObjectSchema>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<ChoiceSchema>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sealed_choices: Vec<ChoiceSchema>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dictionaries: Vec<DictionarySchema>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ors: Vec<OrSchema>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ands: Vec<AndSchema>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<ObjectSchema>,
}

impl Schemas {
    /// Look up an object schema by its wire-derived default name.
    pub fn find_object(&self, default_name: &str) -> Option<&ObjectSchema> {
        self.objects
            .iter()
            .find(|o| o.language.default.name == default_name)
    }

    pub fn find_object_mut(&mut self, default_name: &str) -> Option<&mut ObjectSchema> {
        self.objects
            .iter_mut()
            .find(|o| o.language.default.name == default_name)
    }
}

/// How a schema participates in the generated surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SchemaUsage {
    Input,
    Output,
    OptionsGroup,
}

/// An object schema with typed properties and optional polymorphism metadata.
///
/// Inheritance links (`parent_model_name`, `children`) are by default name
/// rather than live pointers, tolerating partial construction order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectSchema {
    pub language: Language,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Property>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Discriminator>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator_value: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_model_name: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,

    pub flattened: bool,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub usage: Vec<SchemaUsage>,
}

impl ObjectSchema {
    /// Polymorphic means discriminator base or discriminator leaf. Either way
    /// the schema must stay visible to deserialization dispatch and can never
    /// be flattened away.
    pub fn is_polymorphic(&self) -> bool {
        self.discriminator.is_some() || self.discriminator_value.is_some()
    }
}

/// Marks an object schema as the base of a polymorphic hierarchy; the wrapped
/// property selects the subtype on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Discriminator {
    pub property: Property,
}

/// A property of exactly one object schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Property {
    pub language: Language,

    pub schema: SchemaType,

    pub required: bool,

    pub read_only: bool,

    pub constant: bool,

    /// The client-flatten extension from the wire document.
    pub flatten: bool,
}

/// An extensible or sealed enum schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChoiceSchema {
    pub language: Language,

    pub value_type: SchemaType,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<ChoiceValue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChoiceValue {
    pub language: Language,
    pub value: String,
}

/// A map type with string keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DictionarySchema {
    pub language: Language,
    pub element_type: SchemaType,
}

/// A union of anonymous object schemas. Members are owned inline and never
/// registered in the top-level collections; they are only reachable here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrSchema {
    pub language: Language,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<ObjectSchema>,
}

/// An all-of combinator referencing its constituents by default name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AndSchema {
    pub language: Language,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<String>,
}
