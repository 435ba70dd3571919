use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::types::{Language, SchemaType};

/// HTTP method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    #[default]
    Get,
    Put,
    Post,
    Delete,
    Patch,
    Head,
    Options,
    Trace,
}

/// Where a parameter is bound on the wire. `None` means the document gave no
/// explicit binding; `Uri` parameters fill the base-URI template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    #[default]
    None,
    Path,
    Query,
    Header,
    Body,
    Uri,
}

/// Whether an operation starts a paged sequence or is itself the synthesized
/// continuation fetching subsequent pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationRole {
    #[default]
    Initial,
    NextPage,
}

/// A handle addressing one operation inside the code model. Groups and
/// operations are only ever appended during transformation, so handles taken
/// during a run stay valid for the rest of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<usize>,
    pub group: usize,
    pub operation: usize,
}

/// The pageable extension of an operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pageable {
    /// Response field holding the URL of the next page. Empty or absent means
    /// the operation is effectively single-page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_link_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,

    /// Explicit `Group_name` override for the synthesized next-page
    /// operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,

    /// Filled by paging synthesis. A next-page operation references itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_operation: Option<OperationRef>,

    pub role: OperationRole,
}

impl Pageable {
    pub fn has_next_link(&self) -> bool {
        self.next_link_name.as_deref().is_some_and(|n| !n.is_empty())
    }
}

/// A single operation parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Parameter {
    /// Identity handle, unique per code model. Assigned by
    /// `parse::assign_parameter_ids`; a merged list containing the same id
    /// twice holds the same wire parameter twice.
    pub id: u32,

    pub language: Language,

    pub schema: SchemaType,

    pub location: ParameterLocation,

    pub required: bool,

    /// Whether the parameter appears in the proxy-method signature. Grouped
    /// parameters are represented there by their group parameter instead.
    pub in_signature: bool,

    pub skip_encoding: bool,

    /// Owning operation (default name), set during transformation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,

    /// Default name of the group parameter this one is bundled under.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grouped_by: Option<String>,

    /// Default name of the parameter this one was flattened out of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_parameter: Option<String>,
}

impl Default for Parameter {
    fn default() -> Self {
        Parameter {
            id: 0,
            language: Language::default(),
            schema: SchemaType::default(),
            location: ParameterLocation::None,
            required: false,
            in_signature: true,
            skip_encoding: false,
            operation_name: None,
            grouped_by: None,
            original_parameter: None,
        }
    }
}

impl Parameter {
    /// The name this parameter is serialized under on the wire.
    pub fn wire_name(&self) -> &str {
        self.language
            .default
            .serialized_name
            .as_deref()
            .unwrap_or(&self.language.default.name)
    }
}

/// Path, base URI, and method for one request variant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestProtocol {
    pub path: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    pub method: HttpMethod,
}

/// One concrete request variant of an operation. After transformation
/// `parameters` is the merged wire list, operation-level parameters first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Request {
    pub protocol: RequestProtocol,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
}

impl Request {
    /// Parameters appearing in the proxy-method signature.
    pub fn signature_parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().filter(|p| p.in_signature)
    }
}

/// A response (or exception) contract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaType>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub status_codes: Vec<String>,
}

/// External documentation link.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExternalDocs {
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A friendlier overload sharing the operation's semantic contract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConvenienceApi {
    pub language: Language,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requests: Vec<Request>,
}

/// One API operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Operation {
    pub language: Language,

    /// Owning group (default name), set during transformation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,

    /// Operation-level parameters, shared across requests.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requests: Vec<Request>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub responses: Vec<Response>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exceptions: Vec<Response>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pageable: Option<Pageable>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub convenience_api: Option<ConvenienceApi>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub api_versions: Vec<String>,

    pub deprecated: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocs>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
}

/// A named bucket of operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperationGroup {
    pub language: Language,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<Operation>,

    /// Owning client (default name), set during transformation. `None` for
    /// groups owned directly by the code model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,

    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub extensions: IndexMap<String, serde_json::Value>,
}

/// One client in a multi-client (TypeSpec-sourced) code model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Client {
    pub language: Language,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub operation_groups: Vec<OperationGroup>,
}
