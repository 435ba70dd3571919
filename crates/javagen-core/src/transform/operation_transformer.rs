use std::collections::HashSet;

use crate::error::TransformError;
use crate::model::{
    CodeModel, Language, LanguageInfo, Operation, OperationRole, Parameter, ParameterLocation,
    Request, SchemaType,
};

use super::renamer::{NameKind, rename};
use super::{TransformContext, paging};

/// OData-convention parameter renames, applied only to parameters whose
/// client name is still the wire default.
const ODATA_PARAMETER_RENAMES: &[(&str, &str)] = &[
    ("maxpagesize", "maxPageSize"),
    ("orderby", "orderBy"),
];

/// Normalize every operation group: back-references, renames, parameter
/// merging and synthesis, then paging synthesis per group once all of its
/// operations are in final shape.
pub(super) fn transform_operation_groups(
    model: &mut CodeModel,
    ctx: &mut TransformContext,
) -> Result<(), TransformError> {
    for group_idx in 0..model.operation_groups.len() {
        transform_group(model, None, group_idx, ctx)?;
    }
    for client_idx in 0..model.clients.len() {
        rename(&mut model.clients[client_idx].language, NameKind::Client);
        for group_idx in 0..model.clients[client_idx].operation_groups.len() {
            transform_group(model, Some(client_idx), group_idx, ctx)?;
        }
    }
    Ok(())
}

fn transform_group(
    model: &mut CodeModel,
    client: Option<usize>,
    group_idx: usize,
    ctx: &mut TransformContext,
) -> Result<(), TransformError> {
    let client_name = client.map(|c| model.clients[c].language.default.name.clone());

    let mut paged: Vec<usize> = Vec::new();
    {
        let groups = match client {
            Some(c) => &mut model.clients[c].operation_groups,
            None => &mut model.operation_groups,
        };
        let group = &mut groups[group_idx];
        group.client_name = client_name;
        rename(&mut group.language, NameKind::MethodGroup);
        let group_default = group.language.default.name.clone();

        for (op_idx, op) in group.operations.iter_mut().enumerate() {
            transform_operation(op, &group_default, ctx);
            // Next-page operations are continuations, never sources: they
            // must not synthesize companions of their own.
            let queue = op
                .pageable
                .as_ref()
                .is_some_and(|p| p.has_next_link() && p.role == OperationRole::Initial);
            if queue {
                paged.push(op_idx);
            }
        }
    }

    // Synthesis reads the fully normalized parameter lists, so it runs only
    // after every operation in the group has been transformed.
    for op_idx in paged {
        paging::synthesize_next_operation(model, client, group_idx, op_idx, ctx)?;
    }
    Ok(())
}

fn transform_operation(op: &mut Operation, group_default: &str, ctx: &mut TransformContext) {
    op.group_name = Some(group_default.to_string());
    rename(&mut op.language, NameKind::Method);
    let op_default = op.language.default.name.clone();

    if let Some(conv) = &mut op.convenience_api {
        rename(&mut conv.language, NameKind::Method);
        for req in &mut conv.requests {
            for p in &mut req.parameters {
                rename(&mut p.language, NameKind::Variable);
            }
        }
    }

    // Operation-level parameters are renamed in place as well: the merged
    // request lists below work on clones of them.
    for p in &mut op.parameters {
        rename(&mut p.language, NameKind::Variable);
        p.operation_name = Some(op_default.clone());
    }

    let op_params = op.parameters.clone();
    for request in &mut op.requests {
        // Merge: operation-level parameters first, then request-level.
        let mut merged = op_params.clone();
        merged.append(&mut request.parameters);
        request.parameters = merged;

        // Grouped parameters are represented by their group parameter in the
        // signature, never individually.
        for p in &mut request.parameters {
            if p.grouped_by.is_some() {
                p.in_signature = false;
            }
        }

        transform_parameters(request, &op_default, ctx);
        apply_odata_renames(request);
        deduplicate_parameters(request);
    }
}

/// Walk the merged parameter list by index (insertion happens mid-loop):
/// rename, set the operation back-reference, synthesize a Content-Length
/// header after a raw binary body, and promote unbound contentType
/// parameters to headers.
fn transform_parameters(request: &mut Request, op_name: &str, ctx: &mut TransformContext) {
    let mut i = 0;
    while i < request.parameters.len() {
        {
            let p = &mut request.parameters[i];
            rename(&mut p.language, NameKind::Variable);
            p.operation_name = Some(op_name.to_string());
        }

        if !ctx.settings.data_plane_client
            && is_binary_body(&request.parameters[i])
            && !has_content_length_header(&request.parameters)
        {
            let required = request.parameters[i].required;
            let header = content_length_parameter(required, ctx.fresh_parameter_id());
            request.parameters.insert(i + 1, header);
            // The inserted header is picked up by the next iteration for its
            // own rename and back-reference.
        }

        let p = &mut request.parameters[i];
        if p.language.default.name == "contentType" && p.location == ParameterLocation::None {
            p.location = ParameterLocation::Header;
            p.language.default.serialized_name = Some("Content-Type".to_string());
            if let Some(t) = &mut p.language.target {
                t.serialized_name = Some("Content-Type".to_string());
            }
        }

        i += 1;
    }
}

fn is_binary_body(p: &Parameter) -> bool {
    p.location == ParameterLocation::Body && p.schema == SchemaType::Binary
}

fn has_content_length_header(parameters: &[Parameter]) -> bool {
    parameters.iter().any(|p| {
        p.location == ParameterLocation::Header
            && p.wire_name().eq_ignore_ascii_case("content-length")
    })
}

fn content_length_parameter(required: bool, id: u32) -> Parameter {
    Parameter {
        id,
        language: Language {
            default: LanguageInfo {
                name: "contentLength".to_string(),
                serialized_name: Some("Content-Length".to_string()),
                description: Some("The Content-Length header for the request".to_string()),
            },
            target: None,
        },
        schema: SchemaType::Long,
        location: ParameterLocation::Header,
        required,
        ..Default::default()
    }
}

fn apply_odata_renames(request: &mut Request) {
    for p in &mut request.parameters {
        if !matches!(
            p.location,
            ParameterLocation::Query | ParameterLocation::Header
        ) {
            continue;
        }
        for (wire, replacement) in ODATA_PARAMETER_RENAMES {
            // Only truly default-named parameters are renamed: a spec author
            // who picked an explicit client name keeps it.
            if p.wire_name() == *wire && p.language.default.name == *wire {
                if let Some(t) = &mut p.language.target {
                    t.name = (*replacement).to_string();
                }
            }
        }
    }
}

/// Remove the same parameter merged in twice, then suffix later parameters
/// that collide on their emitted identifier. Flattening-origin parameters
/// never appear in the proxy signature, so they neither claim nor receive a
/// name.
fn deduplicate_parameters(request: &mut Request) {
    let mut seen_ids: HashSet<u32> = HashSet::new();
    request.parameters.retain(|p| seen_ids.insert(p.id));

    let mut used: HashSet<String> = HashSet::new();
    for p in &mut request.parameters {
        if p.original_parameter.is_some() {
            continue;
        }
        let mut name = p.language.resolved_name().to_string();
        if used.contains(&name) {
            while used.contains(&name) {
                name.push_str("Param");
            }
            if let Some(t) = &mut p.language.target {
                t.name = name.clone();
            }
        }
        used.insert(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JavaSettings;
    use crate::model::HttpMethod;

    fn ctx_with<'a>(settings: &'a JavaSettings) -> TransformContext<'a> {
        TransformContext::new(settings, &CodeModel::default())
    }

    fn parameter(id: u32, name: &str, schema: SchemaType, location: ParameterLocation) -> Parameter {
        Parameter {
            id,
            language: Language::new(name),
            schema,
            location,
            ..Default::default()
        }
    }

    fn request_with(parameters: Vec<Parameter>) -> Request {
        Request {
            parameters,
            ..Default::default()
        }
    }

    #[test]
    fn synthesizes_content_length_after_binary_body() {
        let settings = JavaSettings::default();
        let mut ctx = ctx_with(&settings);
        let mut body = parameter(1, "body", SchemaType::Binary, ParameterLocation::Body);
        body.required = true;
        let mut request = request_with(vec![
            parameter(2, "widgetId", SchemaType::String, ParameterLocation::Path),
            body,
        ]);

        transform_parameters(&mut request, "upload", &mut ctx);

        assert_eq!(request.parameters.len(), 3);
        let header = &request.parameters[2];
        assert_eq!(header.wire_name(), "Content-Length");
        assert_eq!(header.schema, SchemaType::Long);
        assert_eq!(header.location, ParameterLocation::Header);
        assert!(header.required);
        assert!(header.in_signature);
        // Got its own rename and back-reference from the index loop.
        assert_eq!(header.language.resolved_name(), "contentLength");
        assert_eq!(header.operation_name.as_deref(), Some("upload"));
    }

    #[test]
    fn does_not_duplicate_existing_content_length() {
        let settings = JavaSettings::default();
        let mut ctx = ctx_with(&settings);
        let mut existing = parameter(1, "contentLength", SchemaType::Long, ParameterLocation::Header);
        existing.language.default.serialized_name = Some("content-length".to_string());
        let mut request = request_with(vec![
            existing,
            parameter(2, "body", SchemaType::Binary, ParameterLocation::Body),
        ]);

        transform_parameters(&mut request, "upload", &mut ctx);

        assert_eq!(request.parameters.len(), 2);
    }

    #[test]
    fn data_plane_client_skips_content_length() {
        let settings = JavaSettings {
            data_plane_client: true,
            ..Default::default()
        };
        let mut ctx = ctx_with(&settings);
        let mut request = request_with(vec![parameter(
            1,
            "body",
            SchemaType::Binary,
            ParameterLocation::Body,
        )]);

        transform_parameters(&mut request, "upload", &mut ctx);

        assert_eq!(request.parameters.len(), 1);
    }

    #[test]
    fn promotes_unbound_content_type_to_header() {
        let settings = JavaSettings::default();
        let mut ctx = ctx_with(&settings);
        let mut request = request_with(vec![parameter(
            1,
            "contentType",
            SchemaType::String,
            ParameterLocation::None,
        )]);

        transform_parameters(&mut request, "upload", &mut ctx);

        let p = &request.parameters[0];
        assert_eq!(p.location, ParameterLocation::Header);
        assert_eq!(p.wire_name(), "Content-Type");
        assert_eq!(
            p.language.target.as_ref().unwrap().serialized_name.as_deref(),
            Some("Content-Type")
        );
    }

    #[test]
    fn renames_default_named_odata_parameters() {
        let mut orderby = parameter(1, "orderby", SchemaType::String, ParameterLocation::Query);
        orderby.language.default.serialized_name = Some("orderby".to_string());
        rename(&mut orderby.language, NameKind::Variable);

        let mut maxpagesize =
            parameter(2, "maxpagesize", SchemaType::Integer, ParameterLocation::Query);
        rename(&mut maxpagesize.language, NameKind::Variable);

        // Author-named parameter keeps its explicit client name.
        let mut custom = parameter(3, "pageLimit", SchemaType::Integer, ParameterLocation::Query);
        custom.language.default.serialized_name = Some("maxpagesize".to_string());
        rename(&mut custom.language, NameKind::Variable);

        let mut request = request_with(vec![orderby, maxpagesize, custom]);
        apply_odata_renames(&mut request);

        assert_eq!(request.parameters[0].language.resolved_name(), "orderBy");
        assert_eq!(
            request.parameters[1].language.resolved_name(),
            "maxPageSize"
        );
        assert_eq!(request.parameters[2].language.resolved_name(), "pageLimit");
    }

    #[test]
    fn removes_same_parameter_merged_twice() {
        let p = parameter(7, "apiVersion", SchemaType::String, ParameterLocation::Query);
        let mut request = request_with(vec![p.clone(), p]);

        deduplicate_parameters(&mut request);

        assert_eq!(request.parameters.len(), 1);
    }

    #[test]
    fn suffixes_colliding_identifiers() {
        let mut first = parameter(1, "filter", SchemaType::String, ParameterLocation::Query);
        rename(&mut first.language, NameKind::Variable);
        let mut second = parameter(2, "Filter", SchemaType::String, ParameterLocation::Header);
        rename(&mut second.language, NameKind::Variable);

        let mut request = request_with(vec![first, second]);
        deduplicate_parameters(&mut request);

        assert_eq!(request.parameters.len(), 2);
        assert_eq!(request.parameters[0].language.resolved_name(), "filter");
        assert_eq!(
            request.parameters[1].language.resolved_name(),
            "filterParam"
        );
    }

    #[test]
    fn flattening_origin_parameters_are_exempt_from_dedup() {
        let mut first = parameter(1, "name", SchemaType::String, ParameterLocation::Query);
        rename(&mut first.language, NameKind::Variable);
        let mut flattened = parameter(2, "name", SchemaType::String, ParameterLocation::None);
        flattened.original_parameter = Some("properties".to_string());
        rename(&mut flattened.language, NameKind::Variable);

        let mut request = request_with(vec![first, flattened]);
        deduplicate_parameters(&mut request);

        // The flattened parameter keeps its name; it is not part of the wire
        // signature being deduplicated.
        assert_eq!(request.parameters[1].language.resolved_name(), "name");
    }

    #[test]
    fn grouped_parameters_leave_the_signature() {
        let settings = JavaSettings::default();
        let mut ctx = ctx_with(&settings);

        let mut grouped = parameter(1, "top", SchemaType::Integer, ParameterLocation::Query);
        grouped.grouped_by = Some("listOptions".to_string());

        let mut op = Operation {
            language: Language::new("list"),
            requests: vec![request_with(vec![grouped])],
            ..Default::default()
        };
        transform_operation(&mut op, "Widgets", &mut ctx);

        let request = &op.requests[0];
        assert!(!request.parameters[0].in_signature);
        assert_eq!(request.signature_parameters().count(), 0);
    }

    #[test]
    fn merges_operation_level_parameters_first() {
        let settings = JavaSettings::default();
        let mut ctx = ctx_with(&settings);

        let mut op = Operation {
            language: Language::new("get"),
            parameters: vec![parameter(
                1,
                "apiVersion",
                SchemaType::String,
                ParameterLocation::Query,
            )],
            requests: vec![Request {
                protocol: crate::model::RequestProtocol {
                    path: "/widgets/{widgetId}".to_string(),
                    uri: Some("{endpoint}".to_string()),
                    method: HttpMethod::Get,
                },
                parameters: vec![parameter(
                    2,
                    "widgetId",
                    SchemaType::String,
                    ParameterLocation::Path,
                )],
            }],
            ..Default::default()
        };

        transform_operation(&mut op, "Widgets", &mut ctx);

        let names: Vec<&str> = op.requests[0]
            .parameters
            .iter()
            .map(|p| p.language.resolved_name())
            .collect();
        assert_eq!(names, vec!["apiVersion", "widgetId"]);
        assert_eq!(
            op.requests[0].parameters[0].operation_name.as_deref(),
            Some("get")
        );
        assert_eq!(op.group_name.as_deref(), Some("Widgets"));
    }
}
