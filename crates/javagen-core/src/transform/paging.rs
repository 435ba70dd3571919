use std::collections::HashSet;

use indexmap::IndexMap;
use log::debug;

use crate::error::TransformError;
use crate::model::{
    CodeModel, ExternalDocs, HttpMethod, Language, LanguageInfo, Operation, OperationGroup,
    OperationRef, OperationRole, Pageable, Parameter, ParameterLocation, Request,
    RequestProtocol, Response, SchemaType,
};

use super::TransformContext;
use super::renamer::{NameKind, cased, rename};

/// Everything read from a paged operation before the owning scope is mutated.
struct SourceSnapshot {
    key: (Option<usize>, String, String),
    group_name: String,
    group_extensions: IndexMap<String, serde_json::Value>,
    client_name: Option<String>,
    op_name: String,
    override_name: Option<String>,
    next_link_name: Option<String>,
    response_schema: Option<SchemaType>,
    uri: Option<String>,
    description: Option<String>,
    api_versions: Vec<String>,
    deprecated: bool,
    summary: Option<String>,
    uid: Option<String>,
    external_docs: Option<ExternalDocs>,
    profile: Option<String>,
    responses: Vec<Response>,
    exceptions: Vec<Response>,
    carried: Vec<Parameter>,
}

/// Ensure a paged operation has exactly one "next page" companion, creating
/// or reusing it and wiring the pageable links on both ends. The companion's
/// own pageable references itself and carries the next-page role.
pub(super) fn synthesize_next_operation(
    model: &mut CodeModel,
    client: Option<usize>,
    group_idx: usize,
    op_idx: usize,
    ctx: &mut TransformContext,
) -> Result<(), TransformError> {
    let source_ref = OperationRef {
        client,
        group: group_idx,
        operation: op_idx,
    };

    let snap = {
        let groups = match client {
            Some(c) => &model.clients[c].operation_groups,
            None => &model.operation_groups,
        };
        let group = &groups[group_idx];
        let op = &group.operations[op_idx];
        let pageable = op.pageable.as_ref().ok_or_else(|| {
            TransformError::Other(format!(
                "operation '{}' queued for paging without a pageable extension",
                op.language.resolved_name()
            ))
        })?;
        SourceSnapshot {
            key: (
                client,
                group.language.default.name.clone(),
                op.language.default.name.clone(),
            ),
            group_name: group.language.resolved_name().to_string(),
            group_extensions: group.extensions.clone(),
            client_name: group.client_name.clone(),
            op_name: op.language.resolved_name().to_string(),
            override_name: pageable.operation_name.clone().filter(|s| !s.is_empty()),
            next_link_name: pageable.next_link_name.clone(),
            response_schema: op.responses.iter().find_map(|r| r.schema.clone()),
            uri: op.requests.first().and_then(|r| r.protocol.uri.clone()),
            description: op.language.default.description.clone(),
            api_versions: op.api_versions.clone(),
            deprecated: op.deprecated,
            summary: op.summary.clone(),
            uid: op.uid.clone(),
            external_docs: op.external_docs.clone(),
            profile: op.profile.clone(),
            responses: op.responses.clone(),
            exceptions: op.exceptions.clone(),
            carried: carried_parameters(op),
        }
    };

    // A scope may list the same logical operation more than once (duplicated
    // group entries in the document): reuse the companion it already has.
    // Operations in other scopes never share a companion, so the key carries
    // the owning client.
    if let Some(&existing) = ctx.synthesized.get(&snap.key) {
        wire_links(model, source_ref, existing);
        return Ok(());
    }

    // 1. Derive the companion's group and operation names.
    let (target_group, mut target_name, explicit) = match &snap.override_name {
        Some(ov) => match ov.split_once('_') {
            Some((group_part, name_part)) => (
                cased(group_part, NameKind::MethodGroup),
                cased(name_part, NameKind::Method),
                true,
            ),
            None => (snap.group_name.clone(), cased(ov, NameKind::Method), true),
        },
        None => (
            snap.group_name.clone(),
            format!("{}Next", snap.op_name),
            false,
        ),
    };

    // Two different response contracts cannot share one emitted method
    // signature: the later one falls back to the derived name.
    if let Some(schema) = &snap.response_schema {
        let signature = (client, target_group.clone(), target_name.clone());
        if let Some(previous) = ctx.signature_responses.get(&signature) {
            if previous != schema {
                target_name = format!("{}Next", snap.op_name);
            }
        }
        ctx.signature_responses
            .insert((client, target_group.clone(), target_name.clone()), schema.clone());
    }

    // 2. Locate or create the target operation group in the owning scope.
    let groups = match client {
        Some(c) => &mut model.clients[c].operation_groups,
        None => &mut model.operation_groups,
    };
    let target_group_idx = match groups
        .iter()
        .position(|g| g.language.resolved_name() == target_group)
    {
        Some(i) => i,
        None => {
            let mut group = OperationGroup {
                language: Language::new(&target_group),
                client_name: snap.client_name.clone(),
                extensions: snap.group_extensions.clone(),
                ..Default::default()
            };
            rename(&mut group.language, NameKind::MethodGroup);
            groups.push(group);
            groups.len() - 1
        }
    };

    // 3. Locate or create the companion operation.
    let target_group_default = groups[target_group_idx].language.default.name.clone();
    let existing_op = groups[target_group_idx]
        .operations
        .iter()
        .position(|o| o.language.resolved_name() == target_name);
    let n_idx = match existing_op {
        Some(i) => i,
        None => {
            let carried: &[Parameter] = if explicit { &[] } else { &snap.carried };
            let next = build_next_operation(&target_name, &target_group_default, &snap, carried, ctx);
            debug!(
                "synthesized next-page operation '{}.{}' for '{}.{}'",
                target_group, target_name, snap.group_name, snap.op_name
            );
            groups[target_group_idx].operations.push(next);
            groups[target_group_idx].operations.len() - 1
        }
    };

    let next_ref = OperationRef {
        client,
        group: target_group_idx,
        operation: n_idx,
    };
    ctx.synthesized.insert(snap.key, next_ref);
    wire_links(model, source_ref, next_ref);
    Ok(())
}

/// Parameters carried over into the companion: headers, base-URI parameters,
/// and unbound parameters. Path and query parameters address the current
/// page only; the companion's own nextLink parameter drives the next fetch.
fn carried_parameters(op: &Operation) -> Vec<Parameter> {
    let mut seen: HashSet<u32> = HashSet::new();
    let mut carried = Vec::new();
    let all = op
        .parameters
        .iter()
        .chain(op.requests.iter().flat_map(|r| r.parameters.iter()));
    for p in all {
        if !matches!(
            p.location,
            ParameterLocation::Header | ParameterLocation::Uri | ParameterLocation::None
        ) {
            continue;
        }
        if seen.insert(p.id) {
            carried.push(p.clone());
        }
    }
    carried
}

fn build_next_operation(
    name: &str,
    group_default: &str,
    snap: &SourceSnapshot,
    carried: &[Parameter],
    ctx: &mut TransformContext,
) -> Operation {
    let mut language = Language::new(name);
    language.default.description = snap.description.clone();
    rename(&mut language, NameKind::Method);

    let mut next_link = Parameter {
        id: ctx.fresh_parameter_id(),
        language: Language {
            default: LanguageInfo {
                name: "nextLink".to_string(),
                serialized_name: Some("nextLink".to_string()),
                description: Some("The URL to get the next list of items".to_string()),
            },
            target: None,
        },
        schema: SchemaType::String,
        location: ParameterLocation::Path,
        required: true,
        skip_encoding: true,
        operation_name: Some(name.to_string()),
        ..Default::default()
    };
    rename(&mut next_link.language, NameKind::Variable);

    let mut parameters = vec![next_link];
    parameters.extend(carried.iter().cloned());
    for p in &mut parameters {
        p.operation_name = Some(name.to_string());
    }

    Operation {
        language,
        group_name: Some(group_default.to_string()),
        parameters: Vec::new(),
        requests: vec![Request {
            protocol: RequestProtocol {
                path: "{nextLink}".to_string(),
                uri: snap.uri.clone(),
                method: HttpMethod::Get,
            },
            parameters,
        }],
        responses: snap.responses.clone(),
        exceptions: snap.exceptions.clone(),
        pageable: Some(Pageable {
            next_link_name: snap.next_link_name.clone(),
            role: OperationRole::NextPage,
            ..Default::default()
        }),
        convenience_api: None,
        api_versions: snap.api_versions.clone(),
        deprecated: snap.deprecated,
        summary: snap.summary.clone(),
        uid: snap.uid.clone(),
        external_docs: snap.external_docs.clone(),
        profile: snap.profile.clone(),
    }
}

/// Point the source at its companion and the companion at itself. A reused
/// companion that lacked a pageable extension gets one here.
fn wire_links(model: &mut CodeModel, source: OperationRef, next: OperationRef) {
    if let Some(op) = model.operation_mut(source) {
        if let Some(p) = &mut op.pageable {
            p.next_operation = Some(next);
        }
    }
    if let Some(op) = model.operation_mut(next) {
        let p = op.pageable.get_or_insert_with(Pageable::default);
        p.next_operation = Some(next);
        p.role = OperationRole::NextPage;
    }
}
