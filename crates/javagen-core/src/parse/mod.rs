use crate::error::ParseError;
use crate::model::{CodeModel, ObjectSchema, OperationGroup, ParameterLocation};

/// Parse a code-model document from YAML.
pub fn from_yaml(input: &str) -> Result<CodeModel, ParseError> {
    let mut model: CodeModel = serde_yaml_ng::from_str(input)?;
    finish(&mut model)?;
    Ok(model)
}

/// Parse a code-model document from JSON.
pub fn from_json(input: &str) -> Result<CodeModel, ParseError> {
    let mut model: CodeModel = serde_json::from_str(input)?;
    finish(&mut model)?;
    Ok(model)
}

fn finish(model: &mut CodeModel) -> Result<(), ParseError> {
    validate_names(model)?;
    assign_parameter_ids(model);
    Ok(())
}

/// Number every parameter in the model with a fresh identity handle.
///
/// A request-level entry that repeats an operation-level entry, meaning same
/// wire name and location (the document-level spelling of a YAML anchor),
/// receives the same id, so a parameter that ends up in a merged list twice
/// is recognized as one wire parameter.
pub fn assign_parameter_ids(model: &mut CodeModel) {
    let mut next = 1u32;
    for_each_group_mut(model, |group| {
        for op in &mut group.operations {
            for p in &mut op.parameters {
                p.id = next;
                next += 1;
            }
            let op_keys: Vec<(String, ParameterLocation, u32)> = op
                .parameters
                .iter()
                .map(|p| (p.wire_name().to_string(), p.location, p.id))
                .collect();
            for req in &mut op.requests {
                for p in &mut req.parameters {
                    let repeat = op_keys
                        .iter()
                        .find(|(n, l, _)| n == p.wire_name() && *l == p.location);
                    match repeat {
                        Some((_, _, id)) => p.id = *id,
                        None => {
                            p.id = next;
                            next += 1;
                        }
                    }
                }
            }
            if let Some(conv) = &mut op.convenience_api {
                for req in &mut conv.requests {
                    for p in &mut req.parameters {
                        p.id = next;
                        next += 1;
                    }
                }
            }
        }
    });
}

/// Whether any parameter in the model still carries the unassigned id `0`.
/// Models assembled in memory rather than parsed typically do.
pub fn has_unassigned_parameter_ids(model: &CodeModel) -> bool {
    let mut groups: Vec<&OperationGroup> = model.operation_groups.iter().collect();
    for client in &model.clients {
        groups.extend(client.operation_groups.iter());
    }
    for group in groups {
        for op in &group.operations {
            let request_params = op.requests.iter().flat_map(|r| r.parameters.iter());
            let conv_params = op
                .convenience_api
                .iter()
                .flat_map(|c| c.requests.iter())
                .flat_map(|r| r.parameters.iter());
            if op
                .parameters
                .iter()
                .chain(request_params)
                .chain(conv_params)
                .any(|p| p.id == 0)
            {
                return true;
            }
        }
    }
    false
}

/// The highest parameter id currently assigned anywhere in the model.
pub fn max_parameter_id(model: &CodeModel) -> u32 {
    let mut max = 0;
    let mut groups: Vec<&OperationGroup> = model.operation_groups.iter().collect();
    for client in &model.clients {
        groups.extend(client.operation_groups.iter());
    }
    for group in groups {
        for op in &group.operations {
            for p in &op.parameters {
                max = max.max(p.id);
            }
            for req in &op.requests {
                for p in &req.parameters {
                    max = max.max(p.id);
                }
            }
            if let Some(conv) = &op.convenience_api {
                for req in &conv.requests {
                    for p in &req.parameters {
                        max = max.max(p.id);
                    }
                }
            }
        }
    }
    max
}

/// Reject empty default names anywhere in the graph. The renamer assumes
/// wire-derived input; a missing name upstream is a malformed document, not
/// something the pipeline can patch.
pub fn validate_names(model: &CodeModel) -> Result<(), ParseError> {
    for obj in model.schemas.objects.iter().chain(model.schemas.groups.iter()) {
        validate_object(obj)?;
    }
    for choice in model
        .schemas
        .choices
        .iter()
        .chain(model.schemas.sealed_choices.iter())
    {
        require(&choice.language.default.name, "choice schema")?;
        for value in &choice.values {
            require(
                &value.language.default.name,
                &format!("value of choice '{}'", choice.language.default.name),
            )?;
        }
    }
    for dict in &model.schemas.dictionaries {
        require(&dict.language.default.name, "dictionary schema")?;
    }
    for or in &model.schemas.ors {
        require(&or.language.default.name, "union schema")?;
        for member in &or.members {
            validate_object(member)?;
        }
    }
    for and in &model.schemas.ands {
        require(&and.language.default.name, "and schema")?;
    }

    let mut groups: Vec<&OperationGroup> = model.operation_groups.iter().collect();
    for client in &model.clients {
        require(&client.language.default.name, "client")?;
        groups.extend(client.operation_groups.iter());
    }
    for group in groups {
        require(&group.language.default.name, "operation group")?;
        for op in &group.operations {
            let ctx = format!(
                "operation in group '{}'",
                group.language.default.name
            );
            require(&op.language.default.name, &ctx)?;
            let param_ctx = format!("parameter of operation '{}'", op.language.default.name);
            for p in &op.parameters {
                require(&p.language.default.name, &param_ctx)?;
            }
            for req in &op.requests {
                for p in &req.parameters {
                    require(&p.language.default.name, &param_ctx)?;
                }
            }
            if let Some(conv) = &op.convenience_api {
                require(&conv.language.default.name, &ctx)?;
            }
        }
    }
    Ok(())
}

fn validate_object(obj: &ObjectSchema) -> Result<(), ParseError> {
    require(&obj.language.default.name, "object schema")?;
    for prop in &obj.properties {
        require(
            &prop.language.default.name,
            &format!("property of schema '{}'", obj.language.default.name),
        )?;
    }
    if let Some(d) = &obj.discriminator {
        require(
            &d.property.language.default.name,
            &format!("discriminator of schema '{}'", obj.language.default.name),
        )?;
    }
    Ok(())
}

fn require(name: &str, context: &str) -> Result<(), ParseError> {
    if name.is_empty() {
        return Err(ParseError::EmptyDefaultName(context.to_string()));
    }
    Ok(())
}

fn for_each_group_mut(model: &mut CodeModel, mut f: impl FnMut(&mut OperationGroup)) {
    for group in &mut model.operation_groups {
        f(group);
    }
    for client in &mut model.clients {
        for group in &mut client.operation_groups {
            f(group);
        }
    }
}
