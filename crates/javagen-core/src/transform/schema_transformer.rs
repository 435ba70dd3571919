use log::warn;

use crate::model::{CodeModel, ObjectSchema, SchemaType, SchemaUsage, Schemas};

use super::renamer::{NameKind, rename};

/// Fold parameter-group schemas into the object collection and rename every
/// schema in the model.
///
/// Groups are synthetic schemas bundling optional parameters; after folding
/// they are treated uniformly as objects carrying the options-group usage
/// tag. Union members are renamed here too since they are only reachable
/// through their union.
pub(super) fn transform_schemas(schemas: &mut Schemas) {
    let groups = std::mem::take(&mut schemas.groups);
    for mut group in groups {
        if !group.usage.contains(&SchemaUsage::OptionsGroup) {
            group.usage.push(SchemaUsage::OptionsGroup);
        }
        schemas.objects.push(group);
    }

    for obj in &mut schemas.objects {
        rename_object(obj);
    }
    for and in &mut schemas.ands {
        rename(&mut and.language, NameKind::Type);
    }
    for choice in schemas
        .choices
        .iter_mut()
        .chain(schemas.sealed_choices.iter_mut())
    {
        rename(&mut choice.language, NameKind::Type);
    }
    for dict in &mut schemas.dictionaries {
        rename(&mut dict.language, NameKind::Type);
    }
    for or in &mut schemas.ors {
        rename(&mut or.language, NameKind::Type);
        for member in &mut or.members {
            rename_object(member);
        }
    }
}

fn rename_object(obj: &mut ObjectSchema) {
    rename(&mut obj.language, NameKind::Type);
    for prop in &mut obj.properties {
        rename(&mut prop.language, NameKind::Property);
    }
    if let Some(d) = &mut obj.discriminator {
        rename(&mut d.property.language, NameKind::Property);
    }
}

/// Mark schemas referenced by flatten-flagged properties as flattened.
///
/// Flattening a polymorphic schema would hide the discriminator needed for
/// deserialization dispatch, so those properties have their flag cleared and
/// a warning logged instead.
pub(super) fn mark_flattened_schemas(model: &mut CodeModel) {
    let mut to_flatten: Vec<String> = Vec::new();
    let mut to_demote: Vec<(usize, usize)> = Vec::new();

    for (i, obj) in model.schemas.objects.iter().enumerate() {
        for (j, prop) in obj.properties.iter().enumerate() {
            if !prop.flatten {
                continue;
            }
            let SchemaType::Object(nested_name) = &prop.schema else {
                continue;
            };
            let Some(nested) = model.schemas.find_object(nested_name) else {
                continue;
            };
            if nested.is_polymorphic() {
                warn!(
                    "schema '{}' is polymorphic and cannot be flattened into '{}'",
                    nested.language.resolved_name(),
                    obj.language.resolved_name()
                );
                to_demote.push((i, j));
            } else {
                to_flatten.push(nested_name.clone());
            }
        }
    }

    for (i, j) in to_demote {
        model.schemas.objects[i].properties[j].flatten = false;
    }
    for name in to_flatten {
        if let Some(obj) = model.schemas.find_object_mut(&name) {
            obj.flattened = true;
        }
    }
}
