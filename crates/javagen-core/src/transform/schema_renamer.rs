use indexmap::IndexMap;
use log::info;

use crate::model::{CodeModel, Language, LanguageInfo};

/// Apply user-requested schema renames on top of the default renaming.
///
/// Matching is against the resolved target name; a hit overwrites it with
/// the replacement. Runs strictly last so overrides win over every other
/// pass. No-op for an empty map, and a total overwrite, so reapplying the
/// same map changes nothing.
pub(super) fn apply_renames(model: &mut CodeModel, renames: &IndexMap<String, String>) {
    if renames.is_empty() {
        return;
    }
    for obj in &mut model.schemas.objects {
        rename_schema(&mut obj.language, renames);
    }
    for choice in model
        .schemas
        .choices
        .iter_mut()
        .chain(model.schemas.sealed_choices.iter_mut())
    {
        rename_schema(&mut choice.language, renames);
    }
}

fn rename_schema(language: &mut Language, renames: &IndexMap<String, String>) {
    let current = language.resolved_name().to_string();
    let Some(replacement) = renames.get(&current) else {
        return;
    };
    info!("renaming schema '{current}' to '{replacement}'");
    match &mut language.target {
        Some(target) => target.name = replacement.clone(),
        None => {
            language.target = Some(LanguageInfo {
                name: replacement.clone(),
                serialized_name: language.default.serialized_name.clone(),
                description: language.default.description.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChoiceSchema, ObjectSchema};
    use crate::transform::renamer::{NameKind, rename};

    fn model_with_schemas() -> CodeModel {
        let mut model = CodeModel::default();
        let mut widget = ObjectSchema {
            language: Language::new("widget"),
            ..Default::default()
        };
        rename(&mut widget.language, NameKind::Type);
        model.schemas.objects.push(widget);

        let mut color = ChoiceSchema {
            language: Language::new("widget_color"),
            ..Default::default()
        };
        rename(&mut color.language, NameKind::Type);
        model.schemas.choices.push(color);
        model
    }

    #[test]
    fn overrides_resolved_names() {
        let mut model = model_with_schemas();
        let mut renames = IndexMap::new();
        renames.insert("Widget".to_string(), "WidgetResource".to_string());
        renames.insert("WidgetColor".to_string(), "Color".to_string());

        apply_renames(&mut model, &renames);

        assert_eq!(
            model.schemas.objects[0].language.resolved_name(),
            "WidgetResource"
        );
        assert_eq!(model.schemas.choices[0].language.resolved_name(), "Color");
        // Default names are untouched; references stay valid.
        assert_eq!(model.schemas.objects[0].language.default.name, "widget");
    }

    #[test]
    fn applying_twice_matches_applying_once() {
        let mut once = model_with_schemas();
        let mut twice = model_with_schemas();
        let mut renames = IndexMap::new();
        renames.insert("Widget".to_string(), "WidgetResource".to_string());

        apply_renames(&mut once, &renames);
        apply_renames(&mut twice, &renames);
        apply_renames(&mut twice, &renames);

        assert_eq!(
            once.schemas.objects[0].language.resolved_name(),
            twice.schemas.objects[0].language.resolved_name()
        );
    }

    #[test]
    fn empty_map_is_a_no_op() {
        let mut model = model_with_schemas();
        apply_renames(&mut model, &IndexMap::new());
        assert_eq!(model.schemas.objects[0].language.resolved_name(), "Widget");
    }
}
