use heck::{ToLowerCamelCase, ToPascalCase};

use crate::model::{Language, LanguageInfo};

/// What kind of identifier a `Language` record names, selecting the casing
/// rule for the emitted Java identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Type,
    Property,
    Variable,
    MethodGroup,
    Method,
    Client,
}

/// Fill `language.target` from the wire-derived default name, carrying the
/// serialized name and description over unchanged.
///
/// The casing rules assume wire-derived input: re-running on the same default
/// name yields the same result, but callers must never feed a target name
/// back in as the default.
pub fn rename(language: &mut Language, kind: NameKind) {
    language.target = Some(LanguageInfo {
        name: cased(&language.default.name, kind),
        serialized_name: language.default.serialized_name.clone(),
        description: language.default.description.clone(),
    });
}

/// Apply the casing rule for `kind` to a raw name.
pub fn cased(name: &str, kind: NameKind) -> String {
    let sanitized = sanitize_identifier(name);
    let converted = match kind {
        NameKind::Type | NameKind::MethodGroup | NameKind::Client => sanitized.to_pascal_case(),
        NameKind::Property | NameKind::Variable | NameKind::Method => {
            sanitized.to_lower_camel_case()
        }
    };
    // Case conversion strips a leading underscore, so the digit guard runs
    // on the converted result.
    if converted.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{converted}")
    } else {
        converted
    }
}

/// Sanitize a string to be a valid identifier.
fn sanitize_identifier(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut prev_was_separator = false;

    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if prev_was_separator && !result.is_empty() {
                result.push('_');
            }
            result.push(ch);
            prev_was_separator = false;
        } else {
            prev_was_separator = true;
        }
    }

    if result.is_empty() {
        return "unnamed".to_string();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_casing() {
        assert_eq!(cased("widget_list", NameKind::Type), "WidgetList");
        assert_eq!(cased("widgetList", NameKind::Type), "WidgetList");
        assert_eq!(cased("widget-list", NameKind::Type), "WidgetList");
    }

    #[test]
    fn test_member_casing() {
        assert_eq!(cased("widget_id", NameKind::Property), "widgetId");
        assert_eq!(cased("WidgetId", NameKind::Variable), "widgetId");
        assert_eq!(cased("list_all", NameKind::Method), "listAll");
    }

    #[test]
    fn test_group_and_client_casing() {
        assert_eq!(cased("widgets", NameKind::MethodGroup), "Widgets");
        assert_eq!(cased("widget service", NameKind::Client), "WidgetService");
    }

    #[test]
    fn test_special_chars() {
        assert_eq!(cased("$filter", NameKind::Variable), "filter");
        assert_eq!(cased("x-ms-client-id", NameKind::Variable), "xMsClientId");
    }

    #[test]
    fn test_leading_digit_keeps_prefix() {
        assert_eq!(cased("3d_model", NameKind::Type), "_3dModel");
        assert_eq!(cased("3d", NameKind::Variable), "_3d");
        assert_eq!(cased("404_response", NameKind::Type), "_404Response");
    }

    #[test]
    fn test_rename_carries_metadata() {
        let mut lang = Language::new("widget_id");
        lang.default.serialized_name = Some("widget_id".to_string());
        lang.default.description = Some("The widget's id.".to_string());

        rename(&mut lang, NameKind::Property);

        let target = lang.target.as_ref().unwrap();
        assert_eq!(target.name, "widgetId");
        assert_eq!(target.serialized_name.as_deref(), Some("widget_id"));
        assert_eq!(target.description.as_deref(), Some("The widget's id."));
    }

    #[test]
    fn test_rename_same_input_same_output() {
        let mut lang = Language::new("list_widgets");
        rename(&mut lang, NameKind::Method);
        let first = lang.target.clone();
        rename(&mut lang, NameKind::Method);
        assert_eq!(lang.target, first);
    }
}
