use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

/// Which mechanism carries client-flatten requests through to the emitted
/// code. `Field` routes flattening through property marks, which is the only
/// target where the schema-level flatten pass runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientFlattenTarget {
    #[default]
    Type,
    Field,
    None,
}

/// Generator settings consulted mid-transform.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JavaSettings {
    /// Data-plane clients take the body as-is and never synthesize a
    /// Content-Length header parameter.
    pub data_plane_client: bool,

    pub client_flatten_annotation_target: ClientFlattenTarget,
}

/// Output document format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Top-level project configuration loaded from `.javagen.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JavagenConfig {
    pub input: String,
    pub output: Option<String>,
    pub format: OutputFormat,
    pub settings: JavaSettings,
    /// Map from resolved schema name to replacement, applied after every
    /// other pass. Keys are matched against post-rename names.
    pub renames: IndexMap<String, String>,
}

impl Default for JavagenConfig {
    fn default() -> Self {
        Self {
            input: "code-model.yaml".to_string(),
            output: None,
            format: OutputFormat::Yaml,
            settings: JavaSettings::default(),
            renames: IndexMap::new(),
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".javagen.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<JavagenConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: JavagenConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# javagen configuration
input: code-model.yaml
# output: code-model.normalized.yaml   # defaults to stdout
format: yaml            # yaml | json

settings:
  data_plane_client: false
  client_flatten_annotation_target: type   # type | field | none

# Last-mile schema renames, applied after every other pass.
# Keys match the resolved (post-rename) schema name.
renames: {}
  # Widget: WidgetResource
"#
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = JavagenConfig::default();
        assert_eq!(config.input, "code-model.yaml");
        assert_eq!(config.output, None);
        assert_eq!(config.format, OutputFormat::Yaml);
        assert!(!config.settings.data_plane_client);
        assert_eq!(
            config.settings.client_flatten_annotation_target,
            ClientFlattenTarget::Type
        );
        assert!(config.renames.is_empty());
    }

    #[test]
    fn test_parse_config_yaml() {
        let yaml = r#"
input: model.yaml
output: normalized.yaml
format: json
settings:
  data_plane_client: true
  client_flatten_annotation_target: field
renames:
  Widget: WidgetResource
  Gadget: GadgetResource
"#;
        let config: JavagenConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.input, "model.yaml");
        assert_eq!(config.output.as_deref(), Some("normalized.yaml"));
        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.settings.data_plane_client);
        assert_eq!(
            config.settings.client_flatten_annotation_target,
            ClientFlattenTarget::Field
        );
        assert_eq!(config.renames.len(), 2);
        assert_eq!(config.renames["Widget"], "WidgetResource");
    }

    #[test]
    fn test_parse_minimal_config() {
        let yaml = "input: api.yaml\n";
        let config: JavagenConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.input, "api.yaml");
        // Defaults applied
        assert_eq!(config.format, OutputFormat::Yaml);
        assert!(config.renames.is_empty());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        assert!(load_config(&path).unwrap().is_none());

        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "input: model.yaml").unwrap();
        drop(file);

        let config = load_config(&path).unwrap().expect("config should load");
        assert_eq!(config.input, "model.yaml");
    }
}
