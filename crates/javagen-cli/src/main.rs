use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use javagen_core::config::{self, CONFIG_FILE_NAME, JavagenConfig, OutputFormat};
use javagen_core::model::CodeModel;
use javagen_core::parse;
use javagen_core::transform::{self, TransformOptions};

#[derive(Parser)]
#[command(name = "javagen", about = "Code-model transformer for Java client generation", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a code-model document
    Transform {
        /// Path to the code-model document (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Where to write the normalized model (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a code-model document
    Validate {
        /// Path to the code-model document
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Inspect a parsed code-model document before transformation
    Inspect {
        /// Path to the code-model document
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: DumpFormat,
    },

    /// Initialize a new javagen configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum DumpFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Transform { input, output } => cmd_transform(input, output),

        Commands::Validate { input } => cmd_validate(&input),

        Commands::Inspect { input, format } => cmd_inspect(&input, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "javagen", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<JavagenConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

fn load_model(path: &Path) -> Result<CodeModel> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");

    let model = match ext {
        "json" => parse::from_json(&content)?,
        _ => parse::from_yaml(&content)?,
    };
    Ok(model)
}

fn cmd_transform(input: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();

    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.input));
    let mut model = load_model(&input)?;

    let options = TransformOptions {
        settings: cfg.settings.clone(),
        renames: cfg.renames.clone(),
    };
    transform::transform_with_options(&mut model, &options)?;

    let group_count = model.operation_groups.len()
        + model
            .clients
            .iter()
            .map(|c| c.operation_groups.len())
            .sum::<usize>();
    log::info!(
        "transformed {} schema(s) across {} operation group(s)",
        model.schemas.objects.len(),
        group_count
    );

    let rendered = match cfg.format {
        OutputFormat::Yaml => serde_yaml_ng::to_string(&model)?,
        OutputFormat::Json => serde_json::to_string_pretty(&model)? + "\n",
    };

    let output = output.or_else(|| cfg.output.as_ref().map(PathBuf::from));
    match output {
        Some(path) => {
            fs::write(&path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn cmd_validate(input: &Path) -> Result<()> {
    let model = load_model(input)?;
    println!(
        "OK: '{}' with {} object schema(s), {} operation group(s), {} client(s)",
        model.info.title,
        model.schemas.objects.len(),
        model.operation_groups.len(),
        model.clients.len()
    );
    Ok(())
}

fn cmd_inspect(input: &Path, format: DumpFormat) -> Result<()> {
    let model = load_model(input)?;
    let rendered = match format {
        DumpFormat::Yaml => serde_yaml_ng::to_string(&model)?,
        DumpFormat::Json => serde_json::to_string_pretty(&model)? + "\n",
    };
    print!("{rendered}");
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let path = PathBuf::from(CONFIG_FILE_NAME);
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    fs::write(&path, config::default_config_content())
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}
