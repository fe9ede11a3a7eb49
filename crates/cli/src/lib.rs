pub mod scenario;
mod view;

use anyhow::Context;
use clap::{Parser, Subcommand};
use restbind_core::AssemblyConfig;
use restbind_core::classify::Classifier;
use restbind_core::logging;
use scenario::Scenario;
use std::path::{Path, PathBuf};
use tabled::Table;
use tracing::info;
use view::{ClassificationRow, OutcomeView, RegistrationRow};

#[derive(Parser)]
#[command(
    name = "restbind",
    version,
    about = "Binds REST resources and providers to the applications that own them",
    long_about = "Restbind runs the startup assembly pass offline: it classifies scanned types, \
                  resolves which declared application owns each resource and provider, and \
                  groups whatever is left into synthetic applications by qualifier."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the assembly pass over a scenario file
    #[command(
        long_about = "Feeds the scenario's types and beans through a fresh assembly pass and \
                            prints the registrations it would submit to the container."
    )]
    Assemble {
        /// Path to the scenario JSON file
        #[arg(value_name = "SCENARIO")]
        path: PathBuf,
        /// Pass configuration JSON, replacing the scenario's own
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
        /// Also write logs to daily files, in DIR or ~/.restbind/logs
        #[arg(long, value_name = "DIR", num_args = 0..=1)]
        log_dir: Option<Option<PathBuf>>,
    },
    /// Show how each type of a scenario is classified
    Classify {
        /// Path to the scenario JSON file
        #[arg(value_name = "SCENARIO")]
        path: PathBuf,
        /// Pass configuration JSON, replacing the scenario's own
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// Print the JSON schema of scenario files
    Schema,
}

impl Commands {
    /// Log file prefix for the subcommand.
    pub fn component(&self) -> &'static str {
        match self {
            Commands::Assemble { .. } => "assemble",
            Commands::Classify { .. } => "classify",
            Commands::Schema => "schema",
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_dir = match &cli.command {
        Commands::Assemble {
            log_dir: Some(dir), ..
        } => Some(dir.clone().unwrap_or_else(logging::default_log_dir)),
        _ => None,
    };
    let _guard = logging::init_logging(cli.command.component(), log_dir);

    match cli.command {
        Commands::Assemble {
            path, config, json, ..
        } => assemble(load(&path, config.as_deref())?, &path, json),
        Commands::Classify { path, config } => classify(load(&path, config.as_deref())?),
        Commands::Schema => {
            let schema = schemars::schema_for!(Scenario);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
    }
}

fn load(path: &Path, config: Option<&Path>) -> anyhow::Result<Scenario> {
    let mut scenario = Scenario::load(path)?;
    if let Some(config) = config {
        scenario.config = AssemblyConfig::from_path(config)
            .with_context(|| format!("invalid config {}", config.display()))?;
    }
    Ok(scenario)
}

fn assemble(scenario: Scenario, path: &Path, json: bool) -> anyhow::Result<()> {
    info!("Assembling scenario {}...", path.display());

    let host = scenario.host();
    let outcome = scenario.run(&host)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&OutcomeView::from(&outcome))?
        );
        return Ok(());
    }

    if outcome.registrations.is_empty() {
        println!("No registrations.");
    } else {
        let rows: Vec<RegistrationRow> = outcome.registrations.iter().map(Into::into).collect();
        println!("{}", Table::new(rows));
    }
    for provider in &outcome.orphan_providers {
        println!("Orphan provider {}: no application owns it", provider);
    }
    for (class, role) in &outcome.discarded {
        println!("Discarded {} {}: no bean was built for it", role, class);
    }
    Ok(())
}

fn classify(scenario: Scenario) -> anyhow::Result<()> {
    let host = scenario.host();
    let classifier = Classifier::new(&scenario.config.markers);

    let rows: Vec<ClassificationRow> = scenario
        .types
        .iter()
        .map(|ty| {
            let classification = classifier.classify(ty);
            ClassificationRow {
                name: ty.name.to_string(),
                resource: classification.resource,
                provider: classification.provider,
                general_resource: classifier.is_general_resource_class(ty, &host),
            }
        })
        .collect();

    if rows.is_empty() {
        println!("No types in scenario.");
    } else {
        println!("{}", Table::new(rows));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_dir_flag_is_optional_valued() {
        let cli = Cli::try_parse_from(["restbind", "assemble", "s.json", "--log-dir"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Assemble { log_dir: Some(None), json: false, .. }
        ));

        let cli =
            Cli::try_parse_from(["restbind", "assemble", "s.json", "--json", "--log-dir", "/tmp/l"])
                .unwrap();
        match cli.command {
            Commands::Assemble { log_dir, json, .. } => {
                assert!(json);
                assert_eq!(log_dir, Some(Some(PathBuf::from("/tmp/l"))));
            }
            _ => panic!("expected assemble"),
        }
    }

    #[test]
    fn test_log_component_follows_subcommand() {
        let component = |args: &[&str]| Cli::try_parse_from(args).unwrap().command.component();
        assert_eq!(component(&["restbind", "assemble", "s.json"]), "assemble");
        assert_eq!(component(&["restbind", "classify", "s.json"]), "classify");
        assert_eq!(component(&["restbind", "schema"]), "schema");
    }

    #[test]
    fn test_config_file_replaces_scenario_config() {
        use std::io::Write;

        let mut scenario = tempfile::NamedTempFile::new().unwrap();
        scenario
            .write_all(br#"{ "config": { "orphan_providers": "fail" } }"#)
            .unwrap();
        let mut config = tempfile::NamedTempFile::new().unwrap();
        config
            .write_all(br#"{ "orphan_providers": "default-group" }"#)
            .unwrap();

        let loaded = load(scenario.path(), None).unwrap();
        assert_eq!(
            loaded.config.orphan_providers,
            restbind_core::OrphanProviderPolicy::Fail
        );

        let loaded = load(scenario.path(), Some(config.path())).unwrap();
        assert_eq!(
            loaded.config.orphan_providers,
            restbind_core::OrphanProviderPolicy::DefaultGroup
        );

        let missing = scenario.path().with_extension("missing");
        let err = load(scenario.path(), Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("invalid config"));
    }
}
