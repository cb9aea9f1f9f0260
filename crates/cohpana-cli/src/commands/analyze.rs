use crate::cli::AnalyzeArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use cohpana::core::geometry::GeometricClassifier;
use cohpana::engine::progress::ProgressReporter;
use cohpana::workflows::analyze::{self, AnalysisInputs};
use std::io::Write;
use tracing::{info, warn};

pub fn run(args: AnalyzeArgs, show_progress: bool) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let config = build_config(&args)?;

    info!("Loading inputs, bond list from {:?}", &config.inputs.icohplist);
    let inputs = AnalysisInputs::load(&config.inputs)?;

    let progress_handler = if show_progress {
        CliProgressHandler::new()
    } else {
        CliProgressHandler::hidden()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let analysis = analyze::run(
        &inputs,
        &config.analysis,
        &GeometricClassifier::default(),
        &reporter,
    )?;
    for warning in &analysis.warnings {
        warn!(?warning, "Analysis completed with a warning.");
    }

    let json = analysis
        .to_json_pretty()
        .map_err(|e| CliError::Other(e.into()))?;
    match &config.json_output {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))?;
            println!(
                "Condensed analysis of {} ({} site(s)) written to: {}",
                analysis.formula,
                analysis.sites.0.len(),
                path.display()
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::commands::test_inputs;
    use clap::Parser;
    use cohpana::engine::result::CondensedAnalysis;
    use tempfile::tempdir;

    fn analyze_args(argv: Vec<String>) -> AnalyzeArgs {
        match Cli::parse_from(argv).command {
            Commands::Analyze(args) => args,
            _ => panic!("Expected 'analyze' subcommand"),
        }
    }

    #[test]
    fn writes_condensed_analysis_json() {
        let dir = tempdir().unwrap();
        let files = test_inputs::write(dir.path());
        let out = dir.path().join("analysis.json");

        let mut argv: Vec<String> = vec!["cohpana".into(), "analyze".into()];
        argv.extend(files.analyze_flags());
        argv.extend(["--json".into(), out.display().to_string()]);
        run(analyze_args(argv), false).unwrap();

        let analysis: CondensedAnalysis =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(analysis.formula, "Na");
        assert!(!analysis.charges_available);
        let na = analysis.site("Na1").unwrap();
        assert_eq!(na.coordination_environment.code(), "L:2");
        assert_eq!(na.relevant_bonds[0].number_of_bonds, 2);
    }

    #[test]
    fn missing_input_file_is_reported() {
        let dir = tempdir().unwrap();
        let files = test_inputs::write(dir.path());
        std::fs::remove_file(&files.cohpcar).unwrap();

        let mut argv: Vec<String> = vec!["cohpana".into(), "analyze".into()];
        argv.extend(files.analyze_flags());
        let result = run(analyze_args(argv), false);
        assert!(matches!(result, Err(CliError::Analysis(_))));
    }
}
