use crate::cli::FeaturizeArgs;
use crate::error::{CliError, Result};
use crate::utils::parser::compound_id;
use cohpana::engine::result::CondensedAnalysis;
use cohpana::workflows::featurize::{FeatureRow, featurize, write_csv};
use rayon::prelude::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, info};

fn featurize_file(path: &Path) -> Result<FeatureRow> {
    let file = File::open(path).map_err(|e| CliError::file(path, e))?;
    let analysis: CondensedAnalysis =
        serde_json::from_reader(std::io::BufReader::new(file)).map_err(|e| CliError::file(path, e))?;
    let id = compound_id(path);
    debug!(compound = %id, "Featurizing {:?}", path);
    Ok(featurize(&id, &analysis)?)
}

pub fn run(args: FeaturizeArgs) -> Result<()> {
    info!("Featurizing {} condensed analysis file(s)...", args.inputs.len());
    let rows = args
        .inputs
        .par_iter()
        .map(|path| featurize_file(path))
        .collect::<Result<Vec<_>>>()?;

    match &args.output {
        Some(path) => {
            write_csv(&rows, BufWriter::new(File::create(path)?))?;
            println!("{} feature row(s) written to: {}", rows.len(), path.display());
        }
        None => write_csv(&rows, std::io::stdout().lock())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::commands::{analyze, test_inputs};
    use clap::Parser;
    use tempfile::tempdir;

    fn parse(argv: Vec<String>) -> Commands {
        Cli::parse_from(argv).command
    }

    fn analysis_json(dir: &Path, name: &str) -> String {
        let files = test_inputs::write(dir);
        let out = dir.join(name);
        let mut argv: Vec<String> = vec!["cohpana".into(), "analyze".into()];
        argv.extend(files.analyze_flags());
        argv.extend(["--json".into(), out.display().to_string()]);
        let Commands::Analyze(args) = parse(argv) else {
            panic!("Expected 'analyze' subcommand");
        };
        analyze::run(args, false).unwrap();
        out.display().to_string()
    }

    #[test]
    fn writes_one_row_per_input_in_order() {
        let dir = tempdir().unwrap();
        let first = analysis_json(dir.path(), "first.json");
        let second = analysis_json(dir.path(), "second.json");
        let csv_path = dir.path().join("features.csv");

        let Commands::Featurize(args) = parse(vec![
            "cohpana".into(),
            "featurize".into(),
            first,
            second,
            "-o".into(),
            csv_path.display().to_string(),
        ]) else {
            panic!("Expected 'featurize' subcommand");
        };
        run(args).unwrap();

        let text = std::fs::read_to_string(&csv_path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("compound,Icohp_mean_avg"));
        assert!(lines[1].starts_with("first,"));
        assert!(lines[2].starts_with("second,"));
    }

    #[test]
    fn invalid_json_names_the_file() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        let err = featurize_file(&bad).unwrap_err();
        assert!(matches!(err, CliError::FileParsing { ref path, .. } if path == &bad));
    }
}
