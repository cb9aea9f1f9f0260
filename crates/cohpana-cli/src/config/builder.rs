use super::defaults::DefaultsConfig;
use super::file::{FileAnalysisConfig, FileConfig};
use super::models::AppConfig;
use crate::cli::AnalyzeArgs;
use crate::error::{CliError, Result};
use cohpana::engine::config::{AnalysisConfigBuilder, WhichBonds};
use cohpana::workflows::analyze::InputPaths;
use std::str::FromStr;
use tracing::debug;

pub fn build_config(args: &AnalyzeArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;
    let analysis_file = file_config.analysis.take().unwrap_or_default();

    let which_bonds = if args.all_bonds {
        WhichBonds::All
    } else {
        analysis_file.which_bonds.unwrap_or(defaults.which_bonds)
    };
    let cutoff_icohp = args
        .cutoff
        .or(analysis_file.cutoff_icohp)
        .unwrap_or(defaults.cutoff_icohp);
    let charge_model = args
        .charge_model
        .or(analysis_file.charge_model)
        .unwrap_or(defaults.charge_model);
    let summed_spins = if args.spin_resolved {
        false
    } else {
        analysis_file.summed_spins.unwrap_or(defaults.summed_spins)
    };
    let orbital_resolved = args.orbital_resolved
        || analysis_file
            .orbital_resolved
            .unwrap_or(defaults.orbital_resolved);

    let mut builder = AnalysisConfigBuilder::new()
        .which_bonds(which_bonds)
        .cutoff_icohp(cutoff_icohp)
        .charge_model(charge_model)
        .summed_spins(summed_spins)
        .orbital_resolved(orbital_resolved);
    if let Some(start) = args.start.or(analysis_file.integration_start) {
        builder = builder.integration_start(start);
    }
    let analysis = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;
    debug!(?analysis, "Merged analysis configuration.");

    let inputs = InputPaths {
        poscar: args.inputs.poscar.clone(),
        icohplist: args.inputs.icohplist.clone(),
        cohpcar: args.inputs.cohpcar.clone(),
        charge: args.inputs.charge.clone(),
        madelung: args.inputs.madelung.clone(),
        kind: args.kind.or(analysis_file.curve_kind),
    };

    Ok(AppConfig {
        inputs,
        json_output: args.json.clone(),
        analysis,
    })
}

fn parse_value<T: FromStr>(key: &str, value: &str, what: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", what, key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let analysis: &mut FileAnalysisConfig = config.analysis.get_or_insert_with(Default::default);

        match key.trim() {
            "analysis.which-bonds" => {
                analysis.which_bonds = Some(parse_value(key, value_str, "which-bonds")?);
            }
            "analysis.cutoff-icohp" => {
                analysis.cutoff_icohp = Some(parse_value(key, value_str, "float")?);
            }
            "analysis.charge-model" => {
                analysis.charge_model = Some(parse_value(key, value_str, "charge model")?);
            }
            "analysis.summed-spins" => {
                analysis.summed_spins = Some(parse_value(key, value_str, "boolean")?);
            }
            "analysis.orbital-resolved" => {
                analysis.orbital_resolved = Some(parse_value(key, value_str, "boolean")?);
            }
            "analysis.integration-start" => {
                analysis.integration_start = Some(parse_value(key, value_str, "float")?);
            }
            "analysis.curve-kind" => {
                analysis.curve_kind = Some(parse_value(key, value_str, "curve kind")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use cohpana::core::models::charges::ChargeModel;
    use cohpana::core::models::curve::CurveKind;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    fn analyze_args(extra: &[&str]) -> AnalyzeArgs {
        let mut argv = vec!["cohpana", "analyze"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Analyze(args) => args,
            _ => panic!("Expected 'analyze' subcommand"),
        }
    }

    fn write_config_file(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("cohpana.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn defaults_apply_without_file_or_flags() {
        let config = build_config(&analyze_args(&[])).unwrap();
        assert_eq!(config.analysis.selection.which_bonds, WhichBonds::CationAnion);
        assert_eq!(config.analysis.selection.cutoff_icohp, 0.1);
        assert!(config.analysis.classification.summed_spins);
        assert!(!config.analysis.classification.orbital_resolved);
        assert_eq!(config.analysis.classification.integration_start, None);
        assert_eq!(config.inputs.cohpcar, PathBuf::from("COHPCAR.lobster"));
        assert_eq!(config.inputs.kind, None);
        assert!(config.json_output.is_none());
    }

    #[test]
    fn file_values_fill_unset_flags() {
        let dir = tempdir().unwrap();
        let path = write_config_file(
            dir.path(),
            r#"
            [analysis]
            which-bonds = "all"
            cutoff-icohp = 0.2
            charge-model = "loewdin"
            summed-spins = false
            integration-start = -8.0
            curve-kind = "coop"
            "#,
        );
        let config = build_config(&analyze_args(&["-c", path.to_str().unwrap()])).unwrap();

        assert_eq!(config.analysis.selection.which_bonds, WhichBonds::All);
        assert_eq!(config.analysis.selection.cutoff_icohp, 0.2);
        assert_eq!(config.analysis.selection.charge_model, ChargeModel::Loewdin);
        assert!(!config.analysis.classification.summed_spins);
        assert_eq!(config.analysis.classification.integration_start, Some(-8.0));
        assert_eq!(config.inputs.kind, Some(CurveKind::Coop));
    }

    #[test]
    fn cli_args_override_file_and_set_values() {
        let dir = tempdir().unwrap();
        let path = write_config_file(dir.path(), "[analysis]\ncutoff-icohp = 0.2\n");
        let args = analyze_args(&[
            "-c",
            path.to_str().unwrap(),
            "--cutoff",
            "0.3",
            "--kind",
            "cobi",
            "-S",
            "analysis.curve-kind=coop",
            "-S",
            "analysis.orbital-resolved=true",
        ]);
        let config = build_config(&args).unwrap();

        assert_eq!(config.analysis.selection.cutoff_icohp, 0.3);
        assert_eq!(config.inputs.kind, Some(CurveKind::Cobi));
        assert!(config.analysis.classification.orbital_resolved);
    }

    #[test]
    fn set_value_overrides_file() {
        let dir = tempdir().unwrap();
        let path = write_config_file(dir.path(), "[analysis]\ncutoff-icohp = 0.2\n");
        let args = analyze_args(&["-c", path.to_str().unwrap(), "-S", "analysis.cutoff-icohp=0.05"]);
        let config = build_config(&args).unwrap();
        assert_eq!(config.analysis.selection.cutoff_icohp, 0.05);
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = write_config_file(dir.path(), "[analysis]\ncutof-icohp = 0.2\n");
        let result = build_config(&analyze_args(&["-c", path.to_str().unwrap()]));
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn invalid_set_values_are_rejected() {
        for set in ["analysis.cutoff-icohp", "analysis.unknown=1", "analysis.summed-spins=maybe"] {
            let result = build_config(&analyze_args(&["-S", set]));
            assert!(matches!(result, Err(CliError::Config(_))), "{set}");
        }
    }

    #[test]
    fn out_of_range_cutoff_fails_validation() {
        let result = build_config(&analyze_args(&["--cutoff", "1.5"]));
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
