use clap::{Args, Parser, Subcommand};
use cohpana::core::models::charges::ChargeModel;
use cohpana::core::models::curve::CurveKind;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "cohpana - automatic bonding analysis of LOBSTER COHP, COBI and COOP outputs.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for batch featurization.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Select relevant bonds and write the condensed bonding analysis as JSON.
    Analyze(AnalyzeArgs),
    /// Turn condensed analyses into one CSV row of bonding features each.
    Featurize(FeaturizeArgs),
    /// Export (optionally summed and broadened) population curves as CSV.
    Curves(CurvesArgs),
}

/// Locations of the LOBSTER and VASP files of one calculation.
#[derive(Args, Debug, Clone)]
pub struct InputFiles {
    /// Structure file in POSCAR/CONTCAR format.
    #[arg(long, value_name = "PATH", default_value = "POSCAR")]
    pub poscar: PathBuf,

    /// Bond list with integrated values (ICOHPLIST, ICOBILIST or ICOOPLIST).
    #[arg(long, value_name = "PATH", default_value = "ICOHPLIST.lobster")]
    pub icohplist: PathBuf,

    /// Energy-resolved curves (COHPCAR, COBICAR or COOPCAR).
    #[arg(long, value_name = "PATH", default_value = "COHPCAR.lobster")]
    pub cohpcar: PathBuf,

    /// Mulliken and Loewdin charges. Without it every pair is eligible.
    #[arg(long, value_name = "PATH")]
    pub charge: Option<PathBuf>,

    /// Madelung energies to report alongside the analysis.
    #[arg(long, value_name = "PATH")]
    pub madelung: Option<PathBuf>,
}

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub inputs: InputFiles,

    /// Path to an analysis configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Path for the JSON output. Printed to stdout when omitted.
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    // --- Analysis Overrides ---
    /// Consider all pairs instead of cation-anion pairs only.
    #[arg(long)]
    pub all_bonds: bool,

    /// Override the relative ICOHP cutoff (fraction of the strongest bond of a site).
    #[arg(long, value_name = "FLOAT")]
    pub cutoff: Option<f64>,

    /// Report bonding and antibonding contributions per spin channel.
    #[arg(long)]
    pub spin_resolved: bool,

    /// Add orbital-resolved contributions to each bond group.
    #[arg(long)]
    pub orbital_resolved: bool,

    /// Charge model used to tell cations from anions.
    #[arg(long, value_name = "MODEL")]
    pub charge_model: Option<ChargeModel>,

    /// Lower integration bound in eV relative to the Fermi level.
    #[arg(long, value_name = "EV", allow_hyphen_values = true)]
    pub start: Option<f64>,

    /// Force the population kind instead of reading it from the bond list.
    #[arg(long, value_name = "KIND")]
    pub kind: Option<CurveKind>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S analysis.cutoff-icohp=0.05
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `featurize` subcommand.
#[derive(Args, Debug)]
pub struct FeaturizeArgs {
    /// Condensed analysis JSON files written by `analyze`.
    #[arg(required = true, value_name = "JSON")]
    pub inputs: Vec<PathBuf>,

    /// Path for the CSV output. Printed to stdout when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `curves` subcommand.
#[derive(Args, Debug)]
pub struct CurvesArgs {
    /// Bond labels to export, as numbered in the curve file (e.g. 1 2 3).
    #[arg(required = true, value_name = "LABEL")]
    pub labels: Vec<String>,

    /// Curve file (COHPCAR, COBICAR or COOPCAR).
    #[arg(long, value_name = "PATH", default_value = "COHPCAR.lobster")]
    pub cohpcar: PathBuf,

    /// Export one curve summed over all labels.
    #[arg(long)]
    pub summed: bool,

    /// Export the orbital-resolved curve with this tag (e.g. 3s-3p_x).
    #[arg(long, value_name = "TAG")]
    pub orbital: Option<String>,

    #[command(flatten)]
    pub broadening: Broadening,

    /// Export integrated values instead of populations.
    #[arg(long)]
    pub integrated: bool,

    /// Path for the CSV output. Printed to stdout when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Mutually exclusive ways of giving the Gaussian broadening width.
#[derive(Args, Debug, Clone, Copy)]
#[group(required = false, multiple = false)]
pub struct Broadening {
    /// Gaussian standard deviation in eV.
    #[arg(long, value_name = "EV")]
    pub sigma: Option<f64>,
    /// Gaussian full width at half maximum in eV.
    #[arg(long, value_name = "EV")]
    pub fwhm: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_parses_overrides() {
        let cli = Cli::parse_from([
            "cohpana",
            "-vv",
            "analyze",
            "--charge",
            "CHARGE.lobster",
            "--all-bonds",
            "--cutoff",
            "0.05",
            "--start",
            "-5.0",
            "--kind",
            "cobi",
            "--charge-model",
            "loewdin",
            "-S",
            "analysis.orbital-resolved=true",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Analyze(args) = cli.command else {
            panic!("Expected 'analyze' subcommand");
        };
        assert_eq!(args.inputs.poscar, PathBuf::from("POSCAR"));
        assert_eq!(args.inputs.charge, Some(PathBuf::from("CHARGE.lobster")));
        assert!(args.all_bonds);
        assert_eq!(args.cutoff, Some(0.05));
        assert_eq!(args.start, Some(-5.0));
        assert_eq!(args.kind, Some(CurveKind::Cobi));
        assert_eq!(args.charge_model, Some(ChargeModel::Loewdin));
        assert_eq!(args.set_values, vec!["analysis.orbital-resolved=true"]);
    }

    #[test]
    fn sigma_and_fwhm_are_exclusive() {
        let result = Cli::try_parse_from([
            "cohpana", "curves", "1", "--sigma", "0.1", "--fwhm", "0.2",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn featurize_requires_inputs() {
        assert!(Cli::try_parse_from(["cohpana", "featurize"]).is_err());
        let cli = Cli::parse_from(["cohpana", "featurize", "a.json", "b.json", "-o", "out.csv"]);
        let Commands::Featurize(args) = cli.command else {
            panic!("Expected 'featurize' subcommand");
        };
        assert_eq!(args.inputs.len(), 2);
        assert_eq!(args.output, Some(PathBuf::from("out.csv")));
    }
}
