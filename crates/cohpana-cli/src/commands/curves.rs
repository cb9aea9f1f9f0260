use crate::cli::{Broadening, CurvesArgs};
use crate::error::{CliError, Result};
use crate::utils::parser::expand_bond_labels;
use cohpana::core::broadening::{gaussian_broaden, sigma_from_fwhm};
use cohpana::core::io::cohpcar::CohpcarFile;
use cohpana::core::io::traits::LobsterFile;
use cohpana::core::models::curve::{BondCurve, CurveStore, sum_curves};
use cohpana::engine::error::AnalysisError;
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::{debug, info};

fn sigma(broadening: Broadening) -> Option<f64> {
    broadening
        .sigma
        .or_else(|| broadening.fwhm.map(sigma_from_fwhm))
}

/// Looks up the requested curves, orbital-resolved when `orbital` is set.
fn select_curves<'a>(
    store: &'a CurveStore,
    labels: &[String],
    orbital: Option<&str>,
) -> Result<Vec<&'a BondCurve>> {
    labels
        .iter()
        .map(|label| {
            let curve = match orbital {
                Some(tag) => store.orbitals(label).and_then(|o| o.get(tag)),
                None => store.get(label),
            };
            curve.ok_or_else(|| {
                let what = orbital.map_or(String::new(), |t| format!(" (orbital {t})"));
                CliError::Argument(format!("No curve for bond '{label}'{what}"))
            })
        })
        .collect()
}

/// One output column: header and values on the shared energy grid.
fn columns(curves: &[BondCurve], integrated: bool, sigma: Option<f64>) -> Result<Vec<(String, Vec<f64>)>> {
    let mut out = Vec::new();
    for curve in curves {
        let series = if integrated {
            curve.integrated()
        } else {
            curve.populations()
        };
        for spin in series.spins() {
            let Some(values) = series.get(spin) else {
                continue;
            };
            let values = match sigma {
                Some(s) => gaussian_broaden(curve.energies(), values, s)?,
                None => values.to_vec(),
            };
            out.push((format!("{}_{}", curve.label(), spin), values));
        }
    }
    Ok(out)
}

/// Writes the table with energies relative to the Fermi level.
fn write_table<W: Write>(energies: &[f64], columns: &[(String, Vec<f64>)], writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    let mut header = vec!["energy".to_string()];
    header.extend(columns.iter().map(|(name, _)| name.clone()));
    writer.write_record(&header)?;
    for (i, e) in energies.iter().enumerate() {
        let mut record = vec![e.to_string()];
        record.extend(columns.iter().map(|(_, values)| values[i].to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn run(args: CurvesArgs) -> Result<()> {
    let labels = expand_bond_labels(&args.labels).map_err(|e| CliError::Argument(e.to_string()))?;
    let store = CohpcarFile::read_from_path(&args.cohpcar)?;
    info!(
        kind = %store.kind(),
        requested = labels.len(),
        "Exporting curves from {:?}",
        &args.cohpcar
    );

    let selected = select_curves(&store, &labels, args.orbital.as_deref())?;
    let curves: Vec<BondCurve> = if args.summed {
        vec![sum_curves(&selected).map_err(AnalysisError::Curve)?]
    } else {
        selected.into_iter().cloned().collect()
    };
    let Some(first) = curves.first() else {
        return Err(CliError::Argument("No bond labels given".to_string()));
    };
    let energies: Vec<f64> = first.energies().iter().map(|e| e - first.efermi()).collect();

    let sigma = sigma(args.broadening);
    if let Some(s) = sigma {
        debug!(sigma = s, "Applying Gaussian broadening.");
    }
    let columns = columns(&curves, args.integrated, sigma)?;

    match &args.output {
        Some(path) => {
            write_table(&energies, &columns, BufWriter::new(File::create(path)?))?;
            println!("{} column(s) written to: {}", columns.len(), path.display());
        }
        None => write_table(&energies, &columns, std::io::stdout().lock())?,
    }
    Ok(())
}
