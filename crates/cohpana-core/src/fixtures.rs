//! Synthetic LOBSTER outputs for rock-salt NaCl and fluorite CdF2, parsed
//! through the regular readers.

use crate::core::io::charge::ChargeFile;
use crate::core::io::cohpcar::CohpcarFile;
use crate::core::io::icohplist::IcohpListFile;
use crate::core::io::madelung::MadelungFile;
use crate::core::io::poscar::PoscarFile;
use crate::core::io::traits::LobsterFile;
use crate::workflows::analyze::AnalysisInputs;
use std::fmt::Write;
use std::io::Cursor;

pub type Inputs = AnalysisInputs;

pub const EFERMI: f64 = 2.0;
const N_POINTS: usize = 151;

/// Relative energy of grid point `i`: -10 eV to 5 eV in 0.1 eV steps.
fn energy(i: usize) -> f64 {
    (i as f64 - 100.0) / 10.0
}

/// Bonding well below -3 eV, weak antibonding up to the Fermi level.
fn base_population(e: f64) -> f64 {
    if e < -3.0 {
        -0.08
    } else if e < 0.0 {
        0.02
    } else {
        0.05
    }
}

fn cumulative(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut acc = 0.0;
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            acc += 0.5 * (values[i - 1] + v) * 0.1;
        }
        out.push(acc);
    }
    out
}

/// Writes a curve file whose columns are scaled copies of the base
/// population. Polarized files split every value evenly between the spins.
fn cohpcar(labels: &[(&str, f64)], polarized: bool) -> String {
    let n_columns = labels.len() + 1;
    let spins = if polarized { 2 } else { 1 };
    let spin_factor = if polarized { 0.5 } else { 1.0 };

    let mut columns: Vec<(Vec<f64>, Vec<f64>)> = Vec::with_capacity(n_columns);
    let scales = std::iter::once(1.0).chain(labels.iter().map(|(_, s)| *s));
    for scale in scales {
        let pop: Vec<f64> = (0..N_POINTS)
            .map(|i| base_population(energy(i)) * scale * spin_factor)
            .collect();
        let integrated = cumulative(&pop);
        columns.push((pop, integrated));
    }

    let mut text = String::from("COHPCAR.lobster\n");
    let _ = writeln!(
        text,
        "{n_columns} {spins} {N_POINTS} {:.5} {:.5} {EFERMI:.5}",
        energy(0),
        energy(N_POINTS - 1)
    );
    text.push_str("Average\n");
    for (label, _) in labels {
        let _ = writeln!(text, "{label}");
    }
    for i in 0..N_POINTS {
        let _ = write!(text, "{:.5}", energy(i));
        for _ in 0..spins {
            for (pop, integrated) in &columns {
                let _ = write!(text, " {:.6} {:.6}", pop[i], integrated[i]);
            }
        }
        text.push('\n');
    }
    text
}

fn parse<F: LobsterFile>(text: &str) -> F::Output {
    F::read_from(&mut Cursor::new(text)).expect("fixture parses")
}

const NACL_POSCAR: &str = "\
Na Cl
1.0
   0.0000 2.8450 2.8450
   2.8450 0.0000 2.8450
   2.8450 2.8450 0.0000
Na Cl
1 1
Direct
0.0 0.0 0.0
0.5 0.5 0.5
";

const NACL_CHARGE: &str = "\
       #        Atom      Mulliken        Loewdin
       1         Na           0.78           0.68
       2         Cl          -0.78          -0.68
";

const NACL_MADELUNG: &str = "\
 Madelung Energies for the Mulliken and Loewdin charges (eV)
 Ewald Splitting        Mulliken        Loewdin
   3.14                -52.51          -47.06
";

const NACL_TRANSLATIONS: [[i32; 3]; 6] = [
    [-1, 0, 0],
    [0, -1, 0],
    [0, 0, -1],
    [0, -1, -1],
    [-1, 0, -1],
    [-1, -1, 0],
];

fn nacl_icohplist(polarized: bool) -> String {
    let blocks: &[(usize, f64)] = if polarized { &[(1, 0.5), (2, 0.5)] } else { &[(1, 1.0)] };
    let mut text = String::new();
    for &(spin, factor) in blocks {
        let _ = writeln!(
            text,
            " COHP#  atomMU  atomNU     distance     translation  ICOHP(eF)  for spin  {spin}"
        );
        let row = |text: &mut String, label: usize, a: &str, b: &str, d: f64, t: [i32; 3], v: f64| {
            let _ = writeln!(
                text,
                "{label:6} {a:>10} {b:>10} {d:12.5} {:4} {:4} {:4} {:12.5}",
                t[0],
                t[1],
                t[2],
                v * factor
            );
        };
        for (i, t) in NACL_TRANSLATIONS.iter().enumerate() {
            row(&mut text, i + 1, "Na1", "Cl2", 2.845, *t, -0.57);
            if i == 0 {
                row(&mut text, 1, "Na1[3s]", "Cl2[3s]", 2.845, *t, -0.15);
                row(&mut text, 1, "Na1[3s]", "Cl2[3p_x]", 2.845, *t, -0.42);
            }
        }
        row(&mut text, 7, "Na1", "Na1", 4.02344, [1, 0, 0], -0.02);
        row(&mut text, 8, "Na1", "Na1", 4.02344, [0, 1, 0], -0.02);
        row(&mut text, 9, "Cl2", "Cl2", 4.02344, [1, 0, 0], -0.03);
        row(&mut text, 10, "Cl2", "Cl2", 4.02344, [0, 1, 0], -0.03);
    }
    text
}

fn nacl_cohpcar(polarized: bool) -> String {
    let mut labels: Vec<(String, f64)> = Vec::new();
    for i in 1..=6 {
        labels.push((format!("No.{i}:Na1->Cl2(2.84500)"), 1.0));
        if i == 1 {
            labels.push(("No.1:Na1[3s]->Cl2[3s](2.84500)".into(), 0.25));
            labels.push(("No.1:Na1[3s]->Cl2[3p_x](2.84500)".into(), 0.75));
        }
    }
    labels.push(("No.7:Na1->Na1(4.02344)".into(), 0.1));
    labels.push(("No.8:Na1->Na1(4.02344)".into(), 0.1));
    labels.push(("No.9:Cl2->Cl2(4.02344)".into(), 0.1));
    labels.push(("No.10:Cl2->Cl2(4.02344)".into(), 0.1));
    let borrowed: Vec<(&str, f64)> = labels.iter().map(|(l, s)| (l.as_str(), *s)).collect();
    cohpcar(&borrowed, polarized)
}

fn nacl_inputs(polarized: bool) -> Inputs {
    AnalysisInputs {
        structure: parse::<PoscarFile>(NACL_POSCAR),
        charges: Some(parse::<ChargeFile>(NACL_CHARGE)),
        bonds: parse::<IcohpListFile>(&nacl_icohplist(polarized)),
        curves: parse::<CohpcarFile>(&nacl_cohpcar(polarized)),
        madelung: Some(parse::<MadelungFile>(NACL_MADELUNG)),
    }
}

/// Rock-salt NaCl: six Na-Cl bonds of -0.57 eV, weak Na-Na and Cl-Cl contacts.
pub fn nacl() -> Inputs {
    nacl_inputs(false)
}

/// Same as [`nacl`] with every value split evenly over two spin channels.
pub fn nacl_spin_polarized() -> Inputs {
    nacl_inputs(true)
}

const CDF2_POSCAR: &str = "\
Cd F
1.0
   0.0000 2.6950 2.6950
   2.6950 0.0000 2.6950
   2.6950 2.6950 0.0000
Cd F
1 2
Direct
0.00 0.00 0.00
0.25 0.25 0.25
0.75 0.75 0.75
";

const CDF2_CHARGE: &str = "\
       #        Atom      Mulliken        Loewdin
       1         Cd           1.57           1.18
       2          F          -0.78          -0.59
       3          F          -0.78          -0.59
";

/// Fluorite CdF2 in the old list format without translations: eight Cd-F
/// bonds of -0.62 eV.
pub fn cdf2() -> Inputs {
    let mut icohplist = String::from("  COHP#  atomMU  atomNU     distance     ICOHP(eF)      #bonds\n");
    let mut labels = Vec::new();
    for i in 1..=8 {
        let partner = if i <= 4 { "F2" } else { "F3" };
        let _ = writeln!(icohplist, "{i:6} {:>6} {partner:>6} {:12.5} {:12.5} {:6}", "Cd1", 2.33394, -0.62, 1);
        labels.push((format!("No.{i}:Cd1->{partner}(2.33394)"), 1.0));
    }
    let borrowed: Vec<(&str, f64)> = labels.iter().map(|(l, s)| (l.as_str(), *s)).collect();

    AnalysisInputs {
        structure: parse::<PoscarFile>(CDF2_POSCAR),
        charges: Some(parse::<ChargeFile>(CDF2_CHARGE)),
        bonds: parse::<IcohpListFile>(&icohplist),
        curves: parse::<CohpcarFile>(&cohpcar(&borrowed, false)),
        madelung: None,
    }
}
