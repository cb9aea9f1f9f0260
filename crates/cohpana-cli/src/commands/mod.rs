pub mod analyze;
pub mod curves;
pub mod featurize;

#[cfg(test)]
pub(crate) mod test_inputs {
    //! A one-site cubic Na cell with two linear Na-Na COBI bonds.

    use std::fmt::Write as _;
    use std::fs;
    use std::path::{Path, PathBuf};

    pub const N_POINTS: usize = 11;

    pub struct InputFiles {
        pub poscar: PathBuf,
        pub icohplist: PathBuf,
        pub cohpcar: PathBuf,
    }

    impl InputFiles {
        pub fn analyze_flags(&self) -> Vec<String> {
            vec![
                "--poscar".into(),
                self.poscar.display().to_string(),
                "--icohplist".into(),
                self.icohplist.display().to_string(),
                "--cohpcar".into(),
                self.cohpcar.display().to_string(),
            ]
        }
    }

    pub fn write(dir: &Path) -> InputFiles {
        let poscar = dir.join("POSCAR");
        fs::write(&poscar, "Na\n1.0\n3 0 0\n0 3 0\n0 0 3\nNa\n1\nDirect\n0 0 0\n").unwrap();

        let icohplist = dir.join("ICOBILIST.lobster");
        fs::write(
            &icohplist,
            " COBI#  atomMU  atomNU  distance  translation  ICOBI(eF)  for spin  1\n\
             1  Na1  Na1  3.00000   1  0  0  0.10000\n\
             2  Na1  Na1  3.00000  -1  0  0  0.10000\n",
        )
        .unwrap();

        let cohpcar = dir.join("COBICAR.lobster");
        let mut text = String::from("COBICAR.lobster\n");
        let _ = writeln!(text, "3 1 {N_POINTS} -5.00000 0.00000 1.00000");
        text.push_str("Average\nNo.1:Na1->Na1(3.00000)\nNo.2:Na1->Na1(3.00000)\n");
        for i in 0..N_POINTS {
            let e = -5.0 + 0.5 * i as f64;
            let integrated = 0.02 * 0.5 * i as f64;
            let _ = write!(text, "{e:.5}");
            for _ in 0..3 {
                let _ = write!(text, " 0.02000 {integrated:.5}");
            }
            text.push('\n');
        }
        fs::write(&cohpcar, text).unwrap();

        InputFiles {
            poscar,
            icohplist,
            cohpcar,
        }
    }
}
