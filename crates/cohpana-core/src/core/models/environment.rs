use phf::{Map, phf_map};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static ENVIRONMENT_NAMES: Map<&'static str, &'static str> = phf_map! {
    "S:1" => "single",
    "L:2" => "linear",
    "A:2" => "angular",
    "TL:3" => "trigonal planar",
    "TY:3" => "triangular non-coplanar",
    "TS:3" => "t-shaped",
    "T:4" => "tetrahedral",
    "S:4" => "square planar",
    "SY:4" => "square non-coplanar",
    "SS:4" => "see-saw like",
    "PP:5" => "pentagonal",
    "S:5" => "square pyramidal",
    "T:5" => "trigonal bipyramidal",
    "O:6" => "octahedral",
    "T:6" => "trigonal prismatic",
    "PP:6" => "pentagonal pyramidal",
    "PB:7" => "pentagonal bipyramidal",
    "ST:7" => "square-face capped trigonal prismatic",
    "ET:7" => "end-trigonal-face capped trigonal prismatic",
    "FO:7" => "face-capped octahedron",
    "C:8" => "cubic",
    "SA:8" => "square antiprismatic",
    "SBT:8" => "square-face bicapped trigonal prismatic",
    "TBT:8" => "triangular-face bicapped trigonal prismatic",
    "DD:8" => "dodecahedronal (with triangular faces)",
    "DDPN:8" => "dodecahedronal (with triangular faces - p2345 plane normalized)",
    "HB:8" => "hexagonal bipyramidal",
    "BO_1:8" => "bicapped octahedral (opposed cap faces)",
    "BO_2:8" => "bicapped octahedral (cap faces with one atom in common)",
    "BO_3:8" => "bicapped octahedral (cap faces with one edge in common)",
    "TC:9" => "triangular cupola",
    "TT_1:9" => "Tricapped triangular prismatic (three square - face caps)",
    "TT_2:9" => "Tricapped triangular prismatic (two square - face caps and one triangular - face cap)",
    "TT_3:9" => "Tricapped triangular prism (one square - face cap and two triangular - face caps)",
    "HD:9" => "Heptagonal dipyramidal",
    "TI:9" => "tridiminished icosohedral",
    "SMA:9" => "Square-face monocapped antiprism",
    "SS:9" => "Square-face capped square prismatic",
    "TO_1:9" => "Tricapped octahedral (all 3 cap faces share one atom)",
    "TO_2:9" => "Tricapped octahedral (cap faces are aligned)",
    "TO_3:9" => "Tricapped octahedron (all 3 cap faces are sharing one edge of a face)",
    "PP:10" => "Pentagonal prismatic",
    "PA:10" => "Pentagonal antiprismatic",
    "SBSA:10" => "Square-face bicapped square antiprismatic",
    "MI:10" => "Metabidiminished icosahedral",
    "S:10" => "sphenocoronal",
    "H:10" => "Hexadecahedral",
    "BS_1:10" => "Bicapped square prismatic (opposite faces)",
    "BS_2:10" => "Bicapped square prism(adjacent faces)",
    "TBSA:10" => "Trigonal-face bicapped square antiprismatic",
    "PCPA:11" => "Pentagonal - face capped pentagonal antiprismatic",
    "H:11" => "Hendecahedral",
    "SH:11" => "Sphenoid hendecahedral",
    "CO:11" => "Cs - octahedral",
    "DI:11" => "Diminished icosahedral",
    "I:12" => "Icosahedral",
    "PBP:12" => "Pentagonal - face bicapped pentagonal prismatic",
    "TT:12" => "Truncated tetrahedral",
    "C:12" => "Cuboctahedral",
    "AC:12" => "Anticuboctahedral",
    "SC:12" => "Square cupola",
    "S:12" => "Sphenomegacorona",
    "HP:12" => "Hexagonal prismatic",
    "HA:12" => "Hexagonal antiprismatic",
    "SH:13" => "Square-face capped hexagonal prismatic",
};

/// A coordination-environment code such as `O:6`: a polyhedron symbol plus
/// the coordination number.
///
/// Serialized as the string `"<symbol>:<cn>"`. Environments without a matching
/// ideal polyhedron use the symbol `CN`, e.g. `CN:7`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CoordinationEnvironment {
    pub symbol: String,
    pub coordination_number: usize,
}

impl CoordinationEnvironment {
    pub fn new(symbol: impl Into<String>, coordination_number: usize) -> Self {
        Self {
            symbol: symbol.into(),
            coordination_number,
        }
    }

    /// The generic code used when no ideal polyhedron matches.
    pub fn unclassified(coordination_number: usize) -> Self {
        Self::new("CN", coordination_number)
    }

    pub fn code(&self) -> String {
        self.to_string()
    }

    /// Human-readable name, e.g. "octahedral (CN=6)". Unknown codes are
    /// returned unchanged.
    pub fn describe(&self) -> String {
        let code = self.code();
        match ENVIRONMENT_NAMES.get(code.as_str()) {
            Some(name) => format!("{} (CN={})", name, self.coordination_number),
            None => code,
        }
    }
}

impl fmt::Display for CoordinationEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.symbol, self.coordination_number)
    }
}

impl FromStr for CoordinationEnvironment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (symbol, cn) = s
            .rsplit_once(':')
            .ok_or_else(|| format!("invalid coordination environment '{s}'"))?;
        let cn = cn
            .trim()
            .parse()
            .map_err(|_| format!("invalid coordination number in '{s}'"))?;
        if symbol.is_empty() {
            return Err(format!("missing symbol in '{s}'"));
        }
        Ok(Self::new(symbol, cn))
    }
}

impl From<CoordinationEnvironment> for String {
    fn from(env: CoordinationEnvironment) -> Self {
        env.code()
    }
}

impl TryFrom<String> for CoordinationEnvironment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_known_codes() {
        assert_eq!(
            CoordinationEnvironment::new("O", 6).describe(),
            "octahedral (CN=6)"
        );
        assert_eq!(CoordinationEnvironment::new("C", 8).describe(), "cubic (CN=8)");
        assert_eq!(
            CoordinationEnvironment::new("TL", 3).describe(),
            "trigonal planar (CN=3)"
        );
    }

    #[test]
    fn describe_falls_back_to_code() {
        assert_eq!(CoordinationEnvironment::new("H", 5).describe(), "H:5");
        assert_eq!(CoordinationEnvironment::unclassified(7).describe(), "CN:7");
    }

    #[test]
    fn serializes_as_code_string() {
        let env = CoordinationEnvironment::new("O", 6);
        assert_eq!(serde_json::to_string(&env).unwrap(), "\"O:6\"");
        let back: CoordinationEnvironment = serde_json::from_str("\"BO_1:8\"").unwrap();
        assert_eq!(back, CoordinationEnvironment::new("BO_1", 8));
        assert!(serde_json::from_str::<CoordinationEnvironment>("\"O6\"").is_err());
    }
}
