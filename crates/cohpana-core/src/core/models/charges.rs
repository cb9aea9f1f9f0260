use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Population analysis used for partial charges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChargeModel {
    #[default]
    Mulliken,
    Loewdin,
}

impl fmt::Display for ChargeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChargeModel::Mulliken => write!(f, "mulliken"),
            ChargeModel::Loewdin => write!(f, "loewdin"),
        }
    }
}

impl FromStr for ChargeModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mulliken" => Ok(ChargeModel::Mulliken),
            "loewdin" | "lowdin" => Ok(ChargeModel::Loewdin),
            other => Err(format!(
                "unknown charge model '{other}' (expected mulliken or loewdin)"
            )),
        }
    }
}

/// Partial charges of one site.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteCharge {
    pub species: String,
    pub mulliken: f64,
    pub loewdin: f64,
}

impl SiteCharge {
    pub fn get(&self, model: ChargeModel) -> f64 {
        match model {
            ChargeModel::Mulliken => self.mulliken,
            ChargeModel::Loewdin => self.loewdin,
        }
    }
}

/// Per-site partial charges, indexed like the sites of the structure.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChargeTable {
    charges: Vec<SiteCharge>,
}

impl ChargeTable {
    pub fn new(charges: Vec<SiteCharge>) -> Self {
        Self { charges }
    }

    pub fn get(&self, index: usize) -> Option<&SiteCharge> {
        self.charges.get(index)
    }

    pub fn charge(&self, index: usize, model: ChargeModel) -> Option<f64> {
        self.get(index).map(|c| c.get(model))
    }

    pub fn len(&self) -> usize {
        self.charges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SiteCharge> {
        self.charges.iter()
    }
}

/// Madelung energies per formula unit, in eV.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MadelungEnergies {
    pub ewald_splitting: Option<f64>,
    pub mulliken: f64,
    pub loewdin: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charge_model_parses_both_spellings() {
        assert_eq!("Loewdin".parse::<ChargeModel>(), Ok(ChargeModel::Loewdin));
        assert_eq!("lowdin".parse::<ChargeModel>(), Ok(ChargeModel::Loewdin));
        assert_eq!("MULLIKEN".parse::<ChargeModel>(), Ok(ChargeModel::Mulliken));
        assert!("bader".parse::<ChargeModel>().is_err());
    }

    #[test]
    fn table_selects_charge_model() {
        let table = ChargeTable::new(vec![SiteCharge {
            species: "Na".into(),
            mulliken: 0.78,
            loewdin: 0.68,
        }]);
        assert_eq!(table.charge(0, ChargeModel::Mulliken), Some(0.78));
        assert_eq!(table.charge(0, ChargeModel::Loewdin), Some(0.68));
        assert_eq!(table.charge(1, ChargeModel::Mulliken), None);
    }
}
