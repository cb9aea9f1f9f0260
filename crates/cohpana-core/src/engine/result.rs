use super::config::WhichBonds;
use super::error::AnalysisWarning;
use super::stats::IcohpStatistics;
use crate::core::models::curve::CurveKind;
use crate::core::models::environment::CoordinationEnvironment;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One side of an interaction: its integrated magnitude and its share of the
/// total.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Contribution {
    pub integral: f64,
    pub perc: f64,
}

/// Bonding and antibonding contributions below the Fermi level.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InteractionCharacter {
    pub bonding: Contribution,
    pub antibonding: Contribution,
}

impl InteractionCharacter {
    /// Builds the character from the two integrated magnitudes.
    ///
    /// When both are zero each side gets half.
    pub fn from_integrals(bonding: f64, antibonding: f64) -> Self {
        let total = bonding + antibonding;
        let (pb, pa) = if total > 0.0 {
            (bonding / total, antibonding / total)
        } else {
            (0.5, 0.5)
        };
        Self {
            bonding: Contribution {
                integral: bonding,
                perc: pb,
            },
            antibonding: Contribution {
                integral: antibonding,
                perc: pa,
            },
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.bonding.integral + self.antibonding.integral <= 0.0
    }

    pub fn has_antibonding(&self) -> bool {
        self.antibonding.integral > 0.0
    }
}

/// A value per spin channel for spin-resolved output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinResolved<T> {
    pub up: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down: Option<T>,
}

/// One selected bond of a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondMember {
    pub label: String,
    /// Label of the partner site, e.g. `Cl2`.
    pub partner: String,
    pub length: f64,
    #[serde(rename = "ICOHP")]
    pub icohp: f64,
    pub strength: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<[i32; 3]>,
}

/// Contribution of one orbital pair to a group of bonds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitalContribution {
    #[serde(flatten)]
    pub character: InteractionCharacter,
    #[serde(flatten)]
    pub statistics: IcohpStatistics,
    /// Share of the group's summed ICOHP carried by this orbital pair.
    pub relative_icohp: f64,
    pub number_of_bonds: usize,
}

/// All selected bonds of one central site to one partner species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevantBondGroup {
    pub central_site: usize,
    pub central_species: String,
    pub partner_species: String,
    pub coordination_environment: CoordinationEnvironment,
    #[serde(flatten)]
    pub character: InteractionCharacter,
    #[serde(flatten)]
    pub statistics: IcohpStatistics,
    pub number_of_bonds: usize,
    pub bond_labels: Vec<String>,
    pub has_antibonding_below_efermi: bool,
    pub members: Vec<BondMember>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spin_resolved: Option<SpinResolved<InteractionCharacter>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub orbital_data: BTreeMap<String, OrbitalContribution>,
}

impl RelevantBondGroup {
    /// The `<central>-<partner>` species key, e.g. `Na-Cl`.
    pub fn key(&self) -> String {
        format!("{}-{}", self.central_species, self.partner_species)
    }
}

/// Per-site entry of a condensed analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteAnalysis {
    pub site_index: usize,
    pub species: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge: Option<f64>,
    pub coordination_environment: CoordinationEnvironment,
    pub equivalent_sites: Vec<usize>,
    #[serde(with = "keyed::groups")]
    pub relevant_bonds: Vec<RelevantBondGroup>,
}

impl SiteAnalysis {
    /// The LOBSTER-style label, e.g. `Na1`.
    pub fn label(&self) -> String {
        format!("{}{}", self.species, self.site_index + 1)
    }
}

/// Sites in output order, serialized as a map from site label to entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SiteMap(pub Vec<SiteAnalysis>);

/// The condensed bonding analysis of one compound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CondensedAnalysis {
    pub formula: String,
    pub which_bonds: WhichBonds,
    pub charges_available: bool,
    pub summed_spins: bool,
    pub kind: CurveKind,
    pub cutoff_icohp: f64,
    #[serde(flatten)]
    pub sites: SiteMap,
    #[serde(rename = "Madelung_Mull", default, skip_serializing_if = "Option::is_none")]
    pub madelung_mulliken: Option<f64>,
    #[serde(rename = "Madelung_Loew", default, skip_serializing_if = "Option::is_none")]
    pub madelung_loewdin: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<AnalysisWarning>,
}

impl CondensedAnalysis {
    pub fn site(&self, label: &str) -> Option<&SiteAnalysis> {
        self.sites.0.iter().find(|s| s.label() == label)
    }

    pub fn groups(&self) -> impl Iterator<Item = &RelevantBondGroup> {
        self.sites.0.iter().flat_map(|s| s.relevant_bonds.iter())
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for SiteMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|s| (s.label(), s)))
    }
}

impl<'de> Deserialize<'de> for SiteMap {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut sites: Vec<SiteAnalysis> = keyed::values(deserializer)?;
        sites.sort_by_key(|s| s.site_index);
        Ok(SiteMap(sites))
    }
}

/// Maps whose keys are derived from their values, kept in insertion order.
mod keyed {
    use serde::de::{DeserializeOwned, MapAccess, Visitor};
    use serde::{Deserializer, de};
    use std::fmt;
    use std::marker::PhantomData;

    pub fn values<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        struct ValuesVisitor<T>(PhantomData<T>);

        impl<'de, T: DeserializeOwned> Visitor<'de> for ValuesVisitor<T> {
            type Value = Vec<T>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of labelled entries")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Vec<T>, A::Error> {
                let mut out = Vec::new();
                while let Some((_key, value)) = map.next_entry::<de::IgnoredAny, T>()? {
                    out.push(value);
                }
                Ok(out)
            }
        }

        deserializer.deserialize_map(ValuesVisitor(PhantomData))
    }

    pub mod groups {
        use super::super::RelevantBondGroup;
        use serde::{Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            groups: &[RelevantBondGroup],
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.collect_map(groups.iter().map(|g| (g.key(), g)))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Vec<RelevantBondGroup>, D::Error> {
            super::values(deserializer)
        }
    }
}
