use cohpana::core::models::charges::ChargeModel;
use cohpana::engine::config::{DEFAULT_CUTOFF_ICOHP, WhichBonds};

pub struct DefaultsConfig {
    pub which_bonds: WhichBonds,
    pub cutoff_icohp: f64,
    pub charge_model: ChargeModel,
    pub summed_spins: bool,
    pub orbital_resolved: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            which_bonds: WhichBonds::CationAnion,
            cutoff_icohp: DEFAULT_CUTOFF_ICOHP,
            charge_model: ChargeModel::Mulliken,
            summed_spins: true,
            orbital_resolved: false,
        }
    }
}
