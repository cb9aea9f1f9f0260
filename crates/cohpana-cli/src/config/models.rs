use cohpana::engine::config::AnalysisConfig;
use cohpana::workflows::analyze::InputPaths;
use std::path::PathBuf;

pub struct AppConfig {
    pub inputs: InputPaths,
    pub json_output: Option<PathBuf>,
    pub analysis: AnalysisConfig,
}
