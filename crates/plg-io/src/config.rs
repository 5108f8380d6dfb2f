//! TOML configuration files.
//!
//! Every section and field is optional; anything left out keeps its
//! default.
//!
//! ```toml
//! seed = 7
//!
//! [nodes]
//! min_separation_m = 2.5
//!
//! [nodes.refinement]
//! ignored_lanes = [0]
//!
//! [decode]
//! max_path_length = 500
//! ```

use std::fs;
use std::path::Path;

use plg_core::PlgConfig;

use crate::OutputResult;

/// Parse and validate a configuration document.
pub fn parse_config(text: &str) -> OutputResult<PlgConfig> {
    let config: PlgConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}

/// Load and validate a configuration file.
pub fn load_config(path: &Path) -> OutputResult<PlgConfig> {
    parse_config(&fs::read_to_string(path)?)
}

/// Write `config` as TOML, e.g. to seed a config file with the defaults.
pub fn save_config(path: &Path, config: &PlgConfig) -> OutputResult<()> {
    fs::write(path, toml::to_string_pretty(config)?)?;
    Ok(())
}
