use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::tui::Theme;

/// User configuration, read from `~/.config/gem-filter/config.yaml`.
///
/// Example YAML:
/// ```yaml
/// theme: dark
/// export_dir: /home/me/gems
/// default_metric: 3
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Color palette: auto (detect from terminal background), dark or light
    #[serde(default)]
    pub theme: Theme,

    /// Directory the worksheet exports CSV files into (default: current directory)
    #[serde(default)]
    pub export_dir: Option<PathBuf>,

    /// Starting position of every scorecard slider, 1-5 (default: 3)
    #[serde(default)]
    pub default_metric: Option<u8>,
}
