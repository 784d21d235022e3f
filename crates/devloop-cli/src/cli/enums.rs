//! Value enums for command-line arguments.

use clap::ValueEnum;
use devloop_config::Preset;

/// Built-in task layout selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PresetArg {
    /// Bundler watch plus type-checker watch
    Single,
    /// Two bundler watches, type-checker watch, deploy on change
    Split,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Single => Preset::Single,
            PresetArg::Split => Preset::Split,
        }
    }
}
