//! Command-line arguments shared by the binaries.
use crate::config::EngineConfig;
use clap::{Args, ValueEnum};

/// Which game preset to start from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Swap adjacent tiles to line up three or more.
    #[default]
    Crush,
    /// Smash connected groups of 0s and 1s.
    Smash,
    /// Smash groups while digits drop into a well.
    Stack,
}

impl Mode {
    /// The preset configuration for this mode.
    pub fn preset(self) -> EngineConfig {
        match self {
            Mode::Crush => EngineConfig::crush(),
            Mode::Smash => EngineConfig::smash(),
            Mode::Stack => EngineConfig::stack(),
        }
    }
}

/// Game selection and overrides, flattened into each binary's arguments.
#[derive(Args, Clone, Debug, Default, PartialEq, Eq)]
pub struct GameArgs {
    /// Game preset
    #[clap(short, long, value_enum, default_value_t = Mode::Crush)]
    pub mode: Mode,

    /// Number of rows (defaults to the preset's)
    #[clap(long)]
    pub rows: Option<usize>,

    /// Number of columns (defaults to the preset's)
    #[clap(long)]
    pub cols: Option<usize>,

    /// Number of distinct values (defaults to the preset's)
    #[clap(long)]
    pub alphabet: Option<u8>,

    /// Seed for board generation and refills
    #[clap(short, long)]
    pub seed: Option<u64>,
}

impl GameArgs {
    /// Builds the engine configuration: the preset with any overrides applied.
    pub fn to_config(&self) -> EngineConfig {
        let mut config = self.mode.preset();
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.cols = cols;
        }
        if let Some(alphabet) = self.alphabet {
            config.alphabet_size = alphabet;
        }
        config.seed = self.seed;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[clap(flatten)]
        game: GameArgs,
    }

    #[test]
    fn test_defaults_to_crush_preset() {
        let cli = TestCli::parse_from(["test"]);
        assert_eq!(cli.game.mode, Mode::Crush);
        assert_eq!(cli.game.to_config(), EngineConfig::crush());
    }

    #[test]
    fn test_overrides_apply_on_top_of_preset() {
        let cli = TestCli::parse_from([
            "test", "--mode", "stack", "--rows", "6", "--alphabet", "5", "--seed", "11",
        ]);
        let config = cli.game.to_config();
        assert_eq!(config.rows, 6);
        assert_eq!(config.cols, 7);
        assert_eq!(config.alphabet_size, 5);
        assert_eq!(config.seed, Some(11));
        assert_eq!(config.refill, EngineConfig::stack().refill);
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        assert!(TestCli::try_parse_from(["test", "--mode", "tetris"]).is_err());
    }
}
