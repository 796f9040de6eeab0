//! Command-line options shared by all binaries
use clap::Parser;
use std::path::PathBuf;

/// Post-processing of a rolling-pitching wing simulation
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Simulation directory
    #[arg(default_value = ".")]
    pub simudir: PathBuf,
    /// Do not print results
    #[arg(long = "no-show", action = clap::ArgAction::SetFalse)]
    pub show: bool,
    /// Do not write output files
    #[arg(long = "no-save", action = clap::ArgAction::SetFalse)]
    pub save: bool,
    /// Do not compare with reference data
    #[arg(long = "no-data", action = clap::ArgAction::SetFalse)]
    pub data: bool,
}

impl Cli {
    /// Output directory of the solver
    pub fn datadir(&self) -> PathBuf {
        self.simudir.join("output")
    }
}

/// Initialize logging, `RUST_LOG` overrides the default level `info`
pub fn init_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["prog"]);
        assert_eq!(cli.simudir, PathBuf::from("."));
        assert!(cli.show && cli.save && cli.data);
        assert_eq!(cli.datadir(), PathBuf::from("./output"));
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from(["prog", "runs/Re200", "--no-show", "--no-data"]);
        assert_eq!(cli.simudir, PathBuf::from("runs/Re200"));
        assert!(!cli.show);
        assert!(cli.save);
        assert!(!cli.data);
    }
}
