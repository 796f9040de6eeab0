//! Print the parameters of the wing kinematics
use clap::Parser;
use flapwing::cli::{init_logger, Cli};
use flapwing::config::RunConfig;
use flapwing::WingKinematics;

fn main() -> anyhow::Result<()> {
    init_logger();
    let args = Cli::parse();
    let config = RunConfig::load_or_default(&args.simudir)?;
    let wing = WingKinematics::new(config.kinematics)?;
    if args.show {
        println!("{}", wing);
    }
    if args.save {
        let path = args.simudir.join("kinematics.txt");
        std::fs::write(&path, wing.to_string())?;
        log::info!("Wrote {:?}", path);
    }
    Ok(())
}
