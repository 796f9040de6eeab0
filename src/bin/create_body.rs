//! Discretize the elliptical plate (or a disk when a thickness is
//! configured) and write the markers
use clap::Parser;
use flapwing::cli::{init_logger, Cli};
use flapwing::config::RunConfig;
use flapwing::{Body, WingKinematics};

fn main() -> anyhow::Result<()> {
    init_logger();
    let args = Cli::parse();
    let config = RunConfig::load_or_default(&args.simudir)?;
    let wing = WingKinematics::new(config.kinematics)?;

    let body = Body::disk(&wing, config.body_spacing, config.thickness)?.sorted_from_root();
    if args.show {
        println!("number of markers: {}", body.len());
        println!("surface per marker: {:.6e}", wing.planform_area() / body.len() as f64);
    }
    if args.save {
        body.write(args.simudir.join("wing.body"))?;
    }
    Ok(())
}
