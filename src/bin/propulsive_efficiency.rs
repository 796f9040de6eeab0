//! Hydrodynamic power and propulsive efficiency of the wing
//!
//! Only the positive values of the power enter its cycle average.
use clap::Parser;
use flapwing::cli::{init_logger, Cli};
use flapwing::config::RunConfig;
use flapwing::forces::{propulsive_efficiency, time_average, Forces, PowerHistory};
use flapwing::{Body, WingKinematics};

fn main() -> anyhow::Result<()> {
    init_logger();
    let args = Cli::parse();
    let config = RunConfig::load_or_default(&args.simudir)?;
    let wing = WingKinematics::new(config.kinematics)?;
    let datadir = args.datadir();

    // cycle-averaged thrust
    let forces = Forces::read(datadir.join("forces-0.txt"))?;
    let limits = (
        config.averaging[0] * wing.period(),
        config.averaging[1] * wing.period(),
    );
    let thrust = forces.thrust();
    let thrust_avg = time_average(&forces.t, &thrust, limits);
    let ct_avg = thrust_avg * wing.force_scale();

    // hydrodynamic power on the virtual boundary
    let body = Body::read(args.simudir.join("wing.body"))?;
    let d = config.virtual_distance * wing.chord();
    let history = PowerHistory::compute(&wing, &body, d, datadir.join("probe_vicinity-p.h5"), "p")?;
    let power_avg = history.mean_positive();
    let eta = propulsive_efficiency(thrust_avg, wing.u_inf(), power_avg);

    if args.save {
        history.write(datadir.join("P_hydro.dat"))?;
    }
    if args.show {
        println!("Cycle-averaged thrust: {}", thrust_avg);
        println!("Cycle-averaged thrust coefficient: {}", ct_avg);
        println!("Cycle-averaged hydrodynamic power: {}", power_avg);
        println!("Propulsive efficiency: {}", eta);
    }
    Ok(())
}
