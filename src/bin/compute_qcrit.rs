//! Compute the Q-criterion on the cell-centered grid
use clap::Parser;
use flapwing::cli::{init_logger, Cli};
use flapwing::config::RunConfig;
use flapwing::field::qcriterion;
use flapwing::interpolate::Extrapolation;
use flapwing::xdmf::{solution_file, XdmfWriter};
use flapwing::{Field3, Grid3, WingKinematics};
use log::info;

const NAME: &str = "qcrit";

fn main() -> anyhow::Result<()> {
    init_logger();
    let args = Cli::parse();
    let config = RunConfig::load_or_default(&args.simudir)?;
    let wing = WingKinematics::new(config.kinematics)?;
    let datadir = args.datadir();
    let gridpath = datadir.join("grid.h5");
    let outdir = datadir.join("postprocessing").join(NAME);
    if args.save {
        std::fs::create_dir_all(&outdir)?;
    }

    let grid = Grid3::read(&gridpath, "p")?;
    let grid_u = Grid3::read(&gridpath, "u")?;
    let grid_v = Grid3::read(&gridpath, "v")?;
    let grid_w = Grid3::read(&gridpath, "w")?;
    let out_gridpath = outdir.join("grid.h5");
    if args.save {
        grid.write(&out_gridpath, NAME)?;
    }

    let mut xdmf = XdmfWriter::new(&grid, "grid.h5", NAME).attribute(NAME, ".");
    for &timestep in &config.timesteps {
        info!("[time step {}] Computing the Q-criterion", timestep);
        let filepath = datadir.join(solution_file(timestep));
        let cc = |name: &str, g: &Grid3| -> flapwing::Result<Field3> {
            Ok(Field3::read_on_grid(&filepath, name, g.clone())?.interpolate(&grid, Extrapolation::Linear))
        };
        let u = cc("u", &grid_u)?;
        let v = cc("v", &grid_v)?;
        let w = cc("w", &grid_w)?;
        let q = qcriterion(&u, &v, &w);
        if args.show {
            let (lo, hi) = q.min_max();
            println!("[time step {}] Q in [{:.6e}, {:.6e}]", timestep, lo, hi);
        }
        if args.save {
            q.write(outdir.join(solution_file(timestep)), NAME)?;
        }
        xdmf = xdmf.state(timestep, timestep as f64 * wing.dt());
    }
    if args.save {
        xdmf.write(outdir.join(format!("{}.xmf", NAME)))?;
    }
    Ok(())
}
