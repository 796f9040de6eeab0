//! Interpolate the x-vorticity onto the cell-centered grid
use clap::Parser;
use flapwing::cli::{init_logger, Cli};
use flapwing::config::RunConfig;
use flapwing::interpolate::Extrapolation;
use flapwing::xdmf::{solution_file, XdmfWriter};
use flapwing::{Field3, Grid3, WingKinematics};
use log::info;

const FIELD: &str = "wx";
const NAME: &str = "wx_cc";

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
    let grid_field = Grid3::read(&gridpath, FIELD)?;
    let out_gridpath = outdir.join("grid.h5");
    if args.save {
        grid.write(&out_gridpath, NAME)?;
    }

    let mut xdmf = XdmfWriter::new(&grid, "grid.h5", NAME).attribute(NAME, ".");
    for &timestep in &config.timesteps {
        info!("[time step {}] Computing the cell-centered {}", timestep, FIELD);
        let filepath = datadir.join(solution_file(timestep));
        let field = Field3::read_on_grid(&filepath, FIELD, grid_field.clone())?
            .interpolate(&grid, Extrapolation::Linear);
        if args.show {
            let (lo, hi) = field.min_max();
            println!("[time step {}] {} in [{:.6e}, {:.6e}]", timestep, NAME, lo, hi);
        }
        if args.save {
            field.write(outdir.join(solution_file(timestep)), NAME)?;
        }
        xdmf = xdmf.state(timestep, timestep as f64 * wing.dt());
    }
    if args.save {
        xdmf.write(outdir.join(format!("{}.xmf", NAME)))?;
    }
    Ok(())
}
