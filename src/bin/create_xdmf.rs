//! Write a single XDMF file for the Q-criterion and the
//! cell-centered x-vorticity
use clap::Parser;
use flapwing::cli::{init_logger, Cli};
use flapwing::config::RunConfig;
use flapwing::xdmf::XdmfWriter;
use flapwing::{Grid3, WingKinematics};

fn main() -> anyhow::Result<()> {
    init_logger();
    let args = Cli::parse();
    let config = RunConfig::load_or_default(&args.simudir)?;
    let wing = WingKinematics::new(config.kinematics)?;
    let outdir = args.datadir().join("postprocessing");

    let grid = Grid3::read(outdir.join("qcrit").join("grid.h5"), "qcrit")?;
    let mut xdmf = XdmfWriter::new(&grid, "qcrit/grid.h5", "qcrit")
        .attribute("qcrit", "qcrit")
        .attribute("wx_cc", "wx_cc");
    for &timestep in &config.timesteps {
        xdmf = xdmf.state(timestep, timestep as f64 * wing.dt());
    }
    if args.show {
        println!("{} states on grid\n{}", xdmf.len(), grid);
    }
    if args.save {
        xdmf.write(outdir.join("qcrit_wx_cc.xmf"))?;
    }
    Ok(())
}
