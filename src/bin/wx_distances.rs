//! Distances between the wake vortex pairs in slices of the
//! streamwise vorticity
use clap::Parser;
use flapwing::cli::{init_logger, Cli};
use flapwing::config::RunConfig;
use flapwing::xdmf::solution_file;
use flapwing::{Field3, WingKinematics};
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};

fn main() -> anyhow::Result<()> {
    init_logger();
    let args = Cli::parse();
    let config = RunConfig::load_or_default(&args.simudir)?;
    let wing = WingKinematics::new(config.kinematics)?;
    let datadir = args.datadir();
    let setup = &config.wx_distances;

    let time = setup.time * wing.period();
    let timestep = (time / wing.dt()).round() as usize;
    info!("[time step {}] Slicing the streamwise vorticity", timestep);
    let wx = Field3::read(datadir.join(solution_file(timestep)), datadir.join("grid.h5"), "wx")?;
    let distances = setup.measure(&wx, wing.span() / 2.)?;

    if args.show {
        let names: Vec<&str> = distances.iter().map(|(name, _)| name.as_str()).collect();
        println!("| Case | {} |", names.join(" | "));
        println!("|:-:|{}", ":-:|".repeat(names.len()));
        let values: Vec<String> = distances.iter().map(|(_, d)| format!("{:.3}", d)).collect();
        println!("| {} | {} |", args.simudir.display(), values.join(" | "));
    }
    if args.save {
        let path = datadir.join("wx_distances.txt");
        let mut file = BufWriter::new(File::create(&path)?);
        writeln!(file, "# t/T = {}", setup.time)?;
        for (name, d) in &distances {
            writeln!(file, "{} {:.10e}", name, d)?;
        }
        file.flush()?;
        info!("Wrote {:?}", path);
    }
    Ok(())
}
