//! Time-averaged velocity profiles in the wake at the end of the run
//!
//! `u` and `v` are taken along y in the plane z = S/2, `w` along z at
//! y = 0 (z measured from the middle of the span). Each output file
//! holds one block per x-location.
use clap::Parser;
use flapwing::cli::{init_logger, Cli};
use flapwing::config::RunConfig;
use flapwing::profiles::{probe_spanwise_profile, probe_vertical_profile};
use flapwing::WingKinematics;
use log::info;
use ndarray::Array1;
use std::fs::File;
use std::io::{BufWriter, Write};

fn main() -> anyhow::Result<()> {
    init_logger();
    let args = Cli::parse();
    let config = RunConfig::load_or_default(&args.simudir)?;
    let wing = WingKinematics::new(config.kinematics)?;
    let datadir = args.datadir();
    let time = (wing.final_time() * 1e6).round() / 1e6;
    let zmid = wing.span() / 2.;

    for name in ["u", "v", "w"] {
        let mut profiles: Vec<(f64, Array1<f64>, Array1<f64>)> = vec![];
        for (i, &xloc) in config.xlocs.iter().enumerate() {
            let path = datadir.join(format!("probe{}-{}.h5", i + 1, name));
            let (coord, values) = if name == "w" {
                let (z, w) = probe_spanwise_profile(&path, name, time, xloc, 0.)?;
                (z - zmid, w)
            } else {
                probe_vertical_profile(&path, name, time, xloc, zmid)?
            };
            if args.show {
                let (lo, hi) = values
                    .iter()
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
                println!("x/c = {}: {} in [{:.6}, {:.6}]", xloc, name, lo, hi);
            }
            profiles.push((xloc, coord, values));
        }

        if args.save {
            let path = datadir.join(format!("{}_profiles.txt", name));
            let mut file = BufWriter::new(File::create(&path)?);
            let axis = if name == "w" { "z" } else { "y" };
            for (xloc, coord, values) in &profiles {
                writeln!(file, "# x = {}, t = {}", xloc, time)?;
                writeln!(file, "# {} {}", axis, name)?;
                for (c, v) in coord.iter().zip(values.iter()) {
                    writeln!(file, "{:.10e} {:.10e}", c, v)?;
                }
                writeln!(file)?;
            }
            file.flush()?;
            info!("Wrote {:?}", path);
        }
    }
    Ok(())
}
