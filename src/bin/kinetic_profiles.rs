//! Profiles of the fluctuation of kinetic energy in the wake
use clap::Parser;
use flapwing::cli::{init_logger, Cli};
use flapwing::config::RunConfig;
use flapwing::profiles::kinetic_energy_profile;
use flapwing::WingKinematics;
use log::info;
use ndarray::{Array1, Array2};
use std::fs::File;
use std::io::{BufWriter, Write};

fn main() -> anyhow::Result<()> {
    init_logger();
    let args = Cli::parse();
    let config = RunConfig::load_or_default(&args.simudir)?;
    let wing = WingKinematics::new(config.kinematics)?;
    let datadir = args.datadir();

    // all time steps of the averaging window, except the first
    let period = wing.period();
    let n = config.kinematics.nt_period;
    let times = Array1::linspace(
        config.averaging[0] * period + wing.dt(),
        config.averaging[1] * period,
        n,
    );
    let times = &times.as_slice().unwrap_or(&[])[..n.saturating_sub(1)];
    let zloc = wing.span() / 2.;

    let mut y_ref: Option<Array1<f64>> = None;
    let mut profiles: Vec<Array1<f64>> = vec![];
    for (i, &xloc) in config.xlocs.iter().enumerate() {
        let files: Vec<_> = ["u", "v", "w"]
            .iter()
            .map(|name| (datadir.join(format!("probe{}-{}-kin.h5", i + 1, name)), *name))
            .collect();
        let (y, kin) = kinetic_energy_profile(&files, times, xloc, zloc)?;
        if args.show {
            let max = kin.iter().copied().fold(0., f64::max);
            println!("x/c = {}: max fluctuation of kinetic energy {:.6e}", xloc, max);
        }
        y_ref.get_or_insert(y);
        profiles.push(kin);
    }

    if let (true, Some(y)) = (args.save, y_ref) {
        let mut table = Array2::<f64>::zeros((y.len(), profiles.len() + 1));
        table.column_mut(0).assign(&y);
        for (j, kin) in profiles.iter().enumerate() {
            table.column_mut(j + 1).assign(kin);
        }
        let path = datadir.join("kinetic_profiles.txt");
        let mut file = BufWriter::new(File::create(&path)?);
        writeln!(file, "# y {}", config.xlocs.iter().map(|x| format!("x={}", x)).collect::<Vec<_>>().join(" "))?;
        for row in table.rows() {
            let line: Vec<String> = row.iter().map(|v| format!("{:.10e}", v)).collect();
            writeln!(file, "{}", line.join(" "))?;
        }
        file.flush()?;
        info!("Wrote {:?}", path);
    }
    Ok(())
}
