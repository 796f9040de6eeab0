//! Force coefficients of the wing and their statistics
use clap::Parser;
use flapwing::cli::{init_logger, Cli};
use flapwing::config::RunConfig;
use flapwing::forces::{deviation_from_reference, read_reference, Forces};
use flapwing::WingKinematics;
use log::{info, warn};
use std::fs::File;
use std::io::{BufWriter, Write};

fn main() -> anyhow::Result<()> {
    init_logger();
    let args = Cli::parse();
    let config = RunConfig::load_or_default(&args.simudir)?;
    let wing = WingKinematics::new(config.kinematics)?;
    let datadir = args.datadir();

    let forces = Forces::read(datadir.join("forces-0.txt"))?;
    let coeffs = forces.coefficients(&wing);
    let limits = (config.averaging[0], config.averaging[1]);
    let stats = coeffs.stats(limits);
    if args.show {
        println!("Force coefficients over t/T in [{}, {}]:", limits.0, limits.1);
        print!("{}", stats);
    }

    if args.data {
        let references = [
            ("C_T", &config.reference.thrust, &coeffs.ct),
            ("C_L", &config.reference.lift, &coeffs.cl),
        ];
        for (label, path, values) in references {
            let Some(path) = path else { continue };
            let path = RunConfig::resolve(&args.simudir, path);
            match read_reference(&path) {
                Ok((t_ref, v_ref)) => {
                    let dev = deviation_from_reference(&coeffs.t, values, &t_ref, &v_ref);
                    if args.show {
                        println!("RMS deviation of {} from {:?}: {:.4}", label, path, dev);
                    }
                }
                Err(e) => warn!("Skipping reference {:?}: {}", path, e),
            }
        }
    }

    if args.save {
        let path = datadir.join("force_coefficients.txt");
        let mut file = BufWriter::new(File::create(&path)?);
        writeln!(file, "# t/T C_T C_L C_Z")?;
        for i in 0..coeffs.t.len() {
            writeln!(
                file,
                "{:.10} {:.10e} {:.10e} {:.10e}",
                coeffs.t[i], coeffs.ct[i], coeffs.cl[i], coeffs.cz[i]
            )?;
        }
        file.flush()?;
        info!("Wrote {:?}", path);
    }
    Ok(())
}
