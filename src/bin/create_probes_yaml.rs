//! Write the YAML configuration of the volume probes
use clap::Parser;
use flapwing::cli::{init_logger, Cli};
use flapwing::config::RunConfig;
use flapwing::probes::{ProbeVolume, ProbesConfig};
use flapwing::{Grid3, WingKinematics};

fn main() -> anyhow::Result<()> {
    init_logger();
    let args = Cli::parse();
    let config = RunConfig::load_or_default(&args.simudir)?;
    let wing = WingKinematics::new(config.kinematics)?;
    let gridpath = args.datadir().join("grid.h5");
    let (c, s, a_phi) = (wing.chord(), wing.span(), wing.rolling_amplitude());
    let nt_period = config.kinematics.nt_period;
    let t_start = (config.kinematics.n_periods as f64 - 1.) * wing.period();
    let t_end = wing.final_time();

    let mut probes = vec![];
    for field in ["u", "v", "w"] {
        let grid = Grid3::read(&gridpath, field)?;
        for (i, &xloc) in config.xlocs.iter().enumerate() {
            // time-averaged wake profiles
            let name = format!("probe{}-{}", i + 1, field);
            let bounds = if field == "w" {
                [[xloc, xloc], [0., 0.], [-3., 3.]]
            } else {
                [[xloc, xloc], [-3., 3.], [s / 2., s / 2.]]
            };
            probes.push(
                ProbeVolume::new(&name, field, bounds)
                    .adjust_box(&grid)
                    .with_n_sum(nt_period),
            );
        }
        for (i, &xloc) in config.xlocs.iter().enumerate() {
            // profiles over the last period for the kinetic energy
            let name = format!("probe{}-{}-kin", i + 1, field);
            let bounds = [[xloc, xloc], [-3., 3.], [s / 2., s / 2.]];
            probes.push(
                ProbeVolume::new(&name, field, bounds)
                    .adjust_box(&grid)
                    .with_window(t_start, t_end),
            );
        }
    }

    let buf = 0.05 * c;
    for field in ["u", "v", "w", "p"] {
        let grid = Grid3::read(&gridpath, field)?;
        let bounds = [
            [-c / 2. - buf, c / 2. + buf],
            [-s * a_phi.cos() - buf, s * a_phi.cos() + buf],
            [-buf, s + buf],
        ];
        let name = format!("probe_vicinity-{}", field);
        probes.push(
            ProbeVolume::new(&name, field, bounds)
                .adjust_box(&grid)
                .with_window(t_start, t_end)
                .with_n_monitor(((nt_period as f64) / 100.).round() as usize),
        );
    }

    let probes = ProbesConfig { probes };
    if args.show {
        for probe in &probes.probes {
            println!("{}: {} in {:?}", probe.name, probe.field, probe.bounds);
        }
    }
    if args.save {
        probes.write(args.simudir.join("probes.yaml"))?;
    }
    Ok(())
}
