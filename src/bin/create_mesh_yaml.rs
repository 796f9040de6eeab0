//! Write the YAML description of the stretched Cartesian mesh
//!
//! The mesh is uniform around the wing, stretched towards an
//! intermediate box and stretched again towards the domain boundaries.
use clap::Parser;
use flapwing::cli::{init_logger, Cli};
use flapwing::config::RunConfig;
use flapwing::grid::{resize_for_uniform, GridlineConfig, Segment};
use flapwing::{Grid3, WingKinematics};

/// Sub-domains along one direction: outer box `p1..p6`, intermediate
/// box `p2..p5`, uniform box `p3..p4`
fn gridline(direction: &str, p: [f64; 6], d1: f64, d2: f64, r: [f64; 4]) -> GridlineConfig {
    let segments = [
        Segment::stretched(p[0], p[1], d1, r[0], 20. * d1, true),
        Segment::stretched(p[1], p[2], d2, r[1], d1, true),
        Segment::uniform(p[2], p[3], d2),
        Segment::stretched(p[3], p[4], d2, r[2], d1, false),
        Segment::stretched(p[4], p[5], d1, r[3], 20. * d1, false),
    ];
    GridlineConfig::from_segments(direction, &segments).rounded(10)
}

fn main() -> anyhow::Result<()> {
    init_logger();
    let args = Cli::parse();
    let config = RunConfig::load_or_default(&args.simudir)?;
    let wing = WingKinematics::new(config.kinematics)?;
    let (c, s, a_phi) = (wing.chord(), wing.span(), wing.rolling_amplitude());

    let outer = [[-15., 15.], [-12.5, 12.5], [-12.5, 12.5]];
    let inner = [[-2., 6.], [-3., 3.], [-1., 2.]];
    let width = 0.05 * c;
    let dx = 0.01 * c;
    let buf = 0.05 * c;
    let fine = [
        resize_for_uniform(c, 0., dx, buf),
        resize_for_uniform(2. * s * a_phi.cos(), 0., dx, buf),
        resize_for_uniform(s, s / 2., dx, buf),
    ];
    let ratios = [[1.2, 1.1, 1.03, 1.2], [1.2, 1.1, 1.1, 1.2], [1.2, 1.1, 1.1, 1.2]];

    let configs = [0, 1, 2].map(|i| {
        let p = [outer[i][0], inner[i][0], fine[i].0, fine[i].1, inner[i][1], outer[i][1]];
        gridline(["x", "y", "z"][i], p, width, dx, ratios[i])
    });

    if args.show {
        for config in &configs {
            println!("{}", config);
        }
        let grid = Grid3::from_configs(&configs);
        let total: usize = configs.iter().map(GridlineConfig::cells).product();
        println!("{}", grid);
        println!("total number of cells: {}", total);
    }
    if args.save {
        let path = args.simudir.join("mesh.yaml");
        std::fs::write(&path, serde_yaml::to_string(&configs)?)?;
        log::info!("Wrote {:?}", path);
    }
    Ok(())
}
