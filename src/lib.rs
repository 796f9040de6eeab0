#![warn(missing_docs)]
//! # flapwing: tools for a rolling-pitching flapping wing study
//!
//! Pre- and post-processing for immersed-boundary simulations of a
//! flat elliptical wing that rolls and pitches in a uniform stream:
//! - Kinematics: angles, angular velocities and rigid-body motion of
//!   the Lagrangian markers ([`kinematics`])
//! - Regularization of closed contours to uniform arc-length spacing
//!   ([`regularize`])
//! - Grids, meshes and fields of the staggered solver output
//!   ([`grid`], [`field`]), linear interpolation ([`interpolate`]) and
//!   Q-criterion ([`field::qcriterion`])
//! - Volume probes and wake profiles ([`probes`], [`profiles`]),
//!   positions of the wake vortices ([`vortex`])
//! - Force coefficients, hydrodynamic power, efficiency ([`forces`])
//! - XDMF files for visualization ([`xdmf`])
pub mod cli;
pub mod config;
pub mod error;
pub mod field;
pub mod forces;
pub mod grid;
pub mod interpolate;
pub mod kinematics;
pub mod probes;
pub mod profiles;
pub mod regularize;
pub mod vortex;
pub mod xdmf;

pub use error::{Error, Result};
pub use field::Field3;
pub use grid::Grid3;
pub use kinematics::{Body, KinematicsParams, WingKinematics};

