//! Write XDMF files to visualize solution files with ParaView or VisIt
//!
//! The XDMF file describes a temporal collection of 3D rectilinear
//! grids. Attributes are read from solution files named after the
//! time-step index (`0008500.h5`), one directory per attribute.
use crate::grid::Grid3;
use crate::{Error, Result};
use log::info;
use std::fs::File;
use std::io::{LineWriter, Write};
use std::path::{Path, PathBuf};

/// Name of the solution file of a time step
pub fn solution_file(timestep: usize) -> String {
    format!("{:0>7}.h5", timestep)
}

/// Create xmf file for a series of solution files
#[derive(Debug, Clone)]
pub struct XdmfWriter {
    /// Shape `[nz, ny, nx]`
    shape: [usize; 3],
    /// File with gridlines
    gridpath: PathBuf,
    /// Group of the gridlines in the grid file
    gridname: String,
    /// Attribute names (dataset names) and directories of their files
    attributes: Vec<(String, PathBuf)>,
    /// Time-step index and time of each state
    states: Vec<(usize, f64)>,
}

impl XdmfWriter {
    /// Writer for fields defined on `grid`, whose gridlines are stored
    /// in `gridpath` under `gridname`
    pub fn new<P: AsRef<Path>>(grid: &Grid3, gridpath: P, gridname: &str) -> Self {
        Self {
            shape: grid.shape(),
            gridpath: gridpath.as_ref().to_path_buf(),
            gridname: gridname.to_string(),
            attributes: vec![],
            states: vec![],
        }
    }

    /// Add scalar attribute stored in the files of `datadir`
    pub fn attribute<P: AsRef<Path>>(mut self, name: &str, datadir: P) -> Self {
        self.attributes
            .push((name.to_string(), datadir.as_ref().to_path_buf()));
        self
    }

    /// Add time step
    pub fn state(mut self, timestep: usize, time: f64) -> Self {
        self.states.push((timestep, time));
        self
    }

    /// Number of states
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// No states added
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    fn dimensions(&self) -> String {
        format!("{} {} {}", self.shape[0], self.shape[1], self.shape[2])
    }

    /// Return string, which defines the geometry
    fn geometry_string(&self) -> String {
        let mut string = String::from("<Geometry GeometryType=\"VXVYVZ\">\n");
        for (dir, n) in [("x", self.shape[2]), ("y", self.shape[1]), ("z", self.shape[0])] {
            string += &format!(
                "<DataItem Dimensions=\"{}\" NumberType=\"Float\" Precision=\"8\" Format=\"HDF\">{}:/{}/{}</DataItem>\n",
                n,
                self.gridpath.display(),
                self.gridname,
                dir
            );
        }
        string += "</Geometry>\n";
        string
    }

    /// Return string, which defines one time step
    fn state_string(&self, timestep: usize, time: f64) -> String {
        let mut string = String::from("<Grid Name=\"Grid\" GridType=\"Uniform\">\n");
        string += &format!("<Time Value=\"{}\" />\n", time);
        string += &format!(
            "<Topology TopologyType=\"3DRectMesh\" Dimensions=\"{}\"/>\n",
            self.dimensions()
        );
        string += &self.geometry_string();
        for (name, datadir) in &self.attributes {
            let filepath = datadir.join(solution_file(timestep));
            string += &format!(
                "<Attribute Name=\"{}\" AttributeType=\"Scalar\" Center=\"Node\">\n",
                name
            );
            string += &format!(
                "<DataItem Dimensions=\"{}\" NumberType=\"Float\" Precision=\"8\" Format=\"HDF\">{}:/{}</DataItem>\n",
                self.dimensions(),
                filepath.display(),
                name
            );
            string += "</Attribute>\n";
        }
        string += "</Grid>\n";
        string
    }

    /// Write xmf file
    ///
    /// # Errors
    /// File cannot be written.
    pub fn write<P: AsRef<Path>>(&self, xmfpath: P) -> Result<()> {
        let xmfpath = xmfpath.as_ref();
        let write = || -> std::io::Result<()> {
            let file = File::create(xmfpath)?;
            let mut file = LineWriter::new(file);

            // Write header
            file.write_all(b"<?xml version=\"1.0\" ?>\n")?;
            file.write_all(b"<!DOCTYPE Xdmf SYSTEM \"Xdmf.dtd\" []>\n")?;
            file.write_all(b"<Xdmf Version=\"2.0\">\n")?;
            file.write_all(b"<Domain>\n")?;
            file.write_all(
                b"<Grid Name=\"TimeSeries\" GridType=\"Collection\" CollectionType=\"Temporal\">\n",
            )?;

            for (timestep, time) in &self.states {
                file.write_all(self.state_string(*timestep, *time).as_bytes())?;
            }

            // Write closer
            file.write_all(b"</Grid>\n")?;
            file.write_all(b"</Domain>\n")?;
            file.write_all(b"</Xdmf>\n")?;
            file.flush()
        };
        write().map_err(|e| Error::io(xmfpath, e))?;
        info!("Wrote {} states to {:?}", self.states.len(), xmfpath);
        Ok(())
    }
}
