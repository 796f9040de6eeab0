//! Interface between ndarray and hdf5 for
//! easier reading/writing of scalars and multidimensional arrays.
//!
//! Datasets are addressed by a name and an optional group path
//! (`"p"`, `"x"` and `Some("p")` address `/p/x`). Nested groups
//! are created on demand when writing.
pub use hdf5::Error;
pub use hdf5::H5Type;
pub use hdf5::Result;
use ndarray::{Array, Array1, ArrayBase, ArrayD, Dimension};
use std::path::Path;

/// Read dataset from hdf5 file, return array
///
/// # Errors
/// Errors when file/variable does not exist or when the
/// stored dataset has a different dimensionality than `D`.
///
/// # Example
/// ```
/// use hdf5_interface::read_from_hdf5;
/// use hdf5_interface::write_to_hdf5;
/// use ndarray::prelude::*;
/// let fname = std::env::temp_dir().join("hdf5_interface_doc_read.h5");
/// let x = Array1::<f64>::zeros(6);
/// write_to_hdf5(&fname, "x", None, &x).unwrap();
/// let x: Array1<f64> = read_from_hdf5(&fname, "x", None).unwrap();
/// ```
pub fn read_from_hdf5<T, D, P>(filename: P, name: &str, group: Option<&str>) -> Result<Array<T, D>>
where
    T: H5Type + Copy,
    D: Dimension,
    P: AsRef<Path>,
{
    let file = hdf5::File::open(filename)?;
    let name_path = gen_name_path(name, group);
    let data = file.dataset(&name_path)?;
    let y: ArrayD<T> = data.read_dyn::<T>()?;
    let ndim = y.ndim();

    // Dyn to static
    y.into_dimensionality::<D>().map_err(|_| {
        Error::from(format!(
            "dataset {} has {} dimensions, expected {:?}",
            name_path,
            ndim,
            D::NDIM
        ))
    })
}

/// Write dataset to hdf5 file
///
/// The file is created if it does not exist. An existing
/// variable of the same name is overwritten.
///
/// # Errors
/// When the file cannot be opened or when file and
/// variable exist, but the variable has a different
/// shape than the input array.
///
/// # Example
/// ```
/// use hdf5_interface::write_to_hdf5;
/// use ndarray::prelude::*;
/// let fname = std::env::temp_dir().join("hdf5_interface_doc_write.h5");
/// let x = Array1::<f64>::zeros(6);
/// write_to_hdf5(&fname, "x", Some("grid"), &x).unwrap();
/// ```
pub fn write_to_hdf5<T, S, D, P>(
    filename: P,
    name: &str,
    group: Option<&str>,
    array: &ArrayBase<S, D>,
) -> Result<()>
where
    T: H5Type + Copy,
    S: ndarray::Data<Elem = T>,
    D: Dimension,
    P: AsRef<Path>,
{
    let file = open_or_create(filename.as_ref())?;
    let parent = match group {
        Some(g) => require_group(&file, g)?,
        None => file.as_group()?,
    };

    if parent.member_names()?.iter().any(|i| i == name) {
        let dset = parent.dataset(name)?;
        if dset.shape() == array.shape() {
            dset.write(&array.view())?;
            return Ok(());
        }
        parent.unlink(name)?;
    }
    parent
        .new_dataset_builder()
        .with_data(&array.view())
        .create(name)?;
    Ok(())
}

/// Read scalar from hdf5
///
/// Scalars are stored as datasets with a single entry.
///
/// # Errors
/// When file or variable does not exists, or when the
/// variable is not one-dimensional.
///
/// # Example
/// ```
/// use hdf5_interface::write_scalar_to_hdf5;
/// use hdf5_interface::read_scalar_from_hdf5;
/// let fname = std::env::temp_dir().join("hdf5_interface_doc_scalar.h5");
/// let x = 5.;
/// write_scalar_to_hdf5(&fname, "scalar", None, x).unwrap();
/// let x_read: f64 = read_scalar_from_hdf5(&fname, "scalar", None).unwrap();
/// assert!(x == x_read);
/// ```
pub fn read_scalar_from_hdf5<T, P>(filename: P, name: &str, group: Option<&str>) -> Result<T>
where
    T: H5Type + Copy,
    P: AsRef<Path>,
{
    let scalar: Array1<T> = read_from_hdf5(filename, name, group)?;
    scalar
        .first()
        .copied()
        .ok_or_else(|| Error::from(format!("dataset {} is empty", name)))
}

/// Write scalar to hdf5 file
///
/// # Errors
/// When the file cannot be opened or created.
pub fn write_scalar_to_hdf5<T, P>(filename: P, name: &str, group: Option<&str>, scalar: T) -> Result<()>
where
    T: H5Type + Copy,
    P: AsRef<Path>,
{
    let x = Array1::<T>::from_elem(1, scalar);
    write_to_hdf5(filename, name, group, &x)
}

/// Retrieve size of dimension from an hdf5 file
///
/// # Errors
/// When file or variable does not exists, or when the
/// variable is not one-dimensional.
pub fn hdf5_get_size_dimension<P: AsRef<Path>>(
    filename: P,
    name: &str,
    group: Option<&str>,
) -> Result<usize> {
    let file = hdf5::File::open(filename)?;
    let dset = file.dataset(&gen_name_path(name, group))?;
    match dset.shape().as_slice() {
        [n] => Ok(*n),
        shape => Err(Error::from(format!(
            "Dimension must be of size 1, but is of size {}",
            shape.len()
        ))),
    }
}

/// Return the names of all members of a group
/// (`None` lists the root of the file)
///
/// # Errors
/// When file or group does not exists.
pub fn member_names<P: AsRef<Path>>(filename: P, group: Option<&str>) -> Result<Vec<String>> {
    let file = hdf5::File::open(filename)?;
    match group {
        Some(g) => file.group(g)?.member_names(),
        None => file.member_names(),
    }
}

/// Check if a variable exists in a hdf5 file
///
/// # Errors
/// When file does not exists.
pub fn variable_exists<P: AsRef<Path>>(filename: P, name: &str, group: Option<&str>) -> Result<bool> {
    let file = hdf5::File::open(filename)?;
    Ok(file.link_exists(&gen_name_path(name, group)))
}

/// Delete datasets (or groups) from a hdf5 file.
/// Names which do not exist are skipped.
///
/// Returns the number of deleted members.
///
/// # Errors
/// When the file cannot be opened in read/write mode.
pub fn delete_from_hdf5<P: AsRef<Path>>(filename: P, names: &[&str]) -> Result<usize> {
    let file = hdf5::File::open_rw(filename)?;
    let mut deleted = 0;
    for name in names {
        if file.link_exists(name) {
            file.unlink(name)?;
            deleted += 1;
        }
    }
    Ok(deleted)
}

/// Open file in read/write mode, create it if it does not exist
fn open_or_create(filename: &Path) -> Result<hdf5::File> {
    if filename.exists() {
        hdf5::File::append(filename)
    } else {
        hdf5::File::create(filename)
    }
}

/// Return group, create all missing groups along the path
fn require_group(file: &hdf5::File, path: &str) -> Result<hdf5::Group> {
    let mut group = file.as_group()?;
    for name in path.split('/').filter(|s| !s.is_empty()) {
        group = if group.link_exists(name) {
            group.group(name)?
        } else {
            group.create_group(name)?
        };
    }
    Ok(group)
}

/// Generate full variable path inside hdf5 file from name
/// of the variable and name of the group (optional)
fn gen_name_path(name: &str, group: Option<&str>) -> String {
    group.map_or_else(
        || name.to_owned(),
        |g| {
            if g.ends_with('/') {
                g.to_owned() + name
            } else {
                g.to_owned() + "/" + name
            }
        },
    )
}
