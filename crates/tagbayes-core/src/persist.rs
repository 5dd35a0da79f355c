//! Model artifact I/O.
//!
//! The model is stored as a compressed NumPy `.npz` archive holding two
//! arrays: `a` (general tags × characters, f32) and `b` (characters, f32).

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;

use ndarray::{Array1, Array2};
use ndarray_npy::{NpzReader, NpzWriter};

use crate::error::PersistError;
use crate::scoring::ScoreModel;

/// Write a model to `path`, creating parent directories as needed.
pub fn save(model: &ScoreModel, path: &Path) -> Result<(), PersistError> {
    let write_err = |message: String| PersistError::Write {
        path: path.to_path_buf(),
        message,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
    }

    let file = File::create(path).map_err(|e| write_err(e.to_string()))?;
    let mut npz = NpzWriter::new_compressed(BufWriter::new(file));
    npz.add_array("a", model.a())
        .map_err(|e| write_err(e.to_string()))?;
    npz.add_array("b", model.b())
        .map_err(|e| write_err(e.to_string()))?;
    let mut writer = npz.finish().map_err(|e| write_err(e.to_string()))?;
    writer.flush().map_err(|e| write_err(e.to_string()))?;

    let (general, character) = model.dims();
    tracing::info!(
        "Model written to {:?} (a: {}x{}, b: {})",
        path,
        general,
        character,
        character,
    );
    Ok(())
}

/// Read a model written by [`save`] (or by NumPy's `savez_compressed`).
pub fn load(path: &Path) -> Result<ScoreModel, PersistError> {
    let read_err = |message: String| PersistError::Read {
        path: path.to_path_buf(),
        message,
    };

    let file = File::open(path).map_err(|e| read_err(e.to_string()))?;
    let mut npz = NpzReader::new(BufReader::new(file)).map_err(|e| read_err(e.to_string()))?;

    let a: Array2<f32> = read_named(&mut npz, "a").map_err(read_err)?;
    let b: Array1<f32> = read_named(&mut npz, "b").map_err(read_err)?;

    let (rows, cols, bias_len) = (a.nrows(), a.ncols(), b.len());
    ScoreModel::new(a, b).ok_or_else(|| PersistError::Shape {
        path: path.to_path_buf(),
        rows,
        cols,
        bias_len,
    })
}

/// Read an array stored either as `name` or `name.npy`.
fn read_named<R, D>(npz: &mut NpzReader<R>, name: &str) -> Result<ndarray::Array<f32, D>, String>
where
    R: Read + Seek,
    D: ndarray::Dimension,
{
    let names = npz.names().map_err(|e| e.to_string())?;
    let with_ext = format!("{name}.npy");
    let entry = names
        .iter()
        .find(|n| **n == with_ext || *n == name)
        .ok_or_else(|| format!("array {name:?} not found (entries: {names:?})"))?
        .clone();
    npz.by_name(&entry).map_err(|e| e.to_string())
}
