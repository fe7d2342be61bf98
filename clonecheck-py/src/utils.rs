use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use clonecheck_core::error::CheckError;

pub fn to_py_err(err: CheckError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

pub fn bytes_to_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
