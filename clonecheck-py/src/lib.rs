use pyo3::prelude::*;

mod align;
mod orf;
mod utils;
mod verify;

#[pymodule]
fn _native(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    align::register(m)?;
    orf::register(m)?;
    verify::register(m)?;
    Ok(())
}
