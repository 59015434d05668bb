//! Python bindings for twiddle-bloom using PyO3

use crate::bloom::BloomFilter;
use numpy::{IntoPyArray, PyArray1};
use pyo3::prelude::*;

/// Python wrapper for BloomFilter
///
/// Elements are keyed by Python's own `hash(x)`, so anything hashable can be
/// stored and equal objects probe the same bits.
#[pyclass(name = "BloomFilterA2")]
struct PyBloomFilterA2 {
    inner: BloomFilter,
}

#[pymethods]
impl PyBloomFilterA2 {
    #[new]
    fn new(size: usize, aux_factor: f64, false_positive_target: f64) -> PyResult<Self> {
        let filter = BloomFilter::new(size, aux_factor, false_positive_target)
            .map_err(|e| PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string()))?;

        Ok(PyBloomFilterA2 { inner: filter })
    }

    fn set(&mut self, x: &PyAny) -> PyResult<bool> {
        let key = x.hash()?;
        Ok(self.inner.insert(&key))
    }

    fn test(&self, x: &PyAny) -> PyResult<bool> {
        let key = x.hash()?;
        Ok(self.inner.contains(&key))
    }

    fn __contains__(&self, x: &PyAny) -> PyResult<bool> {
        self.test(x)
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn load_factor(&self) -> f64 {
        self.inner.load_factor()
    }

    fn estimated_fpr(&self) -> f64 {
        self.inner.estimated_fpr()
    }

    fn num_bits(&self) -> usize {
        self.inner.num_bits()
    }

    fn num_hashes(&self) -> usize {
        self.inner.num_hash_functions()
    }

    fn array<'py>(&self, py: Python<'py>) -> &'py PyArray1<u8> {
        self.inner.bit_store().to_bytes().into_pyarray(py)
    }

    fn stats(&self) -> String {
        self.inner.stats().to_string()
    }

    fn __repr__(&self) -> String {
        format!(
            "BloomFilterA2(size={}, num_bits={}, num_hashes={})",
            self.inner.capacity(),
            self.inner.num_bits(),
            self.inner.num_hash_functions()
        )
    }
}

/// Python module definition
#[pymodule]
fn twiddle_bloom(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<PyBloomFilterA2>()?;
    m.add("__version__", "0.1.0")?;

    Ok(())
}
