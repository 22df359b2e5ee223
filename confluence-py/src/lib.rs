//! Python bindings for the confluence box suppression library.
//!
//! This module exposes `confluence_nms` to Python via PyO3.

use numpy::{PyReadonlyArray2, PyUntypedArrayMethods};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use confluence::{
    AnchorSelection, ConfluenceConfig as RustConfluenceConfig, ConfluenceError,
    ScoredBox as RustScoredBox,
};

/// Convert a ConfluenceError to a Python exception.
fn to_py_err(err: ConfluenceError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn parse_selection(selection: &str) -> PyResult<AnchorSelection> {
    match selection.to_lowercase().as_str() {
        "max_score" => Ok(AnchorSelection::MaxScore),
        "most_confluent" => Ok(AnchorSelection::MostConfluent),
        _ => Err(PyValueError::new_err(
            "selection must be 'max_score' or 'most_confluent'",
        )),
    }
}

/// Retained box with its (possibly decayed) score.
#[pyclass]
#[derive(Clone)]
pub struct ScoredBox {
    #[pyo3(get)]
    pub x1: f64,
    #[pyo3(get)]
    pub y1: f64,
    #[pyo3(get)]
    pub x2: f64,
    #[pyo3(get)]
    pub y2: f64,
    /// Confidence score.
    #[pyo3(get)]
    pub score: f64,
}

#[pymethods]
impl ScoredBox {
    /// Return `(x1, y1, x2, y2, score)`.
    fn to_tuple(&self) -> (f64, f64, f64, f64, f64) {
        (self.x1, self.y1, self.x2, self.y2, self.score)
    }

    fn __repr__(&self) -> String {
        format!(
            "ScoredBox(x1={:.2}, y1={:.2}, x2={:.2}, y2={:.2}, score={:.4})",
            self.x1, self.y1, self.x2, self.y2, self.score
        )
    }
}

impl From<RustScoredBox> for ScoredBox {
    fn from(b: RustScoredBox) -> Self {
        Self {
            x1: b.x1,
            y1: b.y1,
            x2: b.x2,
            y2: b.y2,
            score: b.score,
        }
    }
}

/// Suppression parameters, reusable across calls.
#[pyclass]
#[derive(Clone)]
pub struct ConfluenceConfig {
    inner: RustConfluenceConfig,
}

#[pymethods]
impl ConfluenceConfig {
    /// Create a new ConfluenceConfig.
    ///
    /// Args:
    ///     confluence_thr: Distance cutoff for decay (default: 0.7)
    ///     gaussian: Gaussian decay instead of hard removal (default: True)
    ///     score_thr: Minimum decayed score to keep (default: 0.05)
    ///     sigma: Gaussian decay width, must be > 0 (default: 0.5)
    ///     selection: "max_score" or "most_confluent" (default: "max_score")
    ///     parallel: Process classes in parallel (default: False)
    #[new]
    #[pyo3(signature = (
        confluence_thr = 0.7,
        gaussian = true,
        score_thr = 0.05,
        sigma = 0.5,
        selection = "max_score",
        parallel = false
    ))]
    fn new(
        confluence_thr: f64,
        gaussian: bool,
        score_thr: f64,
        sigma: f64,
        selection: &str,
        parallel: bool,
    ) -> PyResult<Self> {
        let inner = RustConfluenceConfig {
            confluence_thr,
            gaussian,
            score_thr,
            sigma,
            selection: parse_selection(selection)?,
            parallel,
        };
        inner.validate().map_err(to_py_err)?;
        Ok(Self { inner })
    }

    fn __repr__(&self) -> String {
        let cfg = &self.inner;
        format!(
            "ConfluenceConfig(confluence_thr={}, gaussian={}, score_thr={}, sigma={}, selection={:?}, parallel={})",
            cfg.confluence_thr, cfg.gaussian, cfg.score_thr, cfg.sigma, cfg.selection, cfg.parallel
        )
    }
}

fn run<'py>(
    py: Python<'py>,
    boxes: PyReadonlyArray2<'_, f64>,
    scores: &[f64],
    classes: &[i64],
    cfg: &RustConfluenceConfig,
) -> PyResult<Bound<'py, PyDict>> {
    let shape = boxes.shape();
    if shape[1] != 4 {
        return Err(PyValueError::new_err("boxes must have shape (N, 4)"));
    }
    let flat = boxes.as_slice()?;
    let rows: Vec<[f64; 4]> = flat
        .chunks_exact(4)
        .map(|c| [c[0], c[1], c[2], c[3]])
        .collect();

    let out = confluence::confluence_nms(&rows, scores, classes, cfg).map_err(to_py_err)?;

    let dict = PyDict::new(py);
    for (class_id, retained) in out {
        let retained: Vec<ScoredBox> = retained.into_iter().map(ScoredBox::from).collect();
        dict.set_item(class_id, retained)?;
    }
    Ok(dict)
}

/// Run confluence suppression on one image's detections.
///
/// Args:
///     boxes: float64 numpy array of shape (N, 4) with x1, y1, x2, y2
///     scores: sequence of N confidence scores
///     classes: sequence of N integer class ids
///     confluence_thr: Distance cutoff for decay (default: 0.7)
///     gaussian: Gaussian decay instead of hard removal (default: True)
///     score_thr: Minimum decayed score to keep (default: 0.05)
///     sigma: Gaussian decay width, must be > 0 (default: 0.5)
///     selection: "max_score" or "most_confluent" (default: "max_score")
///     parallel: Process classes in parallel (default: False)
///
/// Returns:
///     dict mapping class id to a list of ScoredBox in selection order
#[pyfunction]
#[pyo3(signature = (
    boxes,
    scores,
    classes,
    confluence_thr = 0.7,
    gaussian = true,
    score_thr = 0.05,
    sigma = 0.5,
    selection = "max_score",
    parallel = false
))]
#[allow(clippy::too_many_arguments)]
fn confluence_nms<'py>(
    py: Python<'py>,
    boxes: PyReadonlyArray2<'_, f64>,
    scores: Vec<f64>,
    classes: Vec<i64>,
    confluence_thr: f64,
    gaussian: bool,
    score_thr: f64,
    sigma: f64,
    selection: &str,
    parallel: bool,
) -> PyResult<Bound<'py, PyDict>> {
    let cfg = RustConfluenceConfig {
        confluence_thr,
        gaussian,
        score_thr,
        sigma,
        selection: parse_selection(selection)?,
        parallel,
    };
    run(py, boxes, &scores, &classes, &cfg)
}

/// Run confluence suppression with a prebuilt ConfluenceConfig.
#[pyfunction]
fn confluence_nms_with_config<'py>(
    py: Python<'py>,
    boxes: PyReadonlyArray2<'_, f64>,
    scores: Vec<f64>,
    classes: Vec<i64>,
    config: &ConfluenceConfig,
) -> PyResult<Bound<'py, PyDict>> {
    run(py, boxes, &scores, &classes, &config.inner)
}

/// Python module for confluence suppression.
#[pymodule]
fn _confluence(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ScoredBox>()?;
    m.add_class::<ConfluenceConfig>()?;
    m.add_function(wrap_pyfunction!(confluence_nms, m)?)?;
    m.add_function(wrap_pyfunction!(confluence_nms_with_config, m)?)?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
