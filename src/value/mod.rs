//! Typed constant values: scalars, homogeneous vectors, rectangular matrices.

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use serde::Serialize;

mod encode;

pub use encode::encode;

/// Named constants for one run, keyed by the Eidos identifier each value
/// is bound to.
pub type Constants = BTreeMap<String, Value>;

/// A homogeneous 1-D sequence of scalars. Serializes as a plain JSON array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Vector {
    Str(Vec<String>),
    Bool(Vec<bool>),
    Int(Vec<i64>),
    Float(Vec<f64>),
}

impl Vector {
    pub fn len(&self) -> usize {
        match self {
            Vector::Str(v) => v.len(),
            Vector::Bool(v) => v.len(),
            Vector::Int(v) => v.len(),
            Vector::Float(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A rectangular 2-D array, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    nrow: usize,
    ncol: usize,
    data: Vector,
}

impl Matrix {
    /// Build a matrix from row-major `data`. Fails unless
    /// `data.len() == nrow * ncol`.
    pub fn new(nrow: usize, ncol: usize, data: Vector) -> Result<Self> {
        if data.len() != nrow * ncol {
            bail!(
                "matrix data has {} elements, expected {}x{} = {}",
                data.len(),
                nrow,
                ncol,
                nrow * ncol
            );
        }
        Ok(Self { nrow, ncol, data })
    }

    /// Build a matrix from nested rows. Fails on ragged input.
    pub fn from_rows<T>(rows: Vec<Vec<T>>) -> Result<Self>
    where
        Vec<T>: Into<Vector>,
    {
        let nrow = rows.len();
        let ncol = rows.first().map_or(0, |r| r.len());
        let mut flat = Vec::with_capacity(nrow * ncol);
        for row in rows {
            if row.len() != ncol {
                bail!("matrix rows have unequal lengths ({} vs {})", ncol, row.len());
            }
            flat.extend(row);
        }
        Self::new(nrow, ncol, flat.into())
    }

    pub fn nrow(&self) -> usize {
        self.nrow
    }

    pub fn ncol(&self) -> usize {
        self.ncol
    }

    /// Row-major element data.
    pub fn data(&self) -> &Vector {
        &self.data
    }
}

/// A constant value injectable into a model's namespace.
///
/// The set of kinds is closed: strings, logicals, integers, floats, and
/// their 1-D and rectangular 2-D aggregates. Anything else cannot be
/// constructed, so encoding never has to guess a host value's type at
/// runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    Vector(Vector),
    Matrix(Matrix),
}

impl Value {
    /// Convert a dynamic JSON value.
    ///
    /// Numbers become `Int` when representable as `i64`, otherwise `Float`.
    /// Arrays of depth 1 become homogeneous vectors (mixed int/float
    /// promotes to float); arrays of depth 2 must be rectangular and become
    /// matrices; deeper nesting is rejected.
    pub fn from_json(json: &serde_json::Value) -> Result<Self> {
        use serde_json::Value as Json;
        match json {
            Json::String(s) => Ok(Value::Str(s.clone())),
            Json::Bool(b) => Ok(Value::Bool(*b)),
            Json::Number(n) => number_from_json(n),
            Json::Array(items) => {
                if items.iter().any(|i| i.is_array()) {
                    matrix_from_json(items)
                } else {
                    Ok(Value::Vector(vector_from_json(items)?))
                }
            }
            Json::Null | Json::Object(_) => bail!("unsupported constant value: {}", json),
        }
    }
}

/// Convert a JSON object into a [`Constants`] mapping, labelling any
/// conversion failure with the offending key.
pub fn constants_from_json(json: &serde_json::Value) -> Result<Constants> {
    let serde_json::Value::Object(entries) = json else {
        bail!("constants must be a JSON object, got: {}", json);
    };
    let mut constants = Constants::new();
    for (key, value) in entries {
        let value =
            Value::from_json(value).with_context(|| format!("constant '{}'", key))?;
        constants.insert(key.clone(), value);
    }
    Ok(constants)
}

fn number_from_json(n: &serde_json::Number) -> Result<Value> {
    if let Some(i) = n.as_i64() {
        return Ok(Value::Int(i));
    }
    n.as_f64()
        .map(Value::Float)
        .with_context(|| format!("unrepresentable number: {}", n))
}

fn vector_from_json(items: &[serde_json::Value]) -> Result<Vector> {
    if items.is_empty() {
        return Ok(Vector::Float(Vec::new()));
    }
    if items.iter().all(|i| i.is_string()) {
        let v = items
            .iter()
            .map(|i| i.as_str().unwrap_or_default().to_string())
            .collect();
        return Ok(Vector::Str(v));
    }
    if items.iter().all(|i| i.is_boolean()) {
        let v = items.iter().map(|i| i.as_bool().unwrap_or_default()).collect();
        return Ok(Vector::Bool(v));
    }
    if items.iter().all(|i| i.is_number()) {
        // All-integer stays integer; any float promotes the whole vector.
        if items.iter().all(|i| i.as_i64().is_some()) {
            let v = items.iter().map(|i| i.as_i64().unwrap_or_default()).collect();
            return Ok(Vector::Int(v));
        }
        let v = items.iter().map(|i| i.as_f64().unwrap_or_default()).collect();
        return Ok(Vector::Float(v));
    }
    bail!("vector elements must be all strings, all logicals, or all numbers")
}

fn matrix_from_json(rows: &[serde_json::Value]) -> Result<Value> {
    let mut flat = Vec::new();
    let mut ncol = None;
    for row in rows {
        let serde_json::Value::Array(cells) = row else {
            bail!("cannot mix scalars and arrays in one constant");
        };
        if cells.iter().any(|c| c.is_array()) {
            bail!("arrays with more than 2 dimensions are not supported");
        }
        match ncol {
            None => ncol = Some(cells.len()),
            Some(n) if n != cells.len() => {
                bail!("matrix rows have unequal lengths ({} vs {})", n, cells.len())
            }
            _ => {}
        }
        flat.extend(cells.iter().cloned());
    }
    let data = vector_from_json(&flat)?;
    let matrix = Matrix::new(rows.len(), ncol.unwrap_or(0), data)?;
    Ok(Value::Matrix(matrix))
}

impl From<Vec<String>> for Vector {
    fn from(v: Vec<String>) -> Self {
        Vector::Str(v)
    }
}

impl From<Vec<&str>> for Vector {
    fn from(v: Vec<&str>) -> Self {
        Vector::Str(v.into_iter().map(String::from).collect())
    }
}

impl From<Vec<bool>> for Vector {
    fn from(v: Vec<bool>) -> Self {
        Vector::Bool(v)
    }
}

impl From<Vec<i64>> for Vector {
    fn from(v: Vec<i64>) -> Self {
        Vector::Int(v)
    }
}

impl From<Vec<i32>> for Vector {
    fn from(v: Vec<i32>) -> Self {
        Vector::Int(v.into_iter().map(i64::from).collect())
    }
}

impl From<Vec<f64>> for Vector {
    fn from(v: Vec<f64>) -> Self {
        Vector::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<Vector> for Value {
    fn from(v: Vector) -> Self {
        Value::Vector(v)
    }
}

impl From<Matrix> for Value {
    fn from(v: Matrix) -> Self {
        Value::Matrix(v)
    }
}

impl<T> From<Vec<T>> for Value
where
    Vec<T>: Into<Vector>,
{
    fn from(v: Vec<T>) -> Self {
        Value::Vector(v.into())
    }
}
