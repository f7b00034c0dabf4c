//! Eidos literal encoding for constant defines.

use super::{Value, Vector};

/// Render `key=<literal>` where the literal reconstructs `value` with its
/// original type inside Eidos.
///
/// Scalars and vectors are wrapped in the matching type constructor over a
/// `c(...)` list; matrices flatten row-major and rebuild through
/// `matrix(..., byrow=T)`:
///
/// - `encode("key", &"val".into())` is `key=asString(c('val'))`
/// - `encode("key", &vec![1, 2].into())` is `key=asInteger(c(1,2))`
pub fn encode(key: &str, value: &Value) -> String {
    match value {
        Value::Str(s) => format!("{}=asString(c({}))", key, quote(s)),
        Value::Bool(b) => format!("{}=asLogical(c({}))", key, logical(*b)),
        Value::Int(n) => format!("{}=asInteger(c({}))", key, n),
        Value::Float(x) => format!("{}=asFloat(c({}))", key, float(*x)),
        Value::Vector(v) => format!("{}={}", key, vector_literal(v)),
        Value::Matrix(m) => format!(
            "{}=matrix({}, nrow={}, ncol={}, byrow=T)",
            key,
            vector_literal(m.data()),
            m.nrow(),
            m.ncol()
        ),
    }
}

fn vector_literal(v: &Vector) -> String {
    let (ctor, elems): (&str, Vec<String>) = match v {
        Vector::Str(xs) => ("asString", xs.iter().map(|s| quote(s)).collect()),
        Vector::Bool(xs) => ("asLogical", xs.iter().map(|b| logical(*b).to_string()).collect()),
        Vector::Int(xs) => ("asInteger", xs.iter().map(|n| n.to_string()).collect()),
        Vector::Float(xs) => ("asFloat", xs.iter().map(|x| float(*x)).collect()),
    };
    format!("{}(c({}))", ctor, elems.join(","))
}

// Eidos logical literals.
fn logical(b: bool) -> &'static str {
    if b {
        "T"
    } else {
        "F"
    }
}

// Keep a trailing `.0` on whole floats so the literal stays visibly a float.
fn float(x: f64) -> String {
    if x.is_finite() && x.fract() == 0.0 {
        format!("{:.1}", x)
    } else {
        format!("{}", x)
    }
}

// Single-quoted Eidos string, with `\` and `'` escaped so the literal
// survives the engine's parser.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        if ch == '\\' || ch == '\'' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('\'');
    out
}
