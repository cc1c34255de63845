use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A raw record returned by the search endpoints.
///
/// The field schema varies per payment system (month names in Spanish,
/// lowercase or capitalized depending on the table), so fields are kept
/// as an opaque map and read through the typed accessors below.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RegistroDeuda {
    pub id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl RegistroDeuda {
    /// Returns a text field, if present and a string.
    pub fn texto(&self, campo: &str) -> Option<&str> {
        self.fields.get(campo).and_then(Value::as_str)
    }

    /// Returns a numeric field. The backend stores amounts both as JSON
    /// numbers and as numeric strings; both are accepted. Non-finite or
    /// unparsable values yield `None`.
    pub fn monto(&self, campo: &str) -> Option<f64> {
        let valor = self.fields.get(campo)?;
        let n = match valor {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        n.is_finite().then_some(n)
    }

    /// Returns a positive numeric field, or `None` when the value is
    /// absent, unparsable, zero, or negative.
    pub fn monto_positivo(&self, campo: &str) -> Option<f64> {
        self.monto(campo).filter(|n| *n > 0.0)
    }
}
