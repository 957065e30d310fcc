//! Field-by-field reader over a JSON object that collects every violation.

use serde_json::{Map, Value};

use crate::error::{FieldViolation, ValidationError};

/// Walks the fields of one JSON object, coercing leniently and recording
/// every problem instead of stopping at the first.
pub(crate) struct FieldReader<'a> {
    object: &'a Map<String, Value>,
    prefix: &'a str,
    violations: Vec<FieldViolation>,
}

impl<'a> FieldReader<'a> {
    /// Start reading `value`, which must be a JSON object.
    pub(crate) fn new(value: &'a Value, prefix: &'a str) -> Result<Self, ValidationError> {
        let object = value.as_object().ok_or_else(|| {
            ValidationError::field(prefix, format!("expected an object, got {}", kind(value)))
        })?;
        Ok(Self {
            object,
            prefix,
            violations: Vec::new(),
        })
    }

    fn path(&self, field: &str) -> String {
        join(self.prefix, field)
    }

    pub(crate) fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.violations.push(FieldViolation {
            path: self.path(field),
            message: message.into(),
        });
    }

    fn required(&mut self, field: &str) -> Option<&'a Value> {
        let value = self.object.get(field).filter(|v| !v.is_null());
        if value.is_none() {
            self.reject(field, "field required");
        }
        value
    }

    /// A required string field.
    pub(crate) fn string(&mut self, field: &str) -> Option<String> {
        match self.required(field)? {
            Value::String(s) => Some(s.clone()),
            other => {
                self.reject(field, format!("expected a string, got {}", kind(other)));
                None
            }
        }
    }

    /// A required float field. Integers, numeric strings and booleans
    /// (as 1.0 / 0.0) are accepted.
    pub(crate) fn number(&mut self, field: &str) -> Option<f64> {
        let value = self.required(field)?;
        let number = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        };
        if number.is_none() {
            self.reject(field, format!("expected a number, got {}", kind(value)));
        }
        number
    }

    /// A required list of strings. Every bad element is reported by index.
    pub(crate) fn string_list(&mut self, field: &str) -> Option<Vec<String>> {
        let Value::Array(items) = self.required(field)? else {
            let got = kind(&self.object[field]);
            self.reject(field, format!("expected a list, got {got}"));
            return None;
        };

        let mut out = Vec::with_capacity(items.len());
        let mut valid = true;
        for (index, item) in items.iter().enumerate() {
            if let Value::String(s) = item {
                out.push(s.clone());
            } else {
                valid = false;
                let path = join(&self.path(field), &index.to_string());
                self.violations.push(FieldViolation {
                    path,
                    message: format!("expected a string, got {}", kind(item)),
                });
            }
        }
        valid.then_some(out)
    }

    /// An optional nested record; absent and `null` both yield `Some(None)`.
    ///
    /// Returns `None` only when the nested value is present but invalid,
    /// in which case its violations are merged into this reader.
    pub(crate) fn optional<T>(
        &mut self,
        field: &str,
        parse: impl FnOnce(&Value, &str) -> Result<T, ValidationError>,
    ) -> Option<Option<T>> {
        match self.object.get(field) {
            None | Some(Value::Null) => Some(None),
            Some(value) => {
                let path = self.path(field);
                match parse(value, &path) {
                    Ok(parsed) => Some(Some(parsed)),
                    Err(err) => {
                        self.violations.extend(err.into_violations());
                        None
                    }
                }
            }
        }
    }

    /// Fail with every violation recorded so far, if any.
    pub(crate) fn finish(self) -> Result<(), ValidationError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self.violations))
        }
    }
}

fn join(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_owned()
    } else {
        format!("{prefix}.{field}")
    }
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
