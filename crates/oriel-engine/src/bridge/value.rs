/// Script-visible value.
///
/// Closed tagged union covering everything the bridge marshals. Objects and
/// arrays have no structured representation; engines convert them to their
/// string form before crossing the boundary, so `Str` doubles as the opaque
/// fallback.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptValue {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
}

impl ScriptValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ScriptValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScriptValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScriptValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for ScriptValue {
    fn from(b: bool) -> Self {
        ScriptValue::Bool(b)
    }
}

impl From<f64> for ScriptValue {
    fn from(n: f64) -> Self {
        ScriptValue::Number(n)
    }
}

impl From<&str> for ScriptValue {
    fn from(s: &str) -> Self {
        ScriptValue::Str(s.to_string())
    }
}

impl From<String> for ScriptValue {
    fn from(s: String) -> Self {
        ScriptValue::Str(s)
    }
}

/// Positional arguments passed to a bound native callback.
///
/// Accessors never fail hard: an out-of-range index or a type mismatch
/// yields `None`, and the callback decides what absence means. The bridge
/// performs no arity checking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptArgs(pub Vec<ScriptValue>);

impl ScriptArgs {
    pub fn new(values: Vec<ScriptValue>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ScriptValue> {
        self.0.get(index)
    }

    pub fn bool_at(&self, index: usize) -> Option<bool> {
        self.0.get(index)?.as_bool()
    }

    pub fn f64_at(&self, index: usize) -> Option<f64> {
        self.0.get(index)?.as_f64()
    }

    /// Numeric argument narrowed to `f32` (script numbers are always f64).
    pub fn f32_at(&self, index: usize) -> Option<f32> {
        self.f64_at(index).map(|n| n as f32)
    }

    pub fn str_at(&self, index: usize) -> Option<&str> {
        self.0.get(index)?.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_return_none_out_of_range() {
        let args = ScriptArgs::new(vec![ScriptValue::Number(1.0)]);
        assert_eq!(args.f64_at(0), Some(1.0));
        assert_eq!(args.f64_at(1), None);
        assert_eq!(args.bool_at(7), None);
        assert_eq!(args.str_at(7), None);
    }

    #[test]
    fn accessors_return_none_on_type_mismatch() {
        let args = ScriptArgs::new(vec![ScriptValue::Str("panel".into())]);
        assert_eq!(args.str_at(0), Some("panel"));
        assert_eq!(args.f64_at(0), None);
        assert_eq!(args.bool_at(0), None);
    }

    #[test]
    fn f32_narrowing() {
        let args = ScriptArgs::new(vec![ScriptValue::Number(-1.5)]);
        assert_eq!(args.f32_at(0), Some(-1.5f32));
    }
}
