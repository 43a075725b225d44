//! Script value model: the expression types script statements evaluate to,
//! plus the unit/prefix metadata a value can carry alongside its number.

use smallvec::SmallVec;

/// The type an expression evaluates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprType {
    Int,
    Real,
    String,
    IntArray,
    RealArray,
}

/// Optional physical unit a numeric value is tagged with. Carried
/// alongside the number rather than folded into it so a built-in can
/// reject e.g. a bare integer where a `Hz` value was required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdUnit {
    None,
    Seconds,
    Hertz,
    Bel,
}

/// Metric prefix multiplier attached to a numeric literal or argument,
/// e.g. `3ms` carries [`MetricPrefix::Milli`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricPrefix {
    Micro,
    Milli,
    Centi,
    Deci,
    None,
    Deca,
    Hecto,
    Kilo,
}

impl MetricPrefix {
    pub fn factor(self) -> f64 {
        match self {
            MetricPrefix::Micro => 1e-6,
            MetricPrefix::Milli => 1e-3,
            MetricPrefix::Centi => 1e-2,
            MetricPrefix::Deci => 1e-1,
            MetricPrefix::None => 1.0,
            MetricPrefix::Deca => 1e1,
            MetricPrefix::Hecto => 1e2,
            MetricPrefix::Kilo => 1e3,
        }
    }
}

/// A runtime script value. Arrays are polymorphic over element type, held
/// inline up to a small fixed capacity before spilling to the heap.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int { value: i64, unit: StdUnit, prefix: MetricPrefix, is_final: bool },
    Real { value: f64, unit: StdUnit, prefix: MetricPrefix, is_final: bool },
    String(String),
    IntArray(SmallVec<[i64; 16]>),
    RealArray(SmallVec<[f64; 16]>),
}

impl Value {
    pub fn int(value: i64) -> Self {
        Value::Int { value, unit: StdUnit::None, prefix: MetricPrefix::None, is_final: false }
    }

    pub fn real(value: f64) -> Self {
        Value::Real { value, unit: StdUnit::None, prefix: MetricPrefix::None, is_final: false }
    }

    pub fn expr_type(&self) -> ExprType {
        match self {
            Value::Int { .. } => ExprType::Int,
            Value::Real { .. } => ExprType::Real,
            Value::String(_) => ExprType::String,
            Value::IntArray(_) => ExprType::IntArray,
            Value::RealArray(_) => ExprType::RealArray,
        }
    }

    pub fn is_final(&self) -> bool {
        match self {
            Value::Int { is_final, .. } | Value::Real { is_final, .. } => *is_final,
            _ => false,
        }
    }

    /// Casts to an integer, truncating a real value and applying `prefix`
    /// as a multiplier before truncation (mirrors `evalCastInt(prefix)`).
    pub fn eval_cast_int(&self, prefix: MetricPrefix) -> i64 {
        match self {
            Value::Int { value, prefix: own, .. } => {
                ((*value as f64) * own.factor() / prefix.factor()) as i64
            }
            Value::Real { value, prefix: own, .. } => {
                (*value * own.factor() / prefix.factor()) as i64
            }
            _ => 0,
        }
    }

    /// Widens to a real, applying `prefix` as a multiplier (mirrors
    /// `evalRealFinal(prefix)`).
    pub fn eval_real(&self, prefix: MetricPrefix) -> f64 {
        match self {
            Value::Int { value, prefix: own, .. } => (*value as f64) * own.factor() / prefix.factor(),
            Value::Real { value, prefix: own, .. } => *value * own.factor() / prefix.factor(),
            _ => 0.0,
        }
    }

    pub fn unit(&self) -> StdUnit {
        match self {
            Value::Int { unit, .. } | Value::Real { unit, .. } => *unit,
            _ => StdUnit::None,
        }
    }
}

/// A user-declared script variable, distinguished by sigil at parse time:
/// `$foo` (int), `~foo` (real), `?foo` (string), `%foo` (int array). The
/// reference grammar also allows real arrays via a declared-type `array`
/// statement rather than a distinct sigil.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarSigil {
    Int,
    Real,
    String,
    IntArray,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eval_cast_int_applies_prefix_conversion() {
        let v = Value::Real { value: 13.0, unit: StdUnit::Seconds, prefix: MetricPrefix::Milli, is_final: false };
        // 13ms expressed in seconds (prefix requested = None) should be 0.013 -> truncates to 0.
        assert_eq!(v.eval_cast_int(MetricPrefix::None), 0);
        // 13ms expressed back in milliseconds should round-trip to 13.
        assert_eq!(v.eval_cast_int(MetricPrefix::Milli), 13);
    }

    #[test]
    fn eval_real_applies_prefix_conversion() {
        let v = Value::Int { value: 2, unit: StdUnit::Hertz, prefix: MetricPrefix::Kilo, is_final: false };
        assert!((v.eval_real(MetricPrefix::None) - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn expr_type_matches_variant() {
        assert_eq!(Value::int(1).expr_type(), ExprType::Int);
        assert_eq!(Value::String(String::new()).expr_type(), ExprType::String);
    }
}
