//! Operator definitions for expressions.
//!
//! Each operator family maps its grammar token to a variant and applies the
//! operator to resolved scalar values. `null` operands never reach the
//! arithmetic itself: they propagate, except where three-valued logic says
//! otherwise.

use crate::access::Value;
use crate::expression::{ResolveError, ResolveResult};
use crate::syntax::TokenKind;
use std::cmp::Ordering;

/// Binary arithmetic operators (`+ - * /`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOperator {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithmeticOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus => Some(ArithmeticOperator::Add),
            TokenKind::Minus => Some(ArithmeticOperator::Sub),
            TokenKind::Mul => Some(ArithmeticOperator::Mul),
            TokenKind::Div => Some(ArithmeticOperator::Div),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ArithmeticOperator::Add => "+",
            ArithmeticOperator::Sub => "-",
            ArithmeticOperator::Mul => "*",
            ArithmeticOperator::Div => "/",
        }
    }

    /// Apply the operator to two scalars.
    ///
    /// Dates take part as their day number and any result involving a date
    /// is a whole day count. Division is always carried out on `f64`.
    pub fn apply(&self, left: &Value, right: &Value) -> ResolveResult<Value> {
        if left.is_null() || right.is_null() {
            return Ok(Value::Null);
        }

        let has_date = matches!(left, Value::Date(_)) || matches!(right, Value::Date(_));
        let (l, r) = (left.to_day_count(), right.to_day_count());

        if *self == ArithmeticOperator::Div {
            return match (l.as_f64(), r.as_f64()) {
                (Some(a), Some(b)) => Ok(Value::Number(a / b)),
                _ => Err(self.invalid(left, right)),
            };
        }

        match (&l, &r) {
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(match self {
                ArithmeticOperator::Add => a.wrapping_add(*b),
                ArithmeticOperator::Sub => a.wrapping_sub(*b),
                _ => a.wrapping_mul(*b),
            })),
            _ => match (l.as_f64(), r.as_f64()) {
                (Some(a), Some(b)) => {
                    let n = match self {
                        ArithmeticOperator::Add => a + b,
                        ArithmeticOperator::Sub => a - b,
                        _ => a * b,
                    };
                    if has_date {
                        Ok(Value::Integer(n as i64))
                    } else {
                        Ok(Value::Number(n))
                    }
                }
                _ => Err(self.invalid(left, right)),
            },
        }
    }

    fn invalid(&self, left: &Value, right: &Value) -> ResolveError {
        ResolveError::InvalidOperands {
            operator: self.as_str().to_string(),
            left: left.value_type(),
            right: right.value_type(),
        }
    }
}

/// Unary operators (`+ - not`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Plus,
    Minus,
    Not,
}

impl UnaryOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus => Some(UnaryOperator::Plus),
            TokenKind::Minus => Some(UnaryOperator::Minus),
            TokenKind::Not => Some(UnaryOperator::Not),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOperator::Plus => "+",
            UnaryOperator::Minus => "-",
            UnaryOperator::Not => "not",
        }
    }

    pub fn apply(&self, operand: &Value) -> ResolveResult<Value> {
        match (self, operand) {
            (_, Value::Null) => Ok(Value::Null),
            (UnaryOperator::Plus, Value::Integer(_) | Value::Number(_)) => Ok(operand.clone()),
            (UnaryOperator::Minus, Value::Integer(n)) => Ok(Value::Integer(n.wrapping_neg())),
            (UnaryOperator::Minus, Value::Number(n)) => Ok(Value::Number(-n)),
            (UnaryOperator::Not, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
            _ => Err(ResolveError::InvalidOperand {
                operator: self.as_str().to_string(),
                operand: operand.value_type(),
            }),
        }
    }
}

/// Boolean connectives (`and or xor`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanOperator {
    And,
    Or,
    Xor,
}

impl BooleanOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::And => Some(BooleanOperator::And),
            TokenKind::Or => Some(BooleanOperator::Or),
            TokenKind::Xor => Some(BooleanOperator::Xor),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BooleanOperator::And => "and",
            BooleanOperator::Or => "or",
            BooleanOperator::Xor => "xor",
        }
    }

    /// Three-valued logic: `null and false` is false, `null or true` is true.
    pub fn apply(&self, left: &Value, right: &Value) -> ResolveResult<Value> {
        let l = self.operand(left, right, left)?;
        let r = self.operand(left, right, right)?;

        let result = match (self, l, r) {
            (BooleanOperator::And, Some(false), _) | (BooleanOperator::And, _, Some(false)) => {
                Some(false)
            }
            (BooleanOperator::And, Some(true), Some(true)) => Some(true),
            (BooleanOperator::Or, Some(true), _) | (BooleanOperator::Or, _, Some(true)) => {
                Some(true)
            }
            (BooleanOperator::Or, Some(false), Some(false)) => Some(false),
            (BooleanOperator::Xor, Some(a), Some(b)) => Some(a != b),
            _ => None,
        };

        Ok(result.map_or(Value::Null, Value::Boolean))
    }

    fn operand(&self, left: &Value, right: &Value, value: &Value) -> ResolveResult<Option<bool>> {
        match value {
            Value::Null => Ok(None),
            Value::Boolean(b) => Ok(Some(*b)),
            _ => Err(ResolveError::InvalidOperands {
                operator: self.as_str().to_string(),
                left: left.value_type(),
                right: right.value_type(),
            }),
        }
    }
}

/// Comparison operators (`= <> < <= > >=`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl ComparisonOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Eq => Some(ComparisonOperator::Eq),
            TokenKind::Ne => Some(ComparisonOperator::Ne),
            TokenKind::Lt => Some(ComparisonOperator::Lt),
            TokenKind::Le => Some(ComparisonOperator::Le),
            TokenKind::Gt => Some(ComparisonOperator::Gt),
            TokenKind::Ge => Some(ComparisonOperator::Ge),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperator::Eq => "=",
            ComparisonOperator::Ne => "<>",
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Le => "<=",
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Ge => ">=",
        }
    }

    /// Compare two scalars; `null` on either side yields `null`.
    ///
    /// Integers and numbers compare numerically. A `NaN` operand is unordered,
    /// so only `<>` holds for it.
    pub fn apply(&self, left: &Value, right: &Value) -> ResolveResult<Value> {
        if left.is_null() || right.is_null() {
            return Ok(Value::Null);
        }

        let ordering = match (left, right) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Integer(_) | Value::Number(_), Value::Integer(_) | Value::Number(_)) => {
                match (left.as_f64(), right.as_f64()) {
                    (Some(a), Some(b)) => a.partial_cmp(&b),
                    _ => None,
                }
            }
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::Duration(a), Value::Duration(b)) => Some(compare_durations(a, b)),
            _ => {
                return Err(ResolveError::InvalidOperands {
                    operator: self.as_str().to_string(),
                    left: left.value_type(),
                    right: right.value_type(),
                })
            }
        };

        let result = match ordering {
            Some(ordering) => match self {
                ComparisonOperator::Eq => ordering == Ordering::Equal,
                ComparisonOperator::Ne => ordering != Ordering::Equal,
                ComparisonOperator::Lt => ordering == Ordering::Less,
                ComparisonOperator::Le => ordering != Ordering::Greater,
                ComparisonOperator::Gt => ordering == Ordering::Greater,
                ComparisonOperator::Ge => ordering != Ordering::Less,
            },
            None => *self == ComparisonOperator::Ne,
        };

        Ok(Value::Boolean(result))
    }
}

/// Rank of a period indicator, from daily to annual
fn duration_rank(indicator: &str) -> Option<u8> {
    match indicator.to_uppercase().as_str() {
        "D" => Some(1),
        "W" => Some(2),
        "M" => Some(3),
        "Q" => Some(4),
        "S" => Some(5),
        "A" => Some(6),
        _ => None,
    }
}

fn compare_durations(left: &str, right: &str) -> Ordering {
    match (duration_rank(left), duration_rank(right)) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => left.cmp(right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::ValueType;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> Value {
        Value::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_arithmetic_integers() {
        let (a, b) = (Value::Integer(7), Value::Integer(2));
        assert_eq!(ArithmeticOperator::Add.apply(&a, &b).unwrap(), Value::Integer(9));
        assert_eq!(ArithmeticOperator::Sub.apply(&a, &b).unwrap(), Value::Integer(5));
        assert_eq!(ArithmeticOperator::Mul.apply(&a, &b).unwrap(), Value::Integer(14));
        assert_eq!(ArithmeticOperator::Div.apply(&a, &b).unwrap(), Value::Number(3.5));
        assert_eq!(
            ArithmeticOperator::Add
                .apply(&Value::Integer(i64::MAX), &Value::Integer(1))
                .unwrap(),
            Value::Integer(i64::MIN)
        );
    }

    #[test]
    fn test_arithmetic_promotion() {
        assert_eq!(
            ArithmeticOperator::Add
                .apply(&Value::Integer(1), &Value::Number(0.5))
                .unwrap(),
            Value::Number(1.5)
        );
        assert_eq!(
            ArithmeticOperator::Mul
                .apply(&Value::Number(1.5), &Value::Number(2.0))
                .unwrap(),
            Value::Number(3.0)
        );
    }

    #[test]
    fn test_division_by_zero_is_not_an_error() {
        let result = ArithmeticOperator::Div
            .apply(&Value::Integer(1), &Value::Integer(0))
            .unwrap();
        assert_eq!(result, Value::Number(f64::INFINITY));

        let result = ArithmeticOperator::Div
            .apply(&Value::Integer(0), &Value::Integer(0))
            .unwrap();
        assert!(matches!(result, Value::Number(n) if n.is_nan()));
    }

    #[test]
    fn test_arithmetic_null_propagation() {
        for op in [
            ArithmeticOperator::Add,
            ArithmeticOperator::Sub,
            ArithmeticOperator::Mul,
            ArithmeticOperator::Div,
        ] {
            assert_eq!(op.apply(&Value::Null, &Value::Integer(1)).unwrap(), Value::Null);
            assert_eq!(op.apply(&Value::Number(1.0), &Value::Null).unwrap(), Value::Null);
            assert_eq!(op.apply(&Value::Null, &Value::Null).unwrap(), Value::Null);
        }
    }

    #[test]
    fn test_date_arithmetic() {
        let result = ArithmeticOperator::Sub
            .apply(&date(2024, 3, 1), &date(2024, 2, 1))
            .unwrap();
        assert_eq!(result, Value::Integer(29));

        let result = ArithmeticOperator::Add
            .apply(&date(1970, 1, 2), &Value::Integer(1))
            .unwrap();
        assert_eq!(result, Value::Integer(2));

        let result = ArithmeticOperator::Add
            .apply(&date(1970, 1, 2), &Value::Number(1.5))
            .unwrap();
        assert_eq!(result, Value::Integer(2));
    }

    #[test]
    fn test_arithmetic_invalid_operands() {
        let err = ArithmeticOperator::Add
            .apply(&Value::String("a".into()), &Value::Integer(1))
            .unwrap_err();
        assert!(matches!(
            err,
            ResolveError::InvalidOperands {
                left: ValueType::String,
                right: ValueType::Integer,
                ..
            }
        ));
    }

    #[test]
    fn test_unary() {
        assert_eq!(UnaryOperator::Minus.apply(&Value::Integer(5)).unwrap(), Value::Integer(-5));
        assert_eq!(UnaryOperator::Minus.apply(&Value::Number(2.5)).unwrap(), Value::Number(-2.5));
        assert_eq!(UnaryOperator::Plus.apply(&Value::Integer(5)).unwrap(), Value::Integer(5));
        assert_eq!(UnaryOperator::Minus.apply(&Value::Null).unwrap(), Value::Null);
        assert_eq!(UnaryOperator::Not.apply(&Value::Boolean(true)).unwrap(), Value::Boolean(false));
        assert!(UnaryOperator::Not.apply(&Value::Integer(1)).is_err());
        assert!(UnaryOperator::Minus.apply(&Value::Boolean(true)).is_err());
    }

    #[test]
    fn test_three_valued_logic() {
        let t = Value::Boolean(true);
        let f = Value::Boolean(false);
        let n = Value::Null;

        assert_eq!(BooleanOperator::And.apply(&t, &t).unwrap(), t);
        assert_eq!(BooleanOperator::And.apply(&t, &f).unwrap(), f);
        assert_eq!(BooleanOperator::And.apply(&n, &f).unwrap(), f);
        assert_eq!(BooleanOperator::And.apply(&n, &t).unwrap(), n);

        assert_eq!(BooleanOperator::Or.apply(&f, &f).unwrap(), f);
        assert_eq!(BooleanOperator::Or.apply(&n, &t).unwrap(), t);
        assert_eq!(BooleanOperator::Or.apply(&n, &f).unwrap(), n);

        assert_eq!(BooleanOperator::Xor.apply(&t, &f).unwrap(), t);
        assert_eq!(BooleanOperator::Xor.apply(&t, &t).unwrap(), f);
        assert_eq!(BooleanOperator::Xor.apply(&n, &t).unwrap(), n);

        assert!(BooleanOperator::And.apply(&t, &Value::Integer(1)).is_err());
    }

    #[test]
    fn test_comparisons() {
        let cmp = |op: ComparisonOperator, l: Value, r: Value| op.apply(&l, &r).unwrap();

        assert_eq!(cmp(ComparisonOperator::Lt, Value::Integer(1), Value::Integer(2)), Value::Boolean(true));
        assert_eq!(cmp(ComparisonOperator::Le, Value::Number(1.1), Value::Number(1.1)), Value::Boolean(true));
        assert_eq!(cmp(ComparisonOperator::Ne, Value::Integer(1), Value::Integer(1)), Value::Boolean(false));
        assert_eq!(cmp(ComparisonOperator::Eq, Value::Integer(1), Value::Number(1.0)), Value::Boolean(true));
        assert_eq!(cmp(ComparisonOperator::Gt, Value::String("b".into()), Value::String("a".into())), Value::Boolean(true));
        assert_eq!(cmp(ComparisonOperator::Ge, date(2024, 1, 1), date(2023, 12, 31)), Value::Boolean(true));
        assert_eq!(cmp(ComparisonOperator::Eq, Value::Null, Value::Integer(1)), Value::Null);
    }

    #[test]
    fn test_duration_ordering() {
        let d = Value::Duration("D".into());
        let a = Value::Duration("A".into());
        let m = Value::Duration("M".into());
        assert_eq!(ComparisonOperator::Lt.apply(&d, &a).unwrap(), Value::Boolean(true));
        assert_eq!(ComparisonOperator::Gt.apply(&m, &d).unwrap(), Value::Boolean(true));
        assert_eq!(ComparisonOperator::Eq.apply(&m, &m).unwrap(), Value::Boolean(true));
    }

    #[test]
    fn test_nan_is_unordered() {
        let nan = Value::Number(f64::NAN);
        assert_eq!(ComparisonOperator::Eq.apply(&nan, &nan).unwrap(), Value::Boolean(false));
        assert_eq!(ComparisonOperator::Ne.apply(&nan, &nan).unwrap(), Value::Boolean(true));
        assert_eq!(ComparisonOperator::Lt.apply(&nan, &Value::Integer(1)).unwrap(), Value::Boolean(false));
    }

    #[test]
    fn test_comparison_of_unrelated_kinds() {
        assert!(ComparisonOperator::Eq
            .apply(&Value::Integer(1), &Value::String("1".into()))
            .is_err());
    }

    #[test]
    fn test_from_token() {
        assert_eq!(ArithmeticOperator::from_token(TokenKind::Div), Some(ArithmeticOperator::Div));
        assert_eq!(ArithmeticOperator::from_token(TokenKind::Concat), None);
        assert_eq!(UnaryOperator::from_token(TokenKind::Not), Some(UnaryOperator::Not));
        assert_eq!(BooleanOperator::from_token(TokenKind::Xor), Some(BooleanOperator::Xor));
        assert_eq!(ComparisonOperator::from_token(TokenKind::Ne), Some(ComparisonOperator::Ne));
        assert_eq!(ComparisonOperator::from_token(TokenKind::Plus), None);
    }
}
