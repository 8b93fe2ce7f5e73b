//! Hash join of two datasets on their common identifier columns.
//!
//! This is how binary operators are broadcast over datasets. Algorithm:
//! 1. Build phase: index the right dataset by its composite identifier key
//! 2. Probe phase: for each left row, look up rows with an equal key
//! 3. Merge: copy the identifiers from the left row and combine every common
//!    measure with the operator
//!
//! Rows whose key is absent on either side are dropped (inner join).

use crate::access::{Dataset, Row, Value};
use crate::catalog::Column;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JoinError {
    #[error("join key column list was empty")]
    EmptyKeyColumns,
}

/// How composite row keys are built from identifier values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum JoinKeyPolicy {
    /// Key on the tuple of identifier values. Distinct tuples never collide.
    #[default]
    Typed,
    /// Key on the string forms of the identifier values concatenated without
    /// separator. `("a", "bc")` and `("ab", "c")` share the key `"abc"`.
    Concatenated,
}

/// Wrapper type for join keys that implements Hash and Eq
#[derive(Clone, Debug)]
enum JoinKey {
    Typed(Vec<Value>),
    Concatenated(String),
}

impl Hash for JoinKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            JoinKey::Typed(values) => {
                for value in values {
                    hash_value(value, state);
                }
            }
            JoinKey::Concatenated(key) => key.hash(state),
        }
    }
}

fn hash_value<H: Hasher>(value: &Value, state: &mut H) {
    match value {
        Value::Null => 0u8.hash(state),
        Value::Integer(i) => {
            1u8.hash(state);
            i.hash(state);
        }
        Value::Number(n) => {
            2u8.hash(state);
            n.to_bits().hash(state);
        }
        Value::String(s) => {
            3u8.hash(state);
            s.hash(state);
        }
        Value::Boolean(b) => {
            4u8.hash(state);
            b.hash(state);
        }
        Value::Date(d) => {
            5u8.hash(state);
            d.hash(state);
        }
        Value::Duration(d) => {
            6u8.hash(state);
            d.hash(state);
        }
        Value::Dataset(_) => 7u8.hash(state),
    }
}

fn same_key_value(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.to_bits() == b.to_bits(),
        _ => left == right,
    }
}

impl PartialEq for JoinKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (JoinKey::Typed(a), JoinKey::Typed(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(l, r)| same_key_value(l, r))
            }
            (JoinKey::Concatenated(a), JoinKey::Concatenated(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for JoinKey {}

/// Everything the join needs to know, fixed at compile time.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinSpec {
    identifiers: Vec<Column>,
    measures: Vec<Column>,
    policy: JoinKeyPolicy,
}

impl JoinSpec {
    /// `measures` carry the type of the combined values, which may differ
    /// from the operand columns (division always yields numbers).
    pub fn new(
        identifiers: Vec<Column>,
        measures: Vec<Column>,
        policy: JoinKeyPolicy,
    ) -> Result<Self, JoinError> {
        if identifiers.is_empty() {
            return Err(JoinError::EmptyKeyColumns);
        }
        Ok(Self {
            identifiers,
            measures,
            policy,
        })
    }

    pub fn identifiers(&self) -> &[Column] {
        &self.identifiers
    }

    pub fn measures(&self) -> &[Column] {
        &self.measures
    }

    pub fn policy(&self) -> JoinKeyPolicy {
        self.policy
    }

    /// Columns of the joined rows: common identifiers, then common measures.
    pub fn output_columns(&self) -> Vec<Column> {
        self.identifiers
            .iter()
            .chain(self.measures.iter())
            .cloned()
            .collect()
    }

    fn key_of(&self, row: &Row) -> JoinKey {
        let values = self
            .identifiers
            .iter()
            .map(|c| row.get(&c.name).cloned().unwrap_or(Value::Null));
        match self.policy {
            JoinKeyPolicy::Typed => JoinKey::Typed(values.collect()),
            JoinKeyPolicy::Concatenated => {
                JoinKey::Concatenated(values.fold(String::new(), |mut key, value| {
                    key.push_str(&value.to_string());
                    key
                }))
            }
        }
    }

    fn merge_rows<F, E>(&self, left: &Row, right: &Row, combine: &F) -> Result<Row, E>
    where
        F: Fn(&Value, &Value) -> Result<Value, E>,
    {
        let mut merged = Row::new();
        for identifier in &self.identifiers {
            let value = left.get(&identifier.name).cloned().unwrap_or(Value::Null);
            merged.insert(identifier.name.clone(), value);
        }
        for measure in &self.measures {
            let l = left.get(&measure.name).unwrap_or(&Value::Null);
            let r = right.get(&measure.name).unwrap_or(&Value::Null);
            merged.insert(measure.name.clone(), combine(l, r)?);
        }
        Ok(merged)
    }
}

/// Join `left` and `right` on equal identifier keys, combining measures.
///
/// Output rows follow the left dataset's order. A left row matching several
/// right rows yields one output row per match.
pub fn hash_join<F, E>(
    left: &Dataset,
    right: &Dataset,
    spec: &JoinSpec,
    combine: F,
) -> Result<Dataset, E>
where
    F: Fn(&Value, &Value) -> Result<Value, E>,
    E: From<JoinError>,
{
    if spec.identifiers.is_empty() {
        return Err(JoinError::EmptyKeyColumns.into());
    }

    let mut hash_table: HashMap<JoinKey, Vec<&Row>> = HashMap::with_capacity(right.len());
    for row in right.rows() {
        hash_table.entry(spec.key_of(row)).or_default().push(row);
    }

    let mut rows = Vec::new();
    for left_row in left.rows() {
        if let Some(matches) = hash_table.get(&spec.key_of(left_row)) {
            for right_row in matches {
                rows.push(spec.merge_rows(left_row, right_row, &combine)?);
            }
        }
    }

    log::trace!(
        "hash join: {} x {} rows -> {} rows on {} identifier(s)",
        left.len(),
        right.len(),
        rows.len(),
        spec.identifiers.len()
    );

    Ok(Dataset::with_rows(spec.output_columns(), rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::ValueType;

    fn add(l: &Value, r: &Value) -> Result<Value, JoinError> {
        Ok(match (l, r) {
            (Value::Integer(a), Value::Integer(b)) => Value::Integer(a + b),
            _ => Value::Null,
        })
    }

    fn keyed(keys: &[i64]) -> Dataset {
        let mut dataset = Dataset::new(vec![
            Column::identifier("id", ValueType::Integer),
            Column::measure("m", ValueType::Integer),
        ]);
        for k in keys {
            dataset.push_row([("id", Value::Integer(*k)), ("m", Value::Integer(k * 10))]);
        }
        dataset
    }

    fn spec(policy: JoinKeyPolicy) -> JoinSpec {
        JoinSpec::new(
            vec![Column::identifier("id", ValueType::Integer)],
            vec![Column::measure("m", ValueType::Integer)],
            policy,
        )
        .unwrap()
    }

    #[test]
    fn test_empty_key_columns_rejected() {
        assert_eq!(
            JoinSpec::new(vec![], vec![], JoinKeyPolicy::Typed),
            Err(JoinError::EmptyKeyColumns)
        );
    }

    #[test]
    fn test_inner_join_drops_unmatched_rows() {
        let result = hash_join(&keyed(&[1, 2, 3]), &keyed(&[2, 3, 4]), &spec(JoinKeyPolicy::Typed), add)
            .unwrap();

        let ids: Vec<&Value> = result.rows().iter().map(|r| &r["id"]).collect();
        assert_eq!(ids, vec![&Value::Integer(2), &Value::Integer(3)]);
        assert_eq!(result.rows()[0]["m"], Value::Integer(40));
        assert_eq!(result.rows()[1]["m"], Value::Integer(60));
    }

    #[test]
    fn test_duplicate_right_keys_emit_one_row_per_match() {
        let result =
            hash_join(&keyed(&[1]), &keyed(&[1, 1]), &spec(JoinKeyPolicy::Typed), add).unwrap();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_combine_error_stops_join() {
        let fail = |_: &Value, _: &Value| -> Result<Value, JoinError> {
            Err(JoinError::EmptyKeyColumns)
        };
        assert!(hash_join(&keyed(&[1]), &keyed(&[1]), &spec(JoinKeyPolicy::Typed), fail).is_err());
    }

    fn split_keys(first: &str, second: &str) -> Dataset {
        let mut dataset = Dataset::new(vec![
            Column::identifier("a", ValueType::String),
            Column::identifier("b", ValueType::String),
            Column::measure("m", ValueType::Integer),
        ]);
        dataset.push_row([
            ("a", Value::from(first)),
            ("b", Value::from(second)),
            ("m", Value::Integer(1)),
        ]);
        dataset
    }

    fn split_spec(policy: JoinKeyPolicy) -> JoinSpec {
        JoinSpec::new(
            vec![
                Column::identifier("a", ValueType::String),
                Column::identifier("b", ValueType::String),
            ],
            vec![Column::measure("m", ValueType::Integer)],
            policy,
        )
        .unwrap()
    }

    #[test]
    fn test_typed_keys_do_not_collide() {
        let result = hash_join(
            &split_keys("a", "bc"),
            &split_keys("ab", "c"),
            &split_spec(JoinKeyPolicy::Typed),
            add,
        )
        .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_concatenated_keys_collide() {
        let result = hash_join(
            &split_keys("a", "bc"),
            &split_keys("ab", "c"),
            &split_spec(JoinKeyPolicy::Concatenated),
            add,
        )
        .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.rows()[0]["a"], Value::from("a"));
        assert_eq!(result.rows()[0]["m"], Value::Integer(2));
    }

    #[test]
    fn test_policies_agree_without_collisions() {
        let typed = hash_join(&keyed(&[1, 2, 3]), &keyed(&[3, 1]), &spec(JoinKeyPolicy::Typed), add)
            .unwrap();
        let concatenated = hash_join(
            &keyed(&[1, 2, 3]),
            &keyed(&[3, 1]),
            &spec(JoinKeyPolicy::Concatenated),
            add,
        )
        .unwrap();
        assert_eq!(typed, concatenated);
    }

    #[test]
    fn test_output_columns() {
        let result = hash_join(&keyed(&[1]), &keyed(&[1]), &spec(JoinKeyPolicy::Typed), add).unwrap();
        let names: Vec<&str> = result.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "m"]);
    }
}
