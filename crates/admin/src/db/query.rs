//! Field conditions evaluated against JSON documents.
//!
//! Both store backends evaluate conditions with [`Condition::matches`]; the
//! Postgres backend additionally narrows rows with a JSONB containment
//! filter built by [`containment_filter`].

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Document;

/// Comparison operator for a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "array-contains")]
    ArrayContains,
}

impl std::str::FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" => Ok(Self::Eq),
            "!=" => Ok(Self::Ne),
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::Le),
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::Ge),
            "in" => Ok(Self::In),
            "array-contains" => Ok(Self::ArrayContains),
            other => Err(format!("unsupported operator: {other}")),
        }
    }
}

/// A single `field op value` filter. `field` may be a dotted path such as
/// `restaurant.restaurantId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub op: Operator,
    pub value: Value,
}

impl Condition {
    /// Build a condition.
    #[must_use]
    pub fn new(field: impl Into<String>, op: Operator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Equality shorthand.
    #[must_use]
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Eq, value)
    }

    /// Whether `doc` satisfies this condition.
    ///
    /// Missing fields only satisfy `!=`. Ordering comparisons require both
    /// sides to be numbers or both to be strings.
    #[must_use]
    pub fn matches(&self, doc: &Document) -> bool {
        let Some(actual) = lookup(doc, &self.field) else {
            return self.op == Operator::Ne;
        };

        match self.op {
            Operator::Eq => json_eq(actual, &self.value),
            Operator::Ne => !json_eq(actual, &self.value),
            Operator::Lt => compare(actual, &self.value) == Some(Ordering::Less),
            Operator::Le => matches!(
                compare(actual, &self.value),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Operator::Gt => compare(actual, &self.value) == Some(Ordering::Greater),
            Operator::Ge => matches!(
                compare(actual, &self.value),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Operator::In => self
                .value
                .as_array()
                .is_some_and(|options| options.iter().any(|v| json_eq(actual, v))),
            Operator::ArrayContains => actual
                .as_array()
                .is_some_and(|items| items.iter().any(|v| json_eq(v, &self.value))),
        }
    }
}

/// Whether `doc` satisfies every condition.
#[must_use]
pub fn matches_all(doc: &Document, conditions: &[Condition]) -> bool {
    conditions.iter().all(|c| c.matches(doc))
}

/// Resolve a dotted path inside a document.
#[must_use]
pub fn lookup<'a>(doc: &'a Document, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = doc.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Build a JSONB containment object from the scalar equality conditions.
///
/// Returns `None` when no condition can be pushed down.
#[must_use]
pub fn containment_filter(conditions: &[Condition]) -> Option<Value> {
    let mut root = Map::new();
    let mut pushed = false;

    for condition in conditions {
        if condition.op != Operator::Eq || !is_scalar(&condition.value) {
            continue;
        }
        let path: Vec<&str> = condition.field.split('.').collect();
        pushed |= insert_path(&mut root, &path, &condition.value);
    }

    pushed.then_some(Value::Object(root))
}

/// Insert `value` at `path`, creating intermediate objects. Refuses to
/// overwrite an existing key or descend through a non-object.
fn insert_path(map: &mut Map<String, Value>, path: &[&str], value: &Value) -> bool {
    match path {
        [] => false,
        [leaf] => {
            if map.contains_key(*leaf) {
                return false;
            }
            map.insert((*leaf).to_string(), value.clone());
            true
        }
        [head, rest @ ..] => match map
            .entry((*head).to_string())
            .or_insert_with(|| Value::Object(Map::new()))
        {
            Value::Object(next) => insert_path(next, rest, value),
            _ => false,
        },
    }
}

const fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}

fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_equality_on_nested_path() {
        let order = doc(json!({"restaurant": {"restaurantId": "r1"}, "status": "pending"}));
        assert!(Condition::eq("restaurant.restaurantId", "r1").matches(&order));
        assert!(!Condition::eq("restaurant.restaurantId", "r2").matches(&order));
        assert!(!Condition::eq("restaurant.name", "x").matches(&order));
    }

    #[test]
    fn test_missing_field_only_satisfies_not_equal() {
        let d = doc(json!({"a": 1}));
        assert!(Condition::new("b", Operator::Ne, 1).matches(&d));
        assert!(!Condition::new("b", Operator::Lt, 1).matches(&d));
    }

    #[test]
    fn test_ordering_operators() {
        let d = doc(json!({"price": 40, "name": "Dal"}));
        assert!(Condition::new("price", Operator::Lt, 50).matches(&d));
        assert!(Condition::new("price", Operator::Le, 40.0).matches(&d));
        assert!(Condition::new("price", Operator::Gt, 39.5).matches(&d));
        assert!(!Condition::new("price", Operator::Ge, 41).matches(&d));
        assert!(Condition::new("name", Operator::Gt, "Chai").matches(&d));
        assert!(!Condition::new("price", Operator::Lt, "50").matches(&d));
    }

    #[test]
    fn test_in_and_array_contains() {
        let d = doc(json!({"status": "ready", "zipCodes": ["10001", "10002"]}));
        assert!(Condition::new("status", Operator::In, json!(["ready", "delivered"])).matches(&d));
        assert!(!Condition::new("status", Operator::In, json!(["pending"])).matches(&d));
        assert!(Condition::new("zipCodes", Operator::ArrayContains, "10002").matches(&d));
        assert!(!Condition::new("zipCodes", Operator::ArrayContains, "10009").matches(&d));
    }

    #[test]
    fn test_containment_filter_pushes_scalar_equalities() {
        let conditions = vec![
            Condition::eq("orderType", "food"),
            Condition::eq("restaurant.restaurantId", "r1"),
            Condition::new("status", Operator::Ne, "cancelled"),
        ];
        assert_eq!(
            containment_filter(&conditions),
            Some(json!({"orderType": "food", "restaurant": {"restaurantId": "r1"}}))
        );
    }

    #[test]
    fn test_containment_filter_none_without_equalities() {
        let conditions = vec![Condition::new("price", Operator::Gt, 10)];
        assert_eq!(containment_filter(&conditions), None);
    }

    #[test]
    fn test_operator_parse() {
        assert_eq!("array-contains".parse::<Operator>(), Ok(Operator::ArrayContains));
        assert!("~=".parse::<Operator>().is_err());
    }
}
