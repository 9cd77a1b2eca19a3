//! The override merge function.
//!
//! Total over the closed set of value shapes:
//!
//! | existing \ override | scalar | list | tuple |
//! |---------------------|--------|------|-------|
//! | absent | insert | insert | insert |
//! | scalar | replace | error | error |
//! | sequence | error | replace | replace if same arity, else error |
//! | table | error | error | error |
//!
//! Intermediate path segments that do not exist are created as tables;
//! descending through a non-table is an error. A scalar written over a string
//! of the base file stays a string, so `tag=42` keeps `tag` textual.

use toml::{Table, Value};

use crate::{ConfigError, Override, OverrideValue};

/// Shape of a value in the configuration tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Scalar,
    Sequence,
    Table,
}

impl Shape {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Array(_) => Shape::Sequence,
            Value::Table(_) => Shape::Table,
            _ => Shape::Scalar,
        }
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shape::Scalar => write!(f, "scalar"),
            Shape::Sequence => write!(f, "list"),
            Shape::Table => write!(f, "table"),
        }
    }
}

/// Merges every override into `root` in order; later keys win.
///
/// Only shapes are checked here. The first failing override is returned and
/// nothing after it is applied. Scalar typing follows `root` as it was
/// before the first override, so an earlier override never changes how a
/// later one is read.
pub fn apply_overrides(root: &mut Table, overrides: &[Override]) -> Result<(), ConfigError> {
    let base = root.clone();
    for ov in overrides {
        merge(root, &base, ov)?;
    }
    Ok(())
}

/// Merges one override. On error `root` is left unchanged.
fn merge(root: &mut Table, base: &Table, ov: &Override) -> Result<(), ConfigError> {
    let Some((leaf, parents)) = ov.path().split_last() else {
        return Err(override_error(ov, "empty key".to_string()));
    };

    // Check the whole path before creating any intermediate table.
    let mut cursor: Option<&Table> = Some(&*root);
    for (depth, segment) in parents.iter().enumerate() {
        cursor = match cursor.and_then(|table| table.get(segment)) {
            Some(Value::Table(table)) => Some(table),
            Some(other) => {
                return Err(override_error(
                    ov,
                    format!(
                        "'{}' is a {}, not a table",
                        parents[..=depth].join("."),
                        Shape::of(other)
                    ),
                ));
            }
            None => None,
        };
    }
    if let Some(existing) = cursor.and_then(|table| table.get(leaf)) {
        check_shapes(ov, existing)?;
    }

    let mut table = root;
    for segment in parents {
        table = match table
            .entry(segment.clone())
            .or_insert_with(|| Value::Table(Table::new()))
        {
            Value::Table(inner) => inner,
            // Ruled out by the walk above.
            _ => return Err(override_error(ov, "path changed during merge".to_string())),
        };
    }

    let merged = match (lookup(base, ov.path()), ov.value()) {
        (Some(Value::String(_)), OverrideValue::Scalar { raw, .. }) => Value::String(raw.clone()),
        (_, value) => value.to_toml(),
    };
    table.insert(leaf.clone(), merged);
    Ok(())
}

fn lookup<'a>(table: &'a Table, path: &[String]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    let mut current = table.get(first)?;
    for segment in rest {
        current = current.as_table()?.get(segment)?;
    }
    Some(current)
}

fn check_shapes(ov: &Override, existing: &Value) -> Result<(), ConfigError> {
    let existing_shape = Shape::of(existing);
    match (existing, ov.value()) {
        (Value::Table(_), _) => Err(override_error(
            ov,
            "cannot replace a table; override its keys instead".to_string(),
        )),
        (Value::Array(_), OverrideValue::List(_)) => Ok(()),
        (Value::Array(current), OverrideValue::Tuple(items)) => {
            if current.len() == items.len() {
                Ok(())
            } else {
                Err(override_error(
                    ov,
                    format!(
                        "tuple of {} elements cannot replace a list of {}",
                        items.len(),
                        current.len()
                    ),
                ))
            }
        }
        (_, OverrideValue::Scalar { .. }) if existing_shape == Shape::Scalar => Ok(()),
        (_, value) => Err(override_error(
            ov,
            format!(
                "cannot replace a {existing_shape} with a {}",
                Shape::of(&value.to_toml())
            ),
        )),
    }
}

fn override_error(ov: &Override, reason: String) -> ConfigError {
    ConfigError::Override {
        key: ov.key().to_string(),
        reason,
    }
}
