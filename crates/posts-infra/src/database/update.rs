//! Variable-shape `UPDATE` statements for partial post updates.

use sea_orm::Value;

use posts_core::domain::{PostChanges, PostId};

/// SQL text plus the values for its placeholders, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    pub sql: String,
    pub values: Vec<Value>,
}

/// Build `UPDATE <table> SET ... WHERE id = $n RETURNING <returning>`.
///
/// Each field pushes its value first and then names its placeholder after the
/// new length of the value list, so column and index cannot drift apart. The
/// row ID takes the last placeholder.
pub fn build_update(
    table: &str,
    id: PostId,
    changes: &PostChanges,
    returning: &str,
) -> UpdateStatement {
    let mut values: Vec<Value> = Vec::with_capacity(changes.len() + 1);
    let mut assignments = Vec::with_capacity(changes.len());

    for field in changes.fields() {
        values.push(field.value().into());
        assignments.push(format!("{} = ${}", field.column(), values.len()));
    }

    values.push(id.into());
    let sql = format!(
        "UPDATE {table} SET {} WHERE id = ${} RETURNING {returning}",
        assignments.join(", "),
        values.len()
    );

    UpdateStatement { sql, values }
}
