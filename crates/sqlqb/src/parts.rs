//! The query-part accumulator.
//!
//! [`QueryParts`] holds one typed slot per clause the DSL supports, each with
//! its default empty value. The builder mutates slots in place following each
//! part's accumulation rule; a slot still at its default contributes no text
//! and no parameters at render time.

use crate::cond::{Cond, Direction, Join};
use crate::value::Value;

/// The statement verb currently active on a builder.
///
/// Exactly one is active at a time; the `insert`/`delete`/`update`/`select`
/// mutators switch it as a side effect. Rendering uses the part order of the
/// active type only — values set for other verbs are kept but not rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementType {
    Insert,
    Delete,
    Update,
    Select,
}

impl std::fmt::Display for StatementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StatementType::Insert => "INSERT",
            StatementType::Delete => "DELETE",
            StatementType::Update => "UPDATE",
            StatementType::Select => "SELECT",
        };
        f.write_str(s)
    }
}

/// A named clause slot, used by dialect part-order lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    Insert,
    Delete,
    Update,
    Select,
    Values,
    Using,
    Set,
    From,
    Join,
    Where,
    GroupBy,
    Having,
    OrderBy,
    Limit,
    Offset,
    Returning,
    Conflict,
    Do,
}

/// Conflict resolution action for `ON CONFLICT ... DO ...`.
///
/// `DoUpdate` emits only the action keywords; the assignments and guard come
/// from the `set` and `where` parts that follow it in the INSERT part order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictAction {
    DoNothing,
    DoUpdate,
}

/// One VALUES row: field name to value, in insertion order.
pub type ValueRow = Vec<(String, Value)>;

/// All accumulated clause slots of one statement.
#[derive(Debug, Clone, Default)]
pub struct QueryParts {
    pub(crate) insert: Option<String>,
    pub(crate) delete: Vec<String>,
    pub(crate) update: Vec<String>,
    pub(crate) select: Vec<String>,
    pub(crate) values: Vec<ValueRow>,
    pub(crate) using: Vec<String>,
    pub(crate) set: Vec<(String, Value)>,
    pub(crate) from: Vec<String>,
    pub(crate) join: Vec<Join>,
    pub(crate) where_: Vec<Cond>,
    pub(crate) group_by: Vec<String>,
    pub(crate) having: Vec<Cond>,
    pub(crate) order_by: Vec<(String, Direction)>,
    pub(crate) limit: Option<i64>,
    pub(crate) offset: Option<i64>,
    pub(crate) returning: Vec<String>,
    pub(crate) conflict: Vec<String>,
    pub(crate) do_: Option<ConflictAction>,
}

impl QueryParts {
    /// Merge one assignment into the `set` map: later identical keys
    /// overwrite in place, preserving the key's original position.
    pub(crate) fn merge_set(&mut self, field: String, value: Value) {
        if let Some(slot) = self.set.iter_mut().find(|(k, _)| *k == field) {
            slot.1 = value;
        } else {
            self.set.push((field, value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_merge_overwrites_in_place() {
        let mut parts = QueryParts::default();
        parts.merge_set("a".to_string(), Value::Int(1));
        parts.merge_set("b".to_string(), Value::Int(2));
        parts.merge_set("a".to_string(), Value::Int(3));

        assert_eq!(
            parts.set,
            vec![
                ("a".to_string(), Value::Int(3)),
                ("b".to_string(), Value::Int(2)),
            ]
        );
    }

    #[test]
    fn defaults_are_empty() {
        let parts = QueryParts::default();
        assert!(parts.insert.is_none());
        assert!(parts.select.is_empty());
        assert!(parts.limit.is_none());
        assert!(parts.do_.is_none());
    }
}
