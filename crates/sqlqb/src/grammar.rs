//! Per-part rendering rules.
//!
//! A [`Grammar`] is an explicit lookup table: one function per clause kind,
//! each a pure, stateless translation from that part's accumulated value to
//! SQL text (text-only rules) or to a [`Fragment`] carrying text plus the
//! parameters it binds, in matching left-to-right order (binding rules).
//!
//! Dialects do not subclass anything: a dialect grammar copies the base
//! table and overwrites the entries whose syntax differs, via struct-update
//! syntax (see [`Grammar::postgres`]).

use crate::cond::{Cond, Direction, Join, Op};
use crate::error::{QbError, QbResult};
use crate::parts::{ConflictAction, ValueRow};
use crate::value::Value;

/// How a grammar spells positional placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `?` for every parameter
    Question,
    /// `$1`, `$2`, ... (1-based)
    Dollar,
}

/// Running placeholder generator for one render pass.
///
/// Shared across all binding rules of a statement so `$n` numbering stays
/// aligned with the flattened parameter list.
#[derive(Debug)]
pub struct Placeholders {
    style: PlaceholderStyle,
    next: usize,
}

impl Placeholders {
    pub fn new(style: PlaceholderStyle) -> Self {
        Self { style, next: 0 }
    }

    /// Emit the next placeholder token.
    pub fn next(&mut self) -> String {
        self.next += 1;
        match self.style {
            PlaceholderStyle::Question => "?".to_string(),
            PlaceholderStyle::Dollar => format!("${}", self.next),
        }
    }
}

/// A rendered clause: SQL text plus the parameters it binds, in the order
/// their placeholders appear in the text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub sql: String,
    pub params: Vec<Value>,
}

/// The per-part rendering rule table of one dialect.
#[derive(Debug, Clone, Copy)]
pub struct Grammar {
    pub placeholder: PlaceholderStyle,
    pub insert: fn(&str) -> String,
    pub delete: fn(&[String]) -> String,
    pub update: fn(&[String]) -> String,
    pub select: fn(&[String]) -> String,
    pub using: fn(&[String]) -> String,
    pub from: fn(&[String]) -> String,
    pub join: fn(&[Join]) -> String,
    pub group_by: fn(&[String]) -> String,
    pub order_by: fn(&[(String, Direction)]) -> String,
    pub returning: fn(&[String]) -> String,
    pub conflict: fn(&[String]) -> String,
    pub do_clause: fn(ConflictAction) -> String,
    pub values: fn(&[ValueRow], &mut Placeholders) -> QbResult<Fragment>,
    pub set: fn(&[(String, Value)], &mut Placeholders) -> QbResult<Fragment>,
    pub where_clause: fn(&[Cond], &mut Placeholders) -> QbResult<Fragment>,
    pub having: fn(&[Cond], &mut Placeholders) -> QbResult<Fragment>,
    pub limit: fn(i64, &mut Placeholders) -> Fragment,
    pub offset: fn(i64, &mut Placeholders) -> Fragment,
}

impl Grammar {
    /// The base rule set: `?` placeholders, MySQL-style `DELETE a, b`.
    pub fn base() -> Self {
        Grammar {
            placeholder: PlaceholderStyle::Question,
            insert: base::insert,
            delete: base::delete,
            update: base::update,
            select: base::select,
            using: base::using,
            from: base::from,
            join: base::join,
            group_by: base::group_by,
            order_by: base::order_by,
            returning: base::returning,
            conflict: base::conflict,
            do_clause: base::do_clause,
            values: base::values,
            set: base::set,
            where_clause: base::where_clause,
            having: base::having,
            limit: base::limit,
            offset: base::offset,
        }
    }

    /// The Postgres rule set: every base rule, with `$n` placeholders and
    /// the `DELETE FROM a, b` phrasing.
    pub fn postgres() -> Self {
        Grammar {
            placeholder: PlaceholderStyle::Dollar,
            delete: postgres::delete,
            ..Self::base()
        }
    }
}

/// Base (ANSI/MySQL-flavored) rules.
mod base {
    use super::*;

    pub(super) fn insert(target: &str) -> String {
        format!("INSERT INTO {target}")
    }

    pub(super) fn delete(targets: &[String]) -> String {
        format!("DELETE {}", targets.join(", "))
    }

    pub(super) fn update(targets: &[String]) -> String {
        format!("UPDATE {}", targets.join(", "))
    }

    pub(super) fn select(columns: &[String]) -> String {
        format!("SELECT {}", columns.join(", "))
    }

    pub(super) fn using(tables: &[String]) -> String {
        format!("USING {}", tables.join(", "))
    }

    pub(super) fn from(tables: &[String]) -> String {
        format!("FROM {}", tables.join(", "))
    }

    pub(super) fn join(joins: &[Join]) -> String {
        let mut out = Vec::with_capacity(joins.len());
        for j in joins {
            let mut on = String::new();
            for (i, pred) in j.on.iter().enumerate() {
                if i > 0 {
                    on.push(' ');
                    on.push_str(pred.connector.keyword());
                    on.push(' ');
                }
                on.push_str(&pred.left);
                on.push(' ');
                on.push_str(pred.op.symbol());
                on.push(' ');
                on.push_str(&pred.right);
            }
            out.push(format!("{} JOIN {} ON {}", j.kind.keyword(), j.table, on));
        }
        out.join(" ")
    }

    pub(super) fn group_by(columns: &[String]) -> String {
        format!("GROUP BY {}", columns.join(", "))
    }

    pub(super) fn order_by(entries: &[(String, Direction)]) -> String {
        let list: Vec<String> = entries
            .iter()
            .map(|(field, dir)| format!("{} {}", field, dir.keyword()))
            .collect();
        format!("ORDER BY {}", list.join(", "))
    }

    pub(super) fn returning(columns: &[String]) -> String {
        format!("RETURNING {}", columns.join(", "))
    }

    pub(super) fn conflict(columns: &[String]) -> String {
        format!("ON CONFLICT ({})", columns.join(", "))
    }

    pub(super) fn do_clause(action: ConflictAction) -> String {
        match action {
            ConflictAction::DoNothing => "DO NOTHING".to_string(),
            ConflictAction::DoUpdate => "DO UPDATE".to_string(),
        }
    }

    pub(super) fn values(rows: &[ValueRow], ph: &mut Placeholders) -> QbResult<Fragment> {
        let Some(first) = rows.first() else {
            return Ok(Fragment::default());
        };
        let columns: Vec<&str> = first.iter().map(|(k, _)| k.as_str()).collect();

        let mut params = Vec::new();
        let mut tuples = Vec::with_capacity(rows.len());
        for row in rows {
            let mut cells = Vec::with_capacity(row.len());
            for (_, value) in row {
                cells.push(bind_cell(value, ph, &mut params)?);
            }
            tuples.push(format!("({})", cells.join(", ")));
        }

        Ok(Fragment {
            sql: format!("({}) VALUES {}", columns.join(", "), tuples.join(", ")),
            params,
        })
    }

    pub(super) fn set(assignments: &[(String, Value)], ph: &mut Placeholders) -> QbResult<Fragment> {
        let mut params = Vec::new();
        let mut list = Vec::with_capacity(assignments.len());
        for (field, value) in assignments {
            list.push(format!("{} = {}", field, bind_cell(value, ph, &mut params)?));
        }
        Ok(Fragment {
            sql: format!("SET {}", list.join(", ")),
            params,
        })
    }

    pub(super) fn where_clause(conds: &[Cond], ph: &mut Placeholders) -> QbResult<Fragment> {
        let mut fragment = render_conds(conds, ph)?;
        fragment.sql = format!("WHERE {}", fragment.sql);
        Ok(fragment)
    }

    pub(super) fn having(conds: &[Cond], ph: &mut Placeholders) -> QbResult<Fragment> {
        let mut fragment = render_conds(conds, ph)?;
        fragment.sql = format!("HAVING {}", fragment.sql);
        Ok(fragment)
    }

    pub(super) fn limit(n: i64, ph: &mut Placeholders) -> Fragment {
        Fragment {
            sql: format!("LIMIT {}", ph.next()),
            params: vec![Value::Int(n)],
        }
    }

    pub(super) fn offset(n: i64, ph: &mut Placeholders) -> Fragment {
        Fragment {
            sql: format!("OFFSET {}", ph.next()),
            params: vec![Value::Int(n)],
        }
    }
}

/// Postgres rule overrides.
mod postgres {
    pub(super) fn delete(targets: &[String]) -> String {
        format!("DELETE FROM {}", targets.join(", "))
    }
}

/// Render one value position: raw fragments inline verbatim, everything else
/// becomes a placeholder and a parameter.
fn bind_cell(value: &Value, ph: &mut Placeholders, params: &mut Vec<Value>) -> QbResult<String> {
    match value {
        Value::Raw(sql) => Ok(sql.clone()),
        Value::List(_) => Err(QbError::invalid_operand(
            "list values are only valid as an IN / NOT IN operand",
        )),
        other => {
            params.push(other.clone());
            Ok(ph.next())
        }
    }
}

/// Recursive descent over a condition list: entries joined by each
/// subsequent entry's own connector, groups parenthesized.
fn render_conds(conds: &[Cond], ph: &mut Placeholders) -> QbResult<Fragment> {
    let mut sql = String::new();
    let mut params = Vec::new();

    for (i, cond) in conds.iter().enumerate() {
        if i > 0 {
            sql.push(' ');
            sql.push_str(cond.connector().keyword());
            sql.push(' ');
        }
        match cond {
            Cond::Leaf {
                left, op, right, ..
            } => render_leaf(left, *op, right, ph, &mut sql, &mut params)?,
            Cond::Group { nodes, .. } => {
                let inner = render_conds(nodes, ph)?;
                sql.push('(');
                sql.push_str(&inner.sql);
                sql.push(')');
                params.extend(inner.params);
            }
        }
    }

    Ok(Fragment { sql, params })
}

fn render_leaf(
    left: &str,
    op: Op,
    right: &Value,
    ph: &mut Placeholders,
    sql: &mut String,
    params: &mut Vec<Value>,
) -> QbResult<()> {
    if op.expects_list() {
        return match right {
            Value::List(items) if items.is_empty() => {
                // Empty IN list is a constant, not a syntax error.
                sql.push_str(match op {
                    Op::NotIn => "1=1",
                    _ => "1=0",
                });
                Ok(())
            }
            Value::List(items) => {
                let mut cells = Vec::with_capacity(items.len());
                for item in items {
                    cells.push(bind_cell(item, ph, params)?);
                }
                sql.push_str(left);
                sql.push(' ');
                sql.push_str(op.symbol());
                sql.push_str(" (");
                sql.push_str(&cells.join(", "));
                sql.push(')');
                Ok(())
            }
            // Raw operand carries its own parentheses (e.g. a subquery).
            Value::Raw(raw) => {
                sql.push_str(left);
                sql.push(' ');
                sql.push_str(op.symbol());
                sql.push(' ');
                sql.push_str(raw);
                Ok(())
            }
            other => Err(QbError::invalid_operand(format!(
                "{} requires a list operand, got {:?}",
                op.symbol(),
                other
            ))),
        };
    }

    sql.push_str(left);
    sql.push(' ');
    sql.push_str(op.symbol());
    sql.push(' ');
    let cell = bind_cell(right, ph, params)?;
    sql.push_str(&cell);
    Ok(())
}
