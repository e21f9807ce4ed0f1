//! The fluent statement builder.
//!
//! A [`Builder`] owns one part accumulator and one [`Dialect`]. Fluent calls
//! mutate the accumulator in place and return the same instance (by move) so
//! chains read naturally; this is a mutable builder, not an immutable-copy
//! one. The `insert`/`delete`/`update`/`select` calls also switch the active
//! statement type — that is how the DSL infers intent.
//!
//! # Example
//!
//! ```
//! use sqlqb::{Builder, Op};
//!
//! let (sql, params) = Builder::postgres()
//!     .update(["users"])
//!     .set("name", "Bob")
//!     .filter("id", Op::Eq, 5i64)
//!     .render()
//!     .unwrap();
//!
//! assert_eq!(sql, "UPDATE users SET name = $1 WHERE id = $2");
//! assert_eq!(params.len(), 2);
//! ```

use crate::client::{ExecResult, Executor};
use crate::cond::{Cond, Connector, Direction, Join, JoinKind, OnExpr, Op};
use crate::dialect::Dialect;
use crate::error::{QbError, QbResult};
use crate::grammar::Placeholders;
use crate::parts::{ConflictAction, Part, QueryParts, StatementType};
use crate::row::FromRow;
use crate::value::Value;

/// Fluent SQL statement builder bound to one dialect.
#[derive(Debug, Clone)]
pub struct Builder {
    dialect: Dialect,
    statement: StatementType,
    parts: QueryParts,
}

impl Builder {
    /// Create a builder for the given dialect. The active statement type
    /// starts as SELECT until a verb call switches it.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            statement: StatementType::Select,
            parts: QueryParts::default(),
        }
    }

    /// Create a builder for the Postgres dialect.
    pub fn postgres() -> Self {
        Self::new(Dialect::postgres())
    }

    /// Create a builder for the MySQL-flavored dialect.
    pub fn mysql() -> Self {
        Self::new(Dialect::mysql())
    }

    /// The currently active statement type.
    pub fn statement_type(&self) -> StatementType {
        self.statement
    }

    /// The dialect this builder renders with.
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    // ==================== Statement verbs ====================

    /// Set the INSERT target table. Switches the statement type to INSERT.
    /// Last write wins.
    pub fn insert(mut self, target: impl Into<String>) -> Self {
        self.statement = StatementType::Insert;
        self.parts.insert = Some(target.into());
        self
    }

    /// Append DELETE targets. Switches the statement type to DELETE.
    pub fn delete<S: Into<String>>(mut self, targets: impl IntoIterator<Item = S>) -> Self {
        self.statement = StatementType::Delete;
        self.parts.delete.extend(targets.into_iter().map(Into::into));
        self
    }

    /// Append UPDATE targets. Switches the statement type to UPDATE.
    pub fn update<S: Into<String>>(mut self, targets: impl IntoIterator<Item = S>) -> Self {
        self.statement = StatementType::Update;
        self.parts.update.extend(targets.into_iter().map(Into::into));
        self
    }

    /// Append SELECT columns. Switches the statement type to SELECT.
    pub fn select<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.statement = StatementType::Select;
        self.parts.select.extend(columns.into_iter().map(Into::into));
        self
    }

    // ==================== Clause mutators ====================

    /// Append one VALUES row.
    pub fn values<K, V>(mut self, row: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.parts
            .values
            .push(row.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    /// Append many VALUES rows at once (the "multi" accumulation mode).
    pub fn values_many<K, V, R>(mut self, rows: impl IntoIterator<Item = R>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        R: IntoIterator<Item = (K, V)>,
    {
        for row in rows {
            self.parts
                .values
                .push(row.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        }
        self
    }

    /// Append USING tables.
    pub fn using<S: Into<String>>(mut self, tables: impl IntoIterator<Item = S>) -> Self {
        self.parts.using.extend(tables.into_iter().map(Into::into));
        self
    }

    /// Merge one SET assignment. A later write to the same field overwrites
    /// the earlier value in place.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parts.merge_set(field.into(), value.into());
        self
    }

    /// Merge many SET assignments in iteration order.
    pub fn set_map<K, V>(mut self, assignments: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        for (k, v) in assignments {
            self.parts.merge_set(k.into(), v.into());
        }
        self
    }

    /// Append FROM tables.
    pub fn from<S: Into<String>>(mut self, tables: impl IntoIterator<Item = S>) -> Self {
        self.parts.from.extend(tables.into_iter().map(Into::into));
        self
    }

    /// Append an INNER JOIN with a single `left op right` predicate.
    pub fn join(
        self,
        table: impl Into<String>,
        left: impl Into<String>,
        op: Op,
        right: impl Into<String>,
    ) -> Self {
        self.join_on(table, JoinKind::Inner, vec![OnExpr::and(left, op, right)])
    }

    /// Append a LEFT JOIN with a single `left op right` predicate.
    pub fn left_join(
        self,
        table: impl Into<String>,
        left: impl Into<String>,
        op: Op,
        right: impl Into<String>,
    ) -> Self {
        self.join_on(table, JoinKind::Left, vec![OnExpr::and(left, op, right)])
    }

    /// Append a RIGHT JOIN with a single `left op right` predicate.
    pub fn right_join(
        self,
        table: impl Into<String>,
        left: impl Into<String>,
        op: Op,
        right: impl Into<String>,
    ) -> Self {
        self.join_on(table, JoinKind::Right, vec![OnExpr::and(left, op, right)])
    }

    /// Append a join with an explicit kind and a multi-predicate ON list.
    pub fn join_on(
        mut self,
        table: impl Into<String>,
        kind: JoinKind,
        on: Vec<OnExpr>,
    ) -> Self {
        self.parts.join.push(Join {
            table: table.into(),
            on,
            kind,
        });
        self
    }

    /// Append a WHERE leaf condition attached with AND.
    pub fn filter(mut self, left: impl Into<String>, op: Op, value: impl Into<Value>) -> Self {
        self.parts.where_.push(Cond::and(left, op, value));
        self
    }

    /// Append a WHERE leaf condition attached with OR.
    pub fn or_filter(mut self, left: impl Into<String>, op: Op, value: impl Into<Value>) -> Self {
        self.parts.where_.push(Cond::or(left, op, value));
        self
    }

    /// Append a parenthesized WHERE group attached with AND.
    pub fn filter_group(mut self, nodes: Vec<Cond>) -> Self {
        self.parts.where_.push(Cond::Group {
            nodes,
            connector: Connector::And,
        });
        self
    }

    /// Append a parenthesized WHERE group attached with OR.
    pub fn or_filter_group(mut self, nodes: Vec<Cond>) -> Self {
        self.parts.where_.push(Cond::Group {
            nodes,
            connector: Connector::Or,
        });
        self
    }

    /// Append GROUP BY columns.
    pub fn group_by<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.parts.group_by.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Append a HAVING leaf condition attached with AND.
    pub fn having(mut self, left: impl Into<String>, op: Op, value: impl Into<Value>) -> Self {
        self.parts.having.push(Cond::and(left, op, value));
        self
    }

    /// Append a HAVING leaf condition attached with OR.
    pub fn or_having(mut self, left: impl Into<String>, op: Op, value: impl Into<Value>) -> Self {
        self.parts.having.push(Cond::or(left, op, value));
        self
    }

    /// Append a parenthesized HAVING group attached with AND.
    pub fn having_group(mut self, nodes: Vec<Cond>) -> Self {
        self.parts.having.push(Cond::Group {
            nodes,
            connector: Connector::And,
        });
        self
    }

    /// Append a parenthesized HAVING group attached with OR.
    pub fn or_having_group(mut self, nodes: Vec<Cond>) -> Self {
        self.parts.having.push(Cond::Group {
            nodes,
            connector: Connector::Or,
        });
        self
    }

    /// Append one ORDER BY entry. Entries render in call order.
    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.parts.order_by.push((field.into(), direction));
        self
    }

    /// Append many ORDER BY entries in iteration order.
    pub fn order_by_many<S: Into<String>>(
        mut self,
        entries: impl IntoIterator<Item = (S, Direction)>,
    ) -> Self {
        self.parts
            .order_by
            .extend(entries.into_iter().map(|(f, d)| (f.into(), d)));
        self
    }

    /// Set LIMIT. Last write wins.
    pub fn limit(mut self, n: i64) -> Self {
        self.parts.limit = Some(n);
        self
    }

    /// Set OFFSET. Last write wins.
    pub fn offset(mut self, n: i64) -> Self {
        self.parts.offset = Some(n);
        self
    }

    /// Append RETURNING columns.
    pub fn returning<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.parts.returning.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Append ON CONFLICT target columns.
    pub fn on_conflict<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.parts.conflict.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Resolve conflicts with DO NOTHING. Last write wins against
    /// [`Builder::do_update`].
    pub fn do_nothing(mut self) -> Self {
        self.parts.do_ = Some(ConflictAction::DoNothing);
        self
    }

    /// Resolve conflicts with DO UPDATE; the assignments come from the `set`
    /// part and an optional `filter` guard, which follow in the INSERT part
    /// order.
    pub fn do_update(mut self) -> Self {
        self.parts.do_ = Some(ConflictAction::DoUpdate);
        self
    }

    /// Restore every part to its default empty value, keeping the dialect
    /// and the active statement type.
    pub fn reset(mut self) -> Self {
        self.parts = QueryParts::default();
        self
    }

    // ==================== Rendering ====================

    /// Render the accumulated parts into SQL text and the ordered parameter
    /// list.
    ///
    /// Pure with respect to the accumulator: rendering twice without
    /// mutation in between yields identical output. Parts at their default
    /// empty value are skipped; parts not named by the active statement
    /// type's order list are ignored.
    pub fn render(&self) -> QbResult<(String, Vec<Value>)> {
        let order = self
            .dialect
            .orders
            .for_statement(self.statement)
            .ok_or(QbError::UnsupportedStatement {
                dialect: self.dialect.name,
                statement: self.statement,
            })?;

        let g = &self.dialect.grammar;
        let mut ph = Placeholders::new(g.placeholder);
        let mut fragments: Vec<String> = Vec::new();
        let mut params: Vec<Value> = Vec::new();

        for part in order {
            match part {
                Part::Insert => {
                    if let Some(target) = &self.parts.insert {
                        fragments.push((g.insert)(target));
                    }
                }
                Part::Delete => {
                    if !self.parts.delete.is_empty() {
                        fragments.push((g.delete)(&self.parts.delete));
                    }
                }
                Part::Update => {
                    if !self.parts.update.is_empty() {
                        fragments.push((g.update)(&self.parts.update));
                    }
                }
                Part::Select => {
                    if !self.parts.select.is_empty() {
                        fragments.push((g.select)(&self.parts.select));
                    }
                }
                Part::Using => {
                    if !self.parts.using.is_empty() {
                        fragments.push((g.using)(&self.parts.using));
                    }
                }
                Part::From => {
                    if !self.parts.from.is_empty() {
                        fragments.push((g.from)(&self.parts.from));
                    }
                }
                Part::Join => {
                    if !self.parts.join.is_empty() {
                        fragments.push((g.join)(&self.parts.join));
                    }
                }
                Part::GroupBy => {
                    if !self.parts.group_by.is_empty() {
                        fragments.push((g.group_by)(&self.parts.group_by));
                    }
                }
                Part::OrderBy => {
                    if !self.parts.order_by.is_empty() {
                        fragments.push((g.order_by)(&self.parts.order_by));
                    }
                }
                Part::Returning => {
                    if !self.parts.returning.is_empty() {
                        fragments.push((g.returning)(&self.parts.returning));
                    }
                }
                Part::Conflict => {
                    if !self.parts.conflict.is_empty() {
                        fragments.push((g.conflict)(&self.parts.conflict));
                    }
                }
                Part::Do => {
                    if let Some(action) = self.parts.do_ {
                        fragments.push((g.do_clause)(action));
                    }
                }
                Part::Values => {
                    if !self.parts.values.is_empty() {
                        let f = (g.values)(&self.parts.values, &mut ph)?;
                        fragments.push(f.sql);
                        params.extend(f.params);
                    }
                }
                Part::Set => {
                    if !self.parts.set.is_empty() {
                        let f = (g.set)(&self.parts.set, &mut ph)?;
                        fragments.push(f.sql);
                        params.extend(f.params);
                    }
                }
                Part::Where => {
                    if !self.parts.where_.is_empty() {
                        let f = (g.where_clause)(&self.parts.where_, &mut ph)?;
                        fragments.push(f.sql);
                        params.extend(f.params);
                    }
                }
                Part::Having => {
                    if !self.parts.having.is_empty() {
                        let f = (g.having)(&self.parts.having, &mut ph)?;
                        fragments.push(f.sql);
                        params.extend(f.params);
                    }
                }
                Part::Limit => {
                    if let Some(n) = self.parts.limit {
                        let f = (g.limit)(n, &mut ph);
                        fragments.push(f.sql);
                        params.extend(f.params);
                    }
                }
                Part::Offset => {
                    if let Some(n) = self.parts.offset {
                        let f = (g.offset)(n, &mut ph);
                        fragments.push(f.sql);
                        params.extend(f.params);
                    }
                }
            }
        }

        Ok((fragments.join(" "), params))
    }

    // ==================== Execution ====================

    /// Render and execute through the given executor.
    pub async fn execute(&self, executor: &impl Executor) -> QbResult<ExecResult> {
        let (sql, params) = self.render()?;
        executor.execute(&sql, &params).await
    }

    /// Render, execute, and map every returned row to `T`.
    pub async fn fetch_all_as<T: FromRow>(&self, executor: &impl Executor) -> QbResult<Vec<T>> {
        let result = self.execute(executor).await?;
        result.fetch_all_as()
    }

    /// Render, execute, and map the first returned row to `T`, if any.
    pub async fn fetch_opt_as<T: FromRow>(
        &self,
        executor: &impl Executor,
    ) -> QbResult<Option<T>> {
        let result = self.execute(executor).await?;
        result.fetch_opt_as()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_set_where_end_to_end() {
        let (sql, params) = Builder::postgres()
            .update(["users"])
            .set("name", "Bob")
            .filter("id", Op::Eq, 5i64)
            .render()
            .unwrap();

        assert_eq!(sql, "UPDATE users SET name = $1 WHERE id = $2");
        assert_eq!(params, vec![Value::Text("Bob".to_string()), Value::Int(5)]);
    }

    #[test]
    fn mysql_renders_question_placeholders() {
        let (sql, params) = Builder::mysql()
            .update(["users"])
            .set("name", "Bob")
            .filter("id", Op::Eq, 5i64)
            .render()
            .unwrap();

        assert_eq!(sql, "UPDATE users SET name = ? WHERE id = ?");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn render_is_idempotent() {
        let b = Builder::postgres()
            .select(["id", "name"])
            .from(["users"])
            .filter("status", Op::Eq, "active")
            .limit(10);

        let first = b.render().unwrap();
        let second = b.render().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn reset_renders_empty_for_every_statement_type() {
        for verb in ["insert", "delete", "update", "select"] {
            let b = match verb {
                "insert" => Builder::postgres().insert("t").values([("a", 1i64)]),
                "delete" => Builder::postgres().delete(["t"]).filter("a", Op::Eq, 1i64),
                "update" => Builder::postgres().update(["t"]).set("a", 1i64),
                _ => Builder::postgres().select(["*"]).from(["t"]),
            };
            let (sql, params) = b.reset().render().unwrap();
            assert_eq!(sql, "", "{verb} should render empty after reset");
            assert!(params.is_empty());
        }
    }

    #[test]
    fn nested_where_group_placement_and_param_order() {
        let (sql, params) = Builder::postgres()
            .select(["*"])
            .from(["t"])
            .filter("c", Op::Eq, 3i64)
            .filter_group(vec![
                Cond::and("a", Op::Eq, 1i64),
                Cond::or("b", Op::Eq, 2i64),
            ])
            .render()
            .unwrap();

        assert_eq!(sql, "SELECT * FROM t WHERE c = $1 AND (a = $2 OR b = $3)");
        assert_eq!(params, vec![Value::Int(3), Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn values_single_then_multi_accumulate_in_call_order() {
        let (sql, params) = Builder::postgres()
            .insert("t")
            .values([("a", 1i64), ("b", 2i64)])
            .values_many([
                [("a", 3i64), ("b", 4i64)],
                [("a", 5i64), ("b", 6i64)],
            ])
            .render()
            .unwrap();

        assert_eq!(
            sql,
            "INSERT INTO t (a, b) VALUES ($1, $2), ($3, $4), ($5, $6)"
        );
        assert_eq!(
            params,
            vec![
                Value::Int(1),
                Value::Int(2),
                Value::Int(3),
                Value::Int(4),
                Value::Int(5),
                Value::Int(6),
            ]
        );
    }

    #[test]
    fn verb_calls_switch_the_active_type() {
        let b = Builder::postgres().insert("t").select(["x"]);
        assert_eq!(b.statement_type(), StatementType::Select);

        // The insert part stays set but the SELECT order never names it.
        let (sql, params) = b.from(["t"]).render().unwrap();
        assert_eq!(sql, "SELECT x FROM t");
        assert!(params.is_empty());
    }

    #[test]
    fn missing_part_order_entry_is_silently_ignored() {
        // MySQL declares no RETURNING part for DELETE.
        let (sql, _) = Builder::mysql()
            .delete(["users"])
            .from(["users"])
            .filter("id", Op::Eq, 1i64)
            .returning(["id"])
            .render()
            .unwrap();

        assert_eq!(sql, "DELETE users FROM users WHERE id = ?");
    }

    #[test]
    fn undeclared_statement_type_fails_fast() {
        use crate::dialect::{Dialect, PartOrders};
        use crate::grammar::Grammar;

        let read_only = Dialect {
            name: "read-only",
            grammar: Grammar::base(),
            orders: PartOrders {
                insert: None,
                delete: None,
                update: None,
                select: Some(&[Part::Select, Part::From]),
            },
        };

        let err = Builder::new(read_only).insert("t").render().unwrap_err();
        assert!(err.is_unsupported_statement());

        let (sql, _) = Builder::new(read_only)
            .select(["*"])
            .from(["t"])
            .render()
            .unwrap();
        assert_eq!(sql, "SELECT * FROM t");
    }

    #[test]
    fn postgres_upsert_statement() {
        let (sql, params) = Builder::postgres()
            .insert("users")
            .values([("id", Value::Int(1)), ("name", Value::from("Ann"))])
            .on_conflict(["id"])
            .do_update()
            .set("name", "Ann")
            .returning(["id"])
            .render()
            .unwrap();

        assert_eq!(
            sql,
            "INSERT INTO users (id, name) VALUES ($1, $2) \
             ON CONFLICT (id) DO UPDATE SET name = $3 RETURNING id"
        );
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn insert_do_nothing() {
        let (sql, _) = Builder::postgres()
            .insert("users")
            .values([("id", 1i64)])
            .on_conflict(["id"])
            .do_nothing()
            .render()
            .unwrap();

        assert_eq!(
            sql,
            "INSERT INTO users (id) VALUES ($1) ON CONFLICT (id) DO NOTHING"
        );
    }

    #[test]
    fn delete_with_using_and_returning() {
        let (sql, params) = Builder::postgres()
            .delete(["orders"])
            .using(["users"])
            .filter("orders.user_id", Op::Eq, Value::raw("users.id"))
            .filter("users.banned", Op::Eq, true)
            .returning(["orders.id"])
            .render()
            .unwrap();

        assert_eq!(
            sql,
            "DELETE FROM orders USING users \
             WHERE orders.user_id = users.id AND users.banned = $1 \
             RETURNING orders.id"
        );
        assert_eq!(params, vec![Value::Bool(true)]);
    }

    #[test]
    fn select_kitchen_sink_numbers_across_parts() {
        let (sql, params) = Builder::postgres()
            .select(["u.id", "COUNT(o.id) AS orders"])
            .from(["users u"])
            .left_join("orders o", "o.user_id", Op::Eq, "u.id")
            .filter("u.status", Op::Eq, "active")
            .group_by(["u.id"])
            .having("COUNT(o.id)", Op::Gt, 5i64)
            .order_by("orders", Direction::Desc)
            .order_by("u.id", Direction::Asc)
            .limit(10)
            .offset(20)
            .render()
            .unwrap();

        assert_eq!(
            sql,
            "SELECT u.id, COUNT(o.id) AS orders FROM users u \
             LEFT JOIN orders o ON o.user_id = u.id \
             WHERE u.status = $1 GROUP BY u.id HAVING COUNT(o.id) > $2 \
             ORDER BY orders DESC, u.id ASC LIMIT $3 OFFSET $4"
        );
        assert_eq!(params.len(), 4);
        assert_eq!(params[2], Value::Int(10));
        assert_eq!(params[3], Value::Int(20));
    }

    #[test]
    fn limit_offset_insert_are_last_write_wins() {
        let (sql, params) = Builder::postgres()
            .select(["*"])
            .from(["t"])
            .limit(5)
            .limit(10)
            .offset(1)
            .offset(2)
            .render()
            .unwrap();

        assert_eq!(sql, "SELECT * FROM t LIMIT $1 OFFSET $2");
        assert_eq!(params, vec![Value::Int(10), Value::Int(2)]);

        let b = Builder::postgres().insert("a").insert("b").values([("x", 1i64)]);
        let (sql, _) = b.render().unwrap();
        assert!(sql.starts_with("INSERT INTO b"));
    }

    #[test]
    fn set_merge_overwrites_later_keys() {
        let (sql, params) = Builder::postgres()
            .update(["t"])
            .set("a", 1i64)
            .set("b", 2i64)
            .set("a", 3i64)
            .render()
            .unwrap();

        assert_eq!(sql, "UPDATE t SET a = $1, b = $2");
        assert_eq!(params, vec![Value::Int(3), Value::Int(2)]);
    }

    #[test]
    fn in_filter_round_trip() {
        let (sql, params) = Builder::postgres()
            .select(["*"])
            .from(["t"])
            .filter("id", Op::In, vec![1i64, 2, 3])
            .render()
            .unwrap();

        assert_eq!(sql, "SELECT * FROM t WHERE id IN ($1, $2, $3)");
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn in_with_scalar_operand_errors_at_render() {
        let err = Builder::postgres()
            .select(["*"])
            .from(["t"])
            .filter("id", Op::In, 1i64)
            .render()
            .unwrap_err();
        assert!(err.is_invalid_operand());
    }

    #[test]
    fn multi_predicate_join_group() {
        let (sql, _) = Builder::postgres()
            .select(["*"])
            .from(["a"])
            .join_on(
                "b",
                JoinKind::Inner,
                vec![
                    OnExpr::and("a.id", Op::Eq, "b.a_id"),
                    OnExpr::and("a.tenant", Op::Eq, "b.tenant"),
                ],
            )
            .render()
            .unwrap();

        assert_eq!(
            sql,
            "SELECT * FROM a INNER JOIN b ON a.id = b.a_id AND a.tenant = b.tenant"
        );
    }
}
