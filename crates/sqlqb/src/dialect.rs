//! Dialect descriptors: which parts render, in what order, with which rules.
//!
//! A [`Dialect`] pairs a [`Grammar`] with the per-statement-type part
//! ordering. This is what differentiates one SQL dialect's builder from
//! another at the statement-shape level. A part missing from a statement
//! type's order list may still be set on the builder — it is silently never
//! rendered, which is a policy, not an error. A statement type whose order
//! is `None` is refused at render time.

use crate::grammar::Grammar;
use crate::parts::{Part, StatementType};

/// The ordered part list for each statement type, or `None` when the dialect
/// does not support that statement type at all.
#[derive(Debug, Clone, Copy)]
pub struct PartOrders {
    pub insert: Option<&'static [Part]>,
    pub delete: Option<&'static [Part]>,
    pub update: Option<&'static [Part]>,
    pub select: Option<&'static [Part]>,
}

impl PartOrders {
    /// Resolve the order list for a statement type.
    pub fn for_statement(&self, statement: StatementType) -> Option<&'static [Part]> {
        match statement {
            StatementType::Insert => self.insert,
            StatementType::Delete => self.delete,
            StatementType::Update => self.update,
            StatementType::Select => self.select,
        }
    }
}

/// A complete dialect: name, rendering rules, and part orders.
#[derive(Debug, Clone, Copy)]
pub struct Dialect {
    pub name: &'static str,
    pub grammar: Grammar,
    pub orders: PartOrders,
}

const PG_INSERT: &[Part] = &[
    Part::Insert,
    Part::Values,
    Part::Conflict,
    Part::Do,
    Part::Set,
    Part::Where,
    Part::Returning,
];

const PG_DELETE: &[Part] = &[Part::Delete, Part::Using, Part::Where, Part::Returning];

const PG_UPDATE: &[Part] = &[
    Part::Update,
    Part::Set,
    Part::From,
    Part::Where,
    Part::Returning,
];

const PG_SELECT: &[Part] = &[
    Part::Select,
    Part::From,
    Part::Join,
    Part::Where,
    Part::GroupBy,
    Part::Having,
    Part::OrderBy,
    Part::Limit,
    Part::Offset,
];

const MY_INSERT: &[Part] = &[Part::Insert, Part::Values];

const MY_DELETE: &[Part] = &[
    Part::Delete,
    Part::From,
    Part::Where,
    Part::OrderBy,
    Part::Limit,
];

const MY_UPDATE: &[Part] = &[
    Part::Update,
    Part::Set,
    Part::Where,
    Part::OrderBy,
    Part::Limit,
];

const MY_SELECT: &[Part] = PG_SELECT;

impl Dialect {
    /// Postgres: full statement coverage, `$n` placeholders,
    /// `ON CONFLICT ... DO ...` and `RETURNING` everywhere they apply.
    pub fn postgres() -> Self {
        Dialect {
            name: "postgres",
            grammar: Grammar::postgres(),
            orders: PartOrders {
                insert: Some(PG_INSERT),
                delete: Some(PG_DELETE),
                update: Some(PG_UPDATE),
                select: Some(PG_SELECT),
            },
        }
    }

    /// MySQL-flavored: base grammar, `?` placeholders, no RETURNING and no
    /// native upsert parts.
    pub fn mysql() -> Self {
        Dialect {
            name: "mysql",
            grammar: Grammar::base(),
            orders: PartOrders {
                insert: Some(MY_INSERT),
                delete: Some(MY_DELETE),
                update: Some(MY_UPDATE),
                select: Some(MY_SELECT),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postgres_declares_all_statement_types() {
        let d = Dialect::postgres();
        for stmt in [
            StatementType::Insert,
            StatementType::Delete,
            StatementType::Update,
            StatementType::Select,
        ] {
            assert!(d.orders.for_statement(stmt).is_some(), "{stmt} missing");
        }
    }

    #[test]
    fn mysql_orders_omit_returning() {
        let d = Dialect::mysql();
        for stmt in [
            StatementType::Insert,
            StatementType::Delete,
            StatementType::Update,
            StatementType::Select,
        ] {
            let order = d.orders.for_statement(stmt).unwrap();
            assert!(!order.contains(&Part::Returning));
        }
    }

    #[test]
    fn postgres_insert_order_places_upsert_parts() {
        let order = Dialect::postgres().orders.insert.unwrap();
        let pos = |p: Part| order.iter().position(|&x| x == p).unwrap();
        assert!(pos(Part::Values) < pos(Part::Conflict));
        assert!(pos(Part::Conflict) < pos(Part::Do));
        assert!(pos(Part::Do) < pos(Part::Set));
        assert!(pos(Part::Set) < pos(Part::Where));
        assert!(pos(Part::Where) < pos(Part::Returning));
    }
}
