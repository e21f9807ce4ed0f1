//! Condition trees and the operator/connector vocabulary.
//!
//! WHERE and HAVING clauses accumulate a flat list of [`Cond`] nodes. A node
//! is either a leaf comparison or a parenthesized group holding its own node
//! list, so composite boolean logic nests to any depth. Every node carries
//! the connector that splices it to the node before it; the first node's
//! connector is never rendered.

use crate::value::Value;

/// Comparison operator for leaf conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `=`
    Eq,
    /// `<>`
    Ne,
    /// `<=`
    Lte,
    /// `<`
    Lt,
    /// `LIKE`
    Like,
    /// `IN`, expands to one placeholder per element
    In,
    /// `NOT IN`, expands to one placeholder per element
    NotIn,
}

impl Op {
    /// The SQL symbol for this operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            Op::Gt => ">",
            Op::Gte => ">=",
            Op::Eq => "=",
            Op::Ne => "<>",
            Op::Lte => "<=",
            Op::Lt => "<",
            Op::Like => "LIKE",
            Op::In => "IN",
            Op::NotIn => "NOT IN",
        }
    }

    /// Whether the right-hand side must be a [`Value::List`].
    pub fn expects_list(&self) -> bool {
        matches!(self, Op::In | Op::NotIn)
    }
}

/// Boolean connector between adjacent condition entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    And,
    Or,
}

impl Connector {
    /// The SQL keyword for this connector.
    pub fn keyword(&self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
        }
    }
}

/// Sort direction for ORDER BY entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    /// The SQL keyword for this direction.
    pub fn keyword(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// Join flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
}

impl JoinKind {
    /// The SQL keyword for this join kind.
    pub fn keyword(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER",
            JoinKind::Left => "LEFT",
            JoinKind::Right => "RIGHT",
        }
    }
}

/// A node of a WHERE/HAVING condition tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Cond {
    /// A single comparison: `left op right`.
    Leaf {
        left: String,
        op: Op,
        right: Value,
        connector: Connector,
    },
    /// A parenthesized sub-expression. The group's own connector splices it
    /// into the enclosing list; its nodes are joined by their own connectors.
    Group {
        nodes: Vec<Cond>,
        connector: Connector,
    },
}

impl Cond {
    /// Leaf condition attached with AND.
    pub fn and(left: impl Into<String>, op: Op, right: impl Into<Value>) -> Self {
        Cond::Leaf {
            left: left.into(),
            op,
            right: right.into(),
            connector: Connector::And,
        }
    }

    /// Leaf condition attached with OR.
    pub fn or(left: impl Into<String>, op: Op, right: impl Into<Value>) -> Self {
        Cond::Leaf {
            left: left.into(),
            op,
            right: right.into(),
            connector: Connector::Or,
        }
    }

    /// Nested group attached with AND.
    pub fn and_group(nodes: Vec<Cond>) -> Self {
        Cond::Group {
            nodes,
            connector: Connector::And,
        }
    }

    /// Nested group attached with OR.
    pub fn or_group(nodes: Vec<Cond>) -> Self {
        Cond::Group {
            nodes,
            connector: Connector::Or,
        }
    }

    /// The connector splicing this node to the one before it.
    pub fn connector(&self) -> Connector {
        match self {
            Cond::Leaf { connector, .. } | Cond::Group { connector, .. } => *connector,
        }
    }
}

/// One column-to-column predicate of a join ON expression.
///
/// Join predicates are rendered as text, never parameterized.
#[derive(Debug, Clone, PartialEq)]
pub struct OnExpr {
    pub left: String,
    pub op: Op,
    pub right: String,
    pub connector: Connector,
}

impl OnExpr {
    /// Predicate attached with AND.
    pub fn and(left: impl Into<String>, op: Op, right: impl Into<String>) -> Self {
        OnExpr {
            left: left.into(),
            op,
            right: right.into(),
            connector: Connector::And,
        }
    }

    /// Predicate attached with OR.
    pub fn or(left: impl Into<String>, op: Op, right: impl Into<String>) -> Self {
        OnExpr {
            left: left.into(),
            op,
            right: right.into(),
            connector: Connector::Or,
        }
    }
}

/// One accumulated join clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub table: String,
    pub on: Vec<OnExpr>,
    pub kind: JoinKind,
}
