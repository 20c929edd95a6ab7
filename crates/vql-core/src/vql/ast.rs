use crate::{value::Value, vql::error::AstError};
use std::{
    fmt,
    ops::{BitAnd, BitOr},
};

///
/// Filter AST
///
/// Pure, schema-agnostic boolean tree shared by parsed VQL and programmatic
/// construction. Interpretation happens in later passes:
///
/// - operand resolution (raw text -> typed values)
/// - canonicalization (flattening for backends)
/// - backend compilation
///
/// The empty filter is `None` at every API boundary; there is no empty group.
///

///
/// GroupOp
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum GroupOp {
    And,
    Or,
}

impl fmt::Display for GroupOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::And => "AND",
            Self::Or => "OR",
        })
    }
}

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CompareOp {
    Eq,
    Prefix,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    /// Source spelling between field and value (`Prefix` adds a trailing `*`).
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq | Self::Prefix => ":",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
        }
    }

    #[must_use]
    pub const fn is_range(self) -> bool {
        matches!(self, Self::Gt | Self::Gte | Self::Lt | Self::Lte)
    }
}

///
/// Operand
///
/// Right-hand side of a term. Parsed text stays untyped until resolution so
/// identifiers such as `00123` are not coerced early.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Operand {
    /// Unquoted source text.
    Raw(String),
    /// Double-quoted source text with escapes removed; always resolves to text.
    Quoted(String),
    /// Typed value from resolution or programmatic construction.
    Value(Value),
}

impl Operand {
    /// The typed value, once resolved.
    #[must_use]
    pub const fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Raw(_) | Self::Quoted(_) => None,
        }
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

///
/// Term
///
/// Leaf predicate: `field<op>value`, or a bare indexed token when `field`
/// is `None`. Bare tokens only use `Eq` and `Prefix`.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Term {
    field: Option<String>,
    op: CompareOp,
    value: Operand,
}

impl Term {
    /// Field comparison; the field name must be a valid identifier.
    pub fn compare(
        field: impl Into<String>,
        op: CompareOp,
        value: impl Into<Operand>,
    ) -> Result<Self, AstError> {
        let field = field.into();
        if !is_field_name(&field) {
            return Err(AstError::InvalidField { field });
        }

        Ok(Self {
            field: Some(field),
            op,
            value: value.into(),
        })
    }

    /// Bare indexed token matched exactly.
    #[must_use]
    pub fn token(text: impl Into<String>) -> Self {
        Self::bare(CompareOp::Eq, Operand::Value(Value::Text(text.into())))
    }

    /// Bare indexed token matched by prefix.
    #[must_use]
    pub fn prefix_token(text: impl Into<String>) -> Self {
        Self::bare(CompareOp::Prefix, Operand::Value(Value::Text(text.into())))
    }

    pub(crate) const fn bare(op: CompareOp, value: Operand) -> Self {
        Self {
            field: None,
            op,
            value,
        }
    }

    pub(crate) const fn with_field(field: String, op: CompareOp, value: Operand) -> Self {
        Self {
            field: Some(field),
            op,
            value,
        }
    }

    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    #[must_use]
    pub const fn op(&self) -> CompareOp {
        self.op
    }

    #[must_use]
    pub const fn value(&self) -> &Operand {
        &self.value
    }

    #[must_use]
    pub const fn is_bare(&self) -> bool {
        self.field.is_none()
    }

    pub(crate) fn map_value(self, f: impl FnOnce(&Self, Operand) -> Operand) -> Self {
        let Self { field, op, value } = self;
        let shell = Self {
            field,
            op,
            value: Operand::Raw(String::new()),
        };
        let value = f(&shell, value);

        Self { value, ..shell }
    }
}

///
/// Group
///
/// N-ary conjunction or disjunction. `grouped` records explicit parentheses
/// in the source; it affects printing only.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Group {
    op: GroupOp,
    args: Vec<Node>,
    grouped: bool,
}

impl Group {
    pub fn new(op: GroupOp, args: Vec<Node>, grouped: bool) -> Result<Self, AstError> {
        if args.is_empty() {
            return Err(AstError::EmptyGroup { op });
        }

        Ok(Self { op, args, grouped })
    }

    // Callers guarantee a non-empty argument list.
    pub(crate) const fn from_parts(op: GroupOp, args: Vec<Node>, grouped: bool) -> Self {
        debug_assert!(!args.is_empty(), "group arguments must be non-empty");
        Self { op, args, grouped }
    }

    #[must_use]
    pub const fn op(&self) -> GroupOp {
        self.op
    }

    #[must_use]
    pub const fn args(&self) -> &[Node] {
        self.args.as_slice()
    }

    #[must_use]
    pub const fn is_grouped(&self) -> bool {
        self.grouped
    }

    pub(crate) fn into_parts(self) -> (GroupOp, Vec<Node>, bool) {
        (self.op, self.args, self.grouped)
    }
}

///
/// Node
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Node {
    Term(Term),
    Not(Box<Self>),
    Group(Group),
}

impl Node {
    /// Conjunction of one or more filters.
    pub fn and(args: impl IntoIterator<Item = Self>) -> Result<Self, AstError> {
        Group::new(GroupOp::And, args.into_iter().collect(), false).map(Self::Group)
    }

    /// Disjunction of one or more filters.
    pub fn or(args: impl IntoIterator<Item = Self>) -> Result<Self, AstError> {
        Group::new(GroupOp::Or, args.into_iter().collect(), false).map(Self::Group)
    }

    #[expect(clippy::should_implement_trait)]
    #[must_use]
    pub fn not(node: Self) -> Self {
        Self::Not(Box::new(node))
    }

    /// `field<op>value` leaf.
    pub fn term(
        field: impl Into<String>,
        op: CompareOp,
        value: impl Into<Value>,
    ) -> Result<Self, AstError> {
        Term::compare(field, op, Operand::Value(value.into())).map(Self::Term)
    }

    /// Bare indexed token leaf.
    #[must_use]
    pub fn token(text: impl Into<String>) -> Self {
        Self::Term(Term::token(text))
    }

    /// Bare indexed token prefix leaf.
    #[must_use]
    pub fn prefix_token(text: impl Into<String>) -> Self {
        Self::Term(Term::prefix_token(text))
    }

    /// Leaf terms in depth-first, left-to-right order.
    #[must_use]
    pub fn terms(&self) -> Terms<'_> {
        Terms { stack: vec![self] }
    }

    /// Nesting depth; a lone term has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Term(_) => 1,
            Self::Not(inner) => 1 + inner.depth(),
            Self::Group(group) => 1 + group.args.iter().map(Self::depth).max().unwrap_or(0),
        }
    }

    // Extend an ungrouped group of the same operator, otherwise start a new one.
    fn combine(self, op: GroupOp, rhs: Self) -> Self {
        match self {
            Self::Group(mut group) if group.op == op && !group.grouped => {
                group.args.push(rhs);
                Self::Group(group)
            }
            lhs => Self::Group(Group::from_parts(op, vec![lhs, rhs], false)),
        }
    }
}

impl BitAnd for Node {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.combine(GroupOp::And, rhs)
    }
}

impl BitOr for Node {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.combine(GroupOp::Or, rhs)
    }
}

impl From<Term> for Node {
    fn from(term: Term) -> Self {
        Self::Term(term)
    }
}

///
/// Terms
///
/// Depth-first leaf iterator returned by `Node::terms`.
///

pub struct Terms<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Terms<'a> {
    type Item = &'a Term;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            match node {
                Node::Term(term) => return Some(term),
                Node::Not(inner) => self.stack.push(inner),
                Node::Group(group) => self.stack.extend(group.args.iter().rev()),
            }
        }

        None
    }
}

/// Field names: `[A-Za-z0-9_.-]+`, not starting with `-`.
#[must_use]
pub fn is_field_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | '-'))
}
