//! Pretty-printer producing VQL source that parses back to the same tree.

use crate::{
    value::{LiteralContext, Value, write_literal, write_quoted},
    vql::ast::{CompareOp, Group, GroupOp, Node, Operand, Term},
};
use std::fmt::{self, Write as _};

///
/// Slot
///
/// Syntactic position a node is printed into.
///

#[derive(Clone, Copy, Eq, PartialEq)]
enum Slot {
    Top,
    AndOperand,
    Unary,
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, self, Slot::Top)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_term(f, self)
    }
}

fn write_node(f: &mut fmt::Formatter<'_>, node: &Node, slot: Slot) -> fmt::Result {
    match node {
        Node::Term(term) => write_term(f, term),
        Node::Not(inner) => {
            f.write_char('-')?;
            write_node(f, inner, Slot::Unary)
        }
        Node::Group(group) => write_group(f, group, slot),
    }
}

fn write_group(f: &mut fmt::Formatter<'_>, group: &Group, slot: Slot) -> fmt::Result {
    let args = group.args();
    if let [only] = args
        && !group.is_grouped()
    {
        return write_node(f, only, slot);
    }

    let parens = group.is_grouped()
        || slot == Slot::Unary
        || (slot == Slot::AndOperand && group.op() == GroupOp::Or);

    let (separator, inner) = match group.op() {
        GroupOp::And => (" ", Slot::AndOperand),
        GroupOp::Or => (" | ", Slot::Top),
    };

    if parens {
        f.write_char('(')?;
    }
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write_node(f, arg, inner)?;
    }
    if parens {
        f.write_char(')')?;
    }

    Ok(())
}

fn write_term(f: &mut fmt::Formatter<'_>, term: &Term) -> fmt::Result {
    let op = term.op();
    let ctx = match term.field() {
        Some(field) => {
            f.write_str(field)?;
            f.write_str(op.symbol())?;
            LiteralContext::FieldValue
        }
        None => LiteralContext::BareToken,
    };

    match term.value() {
        Operand::Raw(raw) if raw_is_safe(raw, ctx, op) => f.write_str(raw)?,
        Operand::Raw(text) | Operand::Quoted(text) => write_quoted(f, text)?,
        Operand::Value(Value::Text(text)) if merges_with_op(text, op) => write_quoted(f, text)?,
        Operand::Value(value) => write_literal(f, value, ctx)?,
    }

    if op == CompareOp::Prefix {
        f.write_char('*')?;
    }

    Ok(())
}

// Whether unquoted `raw` lexes back as the same unquoted operand.
fn raw_is_safe(raw: &str, ctx: LiteralContext, op: CompareOp) -> bool {
    if raw.is_empty()
        || merges_with_op(raw, op)
        || (op != CompareOp::Prefix && raw.ends_with('*'))
        || raw
            .chars()
            .any(|ch| ch.is_whitespace() || matches!(ch, '(' | ')' | '|' | '&' | '"'))
    {
        return false;
    }

    match ctx {
        LiteralContext::BareToken => {
            !raw.starts_with(['-', '!']) && !raw.contains([':', '<', '>']) && !raw.contains("!=")
        }
        LiteralContext::FieldValue | LiteralContext::Cursor => true,
    }
}

// `a>` followed by `=x` would lex as `a>=` followed by `x`.
fn merges_with_op(text: &str, op: CompareOp) -> bool {
    matches!(op, CompareOp::Gt | CompareOp::Lt) && text.starts_with('=')
}
