use crate::{
    value::{Value, infer_literal},
    vql::ast::{CompareOp, Group, Node, Operand, Term},
};

impl Node {
    /// Replace every operand with a typed value.
    ///
    /// Unquoted field values go through literal inference; quoted values,
    /// prefix patterns and bare tokens always resolve to text.
    #[must_use]
    pub fn resolve(self) -> Self {
        match self {
            Self::Term(term) => Self::Term(resolve_term(term)),
            Self::Not(inner) => Self::Not(Box::new(inner.resolve())),
            Self::Group(group) => {
                let (op, args, grouped) = group.into_parts();
                let args = args.into_iter().map(Self::resolve).collect();

                Self::Group(Group::from_parts(op, args, grouped))
            }
        }
    }

    /// Whether every operand in the tree is already typed.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.terms()
            .all(|term| matches!(term.value(), Operand::Value(_)))
    }
}

fn resolve_term(term: Term) -> Term {
    term.map_value(|term, operand| {
        let text_only = term.is_bare() || term.op() == CompareOp::Prefix;

        let value = match operand {
            Operand::Raw(raw) if text_only => Value::Text(raw),
            Operand::Raw(raw) => infer_literal(&raw),
            Operand::Quoted(text) => Value::Text(text),
            Operand::Value(value @ Value::Text(_)) => value,
            Operand::Value(value) if text_only => Value::Text(value.to_string()),
            Operand::Value(value) => value,
        };

        Operand::Value(value)
    })
}
