use crate::vql::ast::{Group, GroupOp, Node};

///
/// Canonicalization
///
/// Shapes a filter for backend compilation:
///
/// - nested groups of the same operator are flattened in place, keeping
///   argument order for backends that short-circuit
/// - single-argument groups collapse into their argument
/// - `grouped` flags are cleared (parentheses only matter for printing)
///
/// The pass is idempotent.
///

impl Node {
    #[must_use]
    pub fn canonicalize(self) -> Self {
        match self {
            Self::Term(_) => self,
            Self::Not(inner) => Self::Not(Box::new(inner.canonicalize())),
            Self::Group(group) => canonicalize_group(group),
        }
    }

    /// Whether `canonicalize` would return the node unchanged.
    #[must_use]
    pub fn is_canonical(&self) -> bool {
        match self {
            Self::Term(_) => true,
            Self::Not(inner) => inner.is_canonical(),
            Self::Group(group) => {
                !group.is_grouped()
                    && group.args().len() > 1
                    && group.args().iter().all(|arg| {
                        arg.is_canonical()
                            && !matches!(arg, Self::Group(inner) if inner.op() == group.op())
                    })
            }
        }
    }
}

fn canonicalize_group(group: Group) -> Node {
    let (op, args, _) = group.into_parts();

    let mut flat = Vec::with_capacity(args.len());
    for arg in args {
        flatten_into(op, arg.canonicalize(), &mut flat);
    }

    if flat.len() == 1
        && let Some(only) = flat.pop()
    {
        return only;
    }

    Node::Group(Group::from_parts(op, flat, false))
}

// `arg` is already canonical, so one level of splicing is enough.
fn flatten_into(op: GroupOp, arg: Node, out: &mut Vec<Node>) {
    match arg {
        Node::Group(inner) if inner.op() == op => {
            let (_, args, _) = inner.into_parts();
            out.extend(args);
        }
        other => out.push(other),
    }
}
