use crate::{
    types::{Float64, Timestamp},
    value::{Value, canonical_cmp},
    vql::{
        AstError, CompareOp, Expected, Group, GroupOp, Node, Operand, ParseError, Term, parse,
        parse_with_limits,
    },
};
use proptest::prelude::*;
use std::cmp::Ordering;

fn raw(field: &str, op: CompareOp, text: &str) -> Node {
    Node::Term(Term::with_field(
        field.to_string(),
        op,
        Operand::Raw(text.to_string()),
    ))
}

fn bare(text: &str) -> Node {
    Node::Term(Term::bare(CompareOp::Eq, Operand::Raw(text.to_string())))
}

fn group(op: GroupOp, args: Vec<Node>, grouped: bool) -> Node {
    Node::Group(Group::from_parts(op, args, grouped))
}

fn parsed(source: &str) -> Node {
    parse(source)
        .expect("source should parse")
        .expect("source should not be empty")
}

fn parse_error(source: &str) -> ParseError {
    parse(source).expect_err("source should be rejected")
}

//
// Grammar
//

#[test]
fn parses_nested_groups_with_negation() {
    let expected = group(
        GroupOp::And,
        vec![
            raw("name", CompareOp::Prefix, "tomer"),
            group(
                GroupOp::And,
                vec![
                    raw("tag", CompareOp::Eq, "genre_a"),
                    Node::not(raw("tag", CompareOp::Eq, "genre_b")),
                ],
                true,
            ),
        ],
        true,
    );

    assert_eq!(parsed("(name:tomer* (tag:genre_a -tag:genre_b))"), expected);
}

#[test]
fn empty_source_is_the_empty_filter() {
    assert_eq!(parse(""), Ok(None));
    assert_eq!(parse(" \t\n "), Ok(None));
}

#[test]
fn single_bare_term_has_no_group_wrapper() {
    assert_eq!(parsed("hello"), bare("hello"));
    assert_eq!(parsed("  status:active "), raw("status", CompareOp::Eq, "active"));
}

#[test]
fn juxtaposition_and_ampersand_are_the_same_conjunction() {
    let expected = group(GroupOp::And, vec![bare("a"), bare("b"), bare("c")], false);

    assert_eq!(parsed("a b c"), expected);
    assert_eq!(parsed("a & b&c"), expected);
    assert_eq!(parsed("a & b c"), expected);
}

#[test]
fn conjunction_binds_tighter_than_disjunction() {
    assert_eq!(
        parsed("a b | c | d e"),
        group(
            GroupOp::Or,
            vec![
                group(GroupOp::And, vec![bare("a"), bare("b")], false),
                bare("c"),
                group(GroupOp::And, vec![bare("d"), bare("e")], false),
            ],
            false,
        )
    );
}

#[test]
fn negation_binds_to_the_next_term_or_group() {
    assert_eq!(
        parsed("-a b"),
        group(GroupOp::And, vec![Node::not(bare("a")), bare("b")], false)
    );
    assert_eq!(
        parsed("!(a b)"),
        Node::not(group(GroupOp::And, vec![bare("a"), bare("b")], true))
    );
    assert_eq!(parsed("--a"), Node::not(Node::not(bare("a"))));
}

#[test]
fn parentheses_around_a_single_term_wrap_it() {
    assert_eq!(
        parsed("(a)"),
        group(GroupOp::And, vec![bare("a")], true)
    );
    assert_eq!(
        parsed("(a | b)"),
        group(GroupOp::Or, vec![bare("a"), bare("b")], true)
    );
}

#[test]
fn unbalanced_open_paren_reports_end_of_input() {
    assert_eq!(parse_error("(a b"), ParseError::new(4, Expected::CloseParen));
    assert_eq!(parse_error("((a) b"), ParseError::new(6, Expected::CloseParen));
}

#[test]
fn stray_close_paren_reports_its_position() {
    assert_eq!(parse_error("a )"), ParseError::new(2, Expected::EndOfInput));
    assert_eq!(parse_error(")"), ParseError::new(0, Expected::Term));
}

#[test]
fn dangling_operators_and_empty_groups_are_rejected() {
    assert_eq!(parse_error("a |"), ParseError::new(3, Expected::Term));
    assert_eq!(parse_error("a & | b"), ParseError::new(4, Expected::Term));
    assert_eq!(parse_error("-"), ParseError::new(1, Expected::Term));
    assert_eq!(parse_error("a ()"), ParseError::new(3, Expected::Term));
    assert_eq!(parse_error("| a"), ParseError::new(0, Expected::Term));
}

#[test]
fn nesting_limit_is_enforced() {
    assert_eq!(
        parse_with_limits("((((a))))", 3),
        Err(ParseError::new(3, Expected::Nesting { max: 3 }))
    );
    assert_eq!(
        parse_with_limits("---a", 2),
        Err(ParseError::new(2, Expected::Nesting { max: 2 }))
    );
    assert!(parse_with_limits("(((a)))", 3).is_ok());
}

#[test]
fn parse_error_message_names_position_and_expectation() {
    assert_eq!(
        parse_error("(a b").to_string(),
        "vql parse error at position 4: expected ')'"
    );
}

//
// Construction
//

#[test]
fn constructors_enforce_invariants() {
    assert_eq!(
        Node::and(Vec::new()),
        Err(AstError::EmptyGroup { op: GroupOp::And })
    );
    assert_eq!(
        Node::or(Vec::new()),
        Err(AstError::EmptyGroup { op: GroupOp::Or })
    );
    assert_eq!(
        Node::term("-bad", CompareOp::Eq, 1),
        Err(AstError::InvalidField {
            field: "-bad".to_string()
        })
    );
    assert!(Node::term("user.name_2", CompareOp::Eq, "x").is_ok());
}

#[test]
fn operator_sugar_extends_ungrouped_groups() {
    let node = Node::token("a") & Node::token("b") & Node::token("c");
    let Node::Group(group) = &node else {
        panic!("expected a group, got {node:?}");
    };

    assert_eq!(group.op(), GroupOp::And);
    assert_eq!(group.args().len(), 3);
    assert_eq!(node.to_string(), "a b c");
}

#[test]
fn operator_sugar_mixes_operators_with_parentheses_when_printed() {
    let node = (Node::token("a") | Node::token("b")) & Node::prefix_token("c");

    assert_eq!(node.to_string(), "(a | b) c*");
}

#[test]
fn terms_iterates_leaves_left_to_right() {
    let node = parsed("a (b | -c) d:1");
    let fields: Vec<String> = node.terms().map(ToString::to_string).collect();

    assert_eq!(fields, vec!["a", "b", "c", "d:1"]);
    assert_eq!(node.depth(), 4);
}

//
// Canonicalization
//

#[test]
fn canonicalize_flattens_same_operator_groups_in_order() {
    let node = group(
        GroupOp::And,
        vec![
            group(GroupOp::And, vec![bare("a"), bare("b")], true),
            bare("c"),
        ],
        false,
    );

    assert_eq!(
        node.canonicalize(),
        group(GroupOp::And, vec![bare("a"), bare("b"), bare("c")], false)
    );
}

#[test]
fn canonicalize_collapses_single_argument_groups() {
    assert_eq!(parsed("((a))").canonicalize(), bare("a"));
    assert_eq!(
        parsed("-(a)").canonicalize(),
        Node::not(bare("a"))
    );
    assert_eq!(
        parsed("(a | (b | c)) d").canonicalize(),
        group(
            GroupOp::And,
            vec![
                group(GroupOp::Or, vec![bare("a"), bare("b"), bare("c")], false),
                bare("d"),
            ],
            false,
        )
    );
}

//
// Resolution
//

#[test]
fn resolve_types_field_values_and_keeps_tokens_as_text() {
    let node = parsed(r#"age>=21 name:"42" code:00123 tag:12* 7 ratio<0.5 on:2023-01-01"#).resolve();
    let values: Vec<&Value> = node
        .terms()
        .map(|term| term.value().as_value().expect("resolved"))
        .collect();

    assert_eq!(
        values,
        vec![
            &Value::Int(21),
            &Value::Text("42".to_string()),
            &Value::Text("00123".to_string()),
            &Value::Text("12".to_string()),
            &Value::Text("7".to_string()),
            &Value::Float(Float64::try_new(0.5).expect("finite")),
            &Value::Timestamp(Timestamp::parse("2023-01-01").expect("date")),
        ]
    );
    assert!(node.is_resolved());
}

#[test]
fn resolve_widens_integers_past_i64_to_float() {
    let node = parsed("age>99999999999999999999").resolve();
    let term = node.terms().next().expect("one term");
    let operand = term.value().as_value().expect("resolved");

    assert_eq!(operand, &Value::Float(Float64::try_new(1e20).expect("finite")));
    assert_eq!(canonical_cmp(&Value::Int(i64::MAX), operand), Ordering::Less);
    assert_eq!(node.to_string(), "age>100000000000000000000.0");
}

//
// Printing
//

#[test]
fn printing_quotes_values_that_would_change_meaning() {
    let node = Node::term("name", CompareOp::Eq, "42").expect("valid")
        & Node::term("title", CompareOp::Eq, "a b").expect("valid")
        & Node::term("n", CompareOp::Gt, "=x").expect("valid")
        & Node::token("-neg");

    assert_eq!(
        node.to_string(),
        r#"name:"42" title:"a b" n>"=x" "-neg""#
    );
}

#[test]
fn printing_parsed_source_is_stable() {
    for source in [
        "(name:tomer* (tag:genre_a -tag:genre_b))",
        "a b | c",
        "-(a | b) c",
        r#"title:"x \"y\"" --z"#,
        "created_at>=2012-09-01T00:00:00Z n!=3",
    ] {
        assert_eq!(parsed(source).to_string(), source);
    }
}

//
// Properties
//

fn arb_field() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_.]{0,5}"
}

fn arb_compare_op() -> impl Strategy<Value = CompareOp> {
    prop_oneof![
        Just(CompareOp::Eq),
        Just(CompareOp::Prefix),
        Just(CompareOp::Ne),
        Just(CompareOp::Gt),
        Just(CompareOp::Gte),
        Just(CompareOp::Lt),
        Just(CompareOp::Lte),
    ]
}

// Terms in the exact shape the lexer produces.
fn arb_parsed_term() -> impl Strategy<Value = Node> {
    let field_operand = prop_oneof![
        "[a-z0-9_.][a-z0-9_.:-]{0,6}".prop_map(Operand::Raw),
        "[ -~]{0,6}".prop_map(Operand::Quoted),
    ];
    let bare_operand = prop_oneof![
        "[a-z0-9_][a-z0-9_.]{0,6}".prop_map(Operand::Raw),
        "[ -~]{0,6}".prop_map(Operand::Quoted),
    ];
    let bare_op = prop_oneof![Just(CompareOp::Eq), Just(CompareOp::Prefix)];

    prop_oneof![
        (arb_field(), arb_compare_op(), field_operand)
            .prop_map(|(field, op, value)| Node::Term(Term::with_field(field, op, value))),
        (bare_op, bare_operand).prop_map(|(op, value)| Node::Term(Term::bare(op, value))),
    ]
}

fn parenthesize(node: Node) -> Node {
    match node {
        Node::Group(group) if !group.is_grouped() => {
            let (op, args, _) = group.into_parts();
            Node::Group(Group::from_parts(op, args, true))
        }
        other => Node::Group(Group::from_parts(GroupOp::And, vec![other], true)),
    }
}

fn expr_over(unary: BoxedStrategy<Node>) -> impl Strategy<Value = Node> {
    let and_level = prop_oneof![
        unary.clone(),
        prop::collection::vec(unary, 2..4).prop_map(|args| group(GroupOp::And, args, false)),
    ]
    .boxed();

    prop_oneof![
        and_level.clone(),
        prop::collection::vec(and_level, 2..4).prop_map(|args| group(GroupOp::Or, args, false)),
    ]
}

fn arb_parsed_unary() -> BoxedStrategy<Node> {
    arb_parsed_term()
        .prop_recursive(4, 24, 3, |inner| {
            prop_oneof![
                inner.clone().prop_map(Node::not),
                expr_over(inner).prop_map(parenthesize),
            ]
        })
        .boxed()
}

fn arb_parsed_tree() -> impl Strategy<Value = Node> {
    expr_over(arb_parsed_unary())
}

fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-1.0e9_f64..1.0e9_f64).prop_map(|v| Value::Float(
            Float64::try_new(v).expect("range is finite")
        )),
        (0_i64..4_102_444_800).prop_map(|secs| Value::Timestamp(
            Timestamp::from_seconds(secs).expect("range is renderable")
        )),
        "[ -~]{0,8}".prop_map(Value::Text),
    ]
}

// Any well-formed tree, including shapes the parser never produces.
fn arb_built_tree() -> impl Strategy<Value = Node> {
    let leaf = prop_oneof![
        (arb_field(), arb_compare_op(), arb_value()).prop_map(|(field, op, value)| {
            Node::Term(Term::with_field(field, op, Operand::Value(value)))
        }),
        "[ -~]{0,8}".prop_map(Node::token),
        "[ -~]{0,8}".prop_map(Node::prefix_token),
    ];

    leaf.prop_recursive(4, 24, 3, |inner| {
        let op = prop_oneof![Just(GroupOp::And), Just(GroupOp::Or)];
        prop_oneof![
            inner.clone().prop_map(Node::not),
            (op, prop::collection::vec(inner, 1..4), any::<bool>())
                .prop_map(|(op, args, grouped)| group(op, args, grouped)),
        ]
    })
}

proptest! {
    #[test]
    fn parsed_trees_print_and_parse_back_exactly(tree in arb_parsed_tree()) {
        let printed = tree.to_string();
        prop_assert_eq!(parse(&printed), Ok(Some(tree)), "printed as {}", printed);
    }

    #[test]
    fn built_trees_survive_printing_up_to_canonical_form(tree in arb_built_tree()) {
        let printed = tree.to_string();
        let reparsed = parse(&printed)
            .map(|node| node.map(|node| node.resolve().canonicalize()));

        prop_assert_eq!(
            reparsed,
            Ok(Some(tree.resolve().canonicalize())),
            "printed as {}",
            printed
        );
    }

    #[test]
    fn canonicalize_is_idempotent(tree in arb_built_tree()) {
        let once = tree.canonicalize();
        prop_assert!(once.is_canonical());
        prop_assert_eq!(once.clone().canonicalize(), once);
    }
}
