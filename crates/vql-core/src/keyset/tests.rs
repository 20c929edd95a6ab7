use crate::{
    cursor::Cursor,
    keyset::{
        CursorPosition, PageWindow, Row, ScanDirection, compare_rows, compare_to_cursor,
        cursor_for_row,
    },
    query::{Order, RawQuery, normalize},
    value::Value,
};
use proptest::prelude::*;
use std::{cmp::Ordering, collections::BTreeMap};

type TestRow = BTreeMap<String, Value>;

fn row(pairs: &[(&str, Value)]) -> TestRow {
    pairs
        .iter()
        .map(|(name, value)| ((*name).to_string(), value.clone()))
        .collect()
}

fn ranked(rank: i64, id: &str) -> TestRow {
    row(&[("rank", Value::Int(rank)), ("id", Value::from(id))])
}

fn cursor(text: &str) -> Cursor {
    Cursor::parse_text(text).expect("test cursor must parse")
}

fn sort(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|field| (*field).to_string()).collect()
}

fn ids<R: Row>(rows: &[R]) -> Vec<String> {
    rows.iter()
        .map(|row| row.field("id").map(|id| id.to_string()).unwrap_or_default())
        .collect()
}

//
// Comparator
//

#[test]
fn first_differing_field_decides_in_query_direction() {
    let at = cursor("(rank:2,id:m)");
    let sort_by = sort(&["rank"]);

    assert_eq!(
        compare_to_cursor(&ranked(3, "a"), &at, &sort_by, Order::Asc, "id"),
        CursorPosition::After
    );
    assert_eq!(
        compare_to_cursor(&ranked(3, "a"), &at, &sort_by, Order::Desc, "id"),
        CursorPosition::Before
    );
    assert_eq!(
        compare_to_cursor(&ranked(1, "z"), &at, &sort_by, Order::Asc, "id"),
        CursorPosition::Before
    );
}

#[test]
fn tie_breaker_decides_equal_sort_values() {
    let at = cursor("(rank:2,id:m)");
    let sort_by = sort(&["rank"]);

    assert_eq!(
        compare_to_cursor(&ranked(2, "n"), &at, &sort_by, Order::Asc, "id"),
        CursorPosition::After
    );
    assert_eq!(
        compare_to_cursor(&ranked(2, "n"), &at, &sort_by, Order::Desc, "id"),
        CursorPosition::Before
    );
    assert_eq!(
        compare_to_cursor(&ranked(2, "m"), &at, &sort_by, Order::Asc, "id"),
        CursorPosition::Equal
    );
}

#[test]
fn missing_values_order_before_present_ones() {
    let at = cursor("(rank:2,id:m)");
    let missing = row(&[("id", Value::from("a"))]);

    assert_eq!(
        compare_to_cursor(&missing, &at, &sort(&["rank"]), Order::Asc, "id"),
        CursorPosition::Before
    );
    assert_eq!(
        compare_rows(&missing, &ranked(0, "a"), &sort(&["rank"]), Order::Asc, "id"),
        Ordering::Less
    );
}

#[test]
fn numeric_family_compares_across_int_and_float() {
    let at = cursor("(score:2.5,id:m)");
    let high = row(&[("score", Value::Int(3)), ("id", Value::from("a"))]);

    assert_eq!(
        compare_to_cursor(&high, &at, &sort(&["score"]), Order::Asc, "id"),
        CursorPosition::After
    );
}

#[test]
fn cursor_for_row_captures_sort_values_and_identity() {
    let source = ranked(4, "q");
    let built = cursor_for_row(&source, &sort(&["rank"]), "id").expect("row has every field");

    assert_eq!(built, cursor("(rank:4,id:q)"));
    assert_eq!(
        compare_to_cursor(&source, &built, &sort(&["rank"]), Order::Desc, "id"),
        CursorPosition::Equal
    );
    assert_eq!(cursor_for_row(&source, &sort(&["missing"]), "id"), None);
}

//
// Window
//

fn table() -> Vec<TestRow> {
    vec![
        ranked(1, "a"),
        ranked(2, "b"),
        ranked(2, "c"),
        ranked(3, "d"),
        ranked(4, "e"),
        ranked(5, "f"),
    ]
}

fn window(raw: RawQuery) -> PageWindow {
    let query = normalize(raw.sort_by(["rank"])).expect("valid query");
    PageWindow::from_query(&query)
}

#[test]
fn start_at_is_inclusive_and_start_after_is_not() {
    let at = window(RawQuery::new().order(Order::Asc).start_at(cursor("(rank:2,id:c)")));
    let after = window(RawQuery::new().order(Order::Asc).start_after(cursor("(rank:2,id:c)")));

    assert_eq!(ids(&at.page(table())), vec!["c", "d", "e", "f"]);
    assert_eq!(ids(&after.page(table())), vec!["d", "e", "f"]);
}

#[test]
fn end_at_is_inclusive_and_end_before_is_not() {
    let at = window(RawQuery::new().order(Order::Asc).end_at(cursor("(rank:3,id:d)")));
    let before = window(RawQuery::new().order(Order::Asc).end_before(cursor("(rank:3,id:d)")));

    assert_eq!(ids(&at.page(table())), vec!["a", "b", "c", "d"]);
    assert_eq!(ids(&before.page(table())), vec!["a", "b", "c"]);
}

#[test]
fn descending_windows_run_high_to_low() {
    let page = window(
        RawQuery::new()
            .start_after(cursor("(rank:4,id:e)"))
            .limit(2),
    );

    assert_eq!(page.direction(), ScanDirection::Forward);
    assert_eq!(ids(&page.page(table())), vec!["d", "c"]);
}

#[test]
fn limit_to_last_takes_the_tail_in_query_order() {
    let page = window(
        RawQuery::new()
            .order(Order::Asc)
            .limit_to_last(2)
            .end_before(cursor("(rank:4,id:e)")),
    );

    assert_eq!(page.direction(), ScanDirection::Reverse);
    assert_eq!(page.direction().scan_order(Order::Asc), Order::Desc);
    assert_eq!(ids(&page.page(table())), vec!["c", "d"]);
}

#[test]
fn unbounded_window_admits_everything() {
    let page = window(RawQuery::new().order(Order::Asc));

    assert!(!page.is_bounded());
    assert_eq!(page.page_size(), None);
    assert_eq!(ids(&page.page(table())), vec!["a", "b", "c", "d", "e", "f"]);
}

//
// Properties
//

fn arb_row() -> impl Strategy<Value = TestRow> {
    (
        proptest::option::of(0_i64..3),
        proptest::option::of(0_i64..3),
        0_i64..1_000,
    )
        .prop_map(|(a, b, id)| {
            let mut row = TestRow::new();
            if let Some(a) = a {
                row.insert("a".to_string(), Value::Int(a));
            }
            if let Some(b) = b {
                row.insert("b".to_string(), Value::Int(b));
            }
            row.insert("id".to_string(), Value::Int(id));
            row
        })
}

fn arb_order() -> impl Strategy<Value = Order> {
    prop_oneof![Just(Order::Asc), Just(Order::Desc)]
}

fn full_row() -> impl Strategy<Value = TestRow> {
    arb_row().prop_filter("every sort field present", |row| {
        row.contains_key("a") && row.contains_key("b")
    })
}

proptest! {
    #[test]
    fn row_order_is_antisymmetric(left in arb_row(), right in arb_row(), order in arb_order()) {
        let sort_by = sort(&["a", "b"]);
        let forward = compare_rows(&left, &right, &sort_by, order, "id");

        prop_assert_eq!(forward, compare_rows(&right, &left, &sort_by, order, "id").reverse());
        prop_assert_eq!(forward == Ordering::Equal, left == right);
    }

    #[test]
    fn row_order_is_transitive(
        a in arb_row(),
        b in arb_row(),
        c in arb_row(),
        order in arb_order(),
    ) {
        let sort_by = sort(&["a", "b"]);
        let le = |x: &TestRow, y: &TestRow| {
            compare_rows(x, y, &sort_by, order, "id") != Ordering::Greater
        };

        if le(&a, &b) && le(&b, &c) {
            prop_assert!(le(&a, &c));
        }
    }

    #[test]
    fn cursor_position_agrees_with_row_order(
        probe in arb_row(),
        anchor in full_row(),
        order in arb_order(),
    ) {
        let sort_by = sort(&["a", "b"]);
        let at = cursor_for_row(&anchor, &sort_by, "id").expect("anchor has every field");
        let expected = match compare_rows(&probe, &anchor, &sort_by, order, "id") {
            Ordering::Less => CursorPosition::Before,
            Ordering::Equal => CursorPosition::Equal,
            Ordering::Greater => CursorPosition::After,
        };

        prop_assert_eq!(compare_to_cursor(&probe, &at, &sort_by, order, "id"), expected);
    }
}
