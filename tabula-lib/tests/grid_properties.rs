//! Behavioral properties of the row set operations.

use tabula_lib::engine::{column_stats, filter, group, paginate, sort, DataView, FilterClause, SortKeys};
use tabula_lib::model::{Accessor, ColumnDef, ColumnType, Record, Value};
use tabula_lib::selection::SelectionController;

fn scenario_rows() -> Vec<Record> {
    vec![
        Record::new().set("id", 1i64).set("name", "Bravo").set("amount", 50i64),
        Record::new().set("id", 2i64).set("name", "Alpha").set("amount", 150i64),
        Record::new().set("id", 3i64).set("name", "Charlie").set("amount", 100i64),
    ]
}

fn scenario_columns() -> Vec<ColumnDef<Record>> {
    vec![
        ColumnDef::new("id", ColumnType::Number),
        ColumnDef::new("name", ColumnType::Text),
        ColumnDef::new("amount", ColumnType::Currency),
    ]
}

/// A larger set with repeated keys, nulls and mixed types.
fn mixed_rows() -> Vec<Record> {
    (0..40i64)
        .map(|i| {
            let mut row = Record::new()
                .set("id", i)
                .set("team", ["red", "blue", "green"][(i % 3) as usize])
                .set("label", format!("item{}", i % 7));
            if i % 5 != 0 {
                row.insert("score", (i * 37) % 11);
            }
            row
        })
        .collect()
}

fn mixed_columns() -> Vec<ColumnDef<Record>> {
    vec![
        ColumnDef::new("id", ColumnType::Number),
        ColumnDef::new("team", ColumnType::Text),
        ColumnDef::new("label", ColumnType::Text),
        ColumnDef::new("score", ColumnType::Number),
    ]
}

fn ids(rows: &[&Record]) -> Vec<i64> {
    rows.iter()
        .map(|r| match r.get("id") {
            Some(Value::Int(id)) => *id,
            other => panic!("row without id: {:?}", other),
        })
        .collect()
}

#[test]
fn concrete_scenario() {
    let rows = scenario_rows();
    let columns = scenario_columns();

    let sorted = sort(&rows, SortKeys::desc("amount").as_slice(), &columns);
    assert_eq!(ids(&sorted), vec![2, 3, 1]);

    let filtered = filter(&rows, &[FilterClause::gte("amount", 100i64)], &columns, None);
    assert_eq!(ids(&filtered), vec![2, 3]);

    let page = paginate(&filtered, 1, 1);
    assert_eq!(ids(page.data()), vec![2]);
    assert_eq!(page.total_pages(), 2);
    assert_eq!(page.total_items(), 2);
}

#[test]
fn sort_is_stable_and_repeatable() {
    let rows = mixed_rows();
    let columns = mixed_columns();
    let keys = SortKeys::asc("team");

    let once = sort(&rows, keys.as_slice(), &columns);
    let twice = sort(once.iter().copied(), keys.as_slice(), &columns);
    assert_eq!(ids(&once), ids(&twice));

    // equal teams keep input order, so ids ascend within each team
    for team in ["blue", "green", "red"] {
        let team_ids: Vec<i64> = once
            .iter()
            .filter(|r| r.get_str("team") == Some(team))
            .map(|r| match r.get("id") {
                Some(Value::Int(id)) => *id,
                _ => -1,
            })
            .collect();
        assert!(team_ids.windows(2).all(|w| w[0] < w[1]), "{team}: {team_ids:?}");
    }
}

#[test]
fn filter_is_idempotent() {
    let rows = mixed_rows();
    let columns = mixed_columns();
    let clauses = [
        FilterClause::gte("score", 3i64),
        FilterClause::not_in("team", ["green"]),
    ];

    let once = filter(&rows, &clauses, &columns, Some("item"));
    let twice = filter(once.iter().copied(), &clauses, &columns, Some("item"));
    assert_eq!(ids(&once), ids(&twice));
    assert!(!once.is_empty());
}

#[test]
fn pages_cover_every_row_once() {
    let rows = mixed_rows();
    let columns = mixed_columns();
    let sorted = sort(&rows, SortKeys::desc("score").then_asc("label").as_slice(), &columns);

    for page_size in [1, 3, 7, 40, 100] {
        let total_pages = paginate(&sorted, 1, page_size).total_pages();
        let mut joined = Vec::new();
        for page in 1..=total_pages {
            joined.extend(paginate(&sorted, page, page_size).into_data());
        }
        assert_eq!(ids(&joined), ids(&sorted), "page size {page_size}");
    }
}

#[test]
fn nulls_sort_first_ascending_and_last_descending() {
    let rows = mixed_rows();
    let columns = mixed_columns();
    let null_count = rows.iter().filter(|r| r.get("score").is_none()).count();
    assert!(null_count > 0);

    let asc = sort(&rows, SortKeys::asc("score").as_slice(), &columns);
    assert!(asc[..null_count].iter().all(|r| r.get("score").is_none()));
    assert!(asc[null_count..].iter().all(|r| r.get("score").is_some()));

    let desc = sort(&rows, SortKeys::desc("score").as_slice(), &columns);
    let split = rows.len() - null_count;
    assert!(desc[..split].iter().all(|r| r.get("score").is_some()));
    assert!(desc[split..].iter().all(|r| r.get("score").is_none()));
}

#[test]
fn text_columns_sort_numbers_naturally() {
    let rows: Vec<Record> = ["item2", "item10", "item1"]
        .iter()
        .map(|label| Record::new().set("label", *label))
        .collect();
    let columns = vec![ColumnDef::new("label", ColumnType::Text)];

    let sorted = sort(&rows, SortKeys::asc("label").as_slice(), &columns);
    let labels: Vec<_> = sorted.iter().filter_map(|r| r.get_str("label")).collect();
    assert_eq!(labels, ["item1", "item2", "item10"]);
}

#[test]
fn selection_survives_resorting_and_paging() {
    let rows: Vec<Record> = ["r1", "r2", "r3", "r4"]
        .iter()
        .zip([40i64, 10, 30, 20])
        .map(|(id, amount)| Record::new().set("id", *id).set("amount", amount))
        .collect();
    let columns = vec![
        ColumnDef::new("id", ColumnType::Text),
        ColumnDef::new("amount", ColumnType::Number),
    ];

    let mut selection = SelectionController::new();
    selection.toggle(&rows[0]);

    let view = DataView::new(&columns).sort(SortKeys::asc("amount")).page(2, 2);
    let page = view.apply(&rows).page;
    assert_eq!(page.data()[1].get_str("id"), Some("r1"));
    assert!(selection.is_selected(page.data()[1]));
    assert_eq!(selection.selected_ids().collect::<Vec<_>>(), ["r1"]);
}

#[test]
fn unknown_columns_have_no_effect() {
    let rows = scenario_rows();
    let columns = scenario_columns();

    let sorted = sort(&rows, SortKeys::desc("nope").as_slice(), &columns);
    assert_eq!(ids(&sorted), vec![1, 2, 3]);

    let filtered = filter(&rows, &[FilterClause::equals("nope", "x")], &columns, None);
    assert_eq!(filtered.len(), 3);
}

struct Order {
    code: &'static str,
    region: &'static str,
    amount: i64,
}

fn order_columns() -> Vec<ColumnDef<Order>> {
    vec![
        ColumnDef::with_accessor("code", ColumnType::Text, Accessor::projection(|o: &Order| o.code.into())),
        ColumnDef::with_accessor("region", ColumnType::Text, Accessor::projection(|o: &Order| o.region.into())),
        ColumnDef::with_accessor("amount", ColumnType::Currency, Accessor::projection(|o: &Order| o.amount.into())),
    ]
}

#[test]
fn typed_rows_work_through_projections() {
    let orders = vec![
        Order { code: "o-1", region: "West", amount: 50 },
        Order { code: "o-2", region: "East", amount: 150 },
        Order { code: "o-3", region: "West", amount: 100 },
    ];
    let columns = order_columns();

    let result = DataView::new(&columns)
        .filter(FilterClause::gte("amount", 100i64))
        .sort(SortKeys::desc("amount"))
        .apply(&orders);
    let codes: Vec<&str> = result.page.data().iter().map(|o| o.code).collect();
    assert_eq!(codes, ["o-2", "o-3"]);

    let groups = group(&orders, "region", &columns);
    assert_eq!(groups.keys().collect::<Vec<_>>(), ["West", "East"]);
    assert_eq!(column_stats(&orders, &columns[2]).sum, Some(300.0));

    let mut selection = SelectionController::with_id(Accessor::projection(|o: &Order| o.code.into()));
    selection.toggle(&orders[1]);
    assert!(selection.is_selected(&orders[1]));
}
