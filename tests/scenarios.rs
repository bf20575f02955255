//! End-to-end extraction over small report matrices.

use tabfold::{extract, Cell, ExtractError, Key, LeafItem, NullTokens, ResultNode, Sheet, Template};

fn t(s: &str) -> Cell {
    Cell::from(s)
}

fn i(v: i64) -> Cell {
    Cell::Int(v)
}

const NULL: Cell = Cell::Null;

fn run(rows: Vec<Vec<Cell>>, template: &str) -> ResultNode {
    let template: Template = template.parse().unwrap();
    extract(&Sheet::from_rows(rows), &template, &NullTokens::default()).unwrap()
}

fn scalar(c: Cell) -> Key {
    Key::Scalar(c)
}

fn pair(a: Cell, b: Cell) -> Key {
    Key::Composite(vec![a, b])
}

fn branch(entries: Vec<(Key, ResultNode)>) -> ResultNode {
    ResultNode::Branch(entries)
}

fn values(cells: Vec<Cell>) -> ResultNode {
    ResultNode::Leaf(cells.into_iter().map(LeafItem::Value).collect())
}

fn records(rows: Vec<Vec<Cell>>) -> ResultNode {
    ResultNode::Leaf(rows.into_iter().map(LeafItem::Record).collect())
}

fn report_rows() -> Vec<Vec<Cell>> {
    vec![
        vec![t("Report1"), t("SectionA"), t("Value1")],
        vec![NULL, t("SectionB"), t("Value2")],
        vec![t("Report2"), t("SectionC"), t("N/A")],
        vec![t("Report3"), NULL, t("Value3")],
    ]
}

#[test]
fn composite_key_with_single_leaf_column() {
    let rows = vec![
        vec![i(2023), t("Q1"), i(5_000_000)],
        vec![i(2023), t("Q2"), i(6_200_000)],
    ];
    assert_eq!(
        run(rows, "[[_,_],[_]]"),
        branch(vec![
            (pair(i(2023), t("Q1")), values(vec![i(5_000_000)])),
            (pair(i(2023), t("Q2")), values(vec![i(6_200_000)])),
        ])
    );
}

#[test]
fn merged_cells_fill_and_composite_leaves() {
    assert_eq!(
        run(report_rows(), "[[_],[_,_]]"),
        branch(vec![
            (
                scalar(t("Report1")),
                records(vec![
                    vec![t("SectionA"), t("Value1")],
                    vec![t("SectionB"), t("Value2")],
                ]),
            ),
            (scalar(t("Report2")), records(vec![vec![t("SectionC"), NULL]])),
            (scalar(t("Report3")), records(vec![vec![NULL, t("Value3")]])),
        ])
    );
}

#[test]
fn trailing_columns_are_ignored() {
    assert_eq!(
        run(report_rows(), "[[_],[_]]"),
        branch(vec![
            (scalar(t("Report1")), values(vec![t("SectionA"), t("SectionB")])),
            (scalar(t("Report2")), values(vec![t("SectionC")])),
            (scalar(t("Report3")), values(vec![NULL])),
        ])
    );
}

#[test]
fn deep_nesting_with_cascading_fill() {
    let rows = vec![
        vec![t("Report1"), t("SectionA"), t("Value1"), i(2023), t("Q1"), i(5_000_000)],
        vec![NULL, NULL, NULL, i(2023), t("Q2"), i(6_200_000)],
        vec![NULL, t("SectionB"), t("Value2"), i(2023), t("Q1"), i(5_500_000)],
        vec![NULL, NULL, t("Value3"), i(2024), t("Q1"), i(7_000_000)],
        vec![NULL, NULL, NULL, i(2024), t("Q2"), i(8_000_000)],
        vec![t("Report2"), t("SectionC"), NULL, i(2024), t("Q1"), i(3_000_000)],
        vec![NULL, NULL, t("Value4"), i(2024), t("Q2"), i(3_100_000)],
    ];
    let tree = run(rows, "[[_],[_],[_],[_,_],[_]]");

    let expected = branch(vec![
        (
            scalar(t("Report1")),
            branch(vec![
                (
                    scalar(t("SectionA")),
                    branch(vec![(
                        scalar(t("Value1")),
                        branch(vec![
                            (pair(i(2023), t("Q1")), values(vec![i(5_000_000)])),
                            (pair(i(2023), t("Q2")), values(vec![i(6_200_000)])),
                        ]),
                    )]),
                ),
                (
                    scalar(t("SectionB")),
                    branch(vec![
                        (
                            scalar(t("Value2")),
                            branch(vec![(pair(i(2023), t("Q1")), values(vec![i(5_500_000)]))]),
                        ),
                        (
                            scalar(t("Value3")),
                            branch(vec![
                                (pair(i(2024), t("Q1")), values(vec![i(7_000_000)])),
                                (pair(i(2024), t("Q2")), values(vec![i(8_000_000)])),
                            ]),
                        ),
                    ]),
                ),
            ]),
        ),
        (
            scalar(t("Report2")),
            branch(vec![(
                scalar(t("SectionC")),
                branch(vec![
                    (
                        scalar(NULL),
                        branch(vec![(pair(i(2024), t("Q1")), values(vec![i(3_000_000)]))]),
                    ),
                    (
                        scalar(t("Value4")),
                        branch(vec![(pair(i(2024), t("Q2")), values(vec![i(3_100_000)]))]),
                    ),
                ]),
            )]),
        ),
    ]);
    assert_eq!(tree, expected);

    let path = [scalar(t("Report1")), scalar(t("SectionB")), scalar(t("Value3"))];
    assert_eq!(tree.path(&path).map(ResultNode::len), Some(2));
}

#[test]
fn two_level_hierarchy() {
    let rows = vec![
        vec![t("H1"), t("A")],
        vec![t(""), t("B")],
        vec![t("H2"), t("C")],
        vec![t(""), t("D")],
    ];
    assert_eq!(
        run(rows, "[[_],[_]]"),
        branch(vec![
            (scalar(t("H1")), values(vec![t("A"), t("B")])),
            (scalar(t("H2")), values(vec![t("C"), t("D")])),
        ])
    );
}

#[test]
fn composite_first_level_fills_leading_column() {
    let rows = vec![
        vec![t("G1"), t("K1"), t("V1")],
        vec![t(""), t("K1"), t("V2")],
        vec![t("G1"), t("K2"), t("V3")],
        vec![t("G2"), t("K1"), t("V4")],
    ];
    assert_eq!(
        run(rows, "[[_,_],[_]]"),
        branch(vec![
            (pair(t("G1"), t("K1")), values(vec![t("V1"), t("V2")])),
            (pair(t("G1"), t("K2")), values(vec![t("V3")])),
            (pair(t("G2"), t("K1")), values(vec![t("V4")])),
        ])
    );
}

#[test]
fn null_spellings_group_under_null_key() {
    let rows = vec![
        vec![t("KeyA"), t(" "), i(1)],
        vec![t("KeyA"), t(""), i(2)],
        vec![t("KeyA"), NULL, i(3)],
        vec![t("KeyA"), Cell::Float(f64::NAN), i(4)],
        vec![t("KeyA"), t("N/A"), i(6)],
        vec![t("KeyA"), t("NaN"), i(7)],
        vec![t("KeyB"), t("Valid"), i(8)],
    ];
    assert_eq!(
        run(rows, "[[_],[_],[_]]"),
        branch(vec![
            (
                scalar(t("KeyA")),
                branch(vec![(scalar(NULL), values(vec![i(1), i(2), i(3), i(4), i(6), i(7)]))]),
            ),
            (
                scalar(t("KeyB")),
                branch(vec![(scalar(t("Valid")), values(vec![i(8)]))]),
            ),
        ])
    );
}

#[test]
fn explicit_null_parent_is_not_filled() {
    let rows = vec![
        vec![t("N/A"), t("A"), i(1)],
        vec![t(""), t("B"), i(2)],
        vec![t(""), t("A"), Cell::Float(1.5)],
        vec![t("Key2"), t("C"), i(3)],
    ];
    assert_eq!(
        run(rows, "[[_],[_],[_]]"),
        branch(vec![
            (
                scalar(NULL),
                branch(vec![
                    (scalar(t("A")), values(vec![i(1), Cell::Float(1.5)])),
                    (scalar(t("B")), values(vec![i(2)])),
                ]),
            ),
            (scalar(t("Key2")), branch(vec![(scalar(t("C")), values(vec![i(3)]))])),
        ])
    );
}

#[test]
fn flat_template_lists_every_row() {
    let rows = vec![
        vec![i(1), t("Apple"), i(100)],
        vec![i(2), t("Banana"), t("")],
        vec![i(3), t("Orange"), t("<NA>")],
    ];
    assert_eq!(
        run(rows, "[[_,_,_]]"),
        records(vec![
            vec![i(1), t("Apple"), i(100)],
            vec![i(2), t("Banana"), NULL],
            vec![i(3), t("Orange"), NULL],
        ])
    );
}

#[test]
fn template_needing_more_columns_fails() {
    let rows = vec![vec![i(1), t("A")], vec![i(2), t("B")]];
    let template: Template = "[[_],[_],[_]]".parse().unwrap();
    let err = extract(&Sheet::from_rows(rows), &template, &NullTokens::default()).unwrap_err();
    assert_eq!(
        err,
        ExtractError::TemplateMismatch {
            required: 3,
            available: 2
        }
    );
    assert_eq!(
        err.to_string(),
        "template requires 3 columns but the data has 2"
    );
}

#[test]
fn custom_null_tokens_apply() {
    let rows = vec![vec![t("K"), t("--")], vec![t("K"), t("n/a")]];
    let template: Template = "[[_],[_]]".parse().unwrap();
    let tree = extract(
        &Sheet::from_rows(rows),
        &template,
        &NullTokens::new(["--"]),
    )
    .unwrap();
    assert_eq!(
        tree,
        branch(vec![(scalar(t("K")), values(vec![NULL, t("n/a")]))])
    );
}
