// tests/output_tests.rs

use cosmos_sql::ast::{
    BinaryOp, Identifier, Literal, ObjectProperty, Parameter, PropertyName, ScalarExpr, UnaryOp,
};
use cosmos_sql::output::{to_text, to_text_pretty};
use cosmos_sql::{parse, parse_scalar_expression};
use proptest::prelude::*;

fn compact(input: &str) -> String {
    to_text(&parse(input).unwrap_or_else(|e| panic!("Failed to parse {:?}: {}", input, e)))
}

fn scalar_text(input: &str) -> String {
    parse_scalar_expression(input)
        .unwrap_or_else(|e| panic!("Failed to parse {:?}: {}", input, e))
        .to_string()
}

const QUERIES: &[&str] = &[
    "SELECT *",
    "SELECT 1",
    "SELECT 1, 2, 3",
    "SELECT c.name AS n, c.age years FROM c",
    "SELECT VALUE c FROM c",
    "SELECT DISTINCT TOP 10 VALUE c.name FROM c",
    "SELECT TOP @n * FROM c",
    "SELECT * FROM c WHERE c.age > 21",
    "SELECT * FROM c AS d WHERE d.a = 1 AND d.b != 'x' OR NOT d.c",
    "SELECT * FROM c.arr[5]['k'] AS a",
    "SELECT * FROM [1, 2, 3] AS a",
    "SELECT * FROM (SELECT VALUE c.x FROM c) AS s",
    "SELECT * FROM c JOIN t IN c.tags JOIN u IN t.items",
    "SELECT * FROM item IN (SELECT * FROM c)",
    "SELECT c.city, COUNT(1) AS n FROM c GROUP BY c.city",
    "SELECT * FROM c ORDER BY c.a ASC, c.b DESC, c.c",
    "SELECT * FROM c OFFSET 10 LIMIT 5",
    "SELECT * FROM c OFFSET @skip LIMIT @take",
    "SELECT * FROM c WHERE c.age BETWEEN 18 AND 65",
    "SELECT * FROM c WHERE c.age NOT BETWEEN 18 + 1 AND 65 * 2",
    "SELECT * FROM c WHERE c.state IN ('WA', 'OR')",
    "SELECT * FROM c WHERE c.state NOT IN ('CA')",
    "SELECT * FROM c WHERE EXISTS(SELECT * FROM t IN c.tags WHERE t = 'x')",
    "SELECT ARRAY(SELECT VALUE t FROM t IN c.tags) AS tags FROM c",
    "SELECT (SELECT VALUE 1) AS one",
    "SELECT c.a ?? c.b ?? 'none' FROM c",
    "SELECT c.a ? 'yes' : c.b ? 'maybe' : 'no' FROM c",
    "SELECT (c.a ? 1 : 2) + 3 FROM c",
    "SELECT c.first || ' ' || c.last FROM c",
    "SELECT 1 | 2 & 3 ^ 4",
    "SELECT (1 | 2) & 3",
    "SELECT -1, +2, ~3, - -4, -(1 + 2)",
    "SELECT NOT (true AND false)",
    "SELECT 10 - (4 - 3), (10 - 4) - 3, 2 * (3 % 4)",
    "SELECT 1337.42, 1E2, 10e-23, 9223372036854775807, 9223372036854775808",
    "SELECT \"say \\\"hi\\\"\", 'tab\\there', '\\u00e9\\ud83d\\ude00'",
    "SELECT null, undefined, true, FALSE",
    "SELECT [], [1, [2, 3]], {}, {'a': 1, \"b\": {'c': [c.d]}}",
    "SELECT {'x': 1}.x, [1, 2][0], (5).x",
    "SELECT c.arr[2 + 2], c['key'], c.a.b.c[0].d FROM c",
    "SELECT ABS(-123), PI(), STARTSWITH(c.name, 'a'), udf.tax(c.price) FROM c",
    "SELECT @p1 FROM c WHERE c.id = @id",
    "SELECT * FROM c WHERE c.a < 1 = true",
    "SELECT * FROM c WHERE (c.a OR c.b) AND c.c",
    "SELECT * FROM c WHERE c.a || c.b OR c.c",
    "select value c.name from c where c.x between 1 and 2 order by c.name desc",
];

// ============================================================================
// Round Trip
// ============================================================================

#[test]
fn test_round_trip_is_stable() {
    for input in QUERIES {
        let first = parse(input).unwrap_or_else(|e| panic!("Failed to parse {:?}: {}", input, e));
        let text = to_text(&first);
        let second =
            parse(&text).unwrap_or_else(|e| panic!("Failed to reparse {:?}: {}", text, e));
        assert_eq!(first, second, "Tree changed for {:?} -> {:?}", input, text);
        assert_eq!(text, to_text(&second), "Text changed for {:?}", input);
    }
}

#[test]
fn test_pretty_round_trip_is_stable() {
    for input in QUERIES {
        let first = parse(input).unwrap();
        let text = to_text_pretty(&first);
        let second =
            parse(&text).unwrap_or_else(|e| panic!("Failed to reparse {:?}: {}", text, e));
        assert_eq!(first, second, "Tree changed for {:?} -> {:?}", input, text);
    }
}

#[test]
fn test_doubled_quote_is_not_an_escape() {
    // Two adjacent string literals are not a valid projection.
    assert!(parse("SELECT 'it''s'").is_err());
}

// ============================================================================
// Canonical Form
// ============================================================================

#[test]
fn test_keywords_are_upper_cased() {
    assert_eq!(
        compact("select value c.name from c where c.x between 1 and 2 order by c.name desc"),
        "SELECT VALUE c.name FROM c WHERE c.x BETWEEN 1 AND 2 ORDER BY c.name DESC"
    );
}

#[test]
fn test_literals_are_canonical() {
    assert_eq!(compact("SELECT TRUE, False, NULL, UNDEFINED"), "SELECT true, false, null, undefined");
    assert_eq!(compact("SELECT 1E2, 1.5, 42"), "SELECT 100.0, 1.5, 42");
}

#[test]
fn test_strings_are_double_quoted() {
    assert_eq!(compact("SELECT 'hello'"), r#"SELECT "hello""#);
    assert_eq!(compact(r#"SELECT 'say "hi"'"#), r#"SELECT "say \"hi\"""#);
    assert_eq!(compact(r#"SELECT 'it\'s'"#), r#"SELECT "it's""#);
    assert_eq!(compact(r#"SELECT 'a\nb'"#), r#"SELECT "a\nb""#);
}

#[test]
fn test_ascending_is_implicit() {
    assert_eq!(
        compact("SELECT * FROM c ORDER BY c.a ASC, c.b DESC"),
        "SELECT * FROM c ORDER BY c.a, c.b DESC"
    );
}

#[test]
fn test_aliases_use_as() {
    assert_eq!(compact("SELECT c.a x FROM c y"), "SELECT c.a AS x FROM c AS y");
}

#[test]
fn test_clause_order() {
    assert_eq!(
        compact(
            "select distinct top 5 c.city, count(1) as n from c join t in c.tags \
             where t = 'x' group by c.city order by c.city desc offset 0 limit 5"
        ),
        "SELECT DISTINCT TOP 5 c.city, count(1) AS n FROM c JOIN t IN c.tags \
         WHERE t = \"x\" GROUP BY c.city ORDER BY c.city DESC OFFSET 0 LIMIT 5"
    );
}

#[test]
fn test_from_paths() {
    assert_eq!(
        compact("SELECT * FROM c.arr[5]['k'] AS a"),
        r#"SELECT * FROM c.arr[5]["k"] AS a"#
    );
    assert_eq!(compact("SELECT * FROM [1,2,3]"), "SELECT * FROM [1, 2, 3]");
}

// ============================================================================
// Parentheses
// ============================================================================

#[test]
fn test_redundant_parentheses_are_dropped() {
    assert_eq!(scalar_text("(1 + (2 * 3))"), "1 + 2 * 3");
    assert_eq!(scalar_text("((10 - 4) - 3)"), "10 - 4 - 3");
    assert_eq!(scalar_text("('John')"), "\"John\"");
    assert_eq!(scalar_text("(a) AND (b)"), "a AND b");
}

#[test]
fn test_required_parentheses_are_kept() {
    assert_eq!(scalar_text("(1 + 2) * 3"), "(1 + 2) * 3");
    assert_eq!(scalar_text("10 - (4 - 3)"), "10 - (4 - 3)");
    assert_eq!(scalar_text("(a OR b) AND c"), "(a OR b) AND c");
    assert_eq!(scalar_text("NOT (a AND b)"), "NOT (a AND b)");
    assert_eq!(scalar_text("-(1 + 2)"), "-(1 + 2)");
    assert_eq!(scalar_text("(a ? 1 : 2) + 3"), "(a ? 1 : 2) + 3");
    assert_eq!(scalar_text("'a' ?? ('b' ?? 'c')"), r#""a" ?? ("b" ?? "c")"#);
    assert_eq!(scalar_text("(a + b).c"), "(a + b).c");
}

#[test]
fn test_signs_do_not_merge() {
    assert_eq!(scalar_text("-(-1)"), "- -1");
    assert_eq!(scalar_text("-(+1)"), "- +1");
    assert_eq!(scalar_text("1 - -1"), "1 - -1");
}

#[test]
fn test_property_of_number_literal() {
    assert_eq!(scalar_text("(5).x"), "(5).x");
    assert!(parse_scalar_expression("(5).x").is_ok());
}

#[test]
fn test_calls_and_constructors() {
    assert_eq!(scalar_text("udf.tax( c.price , 2 )"), "udf.tax(c.price, 2)");
    assert_eq!(scalar_text("PI( )"), "PI()");
    assert_eq!(scalar_text("{ 'a' : 1 , 'b' : [ ] }"), r#"{"a": 1, "b": []}"#);
    assert_eq!(scalar_text("{ }"), "{}");
    assert_eq!(scalar_text("x IN ( 1,2 )"), "x IN (1, 2)");
    assert_eq!(scalar_text("x not between 1 and 2"), "x NOT BETWEEN 1 AND 2");
}

// ============================================================================
// Pretty Output
// ============================================================================

#[test]
fn test_pretty_one_clause_per_line() {
    let query = parse("SELECT * FROM c WHERE c.a = 1 ORDER BY c.a OFFSET 1 LIMIT 2").unwrap();
    assert_eq!(
        to_text_pretty(&query),
        "SELECT *\nFROM c\nWHERE c.a = 1\nORDER BY c.a\nOFFSET 1 LIMIT 2"
    );
}

#[test]
fn test_pretty_collection_subquery() {
    let query = parse("SELECT * FROM (SELECT VALUE 1) AS s").unwrap();
    assert_eq!(to_text_pretty(&query), "SELECT *\nFROM (\n    SELECT VALUE 1\n) AS s");
}

#[test]
fn test_pretty_nested_subqueries_indent_per_level() {
    let query = parse("SELECT * FROM c WHERE EXISTS(SELECT VALUE ARRAY(SELECT * FROM c))").unwrap();
    assert_eq!(
        to_text_pretty(&query),
        "SELECT *\nFROM c\nWHERE EXISTS(\n    SELECT VALUE ARRAY(\n        SELECT *\n        FROM c\n    )\n)"
    );
}

#[test]
fn test_query_display_is_compact() {
    let query = parse("SELECT *\n  FROM c\n  WHERE c.a = 1").unwrap();
    assert_eq!(query.to_string(), "SELECT * FROM c WHERE c.a = 1");
    assert_eq!(query.to_text(true), "SELECT *\nFROM c\nWHERE c.a = 1");
}

#[test]
fn test_collection_display() {
    let query = parse("SELECT * FROM c JOIN t IN c.tags").unwrap();
    let from = query.from.unwrap();
    assert_eq!(from.expr.to_string(), "c JOIN t IN c.tags");
}

// ============================================================================
// Generated Expressions
// ============================================================================

fn name() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "c", "foo", "bar_1"]).prop_map(String::from)
}

fn leaf() -> impl Strategy<Value = ScalarExpr> {
    prop_oneof![
        (0i64..=i64::MAX).prop_map(|n| ScalarExpr::number(n)),
        (0u32..1_000_000).prop_map(|n| ScalarExpr::number(f64::from(n) / 8.0)),
        "\\PC{0,6}".prop_map(|s: String| ScalarExpr::string(s)),
        any::<bool>().prop_map(|b| ScalarExpr::Literal(Literal::boolean(b))),
        Just(ScalarExpr::Literal(Literal::null())),
        Just(ScalarExpr::Literal(Literal::undefined())),
        name().prop_map(|n| ScalarExpr::identifier(n)),
        name().prop_map(|n| ScalarExpr::ParameterRef(Parameter::new(n))),
    ]
}

fn binary_op() -> impl Strategy<Value = BinaryOp> {
    // `??` parses to its own node, not a binary one.
    prop::sample::select(vec![
        BinaryOp::Add,
        BinaryOp::Subtract,
        BinaryOp::Multiply,
        BinaryOp::Divide,
        BinaryOp::Modulo,
        BinaryOp::BitwiseAnd,
        BinaryOp::BitwiseOr,
        BinaryOp::BitwiseXor,
        BinaryOp::Equal,
        BinaryOp::NotEqual,
        BinaryOp::LessThan,
        BinaryOp::LessThanOrEqual,
        BinaryOp::GreaterThan,
        BinaryOp::GreaterThanOrEqual,
        BinaryOp::And,
        BinaryOp::Or,
        BinaryOp::StringConcat,
    ])
}

fn unary_op() -> impl Strategy<Value = UnaryOp> {
    prop::sample::select(vec![UnaryOp::BitwiseNot, UnaryOp::Minus, UnaryOp::Not, UnaryOp::Plus])
}

fn expr() -> impl Strategy<Value = ScalarExpr> {
    leaf().prop_recursive(4, 48, 3, |inner| {
        prop_oneof![
            (unary_op(), inner.clone()).prop_map(|(op, e)| ScalarExpr::unary(op, e)),
            (binary_op(), inner.clone(), inner.clone())
                .prop_map(|(op, l, r)| ScalarExpr::binary(op, l, r)),
            (inner.clone(), inner.clone(), inner.clone(), any::<bool>()).prop_map(
                |(e, low, high, not)| ScalarExpr::Between {
                    expr: Box::new(e),
                    low: Box::new(low),
                    high: Box::new(high),
                    not,
                }
            ),
            (inner.clone(), inner.clone(), inner.clone()).prop_map(|(c, t, f)| {
                ScalarExpr::Conditional {
                    condition: Box::new(c),
                    consequent: Box::new(t),
                    alternative: Box::new(f),
                }
            }),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| ScalarExpr::Coalesce {
                left: Box::new(l),
                right: Box::new(r),
            }),
            (inner.clone(), prop::collection::vec(inner.clone(), 1..3), any::<bool>()).prop_map(
                |(e, items, not)| ScalarExpr::In {
                    expr: Box::new(e),
                    items,
                    not,
                }
            ),
            (name(), any::<bool>(), prop::collection::vec(inner.clone(), 0..3)).prop_map(
                |(n, udf, args)| ScalarExpr::FunctionCall {
                    name: Identifier::new(n),
                    udf,
                    args,
                }
            ),
            prop_oneof![
                (inner.clone(), inner.clone()).prop_map(|(m, i)| ScalarExpr::MemberIndexer {
                    member: Box::new(m),
                    index: Box::new(i),
                }),
                (inner.clone(), name()).prop_map(|(m, n)| ScalarExpr::property(m, n)),
            ],
            prop::collection::vec(inner.clone(), 0..3).prop_map(ScalarExpr::ArrayCreate),
            prop::collection::vec(("[a-z]{1,4}", inner.clone()), 0..3).prop_map(|properties| {
                ScalarExpr::ObjectCreate(
                    properties
                        .into_iter()
                        .map(|(key, expr)| ObjectProperty {
                            name: PropertyName::new(key),
                            expr,
                        })
                        .collect(),
                )
            }),
        ]
    })
}

proptest! {
    #[test]
    fn prop_scalar_text_parses_back(e in expr()) {
        let text = e.to_string();
        let parsed = parse_scalar_expression(&text);
        prop_assert!(parsed.is_ok(), "Failed to reparse {:?}: {:?}", text, parsed);
        prop_assert_eq!(parsed.unwrap(), e);
    }

    #[test]
    fn prop_query_text_is_stable(e in expr(), pretty in any::<bool>()) {
        let query = parse(&format!("SELECT VALUE {} FROM c", e)).unwrap();
        let text = query.to_text(pretty);
        prop_assert_eq!(parse(&text).unwrap().to_text(pretty), text);
    }
}
