// tests/hasher_tests.rs

use cosmos_sql::{parse, parse_scalar_expression, StructuralHasher};

fn strict(input: &str) -> u32 {
    parse(input).unwrap().structural_hash(true)
}

fn loose(input: &str) -> u32 {
    parse(input).unwrap().structural_hash(false)
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_equal_trees_hash_equal() {
    let queries = [
        "SELECT * FROM c WHERE c.age > 21",
        "SELECT DISTINCT TOP 5 c.a, c.b AS x FROM c JOIN t IN c.tags ORDER BY c.a DESC",
        "SELECT VALUE {'a': 1, 'b': [1, 2]} FROM c OFFSET 1 LIMIT 2",
    ];
    for q in queries {
        assert_eq!(strict(q), strict(q), "Failed for {}", q);
        assert_eq!(loose(q), loose(q), "Failed for {}", q);
    }
}

#[test]
fn test_formatting_does_not_affect_hash() {
    assert_eq!(
        strict("select * from c where (c.age > 21)"),
        strict("SELECT *\nFROM c\nWHERE c.age > 21")
    );
}

#[test]
fn test_integer_and_equal_double_hash_equal() {
    assert_eq!(strict("SELECT 1"), strict("SELECT 1.0"));
    assert_eq!(strict("SELECT 100"), strict("SELECT 1E2"));
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn test_select_item_order() {
    assert_ne!(strict("SELECT 1, 2"), strict("SELECT 2, 1"));
    assert_eq!(loose("SELECT 1, 2"), loose("SELECT 2, 1"));
}

#[test]
fn test_object_property_order() {
    let a = "SELECT VALUE {'a': 1, 'b': 2}";
    let b = "SELECT VALUE {'b': 2, 'a': 1}";
    assert_ne!(strict(a), strict(b));
    assert_eq!(loose(a), loose(b));
}

#[test]
fn test_other_lists_stay_ordered_when_loose() {
    assert_ne!(loose("SELECT VALUE [1, 2]"), loose("SELECT VALUE [2, 1]"));
    assert_ne!(loose("SELECT * ORDER BY 1, 2"), loose("SELECT * ORDER BY 2, 1"));
    assert_ne!(loose("SELECT * GROUP BY 1, 2"), loose("SELECT * GROUP BY 2, 1"));
    assert_ne!(loose("SELECT f(1, 2)"), loose("SELECT f(2, 1)"));
    assert_ne!(loose("SELECT * WHERE 1 IN (1, 2)"), loose("SELECT * WHERE 1 IN (2, 1)"));
}

#[test]
fn test_operands_are_ordered() {
    assert_ne!(strict("SELECT 1 - 2"), strict("SELECT 2 - 1"));
    assert_ne!(strict("SELECT a ?? b"), strict("SELECT b ?? a"));
}

// ============================================================================
// Sensitivity
// ============================================================================

#[test]
fn test_distinguishes_flags() {
    let pairs = [
        ("SELECT *", "SELECT DISTINCT *"),
        ("SELECT * ORDER BY c.a", "SELECT * ORDER BY c.a DESC"),
        ("SELECT * WHERE 1 BETWEEN 0 AND 2", "SELECT * WHERE 1 NOT BETWEEN 0 AND 2"),
        ("SELECT * WHERE 1 IN (1)", "SELECT * WHERE 1 NOT IN (1)"),
        ("SELECT f(1)", "SELECT udf.f(1)"),
        ("SELECT true", "SELECT false"),
        ("SELECT null", "SELECT undefined"),
    ];
    for (a, b) in pairs {
        assert_ne!(strict(a), strict(b), "{} vs {}", a, b);
    }
}

#[test]
fn test_distinguishes_operators() {
    let operators = ["+", "-", "*", "/", "%", "=", "!=", "<", "<=", ">", ">=", "AND", "OR", "|", "&", "^", "||"];
    let hashes: Vec<u32> = operators
        .iter()
        .map(|op| strict(&format!("SELECT 1 {} 2", op)))
        .collect();
    for i in 0..hashes.len() {
        for j in (i + 1)..hashes.len() {
            assert_ne!(hashes[i], hashes[j], "{} vs {}", operators[i], operators[j]);
        }
    }
}

#[test]
fn test_distinguishes_values_and_names() {
    assert_ne!(strict("SELECT * FROM c WHERE c.a = 1"), strict("SELECT * FROM c WHERE c.a = 2"));
    assert_ne!(strict("SELECT * FROM c WHERE c.a = 'x'"), strict("SELECT * FROM c WHERE c.a = 'y'"));
    assert_ne!(strict("SELECT * FROM c WHERE c.a = 1"), strict("SELECT * FROM c WHERE c.b = 1"));
    assert_ne!(strict("SELECT @a"), strict("SELECT @b"));
    assert_ne!(strict("SELECT c.a AS x FROM c"), strict("SELECT c.a FROM c"));
}

#[test]
fn test_distinguishes_node_kinds() {
    // Same leaf text, different shapes.
    assert_ne!(strict("SELECT 'a'"), strict("SELECT a"));
    assert_ne!(strict("SELECT (SELECT 1)"), strict("SELECT ARRAY(SELECT 1)"));
    assert_ne!(strict("SELECT EXISTS(SELECT 1)"), strict("SELECT ARRAY(SELECT 1)"));
    assert_ne!(strict("SELECT * FROM c.a"), strict("SELECT * FROM c['a']"));
    assert_ne!(strict("SELECT * FROM c"), strict("SELECT * FROM x IN c"));
}

#[test]
fn test_optional_clauses_change_hash() {
    let base = strict("SELECT * FROM c");
    assert_ne!(base, strict("SELECT * FROM c WHERE true"));
    assert_ne!(base, strict("SELECT * FROM c OFFSET 0 LIMIT 1"));
    assert_ne!(base, strict("SELECT TOP 1 * FROM c"));
}

#[test]
fn test_scalar_hashing() {
    let hasher = StructuralHasher::strict();
    let a = parse_scalar_expression("c.a + 1").unwrap();
    let b = parse_scalar_expression("(c.a) + 1").unwrap();
    assert_eq!(hasher.hash_scalar(&a), hasher.hash_scalar(&b));
    assert_eq!(
        StructuralHasher::non_strict().hash_scalar(&a),
        StructuralHasher::new(false).hash_scalar(&b)
    );
}
