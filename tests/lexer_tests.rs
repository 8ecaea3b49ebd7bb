// tests/lexer_tests.rs

use cosmos_sql::ast::Token;
use cosmos_sql::lexer::{LexError, Lexer};

fn tokens(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut result = vec![];
    loop {
        let token = lexer.next_token().unwrap();
        if token == Token::Eof {
            break;
        }
        result.push(token);
    }
    result
}

// ============================================================================
// Punctuation and Operators
// ============================================================================

#[test]
fn test_single_char_tokens() {
    let test_cases = vec![
        ("*", Token::Star),
        (",", Token::Comma),
        (".", Token::Dot),
        (":", Token::Colon),
        ("(", Token::LParen),
        (")", Token::RParen),
        ("[", Token::LBracket),
        ("]", Token::RBracket),
        ("{", Token::LBrace),
        ("}", Token::RBrace),
        ("+", Token::Plus),
        ("-", Token::Minus),
        ("/", Token::Slash),
        ("%", Token::Percent),
        ("=", Token::Eq),
        ("<", Token::Lt),
        (">", Token::Gt),
        ("&", Token::Ampersand),
        ("|", Token::Pipe),
        ("^", Token::Caret),
        ("~", Token::Tilde),
        ("?", Token::Question),
    ];

    for (input, expected) in test_cases {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token().unwrap();
        assert_eq!(token, expected, "Failed for input: {}", input);
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    }
}

#[test]
fn test_two_char_tokens() {
    let test_cases = vec![
        ("!=", Token::NotEq),
        ("<=", Token::LtEq),
        (">=", Token::GtEq),
        ("||", Token::DoublePipe),
        ("??", Token::DoubleQuestion),
    ];

    for (input, expected) in test_cases {
        let mut lexer = Lexer::new(input);
        assert_eq!(lexer.next_token().unwrap(), expected, "Failed for input: {}", input);
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    }
}

#[test]
fn test_conditional_and_coalesce_tokens() {
    assert_eq!(
        tokens("a ? b ?? c : d"),
        vec![
            Token::Identifier("a".to_string()),
            Token::Question,
            Token::Identifier("b".to_string()),
            Token::DoubleQuestion,
            Token::Identifier("c".to_string()),
            Token::Colon,
            Token::Identifier("d".to_string()),
        ]
    );
}

#[test]
fn test_bare_exclamation_is_rejected() {
    let mut lexer = Lexer::new("!x");
    let result = lexer.next_token();
    assert!(result.unwrap_err().to_string().contains("Unexpected character"));
}

// ============================================================================
// Keywords and Identifiers
// ============================================================================

#[test]
fn test_all_keywords() {
    let input = "SELECT DISTINCT TOP VALUE AS FROM IN JOIN WHERE GROUP BY ORDER ASC DESC \
                 OFFSET LIMIT AND OR NOT BETWEEN EXISTS ARRAY TRUE FALSE NULL UNDEFINED UDF";
    assert_eq!(
        tokens(input),
        vec![
            Token::Select,
            Token::Distinct,
            Token::Top,
            Token::Value,
            Token::As,
            Token::From,
            Token::In,
            Token::Join,
            Token::Where,
            Token::Group,
            Token::By,
            Token::Order,
            Token::Asc,
            Token::Desc,
            Token::Offset,
            Token::Limit,
            Token::And,
            Token::Or,
            Token::Not,
            Token::Between,
            Token::Exists,
            Token::Array,
            Token::True,
            Token::False,
            Token::Null,
            Token::Undefined,
            Token::Udf,
        ]
    );
}

#[test]
fn test_keywords_are_case_insensitive() {
    for input in ["exists", "EXISTS", "ExIsTS", "eXiStS"] {
        assert_eq!(tokens(input), vec![Token::Exists], "Failed for input: {}", input);
    }
}

#[test]
fn test_identifiers_keep_case() {
    assert_eq!(
        tokens("Name _internal item_2"),
        vec![
            Token::Identifier("Name".to_string()),
            Token::Identifier("_internal".to_string()),
            Token::Identifier("item_2".to_string()),
        ]
    );
}

#[test]
fn test_keyword_prefix_is_identifier() {
    assert_eq!(tokens("SELECTVALUE"), vec![Token::Identifier("SELECTVALUE".to_string())]);
    assert_eq!(tokens("inn"), vec![Token::Identifier("inn".to_string())]);
}

#[test]
fn test_parameters() {
    assert_eq!(
        tokens("@name @min_age"),
        vec![
            Token::Parameter("@name".to_string()),
            Token::Parameter("@min_age".to_string()),
        ]
    );
}

#[test]
fn test_bare_at_sign_is_rejected() {
    let mut lexer = Lexer::new("@ 1");
    assert!(lexer.next_token().unwrap_err().to_string().contains("Unexpected character '@'"));
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn test_integers() {
    assert_eq!(tokens("0"), vec![Token::Integer(0)]);
    assert_eq!(tokens("42"), vec![Token::Integer(42)]);
    assert_eq!(tokens("9223372036854775807"), vec![Token::Integer(i64::MAX)]);
}

#[test]
fn test_integer_overflow_falls_back_to_double() {
    assert_eq!(
        tokens("9223372036854775808"),
        vec![Token::Double(9223372036854775808.0)]
    );
}

#[test]
fn test_doubles() {
    let test_cases = vec![
        ("1337.42", 1337.42),
        ("1E2", 100.0),
        ("10e-23", 10e-23),
        ("2.5e+3", 2500.0),
        (".5", 0.5),
        ("1.", 1.0),
    ];

    for (input, expected) in test_cases {
        assert_eq!(tokens(input), vec![Token::Double(expected)], "Failed for input: {}", input);
    }
}

#[test]
fn test_minus_is_separate_token() {
    assert_eq!(tokens("-42"), vec![Token::Minus, Token::Integer(42)]);
}

#[test]
fn test_dot_before_digit_starts_number() {
    assert_eq!(
        tokens("c.2"),
        vec![Token::Identifier("c".to_string()), Token::Double(0.2)]
    );
}

#[test]
fn test_malformed_numbers() {
    for input in ["0.E", "1e", "1.2.3", "12abc"] {
        let mut lexer = Lexer::new(input);
        let err = lexer.next_token().unwrap_err();
        assert!(
            matches!(err, LexError::MalformedNumber { .. }),
            "Expected malformed number for {}, got {:?}",
            input,
            err
        );
    }
}

#[test]
fn test_number_out_of_range() {
    let mut lexer = Lexer::new("1e400");
    let err = lexer.next_token().unwrap_err();
    assert!(matches!(err, LexError::NumberOutOfRange { .. }));
    assert!(err.to_string().contains("out of range"));
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_single_and_double_quotes() {
    assert_eq!(tokens("'hello'"), vec![Token::String("hello".to_string())]);
    assert_eq!(tokens("\"hello\""), vec![Token::String("hello".to_string())]);
}

#[test]
fn test_other_quote_inside_string() {
    assert_eq!(tokens(r#"'say "hi"'"#), vec![Token::String("say \"hi\"".to_string())]);
    assert_eq!(tokens(r#""it's""#), vec![Token::String("it's".to_string())]);
}

#[test]
fn test_escape_sequences() {
    let test_cases = vec![
        (r#""a\nb""#, "a\nb"),
        (r#""a\tb""#, "a\tb"),
        (r#""a\rb""#, "a\rb"),
        (r#""a\\b""#, "a\\b"),
        (r#""a\/b""#, "a/b"),
        (r#""a\"b""#, "a\"b"),
        (r#"'a\'b'"#, "a'b"),
        (r#""\b\f""#, "\u{8}\u{c}"),
        (r#""\u0041""#, "A"),
        (r#""\u00e9""#, "é"),
        (r#""\ud83d\ude00""#, "😀"),
    ];

    for (input, expected) in test_cases {
        assert_eq!(
            tokens(input),
            vec![Token::String(expected.to_string())],
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_unicode_content() {
    assert_eq!(tokens("'héllo wörld'"), vec![Token::String("héllo wörld".to_string())]);
}

#[test]
fn test_unterminated_string() {
    let mut lexer = Lexer::new("\"hello");
    let result = lexer.next_token();
    assert!(result.unwrap_err().to_string().contains("Unterminated string"));
}

#[test]
fn test_unterminated_after_backslash() {
    let mut lexer = Lexer::new("'abc\\");
    assert!(matches!(
        lexer.next_token().unwrap_err(),
        LexError::UnterminatedString { .. }
    ));
}

#[test]
fn test_invalid_escape() {
    let mut lexer = Lexer::new(r#""\q""#);
    let err = lexer.next_token().unwrap_err();
    assert!(err.to_string().contains("Invalid escape sequence"));
    assert!(err.to_string().contains("\\q"));
}

#[test]
fn test_invalid_unicode_escape() {
    for input in [r#""\u12""#, r#""\uZZZZ""#, r#""\ud83d""#] {
        let mut lexer = Lexer::new(input);
        assert!(
            matches!(lexer.next_token().unwrap_err(), LexError::InvalidEscape { .. }),
            "Failed for input: {}",
            input
        );
    }
}

// ============================================================================
// Positions and Errors
// ============================================================================

#[test]
fn test_unexpected_character() {
    let mut lexer = Lexer::new("42 # 1337");
    assert_eq!(lexer.next_token().unwrap(), Token::Integer(42));
    let err = lexer.next_token().unwrap_err();
    assert!(err.to_string().contains("Unexpected character '#'"));
    assert_eq!(err.position().column, 4);
}

#[test]
fn test_dollar_is_not_a_token() {
    let mut lexer = Lexer::new("$42");
    assert!(matches!(
        lexer.next_token().unwrap_err(),
        LexError::UnexpectedCharacter { ch: '$', .. }
    ));
}

#[test]
fn test_positions_after_multibyte_characters() {
    let mut lexer = Lexer::new("'é' x");
    lexer.next_token().unwrap();
    assert_eq!(lexer.next_token().unwrap(), Token::Identifier("x".to_string()));
    let position = lexer.token_start();
    assert_eq!(position.column, 5);
    assert_eq!(position.offset, 5);
}

#[test]
fn test_whitespace_is_skipped() {
    assert_eq!(
        tokens("  SELECT\t*\r\n  FROM   c  "),
        vec![Token::Select, Token::Star, Token::From, Token::Identifier("c".to_string())]
    );
}

#[test]
fn test_full_query() {
    assert_eq!(
        tokens("SELECT c.name FROM c WHERE c.age >= 21"),
        vec![
            Token::Select,
            Token::Identifier("c".to_string()),
            Token::Dot,
            Token::Identifier("name".to_string()),
            Token::From,
            Token::Identifier("c".to_string()),
            Token::Where,
            Token::Identifier("c".to_string()),
            Token::Dot,
            Token::Identifier("age".to_string()),
            Token::GtEq,
            Token::Integer(21),
        ]
    );
}
