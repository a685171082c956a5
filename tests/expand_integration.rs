//! Integration tests for lamdef expansion over whole files

use lamdef::{DiagnosticCode, LamdefError, RewriteError, RewriteOptions};
use pretty_assertions::assert_eq;
use rstest::rstest;

mod helpers;
use helpers::{lines_containing, load_fixture};

fn options() -> RewriteOptions {
    RewriteOptions::default()
}

#[test]
fn test_fixture_expands_every_call_shape() {
    let source = load_fixture("multiline_lambda.py");
    let expected = load_fixture("multiline_lambda.expanded.py");

    let expansion = lamdef::expand(&source, &options()).unwrap();
    assert_eq!(expansion.source, expected);

    let names: Vec<&str> = expansion.blocks.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["_lamdef_1", "_lamdef_2", "_lamdef_3", "add_one", "_lamdef_4"]
    );
    let lines: Vec<usize> = expansion.blocks.iter().map(|b| b.line).collect();
    assert_eq!(lines, lines_containing(&source, "lamdef("));
    assert!(expansion.diagnostics.is_empty());
}

#[test]
fn test_expanded_fixture_is_stable() {
    let expected = load_fixture("multiline_lambda.expanded.py");
    let expansion = lamdef::expand(&expected, &options()).unwrap();

    assert!(!expansion.changed());
    assert_eq!(expansion.source, expected);
}

#[test]
fn test_crlf_fixture() {
    let source = load_fixture("multiline_lambda.py").replace('\n', "\r\n");
    let expected = load_fixture("multiline_lambda.expanded.py").replace('\n', "\r\n");

    let expansion = lamdef::expand(&source, &options()).unwrap();
    assert_eq!(expansion.source, expected);
}

#[rstest]
#[case(38, "sorted_users = sorted(users, key=_lamdef_1)")]
#[case(46, "    ranked_users = sorted(user_list, key=_lamdef_1)")]
#[case(57, "        sorted_by_name = sorted(users, key=_lamdef_1)")]
#[case(67, "    def add_one(x):")]
#[case(78, "    evens = list(filter(_lamdef_1, numbers))")]
fn test_cursor_line_expands_one_block(#[case] line: usize, #[case] rewritten: &str) {
    let source = load_fixture("multiline_lambda.py");

    let expansion = lamdef::expand_line(&source, line, &options()).unwrap();
    assert_eq!(expansion.blocks.len(), 1);
    assert_eq!(expansion.blocks[0].line, line);
    assert!(expansion.source.lines().any(|l| l == rewritten));
    assert_eq!(lines_containing(&expansion.source, "lamdef(").len(), 4);
}

#[test]
fn test_cursor_expansions_match_whole_file() {
    let source = load_fixture("multiline_lambda.py");
    let expected = load_fixture("multiline_lambda.expanded.py");

    // Each of these blocks keeps its line count when expanded
    let mut current = source.clone();
    for line in lines_containing(&source, "lamdef(") {
        current = lamdef::expand_line(&current, line, &options())
            .unwrap()
            .source;
    }
    assert_eq!(current, expected);
}

#[test]
fn test_list_fixture_blocks() {
    let source = load_fixture("multiline_lambda.py");
    let listing = lamdef::list_blocks(&source, &options()).unwrap();

    assert_eq!(listing.blocks.len(), 5);
    assert!(listing.diagnostics.is_empty());

    let direct: Vec<Option<&str>> = listing
        .blocks
        .iter()
        .map(|b| b.direct_assignment.as_deref())
        .collect();
    assert_eq!(direct, vec![None, None, None, Some("add_one"), None]);
    assert_eq!(listing.blocks[0].params, "user");
    assert_eq!(listing.blocks[0].body_lines, 2);
    assert_eq!(listing.blocks[4].depth, 2);
}

#[test]
fn test_lamdef_free_source_is_unchanged() {
    let source = "data = [1, 2, 3, 4, 5]\nresult = {\n    \"key\": [x for x in data],\n    \"value\": (1, 2, 3)\n}\n"
        .repeat(1000);

    let expansion = lamdef::expand(&source, &options()).unwrap();
    assert_eq!(expansion.source, source);
    assert!(expansion.blocks.is_empty());
}

#[test]
fn test_keyword_outside_code_is_ignored() {
    let source = r#"
doc = """
handler = lamdef(x):
    return x
"""
label = f"lamdef({doc}):"
# sorted(items, key=lamdef(i):
obj.lamdef(1):
def lamdef(x):
    return x
"#;
    let expansion = lamdef::expand(source, &options()).unwrap();
    assert_eq!(expansion.source, source);
}

#[test]
fn test_custom_keyword_and_prefix() {
    let options = RewriteOptions {
        keyword: "fn_block".to_string(),
        name_prefix: "__anon".to_string(),
        ..RewriteOptions::default()
    };
    let source = "items.sort(key=fn_block(item):\n    return item.rank\n)\n";

    let expansion = lamdef::expand(source, &options).unwrap();
    assert_eq!(
        expansion.source,
        "def __anon1(item):\n    return item.rank\nitems.sort(key=__anon1)\n"
    );
}

#[test]
fn test_parameter_lists_are_carried_over() {
    let source = "\
callback = register(lamdef(event, /, *extra, retries: int = 3, **options):
    return event
)
";
    let expansion = lamdef::expand(source, &options()).unwrap();
    assert!(expansion.source.starts_with(
        "def _lamdef_1(event, /, *extra, retries: int = 3, **options):\n    return event\n"
    ));
}

#[rstest]
#[case("x = f(lamdef(a):\n)\n", DiagnosticCode::EmptyBody)]
#[case("x = f(lamdef(a):\n    return a\n", DiagnosticCode::UnterminatedExpression)]
#[case("x = f(lamdef(a):\n    return a)\ny = 1\n", DiagnosticCode::ClosedInsideBody)]
#[case(
    "x = f(lamdef(a):\n        b = a\n      return b\n)\n",
    DiagnosticCode::InconsistentIndentation
)]
#[case(
    "try:\n    pass\nexcept any(map(lamdef(e):\n    return e\n, errors)):\n    pass\n",
    DiagnosticCode::UnsupportedPosition
)]
#[case("x = f(lamdef(a, a):\n    return a\n)\n", DiagnosticCode::InvalidParameters)]
#[case("x = f(lamdef(a):\n    return 'a\n)\n", DiagnosticCode::UnclosedString)]
fn test_malformed_sources(#[case] source: &str, #[case] code: DiagnosticCode) {
    let error = lamdef::expand(source, &options()).unwrap_err();
    assert_eq!(error.code(), Some(code));

    let diagnostics = lamdef::check(source, &options()).unwrap();
    assert!(diagnostics.iter().any(|d| d.code == code && d.is_error()));
}

#[test]
fn test_no_lamdef_on_line() {
    let source = load_fixture("multiline_lambda.py");
    let error = lamdef::expand_line(&source, 1, &options()).unwrap_err();

    assert!(matches!(
        error,
        LamdefError::Rewrite(RewriteError::NoLamdefOnLine { line: 0 })
    ));
    assert_eq!(error.to_string(), "no lamdef on line 1");
}

#[test]
fn test_invalid_options_are_rejected() {
    let options = RewriteOptions {
        keyword: "not a name".to_string(),
        ..RewriteOptions::default()
    };
    assert!(matches!(
        lamdef::expand("x = 1\n", &options),
        Err(LamdefError::InvalidOptions(_))
    ));
}
