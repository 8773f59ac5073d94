//! Fixture-driven tests for the canonical renderer.
//!
//! `fixtures/canonical/*.md` are already in canonical form at the default
//! column budget. `fixtures/messy/<name>.md` are arbitrary inputs whose
//! rendering must equal `<name>.expected.md`, which is canonical in turn.

use std::fs;
use std::path::{Path, PathBuf};

use mdfmt_engine::{Options, Renderer, render_markdown};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn expected_path(path: &Path) -> PathBuf {
    path.with_extension("expected.md")
}

fn fixture_files(subdir: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(fixtures_dir().join(subdir))
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "md"))
        .filter(|path| !path.to_string_lossy().ends_with(".expected.md"))
        .collect();
    files.sort();
    assert!(!files.is_empty(), "no fixtures found in {subdir}");
    files
}

fn all_fixtures() -> Vec<PathBuf> {
    let mut files = fixture_files("canonical");
    files.extend(fixture_files("messy"));
    files
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_canonical_documents_are_fixed_points() {
    let renderer = Renderer::default();
    let expected = fixture_files("messy")
        .into_iter()
        .map(|path| expected_path(&path));
    for path in fixture_files("canonical").into_iter().chain(expected) {
        let source = read(&path);
        let rendered = renderer.render_str(&source).unwrap();
        assert_eq!(rendered, source, "{} is not a fixed point", path.display());
    }
}

#[test]
fn test_messy_documents_render_to_expected() {
    let renderer = Renderer::default();
    for path in fixture_files("messy") {
        let rendered = renderer.render_str(&read(&path)).unwrap();
        assert_eq!(
            rendered,
            read(&expected_path(&path)),
            "unexpected rendering of {}",
            path.display()
        );
    }
}

#[rstest]
fn test_rendering_is_idempotent(#[values(30, 40, 50, 60, 70, 80, 90, 100)] cols: usize) {
    let options = Options::with_cols(cols);
    for path in all_fixtures() {
        let once = render_markdown(&read(&path), options).unwrap();
        let twice = render_markdown(&once, options).unwrap();
        assert_eq!(
            twice,
            once,
            "{} is not idempotent at {cols} columns",
            path.display()
        );
    }
}

#[rstest]
#[case::entities("Use &lt;br&gt; tags, &#42;stars&#42;, AT&amp;T and &amp;amp; entities.\n")]
#[case::escapes("\\*not emphasis\\*, \\_nor this\\_, \\`no code\\` or \\[link\\](x), a \\\\ too.\n")]
#[case::padded_code("A `  padded  ` span, `` `ticked` `` code and `a  b` inside.\n")]
#[case::markers("aaaa bbbb cccc dddd eeee ffff gggg - hhhh + iiii # jjjj > kkkk 1. llll 2) mmmm === nnnn ~~~ oooo\n")]
#[case::list_markers("- \\- dash\n- 1\\. number\n- \\# hash and a long tail of words that wraps - again\n")]
#[case::quoted_markers("> quoted words that wrap at some width + then - and 3. and # and > more\n")]
#[case::empty_quote("a\n\n>\n\nb\n")]
#[case::nested_empty_quote("> >\n>\n> after\n")]
#[case::empty_heading("#\n\n## Closing \\#\n")]
#[case::bang_before_link("Wow\\![not an image](x) and [spaced](<a b>).\n")]
fn test_edge_cases_are_idempotent(
    #[case] source: &str,
    #[values(10, 20, 30, 34, 40, 80)] cols: usize,
) {
    let options = Options::with_cols(cols);
    let once = render_markdown(source, options).unwrap();
    let twice = render_markdown(&once, options).unwrap();
    assert_eq!(twice, once, "not idempotent at {cols} columns");
}

/// Headings, code blocks and tables are written as-is, so only wrapped
/// lines are held to the budget.
fn wrapped_lines(rendered: &str) -> Vec<&str> {
    let mut in_fence = false;
    rendered
        .lines()
        .filter(|line| {
            if line.starts_with("```") {
                in_fence = !in_fence;
                return false;
            }
            !in_fence && !line.starts_with('#') && !line.starts_with('|')
        })
        .collect()
}

/// A line may only run over the budget when it holds a single token after
/// its quote and list prefixes.
fn is_single_token(line: &str) -> bool {
    let body = line.trim_start_matches(['>', ' ']);
    let body = body.strip_prefix("- ").unwrap_or(body);
    let body = match body.split_once(". ") {
        Some((number, rest)) if number.chars().all(|c| c.is_ascii_digit()) => rest,
        _ => body,
    };
    !body.contains(' ')
}

#[rstest]
fn test_lines_fit_the_column_budget(
    #[values(30, 40, 50, 60, 70, 80, 90, 100)] cols: usize,
) {
    let options = Options::with_cols(cols);
    for path in all_fixtures() {
        let rendered = render_markdown(&read(&path), options).unwrap();
        for line in wrapped_lines(&rendered) {
            assert!(
                line.chars().count() <= cols || is_single_token(line),
                "{}: line exceeds {cols} columns: {line:?}",
                path.display()
            );
        }
    }
}

#[rstest]
#[case("")]
#[case("\n\n\n")]
#[case(" \t \n")]
fn test_empty_documents_render_empty(#[case] source: &str) {
    assert_eq!(Renderer::default().render_str(source).unwrap(), "");
}

#[test]
fn test_long_tokens_are_never_split() {
    let url = "https://example.com/a/very/long/path/that/cannot/possibly/fit/in/thirty/columns";
    let source = format!("Visit <{url}> today.\n");
    let rendered = render_markdown(&source, Options::with_cols(30)).unwrap();
    assert_eq!(rendered, format!("Visit\n<{url}>\ntoday.\n"));
}
