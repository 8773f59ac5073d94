//! Column-aligned table rendering.

use unicode_width::UnicodeWidthStr;

use super::error::{RenderError, Result};
use super::inline::compile_inline;
use crate::models::{Alignment, Node, NodeKind};

/// Render a table node as a padded, pipe-delimited block followed by a
/// blank line.
///
/// Every column is as wide as its widest rendered cell; the width is measured
/// after inline compilation, so alignment follows what is actually written.
pub fn render_table(table: &Node) -> Result<String> {
    let alignments = match &table.kind {
        NodeKind::Table { alignments } => alignments.as_slice(),
        _ => &[],
    };

    let (head, body) = match table.children.as_slice() {
        [head, body] => (head, body),
        [] => return Err(invalid("missing table head")),
        [_] => return Err(invalid("missing table body")),
        _ => return Err(invalid("unexpected table children")),
    };
    if head.kind != NodeKind::TableHead {
        return Err(invalid("first child must be a table head"));
    }
    if body.kind != NodeKind::TableBody {
        return Err(invalid("missing table body"));
    }

    let header_row = match head.children.as_slice() {
        [row] if row.kind == NodeKind::TableRow => row,
        _ => return Err(invalid("table head must hold exactly one row")),
    };
    let width = header_row.children.len();
    if width == 0 {
        return Err(invalid("table has no columns"));
    }
    if body.children.is_empty() {
        return Err(invalid("table has no body rows"));
    }

    let header = compile_row(header_row, width, 0)?;
    let rows = body
        .children
        .iter()
        .enumerate()
        .map(|(index, row)| compile_row(row, width, index + 1))
        .collect::<Result<Vec<_>>>()?;

    let widths: Vec<usize> = (0..width)
        .map(|column| {
            let widest = std::iter::once(&header)
                .chain(rows.iter())
                .map(|row| row[column].width())
                .max()
                .unwrap_or(0);
            match alignment_of(alignments, column) {
                // `::` alone is not a valid delimiter cell
                Alignment::Center => widest.max(1),
                _ => widest,
            }
        })
        .collect();

    let mut out = String::new();
    write_row(&mut out, &header, &widths);
    for (column, &column_width) in widths.iter().enumerate() {
        out.push('|');
        out.push_str(&delimiter(alignment_of(alignments, column), column_width));
    }
    out.push_str("|\n");
    for row in &rows {
        write_row(&mut out, row, &widths);
    }
    out.push('\n');

    Ok(out)
}

fn invalid(reason: &'static str) -> RenderError {
    RenderError::InvalidTable { reason }
}

fn alignment_of(alignments: &[Alignment], column: usize) -> Alignment {
    alignments.get(column).copied().unwrap_or_default()
}

fn compile_row(row: &Node, width: usize, index: usize) -> Result<Vec<String>> {
    if row.kind != NodeKind::TableRow {
        return Err(invalid("table sections may only contain rows"));
    }
    let found = row.children.len();
    if found < width {
        return Err(RenderError::RowTooShort {
            row: index,
            expected: width,
            found,
        });
    }
    if found > width {
        return Err(RenderError::RowTooLong {
            row: index,
            expected: width,
            found,
        });
    }

    row.children
        .iter()
        .map(|cell| {
            if cell.kind != NodeKind::TableCell {
                return Err(invalid("table rows may only contain cells"));
            }
            Ok(compile_inline(&cell.children)?.replace('|', "\\|"))
        })
        .collect()
}

fn write_row(out: &mut String, cells: &[String], widths: &[usize]) {
    for (cell, &column_width) in cells.iter().zip(widths) {
        out.push_str("| ");
        out.push_str(cell);
        let padding = column_width.saturating_sub(cell.width()) + 1;
        out.extend(std::iter::repeat_n(' ', padding));
    }
    out.push_str("|\n");
}

/// Delimiter cell spanning `column_width` plus the two padding spaces.
fn delimiter(alignment: Alignment, column_width: usize) -> String {
    let dashes = |n: usize| "-".repeat(n);
    match alignment {
        Alignment::None => dashes(column_width + 2),
        Alignment::Left => format!(":{}", dashes(column_width + 1)),
        Alignment::Right => format!("{}:", dashes(column_width + 1)),
        Alignment::Center => format!(":{}:", dashes(column_width)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cell(text: &str) -> Node {
        Node::with_children(NodeKind::TableCell, vec![Node::text(text)])
    }

    fn row(cells: &[&str]) -> Node {
        Node::with_children(NodeKind::TableRow, cells.iter().map(|c| cell(c)).collect())
    }

    fn table(alignments: Vec<Alignment>, header: &[&str], body: &[&[&str]]) -> Node {
        Node::with_children(
            NodeKind::Table { alignments },
            vec![
                Node::with_children(NodeKind::TableHead, vec![row(header)]),
                Node::with_children(NodeKind::TableBody, body.iter().map(|r| row(r)).collect()),
            ],
        )
    }

    #[test]
    fn test_columns_are_padded_to_widest_cell() {
        let node = table(
            vec![],
            &["Name", "Description"],
            &[&["alpha", "the first letter"], &["beta", "the second letter"]],
        );

        let expected = "\
| Name  | Description       |
|-------|-------------------|
| alpha | the first letter  |
| beta  | the second letter |

";
        assert_eq!(render_table(&node).unwrap(), expected);
    }

    #[test]
    fn test_every_line_has_the_same_width() {
        let node = table(
            vec![],
            &["a", "bb", "ccc"],
            &[&["dddd", "e", ""], &["f", "gggggg", "hh"]],
        );
        let rendered = render_table(&node).unwrap();
        let widths: Vec<usize> = rendered
            .lines()
            .filter(|l| !l.is_empty())
            .map(str::len)
            .collect();

        assert_eq!(widths.len(), 4);
        assert!(widths.iter().all(|&w| w == widths[0]));
    }

    #[test]
    fn test_alignment_markers() {
        let node = table(
            vec![Alignment::Left, Alignment::Center, Alignment::Right],
            &["left", "mid", "right"],
            &[&["1", "2", "3"]],
        );

        let expected = "\
| left | mid | right |
|:-----|:---:|------:|
| 1    | 2   | 3     |

";
        assert_eq!(render_table(&node).unwrap(), expected);
    }

    #[test]
    fn test_cells_use_inline_markup_and_escape_pipes() {
        let node = Node::with_children(
            NodeKind::Table { alignments: vec![] },
            vec![
                Node::with_children(NodeKind::TableHead, vec![row(&["expr"])]),
                Node::with_children(
                    NodeKind::TableBody,
                    vec![Node::with_children(
                        NodeKind::TableRow,
                        vec![Node::with_children(
                            NodeKind::TableCell,
                            vec![Node::with_literal(NodeKind::Code, "a | b")],
                        )],
                    )],
                ),
            ],
        );

        let expected = "\
| expr     |
|----------|
| `a \\| b` |

";
        assert_eq!(render_table(&node).unwrap(), expected);
    }

    #[test]
    fn test_short_and_long_rows_are_rejected() {
        let short = table(vec![], &["a", "b"], &[&["1"]]);
        assert_eq!(
            render_table(&short),
            Err(RenderError::RowTooShort {
                row: 1,
                expected: 2,
                found: 1
            })
        );

        let long = table(vec![], &["a"], &[&["1"], &["2", "3"]]);
        assert_eq!(
            render_table(&long),
            Err(RenderError::RowTooLong {
                row: 2,
                expected: 1,
                found: 2
            })
        );
    }

    #[test]
    fn test_tables_without_rows_or_columns_are_rejected() {
        let no_rows = table(vec![], &["a"], &[]);
        assert_eq!(
            render_table(&no_rows),
            Err(RenderError::InvalidTable {
                reason: "table has no body rows"
            })
        );

        let no_columns = table(vec![], &[], &[&[]]);
        assert_eq!(
            render_table(&no_columns),
            Err(RenderError::InvalidTable {
                reason: "table has no columns"
            })
        );

        let headless = Node::with_children(
            NodeKind::Table { alignments: vec![] },
            vec![Node::new(NodeKind::TableBody), Node::new(NodeKind::TableBody)],
        );
        assert_eq!(
            render_table(&headless),
            Err(RenderError::InvalidTable {
                reason: "first child must be a table head"
            })
        );
    }
}
