// HTML tables as LaTeX `tabular`s.
//
// LaTeX needs the number of columns up front, and it sizes columns to their
// content without wrapping, so wide tables run off the page. With
// `autoscale` the columns become fixed-width `p{..}` columns whose widths
// are proportional to the longest text found in each column.

use crate::context::{Context, Diagnostic};
use crate::dispatch::Dispatcher;
use crate::dom::Element;

fn is_cell(e: &Element) -> bool {
    e.is("td") || e.is("th")
}

/// The element holding the rows: the first `tbody`, else the table itself.
/// Nested tables are not searched.
fn row_group(table: &Element) -> &Element {
    fn find_tbody(e: &Element) -> Option<&Element> {
        for c in e.child_elements() {
            if c.is("tbody") {
                return Some(c);
            }
            if c.is("table") {
                continue;
            }
            if let Some(x) = find_tbody(c) {
                return Some(x);
            }
        }
        None
    }
    find_tbody(table).unwrap_or(table)
}

fn rows(group: &Element) -> Vec<&Element> {
    fn walk<'a>(e: &'a Element, out: &mut Vec<&'a Element>) {
        for c in e.child_elements() {
            if c.is("tr") {
                out.push(c);
            } else if !c.is("table") {
                walk(c, out);
            }
        }
    }
    let mut out = Vec::new();
    walk(group, &mut out);
    out
}

/// Largest number of `td` + `th` cells in any row.
pub fn column_count(table: &Element) -> usize {
    rows(row_group(table))
        .iter()
        .map(|r| r.child_elements().filter(|c| is_cell(c)).count())
        .max()
        .unwrap_or(0)
}

/// Longest cell text (in characters) per column.
pub fn column_chars(table: &Element) -> Vec<usize> {
    let mut chars: Vec<usize> = Vec::new();
    for row in rows(row_group(table)) {
        for (j, cell) in row.child_elements().filter(|c| is_cell(c)).enumerate() {
            if chars.len() < j + 1 {
                chars.push(0);
            }
            chars[j] = chars[j].max(cell.text_content().chars().count());
        }
    }
    chars
}

/// Share `budget` between columns in proportion to `chars`.
///
/// When every column is empty the budget is split evenly.
pub fn distribute_widths(chars: &[usize], budget: u32) -> Vec<u32> {
    let total: usize = chars.iter().sum();
    let budget = budget as f64;
    if total == 0 {
        if chars.is_empty() {
            return Vec::new();
        }
        let share = (budget / chars.len() as f64).round() as u32;
        return vec![share; chars.len()];
    }
    chars
        .iter()
        .map(|&c| (budget * (c as f64 / total as f64)).round() as u32)
        .collect()
}

/// Column spec such as `| l | l |` or `| p{30ex} | p{50ex} |`.
pub fn column_spec(num_columns: usize, widths: Option<&[u32]>) -> String {
    let cols: Vec<String> = (0..num_columns)
        .map(|i| match widths {
            Some(w) => format!("p{{{}ex}}", w.get(i).copied().unwrap_or(0)),
            None => "l".to_string(),
        })
        .collect();
    format!("| {} |", cols.join(" | "))
}

pub fn render_table(
    d: &Dispatcher,
    table: &Element,
    autoscale: bool,
    ctx: &mut Context<'_>,
) -> String {
    let rows = rows(row_group(table));
    let num_columns = column_count(table);

    let widths = if autoscale {
        let chars = column_chars(table);
        log::debug!("column chars: {chars:?}");
        if num_columns > 0 && chars.iter().all(|&c| c == 0) {
            ctx.report(Diagnostic::EmptyTable {
                columns: num_columns,
            });
        }
        Some(distribute_widths(&chars, ctx.config.table_width))
    } else {
        None
    };
    let spec = column_spec(num_columns, widths.as_deref());

    let mut out = format!("\\begin{{center}}\\begin{{tabular}}{{{spec}}}\n");
    out.push_str("\\hline\n");
    for (i, row) in rows.iter().enumerate() {
        let mut cells: Vec<String> = Vec::new();
        for cell in row.child_elements() {
            let mut prefix = String::new();
            let mut suffix = String::new();

            if let Some(span) = cell.attr("colspan").filter(|s| !s.is_empty()) {
                prefix.push_str(&format!("\\multicolumn{{{span}}}{{|c|}}{{"));
                suffix.push('}');
            }
            if cell.is("th") {
                prefix.push_str("\\textbf{");
                suffix.push('}');
            }

            cells.push(format!("{prefix}{}{suffix}", d.container(cell, ctx)));
        }
        if i > 0 {
            out.push_str("\\hline\n");
        }
        out.push_str(&cells.join(" & "));
        out.push_str("\\\\\n");
    }
    out.push_str("\\hline\n");
    out.push_str("\\end{tabular}\\end{center}");
    out
}
