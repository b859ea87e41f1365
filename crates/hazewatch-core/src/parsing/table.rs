use crate::model::RawTable;
use scraper::{ElementRef, Selector};

/// Cell text the source uses for "no data".
pub const NO_DATA: &str = "-";

/// Convert an HTML table into a RawTable.
///
/// The first cell of each row is its label (trimmed, lower-cased); the remaining
/// cells are appended to that label's sequence. `NO_DATA` cells are dropped, not
/// kept as gaps, so a sequence's length is the number of readings actually present.
/// Rows made only of `<th>` cells, rows labelled with one of `header_labels`, and
/// rows with an empty label are skipped.
pub fn parse_table(table: ElementRef<'_>, rows: &Selector, header_labels: &[String]) -> RawTable {
    let mut out = RawTable::new();

    for row in table.select(rows) {
        let cells: Vec<ElementRef<'_>> = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|c| matches!(c.value().name(), "td" | "th"))
            .collect();

        let Some((first, rest)) = cells.split_first() else {
            continue;
        };
        if cells.iter().all(|c| c.value().name() == "th") {
            continue;
        }

        let label = cell_text(first).to_lowercase();
        if label.is_empty() || header_labels.iter().any(|h| h.eq_ignore_ascii_case(&label)) {
            continue;
        }

        out.ensure_row(&label);
        for cell in rest {
            let text = cell_text(cell);
            if text != NO_DATA {
                out.push_cell(&label, text);
            }
        }
    }

    out
}

/// Trimmed text content of an element, with inner whitespace runs collapsed.
pub fn cell_text(el: &ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
