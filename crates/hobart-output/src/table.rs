//! Fixed-width ASCII tables.

/// Render headers and rows as a fixed-width ASCII table.
///
/// Column widths are computed from the widest cell in each column,
/// headers included. Cells are left-aligned with two spaces between
/// columns and a dashed rule under the header row. Rows shorter than
/// the header render empty trailing cells; extra cells are ignored.
pub fn to_ascii_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let rule_width = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    let mut output = String::new();
    output.push_str(&render_row(headers, &widths));
    output.push_str(&"-".repeat(rule_width));
    output.push('\n');
    for row in rows {
        output.push_str(&render_row(row, &widths));
    }
    output
}

fn render_row(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::new();
    for (i, width) in widths.iter().enumerate() {
        let cell = cells.get(i).map_or("", String::as_str);
        if i > 0 {
            line.push_str("  ");
        }
        line.push_str(&format!("{:<width$}", cell, width = width));
    }
    let trimmed = line.trim_end().to_string();
    format!("{}\n", trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_columns_align_to_widest_cell() {
        let headers = strings(&["factor", "evr"]);
        let rows = vec![strings(&["1", "0.8213"]), strings(&["2", "0.11"])];
        let table = to_ascii_table(&headers, &rows);

        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "factor  evr");
        assert_eq!(lines[1], "--------------");
        assert_eq!(lines[2], "1       0.8213");
        assert_eq!(lines[3], "2       0.11");
    }

    #[test]
    fn test_wide_cells_stretch_their_column() {
        let headers = strings(&["security", "1"]);
        let rows = vec![strings(&["BRK.B", "-0.442913"])];
        let table = to_ascii_table(&headers, &rows);

        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "security  1");
        assert_eq!(lines[2], "BRK.B     -0.442913");
    }

    #[test]
    fn test_short_rows_render_empty_cells() {
        let headers = strings(&["a", "b", "c"]);
        let rows = vec![strings(&["x"])];
        let table = to_ascii_table(&headers, &rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[2], "x");
    }

    #[test]
    fn test_empty_rows_render_header_and_rule_only() {
        let headers = strings(&["symbol"]);
        let table = to_ascii_table(&headers, &[]);
        assert_eq!(table, "symbol\n------\n");
    }
}
