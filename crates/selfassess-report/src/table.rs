//! reStructuredText grid tables.
//!
//! ```text
//! +------------------------+
//! |Answers                 |
//! +----+----------+--------+
//! | ID | Question | Answer |
//! +====+==========+========+
//! | 0  |    Q0    |   2*   |
//! +----+----------+--------+
//! ```

use anyhow::Result;

/// Render a grid table as a list of lines.
///
/// Each column is as wide as its heading or its longest cell, plus two
/// characters of padding. If the title does not fit, the last column grows.
/// Headings and cells are centered; the title is left-aligned.
pub fn render_rst_table<S: AsRef<str>>(
    rows: &[Vec<S>],
    title: &str,
    headings: &[&str],
) -> Result<Vec<String>> {
    anyhow::ensure!(!headings.is_empty(), "table `{title}` has no columns");
    for (i, row) in rows.iter().enumerate() {
        anyhow::ensure!(
            row.len() == headings.len(),
            "row {i} of table `{title}` has {} cells, expected {}",
            row.len(),
            headings.len()
        );
    }

    let mut widths = column_widths(rows, headings);
    let mut width = widths.iter().sum::<usize>() + widths.len() - 1;
    let title_len = title.chars().count();
    if title_len > width {
        if let Some(last) = widths.last_mut() {
            *last += title_len - width;
        }
        width = title_len;
    }

    let hline = border(&widths, '-');
    let mut lines = vec![
        format!("+{}+", "-".repeat(width)),
        format!("|{title:<width$}|"),
        hline.clone(),
        row_line(headings, &widths),
        border(&widths, '='),
    ];
    for row in rows {
        lines.push(row_line(row, &widths));
        lines.push(hline.clone());
    }
    Ok(lines)
}

/// Per-column width: longest of heading and cells, plus two.
pub fn column_widths<S: AsRef<str>>(rows: &[Vec<S>], headings: &[&str]) -> Vec<usize> {
    headings
        .iter()
        .enumerate()
        .map(|(i, heading)| {
            let longest_cell = rows
                .iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.as_ref().chars().count())
                .max()
                .unwrap_or(0);
            heading.chars().count().max(longest_cell) + 2
        })
        .collect()
}

fn border(widths: &[usize], fill: char) -> String {
    let segments: Vec<String> = widths
        .iter()
        .map(|&w| fill.to_string().repeat(w))
        .collect();
    format!("+{}+", segments.join("+"))
}

fn row_line<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    let cells: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{:^w$}", cell.as_ref()))
        .collect();
    format!("|{}|", cells.join("|"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADINGS: [&str; 3] = ["ID", "Question", "Answer"];

    fn rows() -> Vec<Vec<String>> {
        vec![
            vec!["0".into(), "Q0".into(), "2*".into()],
            vec!["1".into(), "A considerably longer question".into(), "5".into()],
        ]
    }

    #[test]
    fn exact_layout() {
        let rows = vec![vec!["0", "Q0", "2*"]];
        let lines = render_rst_table(&rows, "Answers", &HEADINGS).unwrap();
        assert_eq!(
            lines,
            vec![
                "+------------------------+",
                "|Answers                 |",
                "+----+----------+--------+",
                "| ID | Question | Answer |",
                "+====+==========+========+",
                "| 0  |    Q0    |   2*   |",
                "+----+----------+--------+",
            ]
        );
    }

    #[test]
    fn widths_cover_headings_and_cells() {
        let rows = rows();
        let widths = column_widths(&rows, &HEADINGS);
        for (i, heading) in HEADINGS.iter().enumerate() {
            assert!(widths[i] >= heading.len() + 2);
            for row in &rows {
                assert!(widths[i] >= row[i].len() + 2);
            }
        }
        assert_eq!(widths[1], "A considerably longer question".len() + 2);
    }

    #[test]
    fn every_line_has_same_length_and_segments() {
        let lines = render_rst_table(&rows(), "T", &HEADINGS).unwrap();
        let len = lines[0].chars().count();
        assert!(lines.iter().all(|l| l.chars().count() == len));

        // Header row, then data rows at every other line after the double border.
        for line in std::iter::once(&lines[3]).chain(lines[5..].iter().step_by(2)) {
            assert_eq!(line.matches('|').count(), HEADINGS.len() + 1);
        }
        for border in std::iter::once(&lines[2]).chain(lines[6..].iter().step_by(2)) {
            assert_eq!(border.matches('+').count(), HEADINGS.len() + 1);
        }
    }

    #[test]
    fn long_title_widens_last_column() {
        let rows = vec![vec!["1", "x", "3"]];
        let title = "Lowest scoring in category \"Technique and Tactics\"";
        let lines = render_rst_table(&rows, title, &HEADINGS).unwrap();
        assert_eq!(lines[0].chars().count(), title.chars().count() + 2);
        assert_eq!(lines[1], format!("|{title}|"));
        assert!(lines.iter().all(|l| l.chars().count() == lines[0].chars().count()));
    }

    #[test]
    fn empty_table_renders_header_only() {
        let rows: Vec<Vec<String>> = Vec::new();
        let lines = render_rst_table(&rows, "Nothing", &HEADINGS).unwrap();
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn arity_mismatch_is_error() {
        let rows = vec![vec!["1", "x"]];
        assert!(render_rst_table(&rows, "T", &HEADINGS).is_err());
    }
}
