use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Rect},
    text::Line,
    widgets::{Cell, Row, Table, Widget},
};

use super::report::ReportRow;

const COLUMN_SPACING: u16 = 2;

/// Render the report as plain text: header, dashed rule, then one line per
/// row with the ordinal column right-aligned.
pub fn render_table(header: &[String], rows: &[ReportRow]) -> String {
    let columns = header.len().max(1);
    let mut widths = vec![0u16; columns];

    let mut measure = |column: usize, text: &str| {
        if let Some(width) = widths.get_mut(column) {
            *width = (*width).max(Line::from(text).width() as u16);
        }
    };
    for (column, title) in header.iter().enumerate() {
        measure(column, title);
    }
    for row in rows {
        measure(0, &row.index.to_string());
        for (column, cell) in row.cells.iter().enumerate() {
            measure(column + 1, cell);
        }
    }

    let header_row = Row::new(header.iter().enumerate().map(|(column, title)| {
        if column == 0 {
            Cell::from(Line::from(title.as_str()).alignment(Alignment::Right))
        } else {
            Cell::from(title.as_str())
        }
    }));

    let rule = Row::new(
        widths
            .iter()
            .map(|width| Cell::from("-".repeat(usize::from(*width)))),
    );

    let body = std::iter::once(rule).chain(rows.iter().map(|row| {
        let ordinal = Cell::from(Line::from(row.index.to_string()).alignment(Alignment::Right));
        Row::new(
            std::iter::once(ordinal).chain(row.cells.iter().map(|cell| Cell::from(cell.as_str()))),
        )
    }));

    let width = widths.iter().sum::<u16>() + COLUMN_SPACING * (columns as u16 - 1);
    let height = rows.len() as u16 + 2;
    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);

    Table::new(body, widths.iter().map(|width| Constraint::Length(*width)))
        .header(header_row)
        .column_spacing(COLUMN_SPACING)
        .render(area, &mut buffer);

    buffer_to_string(&buffer)
}

fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    (area.top()..area.bottom())
        .map(|y| {
            let line: String = (area.left()..area.right())
                .filter_map(|x| buffer.cell((x, y)))
                .map(|cell| cell.symbol())
                .collect();
            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(line: &str) -> Vec<&str> {
        line.split_whitespace().collect()
    }

    #[test]
    fn test_render_table_layout() {
        let header = vec!["#".to_string(), "Name".to_string(), "AutoRenew".to_string()];
        let rows = vec![
            ReportRow {
                index: 1,
                cells: vec!["example.com".to_string(), "x".to_string()],
            },
            ReportRow {
                index: 2,
                cells: vec!["other.com".to_string(), "-".to_string()],
            },
        ];

        let rendered = render_table(&header, &rows);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(words(lines[0]), vec!["#", "Name", "AutoRenew"]);
        assert_eq!(words(lines[1]), vec!["-", "-----------", "---------"]);
        assert_eq!(words(lines[2]), vec!["1", "example.com", "x"]);
        assert_eq!(words(lines[3]), vec!["2", "other.com", "-"]);
        // Columns line up under their headers
        assert_eq!(lines[2].find("example.com"), lines[0].find("Name"));
        assert_eq!(lines[3].find('-'), lines[0].find("AutoRenew"));
    }

    #[test]
    fn test_ordinal_column_is_right_aligned() {
        let header = vec!["#".to_string(), "Name".to_string()];
        let rows: Vec<ReportRow> = (1..=10)
            .map(|index| ReportRow {
                index,
                cells: vec![format!("d{}.com", index)],
            })
            .collect();

        let rendered = render_table(&header, &rows);
        let lines: Vec<&str> = rendered.lines().collect();

        assert!(lines[2].starts_with(" 1  d1.com"));
        assert!(lines[11].starts_with("10  d10.com"));
    }
}
