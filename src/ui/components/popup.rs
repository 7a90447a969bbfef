use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::view::{InvoiceDetailView, SummaryView};

/// Blocking message box; any key dismisses it.
pub fn render_message<B: Backend>(frame: &mut Frame<B>, message: &str) {
    let popup_area = centered_rect(60, 25, frame.size());

    let body = Paragraph::new(vec![
        Spans::from(""),
        Spans::from(message.to_string()),
        Spans::from(""),
        Spans::from(Span::styled(
            "Press any key to continue",
            Style::default().fg(Color::Gray),
        )),
    ])
    .wrap(Wrap { trim: true })
    .block(Block::default().title("Notice").borders(Borders::ALL))
    .style(Style::default().fg(Color::White));

    frame.render_widget(Clear, popup_area);
    frame.render_widget(body, popup_area);
}

/// Read-only modal with a saved invoice.
pub fn render_invoice_detail<B: Backend>(frame: &mut Frame<B>, detail: &InvoiceDetailView) {
    let popup_area = centered_rect(80, 70, frame.size());
    let block = Block::default()
        .title(detail.title.as_str())
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::Cyan));
    let inner = block.inner(popup_area);

    frame.render_widget(Clear, popup_area);
    frame.render_widget(block, popup_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(inner);

    let header_cells = ["Product", "Price", "Qty", "Subtotal"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    let rows = detail
        .rows
        .iter()
        .map(|row| Row::new(row.iter().map(|cell| Cell::from(cell.clone()))).height(1));

    let table = Table::new(rows)
        .header(header)
        .style(Style::default().fg(Color::White))
        .widths(&[
            Constraint::Percentage(40),
            Constraint::Percentage(20),
            Constraint::Percentage(10),
            Constraint::Percentage(30),
        ]);
    frame.render_widget(table, chunks[0]);

    frame.render_widget(summary_paragraph(&detail.summary, None), chunks[1]);

    let hint = Paragraph::new("Press any key to close").style(Style::default().fg(Color::Gray));
    frame.render_widget(hint, chunks[2]);
}

/// Subtotal, discount, VAT and total as a bordered block.
pub fn summary_paragraph<'a>(summary: &SummaryView, title: Option<&'a str>) -> Paragraph<'a> {
    let lines = summary.lines();
    let last = lines.len() - 1;
    let content: Vec<Spans> = lines
        .into_iter()
        .enumerate()
        .map(|(i, (label, value))| {
            let style = if i == last {
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Spans::from(vec![
                Span::styled(format!("{:<16}", label), style),
                Span::styled(value.to_string(), style),
            ])
        })
        .collect();

    let mut block = Block::default().borders(Borders::ALL);
    if let Some(title) = title {
        block = block.title(title);
    }
    Paragraph::new(content).block(block)
}

// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
