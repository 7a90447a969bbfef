use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table},
    Frame,
};

use crate::app::{App, Focus, FormField, Overlay};
use crate::db::Storage;
use crate::models::LineItemField;
use crate::pricing::summarize;
use crate::ui::components::popup::{render_invoice_detail, render_message, summary_paragraph};
use crate::view::{self, ItemRow};

fn panel_block(title: &str, focused: bool) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        })
}

pub fn render_workspace<B: Backend, S: Storage>(frame: &mut Frame<B>, app: &mut App<S>) {
    // Clear the frame completely first
    let clear_block = Block::default().style(Style::default().bg(Color::Black));
    frame.render_widget(clear_block, frame.size());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(12), Constraint::Length(3)].as_ref())
        .split(frame.size());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)].as_ref())
        .split(chunks[0]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(5), // Form
                Constraint::Min(5),    // Items
                Constraint::Length(6), // Summary
            ]
            .as_ref(),
        )
        .split(columns[0]);

    render_form(frame, app, left[0]);
    render_items(frame, app, left[1]);

    let summary = view::summary_view(&summarize(app.workspace().items()));
    frame.render_widget(summary_paragraph(&summary, Some("Summary")), left[2]);

    render_history(frame, app, columns[1]);
    render_help(frame, app, chunks[1]);

    match &app.overlay {
        Some(Overlay::Message(message)) => render_message(frame, message),
        Some(Overlay::Detail(detail)) => render_invoice_detail(frame, detail),
        None => {}
    }
}

fn render_form<B: Backend, S: Storage>(frame: &mut Frame<B>, app: &App<S>, area: Rect) {
    let focused = app.focus == Focus::Form;
    let form = &app.form;

    let content = vec![
        form.name.spans("Product", focused && form.current_field == FormField::Name),
        form.price.spans("Price", focused && form.current_field == FormField::Price),
        form.quantity.spans("Quantity", focused && form.current_field == FormField::Quantity),
    ];

    let paragraph = Paragraph::new(content).block(panel_block("Add product", focused));
    frame.render_widget(paragraph, area);
}

fn render_items<B: Backend, S: Storage>(frame: &mut Frame<B>, app: &mut App<S>, area: Rect) {
    let focused = app.focus == Focus::Items;

    let header_cells = LineItemField::ALL
        .iter()
        .map(|field| field.label())
        .chain(["Subtotal", ""])
        .map(|h| Cell::from(h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells)
        .style(Style::default())
        .height(1)
        .bottom_margin(1);

    let selected_id = app.selected_item_id();
    let rows: Vec<Row> = view::item_rows(app.workspace().items())
        .into_iter()
        .map(|row| match row {
            ItemRow::Placeholder(message) => Row::new(vec![Cell::from(message)
                .style(Style::default().fg(Color::Gray))]),
            ItemRow::Item { id, cells } => {
                let cells = cells.into_iter().map(|cell| {
                    let editing = app
                        .editing
                        .as_ref()
                        .filter(|edit| edit.item_id == id && Some(edit.field) == cell.field);
                    if let Some(edit) = editing {
                        return Cell::from(format!("{}|", edit.input.value))
                            .style(Style::default().fg(Color::Black).bg(Color::Yellow));
                    }

                    let cursor = focused
                        && selected_id == Some(id)
                        && cell.field == Some(app.selected_column);
                    let style = match cell.field {
                        Some(_) if cursor => Style::default().add_modifier(Modifier::UNDERLINED | Modifier::BOLD),
                        Some(_) => Style::default(),
                        None if cell.text == view::DELETE_LABEL => Style::default().fg(Color::Red),
                        None => Style::default().fg(Color::Green),
                    };
                    Cell::from(cell.text).style(style)
                });
                Row::new(cells.collect::<Vec<_>>()).height(1)
            }
        })
        .collect();

    let title = format!("Invoice ({} products)", app.workspace().len());
    let table = Table::new(rows)
        .header(header)
        .block(panel_block(&title, focused))
        .highlight_style(if focused {
            Style::default().bg(Color::Blue).fg(Color::White)
        } else {
            Style::default()
        })
        .widths(&[
            Constraint::Percentage(35),
            Constraint::Percentage(15),
            Constraint::Percentage(10),
            Constraint::Percentage(25),
            Constraint::Percentage(15),
        ]);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_history<B: Backend, S: Storage>(frame: &mut Frame<B>, app: &mut App<S>, area: Rect) {
    let focused = app.focus == Focus::History;

    let items: Vec<ListItem> = view::history_entries(app.history().recent_first())
        .into_iter()
        .map(|entry| {
            if entry.invoice_id.is_none() {
                return ListItem::new(Spans::from(Span::styled(
                    entry.label,
                    Style::default().fg(Color::Gray),
                )));
            }
            ListItem::new(vec![
                Spans::from(entry.label),
                Spans::from(Span::styled(
                    format!("  {}", entry.total),
                    Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(panel_block("History", focused))
        .highlight_style(if focused {
            Style::default().bg(Color::Blue).fg(Color::White)
        } else {
            Style::default()
        });

    frame.render_stateful_widget(list, area, &mut app.history_state);
}

fn render_help<B: Backend, S: Storage>(frame: &mut Frame<B>, app: &App<S>, area: Rect) {
    let help_text = match (&app.editing, app.focus) {
        (Some(edit), _) => match edit.field {
            LineItemField::Name => "Enter/Tab - Apply | Esc - Discard edit",
            _ => "Enter/Tab - Apply number | Esc - Discard edit",
        },
        (None, Focus::Form) => "Enter - Add product | Up/Down - Field | Tab - Next panel | Ctrl+S - Save invoice | Ctrl+C - Quit",
        (None, Focus::Items) => "Up/Down - Row | Left/Right - Column | Enter/E - Edit cell | D - Delete | S - Save | Tab - Next panel | Q - Quit",
        (None, Focus::History) => "Up/Down - Select | Enter - View invoice | S - Save | Tab - Next panel | Q - Quit",
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, area);
}
