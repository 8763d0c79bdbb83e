use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::session::Session;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_signed, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App, session: &Session) {
    let visible = app.visible_transactions(session.transactions());

    if visible.is_empty() {
        let msg = if !app.search_input.is_empty() {
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!("No transactions matching '{}'", app.search_input),
                    theme::dim_style(),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Press Esc to clear the search",
                    theme::dim_style(),
                )),
            ]
        } else {
            vec![
                Line::from(""),
                Line::from(Span::styled("No transactions yet", theme::dim_style())),
                Line::from(""),
                Line::from(Span::styled(
                    "Record one with :expense <category> <amount> or :income",
                    theme::dim_style(),
                )),
            ]
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(" Transactions (0) ", theme::title_style()));
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let header_cells = ["Time", "Category", "Type", "Amount"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = visible
        .iter()
        .enumerate()
        .skip(app.transaction_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, txn)| {
            let is_cursor = i == app.transaction_index;

            let (kind, amount_style) = if txn.is_income() {
                ("income", theme::income_style())
            } else {
                ("expense", theme::expense_style())
            };

            let category = if txn.category.is_empty() {
                "(uncategorized)"
            } else {
                &txn.category
            };

            let style = if is_cursor {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(txn.time.clone()),
                Cell::from(truncate(category, 30)),
                Cell::from(kind),
                Cell::from(Span::styled(format_signed(txn.amount), amount_style)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(18),
        Constraint::Min(20),
        Constraint::Length(9),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                format!(
                    " Transactions ({}) {}",
                    visible.len(),
                    if !app.search_input.is_empty() {
                        format!("search: '{}' ", app.search_input)
                    } else {
                        String::new()
                    }
                ),
                theme::title_style(),
            )),
    );

    f.render_widget(table, area);
}
