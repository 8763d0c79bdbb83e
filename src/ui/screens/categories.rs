use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::Decimal;

use crate::ledger::Sign;
use crate::session::Session;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App, session: &Session) {
    let totals = session.totals_by_category(app.category_sign);
    let title = format!(" {} by Category ({}) ", app.category_sign, totals.len());

    if totals.is_empty() {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(title, theme::title_style()));
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("No {} recorded yet", app.category_sign.to_string().to_lowercase()),
                theme::dim_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press v to switch between income and expenses",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let header_cells = ["Category", "Total", "Entries"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let amount_style = match app.category_sign {
        Sign::Income => theme::income_style(),
        Sign::Expense => theme::expense_style(),
    };

    let rows: Vec<Row> = totals
        .iter()
        .enumerate()
        .skip(app.category_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, (name, total))| {
            let count = session
                .transactions()
                .iter()
                .filter(|t| app.category_sign.matches(t.amount) && t.category == *name)
                .count();

            let shown = if name.is_empty() { "(uncategorized)" } else { name };

            let style = if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(truncate(shown, 30)),
                Cell::from(Span::styled(format_amount(*total), amount_style)),
                Cell::from(format!("{count}")),
            ])
            .style(style)
        })
        .collect();

    let grand_total: Decimal = totals.iter().map(|(_, t)| *t).sum();

    let widths = [
        Constraint::Min(20),
        Constraint::Length(16),
        Constraint::Length(9),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .footer(
            Row::new(vec![
                Cell::from("Total"),
                Cell::from(Span::styled(format_amount(grand_total), amount_style)),
                Cell::from(""),
            ])
            .style(theme::header_style()),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::OVERLAY))
                .title(Span::styled(title, theme::title_style())),
        );

    f.render_widget(table, area);
}
