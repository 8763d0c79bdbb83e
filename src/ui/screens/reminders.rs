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
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App, session: &Session) {
    let plans = session.plans();

    if plans.is_empty() {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(" Payment Reminders (0) ", theme::title_style()));
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No payment plans yet", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Create one with :plan <name> <amount> <installments> <first-due> [monthly]",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let header_cells = ["Name", "Amount", "Paid", "Next Due", "Monthly", "Status"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = plans
        .iter()
        .enumerate()
        .skip(app.plan_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, plan)| {
            let is_cursor = i == app.plan_index;

            let (status, status_style) = if plan.is_overpaid() {
                ("Overpaid".to_string(), theme::expense_style())
            } else if plan.is_fully_paid() {
                ("Paid".to_string(), theme::income_style())
            } else {
                match plan.next_due_date() {
                    Some(date) => (format!("due {date}"), Style::default().fg(theme::YELLOW)),
                    None => ("—".to_string(), theme::dim_style()),
                }
            };

            let next_due = plan
                .next_due_date()
                .map(|d| d.to_string())
                .unwrap_or_else(|| "—".to_string());

            let style = if is_cursor {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(truncate(&plan.name, 24)),
                Cell::from(format_amount(plan.amount)),
                Cell::from(format!("{}/{}", plan.paid_count, plan.installment_count)),
                Cell::from(next_due),
                Cell::from(if plan.recurs_monthly { "yes" } else { "no" }),
                Cell::from(Span::styled(status, status_style)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Min(16),
        Constraint::Length(14),
        Constraint::Length(8),
        Constraint::Length(12),
        Constraint::Length(8),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                format!(" Payment Reminders ({}) ", plans.len()),
                theme::title_style(),
            )),
    );

    f.render_widget(table, area);
}
