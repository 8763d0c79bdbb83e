use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use rust_decimal::Decimal;

use crate::errors::Error;
use crate::session::Session;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, format_signed, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, _app: &App, session: &Session) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Summary cards
            Constraint::Min(8),    // Recent activity + upcoming payments
        ])
        .split(area);

    render_summary_cards(f, chunks[0], session);

    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    render_recent_activity(f, lower[0], session);
    render_upcoming_payments(f, lower[1], session);
}

fn render_summary_cards(f: &mut Frame, area: Rect, session: &Session) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let balance = session.balance();
    render_card(
        f,
        cards[0],
        "Balance",
        format_amount(balance),
        if balance >= Decimal::ZERO {
            theme::GREEN
        } else {
            theme::RED
        },
        Some(format!("{} entries", session.transactions().len())),
    );

    let (allowance_text, allowance_color, allowance_sub) = allowance_card(session);
    render_card(
        f,
        cards[1],
        "Daily Allowance",
        allowance_text,
        allowance_color,
        allowance_sub,
    );

    let active = session
        .plans()
        .iter()
        .filter(|p| !p.is_fully_paid())
        .count();
    render_card(
        f,
        cards[2],
        "Payment Plans",
        format!("{}", session.plans().len()),
        theme::ACCENT,
        Some(format!("{active} with payments left")),
    );

    let (next_text, next_sub) = next_payment_card(session);
    render_card(f, cards[3], "Next Payment", next_text, theme::YELLOW, next_sub);
}

fn allowance_card(session: &Session) -> (String, Color, Option<String>) {
    match session.daily_allowance_today() {
        Ok(Some(allowance)) => (
            format!("{}/day", format_amount(allowance.per_day)),
            if allowance.per_day >= Decimal::ZERO {
                theme::GREEN
            } else {
                theme::RED
            },
            Some(format!(
                "until {} ({} days)",
                allowance.deadline, allowance.days_remaining
            )),
        ),
        Ok(None) => (
            "—".to_string(),
            theme::TEXT_DIM,
            Some("set with :deadline".to_string()),
        ),
        Err(Error::DeadlineIsToday) => (
            "—".to_string(),
            theme::YELLOW,
            session
                .deadline()
                .map(|d| format!("deadline {d} is today")),
        ),
        Err(_) => ("—".to_string(), theme::TEXT_DIM, None),
    }
}

fn next_payment_card(session: &Session) -> (String, Option<String>) {
    let next = session
        .plans()
        .iter()
        .filter_map(|p| p.next_due_date().map(|d| (d, p)))
        .min_by_key(|(d, _)| *d);

    match next {
        Some((date, plan)) => (
            date.to_string(),
            Some(format!("{} ({})", truncate(&plan.name, 14), format_amount(plan.amount))),
        ),
        None => ("—".to_string(), Some("nothing due".to_string())),
    }
}

fn render_card(
    f: &mut Frame,
    area: Rect,
    title: &str,
    value: String,
    color: Color,
    subtitle: Option<String>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(format!(" {title} "), theme::title_style()));

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle.unwrap_or_default(), theme::dim_style())),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}

fn render_recent_activity(f: &mut Frame, area: Rect, session: &Session) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(" Recent Activity ", theme::title_style()));

    if session.transactions().is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No transactions yet. Record one with :expense or :income",
            theme::dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let rows = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = session
        .transactions()
        .iter()
        .rev()
        .take(rows)
        .map(|t| {
            let style = if t.is_income() {
                theme::income_style()
            } else {
                theme::expense_style()
            };
            let category = if t.category.is_empty() {
                "(uncategorized)"
            } else {
                &t.category
            };
            Line::from(vec![
                Span::styled(format!("{}  ", t.time), theme::dim_style()),
                Span::styled(format!("{:<20}", truncate(category, 20)), theme::normal_style()),
                Span::styled(format!("{:>14}", format_signed(t.amount)), style),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_upcoming_payments(f: &mut Frame, area: Rect, session: &Session) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(" Upcoming Payments ", theme::title_style()));

    let mut upcoming: Vec<_> = session
        .plans()
        .iter()
        .filter_map(|p| p.next_due_date().map(|d| (d, p)))
        .collect();
    upcoming.sort_by_key(|(d, _)| *d);

    if upcoming.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No payments due. Add a plan with :plan",
            theme::dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let rows = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = upcoming
        .iter()
        .take(rows)
        .map(|(date, plan)| {
            Line::from(vec![
                Span::styled(format!("{date}  "), Style::default().fg(theme::YELLOW)),
                Span::styled(
                    format!("{:<16}", truncate(&plan.name, 16)),
                    theme::normal_style(),
                ),
                Span::styled(
                    format!("{:>12}", format_amount(plan.amount)),
                    theme::normal_style(),
                ),
                Span::styled(
                    format!("  {}/{}", plan.paid_count, plan.installment_count),
                    theme::dim_style(),
                ),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}
