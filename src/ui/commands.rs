use std::collections::HashMap;
use std::sync::LazyLock;

use super::app::{App, PendingAction, Screen};
use crate::errors::Error;
use crate::ledger::Sign;
use crate::session::{parse_amount, parse_date, PlanEdit, Session};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Session) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit Saldo", cmd_quit, r);
    register_command!("quit", "Quit Saldo", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("t", "Go to Transactions", cmd_transactions, r);
    register_command!("transactions", "Go to Transactions", cmd_transactions, r);
    register_command!("c", "Go to Categories", cmd_categories, r);
    register_command!("categories", "Go to Categories", cmd_categories, r);
    register_command!("r", "Go to Reminders", cmd_reminders, r);
    register_command!("reminders", "Go to Reminders", cmd_reminders, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "expense",
        "Record an expense (e.g. :expense Food 12.50)",
        cmd_expense,
        r
    );
    register_command!("e", "Record an expense (e.g. :e Food 12.50)", cmd_expense, r);
    register_command!(
        "income",
        "Record income (e.g. :income Salary 1000)",
        cmd_income,
        r
    );
    register_command!("i", "Record income (e.g. :i Salary 1000)", cmd_income, r);
    register_command!(
        "reset",
        "Balance correction: replace ALL history (e.g. :reset 500)",
        cmd_reset,
        r
    );
    register_command!(
        "deadline",
        "Set allowance deadline (e.g. :deadline 2024-12-31)",
        cmd_deadline,
        r
    );
    register_command!(
        "allowance",
        "Show daily allowance until the deadline",
        cmd_allowance,
        r
    );
    register_command!(
        "plan",
        "Create payment plan: :plan <name> <amount> <installments> <first-due> [monthly]",
        cmd_plan,
        r
    );
    register_command!(
        "edit-plan",
        "Edit plan fields: :edit-plan <name> amount=.. installments=.. first-due=.. name=.. monthly=yes|no",
        cmd_edit_plan,
        r
    );
    register_command!(
        "delete-plan",
        "Delete a payment plan (selected, or by name)",
        cmd_delete_plan,
        r
    );
    register_command!(
        "pay",
        "Register an installment payment (selected plan, or by name)",
        cmd_pay,
        r
    );
    register_command!(
        "export",
        "Export transactions to CSV (e.g. :export ~/ledger.csv)",
        cmd_export,
        r
    );
    register_command!("reload", "Re-read all data from the store", cmd_reload, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, session)?;
    } else {
        // Try fuzzy match
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Report a failed operation: log it and show it in the status bar. The
/// process never dies on a domain error.
fn report(app: &mut App, operation: &str, err: &Error) {
    tracing::error!(%err, operation, "operation failed");
    app.set_status(format!("Error: {err}"));
}

/// The plan the cursor is on, when the Reminders screen is active.
fn selected_plan_name(app: &App, session: &Session) -> Option<String> {
    session
        .plans()
        .get(app.plan_index)
        .map(|p| p.name.clone())
}

/// Command target: explicit name argument wins, otherwise the selected
/// plan on the Reminders screen.
fn target_plan(args: &str, app: &App, session: &Session) -> Option<String> {
    if !args.is_empty() {
        return Some(args.to_string());
    }
    if app.screen == Screen::Reminders {
        return selected_plan_name(app, session);
    }
    None
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _session: &mut Session) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, _session: &mut Session) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    Ok(())
}

fn cmd_transactions(_args: &str, app: &mut App, _session: &mut Session) -> anyhow::Result<()> {
    app.screen = Screen::Transactions;
    Ok(())
}

fn cmd_categories(_args: &str, app: &mut App, _session: &mut Session) -> anyhow::Result<()> {
    app.screen = Screen::Categories;
    Ok(())
}

fn cmd_reminders(_args: &str, app: &mut App, _session: &mut Session) -> anyhow::Result<()> {
    app.screen = Screen::Reminders;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _session: &mut Session) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_expense(args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    add_entry(args, app, session, Sign::Expense)
}

fn cmd_income(args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    add_entry(args, app, session, Sign::Income)
}

/// Shared body of :expense and :income. The last token is the amount,
/// everything before it is the category (which may be empty).
fn add_entry(args: &str, app: &mut App, session: &mut Session, sign: Sign) -> anyhow::Result<()> {
    let Some((category, amount_text)) = split_category_amount(args) else {
        app.set_status("Usage: :expense <category> <amount>  /  :income <category> <amount>");
        return Ok(());
    };

    match session.add_transaction(&category, amount_text, sign) {
        Ok(amount) => {
            let label = if sign == Sign::Income { "income" } else { "expense" };
            let shown = if category.is_empty() { "(uncategorized)" } else { &category };
            app.set_status(format!(
                "Recorded {label} in {shown}: {}",
                super::util::format_signed(amount)
            ));
        }
        Err(err) => report(app, "add_transaction", &err),
    }
    Ok(())
}

fn split_category_amount(args: &str) -> Option<(String, &str)> {
    let args = args.trim();
    if args.is_empty() {
        return None;
    }
    match args.rsplit_once(' ') {
        Some((category, amount)) => Some((category.trim().to_string(), amount)),
        // Single token: amount only, empty category.
        None => Some((String::new(), args)),
    }
}

fn cmd_reset(args: &str, app: &mut App, _session: &mut Session) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :reset <new initial balance>");
        return Ok(());
    }
    // Validate up front so the confirmation never carries a bad amount.
    if let Err(err) = parse_amount(args) {
        report(app, "reset", &err);
        return Ok(());
    }
    app.confirm(
        format!("Discard ALL transaction history and start from {args}?"),
        PendingAction::ResetLedger {
            amount_text: args.to_string(),
        },
    );
    Ok(())
}

fn cmd_deadline(args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :deadline <YYYY-MM-DD>");
        return Ok(());
    }
    match session.set_deadline(args) {
        Ok(date) => {
            app.set_status(format!("Deadline set to {date}"));
            // Immediately show the figure the deadline was set for.
            show_allowance(app, session);
        }
        Err(err) => report(app, "set_deadline", &err),
    }
    Ok(())
}

fn cmd_allowance(_args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    show_allowance(app, session);
    Ok(())
}

fn show_allowance(app: &mut App, session: &Session) {
    match session.daily_allowance_today() {
        Ok(Some(allowance)) => {
            app.set_status(format!(
                "Daily allowance until {}: {} ({} days)",
                allowance.deadline,
                super::util::format_amount(allowance.per_day),
                allowance.days_remaining
            ));
        }
        Ok(None) => app.set_status("No deadline set. Use :deadline <YYYY-MM-DD>"),
        Err(err) => report(app, "daily_allowance", &err),
    }
}

fn cmd_plan(args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    if parts.len() < 4 || parts.len() > 5 {
        app.set_status("Usage: :plan <name> <amount> <installments> <first-due> [monthly]");
        return Ok(());
    }
    let name = parts[0];
    let amount_text = parts[1];
    let Ok(installments) = parts[2].parse::<u32>() else {
        app.set_status(format!("Invalid installment count '{}'", parts[2]));
        return Ok(());
    };
    let first_due = parts[3];
    let recurs_monthly = parts.get(4).is_some_and(|w| *w == "monthly");

    match session.create_plan(name, amount_text, installments, first_due, recurs_monthly) {
        Ok(()) => {
            app.screen = Screen::Reminders;
            app.set_status(format!("Created plan '{name}' ({installments} installments)"));
        }
        Err(err) => report(app, "create_plan", &err),
    }
    Ok(())
}

fn cmd_edit_plan(args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    let mut parts = args.split_whitespace();
    let Some(name) = parts.next() else {
        app.set_status(
            "Usage: :edit-plan <name> amount=.. installments=.. first-due=.. name=.. monthly=yes|no",
        );
        return Ok(());
    };

    let mut edit = PlanEdit::default();
    for field in parts {
        let Some((key, value)) = field.split_once('=') else {
            app.set_status(format!("Expected key=value, got '{field}'"));
            return Ok(());
        };
        match key {
            "name" => edit.name = Some(value.to_string()),
            "amount" => match parse_amount(value) {
                Ok(amount) => edit.amount = Some(amount),
                Err(err) => {
                    report(app, "edit_plan", &err);
                    return Ok(());
                }
            },
            "installments" => match value.parse::<u32>() {
                Ok(count) => edit.installment_count = Some(count),
                Err(_) => {
                    app.set_status(format!("Invalid installment count '{value}'"));
                    return Ok(());
                }
            },
            "first-due" => match parse_date(value) {
                Ok(date) => edit.first_due_date = Some(date),
                Err(err) => {
                    report(app, "edit_plan", &err);
                    return Ok(());
                }
            },
            "monthly" => {
                edit.recurs_monthly = Some(matches!(value, "yes" | "y" | "true" | "1"));
            }
            other => {
                app.set_status(format!("Unknown plan field '{other}'"));
                return Ok(());
            }
        }
    }

    match session.edit_plan(name, edit) {
        Ok(()) => app.set_status(format!("Updated plan '{name}'")),
        Err(err) => report(app, "edit_plan", &err),
    }
    Ok(())
}

fn cmd_delete_plan(args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    let Some(name) = target_plan(args, app, session) else {
        app.set_status("No plan selected. Use :delete-plan <name> or select one on Reminders");
        return Ok(());
    };
    if session.plan(&name).is_none() {
        report(app, "delete_plan", &Error::PlanNotFound(name));
        return Ok(());
    }
    app.confirm(
        format!("Delete payment plan '{name}'?"),
        PendingAction::DeletePlan { name },
    );
    Ok(())
}

fn cmd_pay(args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    let Some(name) = target_plan(args, app, session) else {
        app.set_status("No plan selected. Use :pay <name> or select one on Reminders");
        return Ok(());
    };
    match session.register_payment(&name) {
        Ok(paid) => {
            let msg = match session.plan(&name) {
                Some(plan) if plan.is_overpaid() => format!(
                    "Payment registered for '{name}' ({paid}/{} — overpaid)",
                    plan.installment_count
                ),
                Some(plan) if plan.is_fully_paid() => {
                    format!("Payment registered for '{name}' ({paid}/{}, fully paid)",
                        plan.installment_count)
                }
                Some(plan) => match plan.next_due_date() {
                    Some(next) => format!(
                        "Payment registered for '{name}' ({paid}/{}), next due {next}",
                        plan.installment_count
                    ),
                    None => format!("Payment registered for '{name}' ({paid})"),
                },
                None => format!("Payment registered for '{name}' ({paid})"),
            };
            app.set_status(msg);
        }
        Err(err) => report(app, "register_payment", &err),
    }
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    let path = if args.is_empty() {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        let today = chrono::Local::now().format("%Y-%m-%d");
        format!("{home}/saldo-export-{today}.csv")
    } else {
        crate::run::cli::shellexpand(args)
    };

    match crate::export::write_csv(std::path::Path::new(&path), session.transactions()) {
        Ok(count) => app.set_status(format!("Exported {count} transactions to {path}")),
        Err(err) => {
            tracing::error!(%err, "export failed");
            app.set_status(format!("Error: export failed: {err:#}"));
        }
    }
    Ok(())
}

fn cmd_reload(_args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    match session.reload() {
        Ok(()) => {
            app.transaction_index = 0;
            app.transaction_scroll = 0;
            app.plan_index = 0;
            app.plan_scroll = 0;
            app.set_status(format!(
                "Reloaded: {} transactions, {} plans",
                session.transactions().len(),
                session.plans().len()
            ));
        }
        Err(err) => report(app, "reload", &err),
    }
    Ok(())
}
