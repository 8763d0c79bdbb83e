use anyhow::Result;
use std::path::Path;

use crate::ledger::Sign;
use crate::session::Session;
use crate::ui::util::format_amount;

pub(crate) fn as_cli(args: &[String], session: &mut Session) -> Result<()> {
    match args[1].as_str() {
        "summary" | "s" => cli_summary(session),
        "export" => cli_export(&args[2..], session),
        "plans" => cli_plans(session),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("saldo {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("Saldo — local-only personal expense tracker");
    println!();
    println!("Usage: saldo [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive TUI");
    println!("  summary                       Print balance, expense totals and daily allowance");
    println!("  export [path]                 Export transactions to CSV");
    println!("  plans                         List payment plans and next due dates");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

fn cli_summary(session: &Session) -> Result<()> {
    println!("Saldo");
    println!("{}", "─".repeat(40));
    println!("  Balance:      {}", format_amount(session.balance()));
    println!("  Transactions: {}", session.transactions().len());

    match session.daily_allowance_today() {
        Ok(Some(allowance)) => {
            println!(
                "  Allowance:    {}/day until {} ({} days)",
                format_amount(allowance.per_day),
                allowance.deadline,
                allowance.days_remaining
            );
        }
        Ok(None) => {}
        Err(err) => println!("  Allowance:    unavailable ({err})"),
    }

    let expenses = session.totals_by_category(Sign::Expense);
    if !expenses.is_empty() {
        println!();
        println!("Expenses by Category:");
        for (name, total) in &expenses {
            let shown = if name.is_empty() { "(uncategorized)" } else { name };
            println!("  {shown:<24} {}", format_amount(*total));
        }
    }

    Ok(())
}

fn cli_export(args: &[String], session: &Session) -> Result<()> {
    let output_path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(|a| shellexpand(a))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            let today = chrono::Local::now().format("%Y-%m-%d");
            format!("{home}/saldo-export-{today}.csv")
        });

    let count = crate::export::write_csv(Path::new(&output_path), session.transactions())?;
    if count == 0 {
        println!("No transactions to export (wrote header to {output_path})");
    } else {
        println!("Exported {count} transactions to {output_path}");
    }
    Ok(())
}

fn cli_plans(session: &Session) -> Result<()> {
    let plans = session.plans();
    if plans.is_empty() {
        println!("No payment plans");
        return Ok(());
    }

    println!(
        "{:<20} {:>12} {:>8} {:<12} Status",
        "Name", "Amount", "Paid", "Next Due"
    );
    println!("{}", "─".repeat(64));
    for plan in plans {
        let next_due = plan
            .next_due_date()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "—".to_string());
        let status = if plan.is_overpaid() {
            "overpaid"
        } else if plan.is_fully_paid() {
            "paid"
        } else {
            "active"
        };
        println!(
            "{:<20} {:>12} {:>8} {:<12} {status}",
            plan.name,
            format_amount(plan.amount),
            format!("{}/{}", plan.paid_count, plan.installment_count),
            next_due,
        );
    }
    Ok(())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}
