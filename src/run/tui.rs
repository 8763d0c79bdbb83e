use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::ledger::Sign;
use crate::session::Session;
use crate::ui::app::{App, InputMode, PendingAction, Screen};
use crate::ui::commands;
use crate::ui::util::{format_amount, scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(session: &mut Session) -> Result<()> {
    let mut app = App::new();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, session);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    session: &mut Session,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            let content_height = f.area().height.saturating_sub(3) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app, session);
        })?;

        if let Event::Key(key) = event::read()? {
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app, session)?,
                InputMode::Command => handle_command_input(key, app, session)?,
                InputMode::Search => handle_search_input(key, app),
                InputMode::Confirm => handle_confirm_input(key, app, session),
            }
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App, session: &mut Session) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Search;
            app.search_input.clear();
            app.screen = Screen::Transactions;
            app.transaction_index = 0;
            app.transaction_scroll = 0;
        }
        KeyCode::Char('q') | KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.running = false;
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app, session),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char('1') => switch_screen(app, Screen::Dashboard),
        KeyCode::Char('2') => switch_screen(app, Screen::Transactions),
        KeyCode::Char('3') => switch_screen(app, Screen::Categories),
        KeyCode::Char('4') => switch_screen(app, Screen::Reminders),
        KeyCode::Tab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let next = (idx + 1) % screens.len();
            switch_screen(app, screens[next]);
        }
        KeyCode::BackTab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let prev = if idx == 0 { screens.len() - 1 } else { idx - 1 };
            switch_screen(app, screens[prev]);
        }
        KeyCode::Char('g') => handle_goto_top(app),
        KeyCode::Char('G') => handle_goto_bottom(app, session),
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Char('v') if app.screen == Screen::Categories => {
            app.category_sign = match app.category_sign {
                Sign::Income => Sign::Expense,
                Sign::Expense => Sign::Income,
            };
            app.category_scroll = 0;
        }
        KeyCode::Char('P') if app.screen == Screen::Reminders => {
            commands::handle_command("pay", app, session)?;
        }
        KeyCode::Char('D') if app.screen == Screen::Reminders => {
            commands::handle_command("delete-plan", app, session)?;
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                handle_move_down(app, session);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                handle_move_up(app);
            }
        }
        KeyCode::Esc => {
            app.status_message.clear();
            if !app.search_input.is_empty() {
                app.search_input.clear();
                app.transaction_index = 0;
                app.transaction_scroll = 0;
                app.set_status("Search cleared");
            }
        }
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: event::KeyEvent, app: &mut App, session: &mut Session) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, session)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let trimmed = app.command_input.trim_end();
            if let Some(pos) = trimmed.rfind(' ') {
                app.command_input.truncate(pos + 1);
            } else {
                app.command_input.clear();
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_search_input(key: event::KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.search_input.clear();
            app.transaction_index = 0;
            app.transaction_scroll = 0;
        }
        KeyCode::Backspace => {
            app.search_input.pop();
            app.transaction_index = 0;
            app.transaction_scroll = 0;
        }
        KeyCode::Char(c) => {
            app.search_input.push(c);
            app.transaction_index = 0;
            app.transaction_scroll = 0;
        }
        _ => {}
    }
}

fn handle_confirm_input(key: event::KeyEvent, app: &mut App, session: &mut Session) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            if let Some(action) = app.pending_action.take() {
                match action {
                    PendingAction::ResetLedger { amount_text } => {
                        match session.reset_with_initial_balance(&amount_text) {
                            Ok(amount) => {
                                app.transaction_index = 0;
                                app.transaction_scroll = 0;
                                app.set_status(format!(
                                    "Ledger reset. New balance: {}",
                                    format_amount(amount)
                                ));
                            }
                            Err(err) => {
                                tracing::error!(%err, "reset failed");
                                app.set_status(format!("Error: {err}"));
                            }
                        }
                    }
                    PendingAction::DeletePlan { name } => match session.delete_plan(&name) {
                        Ok(()) => {
                            if app.plan_index >= session.plans().len() {
                                app.plan_index = session.plans().len().saturating_sub(1);
                            }
                            app.set_status(format!("Deleted plan '{name}'"));
                        }
                        Err(err) => {
                            tracing::error!(%err, "delete_plan failed");
                            app.set_status(format!("Error: {err}"));
                        }
                    },
                }
            }
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.pending_action = None;
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
            app.set_status("Cancelled");
        }
        _ => {}
    }
}

// ── Navigation helpers ───────────────────────────────────────

fn switch_screen(app: &mut App, screen: Screen) {
    app.screen = screen;
    app.set_status(format!("{screen}"));
}

fn handle_move_down(app: &mut App, session: &Session) {
    let page = app.visible_rows;
    match app.screen {
        Screen::Transactions => {
            let len = app.visible_transactions(session.transactions()).len();
            scroll_down(&mut app.transaction_index, &mut app.transaction_scroll, len, page);
        }
        Screen::Categories => {
            let len = session.totals_by_category(app.category_sign).len();
            if app.category_scroll + page < len {
                app.category_scroll += 1;
            }
        }
        Screen::Reminders => {
            scroll_down(
                &mut app.plan_index,
                &mut app.plan_scroll,
                session.plans().len(),
                page,
            );
        }
        Screen::Dashboard => {}
    }
}

fn handle_move_up(app: &mut App) {
    match app.screen {
        Screen::Transactions => scroll_up(&mut app.transaction_index, &mut app.transaction_scroll),
        Screen::Categories => app.category_scroll = app.category_scroll.saturating_sub(1),
        Screen::Reminders => scroll_up(&mut app.plan_index, &mut app.plan_scroll),
        Screen::Dashboard => {}
    }
}

fn handle_goto_top(app: &mut App) {
    match app.screen {
        Screen::Transactions => {
            scroll_to_top(&mut app.transaction_index, &mut app.transaction_scroll)
        }
        Screen::Categories => app.category_scroll = 0,
        Screen::Reminders => scroll_to_top(&mut app.plan_index, &mut app.plan_scroll),
        Screen::Dashboard => {}
    }
}

fn handle_goto_bottom(app: &mut App, session: &Session) {
    let page = app.visible_rows;
    match app.screen {
        Screen::Transactions => {
            let len = app.visible_transactions(session.transactions()).len();
            scroll_to_bottom(&mut app.transaction_index, &mut app.transaction_scroll, len, page);
        }
        Screen::Categories => {
            let len = session.totals_by_category(app.category_sign).len();
            app.category_scroll = len.saturating_sub(page);
        }
        Screen::Reminders => {
            scroll_to_bottom(
                &mut app.plan_index,
                &mut app.plan_scroll,
                session.plans().len(),
                page,
            );
        }
        Screen::Dashboard => {}
    }
}
