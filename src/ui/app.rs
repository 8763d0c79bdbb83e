use crate::ledger::Sign;
use crate::models::Transaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Transactions,
    Categories,
    Reminders,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[
            Self::Dashboard,
            Self::Transactions,
            Self::Categories,
            Self::Reminders,
        ]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Transactions => write!(f, "Transactions"),
            Self::Categories => write!(f, "Categories"),
            Self::Reminders => write!(f, "Reminders"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Search,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Search => write!(f, "SEARCH"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Destructive action awaiting a y/N confirmation.
#[derive(Debug, Clone)]
pub(crate) enum PendingAction {
    /// Balance correction: discard the whole ledger.
    ResetLedger { amount_text: String },
    DeletePlan { name: String },
}

/// Presentation state only. All business data lives in the
/// [`Session`](crate::session::Session); the app holds cursors, input
/// buffers, and which screen is showing.
pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) search_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,

    // Transactions
    pub(crate) transaction_index: usize,
    pub(crate) transaction_scroll: usize,

    // Categories
    pub(crate) category_sign: Sign,
    pub(crate) category_scroll: usize,

    // Reminders
    pub(crate) plan_index: usize,
    pub(crate) plan_scroll: usize,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new() -> Self {
        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            search_input: String::new(),
            status_message: String::new(),
            show_help: false,

            transaction_index: 0,
            transaction_scroll: 0,

            category_sign: Sign::Expense,
            category_scroll: 0,

            plan_index: 0,
            plan_scroll: 0,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    /// The transactions screen view, newest first, narrowed by the live
    /// search over category text.
    pub(crate) fn visible_transactions<'a>(
        &self,
        txns: &'a [Transaction],
    ) -> Vec<&'a Transaction> {
        let filter = self.search_input.to_lowercase();
        txns.iter()
            .rev()
            .filter(|t| filter.is_empty() || t.category.to_lowercase().contains(&filter))
            .collect()
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    pub(crate) fn confirm(&mut self, message: impl Into<String>, action: PendingAction) {
        self.confirm_message = message.into();
        self.pending_action = Some(action);
        self.input_mode = InputMode::Confirm;
    }
}
