//! Line-oriented front-end.
//!
//! Renders the login screen and the main-screen panels as text and maps each
//! input line onto a command. The console task is the only owner of
//! [`AppState`]; background load results reach it through the UI channel.

use std::io::{self, Write};

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tuckshop_shared::constants::APP_NAME;

use crate::commands;
use crate::error::CommandError;
use crate::events::{self, UiEvent, UiReceiver};
use crate::state::AppState;
use crate::views::{MainView, Notice, NoticeLevel, Screen};

#[derive(Debug, Parser)]
#[command(
    name = "tuckshop",
    no_binary_name = true,
    disable_help_flag = true,
    disable_version_flag = true,
    disable_help_subcommand = true
)]
struct ConsoleLine {
    #[command(subcommand)]
    command: ConsoleCommand,
}

#[derive(Debug, Subcommand)]
enum ConsoleCommand {
    /// Log in as the shop administrator
    Login { username: String, password: String },
    /// Return to the login screen
    Logout,
    /// Reload and show the item catalog
    Items,
    /// Reload and show the offers
    Offers,
    /// Select a catalog row and copy it into the item form
    Select { row: usize },
    /// Set one item form field (no value clears it)
    Set { field: FormField, value: Option<String> },
    /// Show the item form
    Form,
    /// Clear the item form and selection
    Clear,
    /// Add the item in the form (flags fill the form first)
    Add(ItemArgs),
    /// Save the form over the selected item
    Update(ItemArgs),
    /// Delete the selected item
    Delete {
        /// Skip the confirmation question
        #[arg(long, short)]
        yes: bool,
    },
    /// Add an offer
    AddOffer {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Select an offer by row number or by its text
    SelectOffer {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        target: Vec<String>,
    },
    /// Replace the selected offer's text
    EditOffer {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Remove the selected offer
    RemoveOffer,
    /// Record a purchase of an item by exact name
    Purchase {
        name: String,
        #[arg(allow_hyphen_values = true)]
        quantity: String,
    },
    /// Show this help
    Help,
    /// Leave the program
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, Args)]
struct ItemArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    price: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    stock: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormField {
    Name,
    Price,
    Category,
    Stock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Default)]
pub struct Console {
    /// Set after `delete` without `--yes`: the next line answers the question.
    pending_delete: bool,
}

impl Console {
    pub fn greet<W: Write>(&self, state: &AppState, out: &mut W) -> io::Result<()> {
        writeln!(out, "{APP_NAME}")?;
        render_login(out, state)
    }

    pub fn prompt<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.pending_delete {
            write!(out, "[y/N] ")?;
        } else {
            write!(out, "> ")?;
        }
        out.flush()
    }

    /// Apply a background result and repaint the panel it refreshed.
    pub fn handle_event<W: Write>(
        &mut self,
        state: &mut AppState,
        event: UiEvent,
        out: &mut W,
    ) -> io::Result<()> {
        let items = matches!(event, UiEvent::ItemsLoaded(_));
        if !events::apply(state, event) {
            return Ok(());
        }
        writeln!(out)?;
        if items {
            render_catalog(out, state)
        } else {
            render_offers(out, state)
        }
    }

    pub fn handle_line<W: Write>(
        &mut self,
        state: &mut AppState,
        line: &str,
        out: &mut W,
    ) -> io::Result<Flow> {
        let line = line.trim();

        if self.pending_delete {
            self.pending_delete = false;
            let confirmed = matches!(line.to_ascii_lowercase().as_str(), "y" | "yes");
            self.delete(state, confirmed, out)?;
            return Ok(Flow::Continue);
        }

        if line.is_empty() {
            return Ok(Flow::Continue);
        }

        let tokens = match tokenize(line) {
            Ok(tokens) => tokens,
            Err(msg) => {
                render_notice(out, &Notice { level: NoticeLevel::Warning, text: msg })?;
                return Ok(Flow::Continue);
            }
        };

        match ConsoleLine::try_parse_from(tokens) {
            Ok(parsed) => self.execute(state, parsed.command, out),
            Err(e) => {
                write!(out, "{}", e.render())?;
                Ok(Flow::Continue)
            }
        }
    }

    fn execute<W: Write>(
        &mut self,
        state: &mut AppState,
        command: ConsoleCommand,
        out: &mut W,
    ) -> io::Result<Flow> {
        match command {
            ConsoleCommand::Login { username, password } => {
                if commands::session::login(state, &username, &password) {
                    writeln!(out, "Welcome, {username}. Loading items and offers...")?;
                } else {
                    render_login(out, state)?;
                }
            }
            ConsoleCommand::Logout => {
                commands::session::logout(state);
                render_login(out, state)?;
            }
            ConsoleCommand::Items => {
                if attempt(out, commands::items::reload_items(state))?.is_some() {
                    render_catalog(out, state)?;
                }
            }
            ConsoleCommand::Offers => {
                if attempt(out, commands::offers::reload_offers(state))?.is_some() {
                    render_offers(out, state)?;
                }
            }
            ConsoleCommand::Select { row } => {
                let selected = match row.checked_sub(1) {
                    Some(index) => commands::items::select_item(state, index),
                    None => Err(CommandError::Validation("Rows are numbered from 1".into())),
                };
                if attempt(out, selected)?.is_some() {
                    render_form(out, state)?;
                }
            }
            ConsoleCommand::Set { field, value } => {
                let value = value.unwrap_or_default();
                let set = state.main_view_mut().map(|view| {
                    let form = &mut view.catalog.form;
                    match field {
                        FormField::Name => form.name = value,
                        FormField::Price => form.price = value,
                        FormField::Category => form.category = value,
                        FormField::Stock => form.stock = value,
                    }
                });
                if attempt(out, set)?.is_some() {
                    render_form(out, state)?;
                }
            }
            ConsoleCommand::Form => {
                if attempt(out, state.main_view_mut().map(|_| ()))?.is_some() {
                    render_form(out, state)?;
                }
            }
            ConsoleCommand::Clear => {
                if attempt(out, commands::items::clear_form(state))?.is_some() {
                    render_form(out, state)?;
                }
            }
            ConsoleCommand::Add(args) => {
                let added = fill_form(state, args).and_then(|()| commands::items::add_item(state));
                if let Some(item) = attempt(out, added)? {
                    render_notice(out, &Notice::info(format!("Added {}", item.label())))?;
                    render_catalog(out, state)?;
                }
            }
            ConsoleCommand::Update(args) => {
                let updated =
                    fill_form(state, args).and_then(|()| commands::items::update_item(state));
                if let Some(item) = attempt(out, updated)? {
                    render_notice(out, &Notice::info(format!("Updated {}", item.label())))?;
                    render_catalog(out, state)?;
                }
            }
            ConsoleCommand::Delete { yes: true } => self.delete(state, true, out)?,
            ConsoleCommand::Delete { yes: false } => {
                let label = state
                    .main_view()
                    .and_then(|view| view.catalog.selected_item())
                    .map(|item| item.label());
                match label {
                    Some(label) => {
                        writeln!(out, "Delete '{label}'?")?;
                        self.pending_delete = true;
                    }
                    // Let the command report why there is nothing to delete.
                    None => self.delete(state, false, out)?,
                }
            }
            ConsoleCommand::AddOffer { text } => {
                match attempt(out, commands::offers::add_offer(state, &text.join(" ")))? {
                    Some(Some(_)) => render_offers(out, state)?,
                    Some(None) => render_notice(out, &Notice::info("Nothing to add"))?,
                    None => {}
                }
            }
            ConsoleCommand::SelectOffer { target } => {
                let joined = target.join(" ");
                let selected = match joined.parse::<usize>() {
                    Ok(0) => Err(CommandError::Validation("Rows are numbered from 1".into())),
                    Ok(row) => commands::offers::select_offer(state, row - 1),
                    Err(_) => commands::offers::select_offer_text(state, &joined),
                };
                if attempt(out, selected)?.is_some() {
                    render_offers(out, state)?;
                }
            }
            ConsoleCommand::EditOffer { text } => {
                if attempt(out, commands::offers::edit_offer(state, &text.join(" ")))?.is_some() {
                    render_offers(out, state)?;
                }
            }
            ConsoleCommand::RemoveOffer => {
                if let Some(offer) = attempt(out, commands::offers::remove_offer(state))? {
                    render_notice(out, &Notice::info(format!("Removed '{}'", offer.description)))?;
                    render_offers(out, state)?;
                }
            }
            ConsoleCommand::Purchase { name, quantity } => {
                let purchased = state
                    .main_view_mut()
                    .map(|view| {
                        view.purchase.item_name = name;
                        view.purchase.quantity = quantity;
                    })
                    .and_then(|()| commands::purchases::purchase_item(state));
                if attempt(out, purchased)?.is_some() {
                    if let Some(message) = state.main_view().and_then(|v| v.purchase.message.as_deref()) {
                        render_notice(out, &Notice::info(message))?;
                    }
                }
            }
            ConsoleCommand::Help => {
                write!(out, "{}", ConsoleLine::command().render_help())?;
            }
            ConsoleCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn delete<W: Write>(&mut self, state: &mut AppState, confirmed: bool, out: &mut W) -> io::Result<()> {
        match attempt(out, commands::items::delete_item(state, |_| confirmed))? {
            Some(true) => {
                render_notice(out, &Notice::info("Item deleted"))?;
                render_catalog(out, state)
            }
            Some(false) => render_notice(out, &Notice::info("Delete cancelled")),
            None => Ok(()),
        }
    }
}

/// Run the console until `quit` or end of input.
pub async fn run_console(mut state: AppState, mut ui_rx: UiReceiver) -> anyhow::Result<()> {
    let mut console = Console::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut out = io::stdout();

    console.greet(&state, &mut out)?;
    console.prompt(&mut out)?;

    loop {
        tokio::select! {
            Some(event) = ui_rx.recv() => {
                console.handle_event(&mut state, event, &mut out)?;
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if console.handle_line(&mut state, &line, &mut out)? == Flow::Quit {
                    break;
                }
            }
        }
        console.prompt(&mut out)?;
    }

    info!("Console closed");
    Ok(())
}

/// Split a line into words; single or double quotes opening a word group
/// spaces, e.g. `add --price "Ksh 50"`.
pub fn tokenize(line: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if !in_token && (c == '"' || c == '\'') => {
                quote = Some(c);
                in_token = true;
            }
            None if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quote.is_some() {
        return Err("Unterminated quote".into());
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Print a command failure and turn it into `None`.
fn attempt<T, W: Write>(out: &mut W, result: Result<T, CommandError>) -> io::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            render_notice(out, &e.to_notice())?;
            Ok(None)
        }
    }
}

fn fill_form(state: &mut AppState, args: ItemArgs) -> Result<(), CommandError> {
    let form = &mut state.main_view_mut()?.catalog.form;
    if let Some(name) = args.name {
        form.name = name;
    }
    if let Some(price) = args.price {
        form.price = price;
    }
    if let Some(category) = args.category {
        form.category = category;
    }
    if let Some(stock) = args.stock {
        form.stock = stock;
    }
    Ok(())
}

fn render_notice<W: Write>(out: &mut W, notice: &Notice) -> io::Result<()> {
    let tag = match notice.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    };
    writeln!(out, "[{tag}] {}", notice.text)
}

fn render_login<W: Write>(out: &mut W, state: &AppState) -> io::Result<()> {
    if let Screen::Login { message: Some(message) } = &state.screen {
        writeln!(out, "{message}")?;
    }
    writeln!(out, "Log in with: login <username> <password>")
}

fn render_catalog<W: Write>(out: &mut W, state: &AppState) -> io::Result<()> {
    let Some(view) = state.main_view() else {
        return Ok(());
    };
    writeln!(out, "Items:")?;
    let rows = view.catalog.rows();
    if rows.is_empty() {
        writeln!(out, "  (no items)")?;
    }
    for (i, row) in rows.iter().enumerate() {
        let marker = if view.catalog.selected == Some(i) { '*' } else { ' ' };
        writeln!(out, " {marker}{:>3}. {row}", i + 1)?;
    }
    Ok(())
}

fn render_offers<W: Write>(out: &mut W, state: &AppState) -> io::Result<()> {
    let Some(view) = state.main_view() else {
        return Ok(());
    };
    writeln!(out, "Offers:")?;
    let lines = view.offers.lines();
    if lines.is_empty() {
        writeln!(out, "  (no offers)")?;
    }
    for (i, line) in lines.iter().enumerate() {
        let marker = if view.offers.selected == Some(i) { '*' } else { ' ' };
        writeln!(out, " {marker}{:>3}. {line}", i + 1)?;
    }
    Ok(())
}

fn render_form<W: Write>(out: &mut W, state: &AppState) -> io::Result<()> {
    let Some(MainView { catalog, .. }) = state.main_view() else {
        return Ok(());
    };
    let form = &catalog.form;
    writeln!(out, "Item form:")?;
    writeln!(out, "  name:     {}", form.name)?;
    writeln!(out, "  price:    {}", form.price)?;
    writeln!(out, "  category: {}", form.category)?;
    writeln!(out, "  stock:    {}", form.stock)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::test_state;

    fn feed(console: &mut Console, state: &mut AppState, lines: &[&str]) -> String {
        let mut out = Vec::new();
        for line in lines {
            console.handle_line(state, line, &mut out).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn tokenize_honours_quotes() {
        assert_eq!(
            tokenize(r#"add --name Samosa --price "Ksh 50" --category 'Hot snacks'"#).unwrap(),
            ["add", "--name", "Samosa", "--price", "Ksh 50", "--category", "Hot snacks"]
        );
        assert_eq!(tokenize("add-offer don't miss").unwrap(), ["add-offer", "don't", "miss"]);
        assert_eq!(tokenize(r#"set stock """#).unwrap(), ["set", "stock", ""]);
        assert!(tokenize(r#"purchase "Samosa 3"#).is_err());
    }

    #[test]
    fn bad_login_stays_on_login_screen() {
        let (_dir, mut state, _rx) = test_state();
        let mut console = Console::default();

        let output = feed(&mut console, &mut state, &["login Admin nope", "items"]);
        assert!(output.contains("Invalid credentials. Please try again."));
        assert!(output.contains("[warning] Please log in first"));
    }

    #[tokio::test]
    async fn samosa_scenario() {
        let (_dir, mut state, _rx) = test_state();
        let mut console = Console::default();

        let output = feed(
            &mut console,
            &mut state,
            &[
                "login Admin 1234",
                r#"add --name Samosa --price "Ksh 50" --category Snacks"#,
                "purchase Samosa 3",
                "purchase Pizza 1",
            ],
        );

        assert!(output.contains("Welcome, Admin."));
        assert!(output.contains("1. Samosa - Ksh 50"));
        assert!(output.contains("[info] Purchase successful! Total price: Ksh 150"));
        assert!(output.contains("[info] Item not found."));
        assert_eq!(state.database.lock().unwrap().list_purchases().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_asks_for_confirmation() {
        let (_dir, mut state, _rx) = test_state();
        let mut console = Console::default();

        let output = feed(
            &mut console,
            &mut state,
            &[
                "login Admin 1234",
                r#"add --name Soda --price "Ksh 60" --category Drinks"#,
                "select 1",
                "delete",
                "n",
            ],
        );
        assert!(output.contains("Delete 'Soda - Ksh 60'?"));
        assert!(output.contains("[info] Delete cancelled"));
        assert_eq!(state.database.lock().unwrap().list_items().unwrap().len(), 1);

        let output = feed(&mut console, &mut state, &["select 1", "delete", "yes"]);
        assert!(output.contains("[info] Item deleted"));
        assert!(output.contains("(no items)"));
        assert!(state.database.lock().unwrap().list_items().unwrap().is_empty());
    }

    #[tokio::test]
    async fn remove_offer_needs_selection() {
        let (_dir, mut state, _rx) = test_state();
        let mut console = Console::default();

        let output = feed(
            &mut console,
            &mut state,
            &["login Admin 1234", "add-offer Free tea with any snack", "remove-offer"],
        );
        assert!(output.contains("• Free tea with any snack"));
        assert!(output.contains("[warning] No offer selected"));
        assert_eq!(state.database.lock().unwrap().list_offers().unwrap().len(), 1);

        let output = feed(
            &mut console,
            &mut state,
            &["select-offer • Free tea with any snack", "remove-offer"],
        );
        assert!(output.contains("[info] Removed 'Free tea with any snack'"));
        assert!(output.contains("(no offers)"));
    }

    #[tokio::test]
    async fn select_offer_by_typed_text() {
        let (_dir, mut state, _rx) = test_state();
        let mut console = Console::default();

        feed(
            &mut console,
            &mut state,
            &[
                "login Admin 1234",
                r#"add-offer "Buy 2  get 1 free""#,
                "add-offer -20% on soda",
            ],
        );

        let output = feed(
            &mut console,
            &mut state,
            &["select-offer • Buy 2  get 1 free", "remove-offer"],
        );
        assert!(output.contains("[info] Removed 'Buy 2  get 1 free'"));

        let output = feed(
            &mut console,
            &mut state,
            &["select-offer -20% on soda", "remove-offer"],
        );
        assert!(output.contains("[info] Removed '-20% on soda'"));
        assert!(state.database.lock().unwrap().list_offers().unwrap().is_empty());
    }

    #[test]
    fn unknown_command_prints_usage_error() {
        let (_dir, mut state, _rx) = test_state();
        let mut console = Console::default();

        let output = feed(&mut console, &mut state, &["frobnicate"]);
        assert!(output.contains("frobnicate"));
        assert_eq!(
            console.handle_line(&mut state, "quit", &mut Vec::new()).unwrap(),
            Flow::Quit
        );
    }
}
