//! Application state and the handlers behind every key press.

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{error, info};
use tui::widgets::{ListState, TableState};

use crate::db::Storage;
use crate::error::ValidationError;
use crate::history::HistoryStore;
use crate::models::{Invoice, LineItemField};
use crate::pricing::summarize;
use crate::ui::components::text_input::{InputKind, TextInput};
use crate::view::{self, InvoiceDetailView};
use crate::workspace::Workspace;

pub const SAVED_MESSAGE: &str = "Invoice saved to history!";

/// Panel that receives keys while no overlay is open.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Focus {
    Form,
    Items,
    History,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Form => Focus::Items,
            Focus::Items => Focus::History,
            Focus::History => Focus::Form,
        }
    }

    fn previous(self) -> Self {
        match self {
            Focus::Form => Focus::History,
            Focus::Items => Focus::Form,
            Focus::History => Focus::Items,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum FormField {
    Name,
    Price,
    Quantity,
}

/// The add-product form.
pub struct AddForm {
    pub name: TextInput,
    pub price: TextInput,
    pub quantity: TextInput,
    pub current_field: FormField,
}

impl AddForm {
    fn new() -> Self {
        Self {
            name: TextInput::new(InputKind::Text),
            price: TextInput::new(InputKind::Decimal),
            quantity: TextInput::new(InputKind::Integer),
            current_field: FormField::Name,
        }
    }

    fn current_input(&mut self) -> &mut TextInput {
        match self.current_field {
            FormField::Name => &mut self.name,
            FormField::Price => &mut self.price,
            FormField::Quantity => &mut self.quantity,
        }
    }

    fn next_field(&mut self) {
        self.current_field = match self.current_field {
            FormField::Name => FormField::Price,
            FormField::Price => FormField::Quantity,
            FormField::Quantity => FormField::Name,
        };
    }

    fn previous_field(&mut self) {
        self.current_field = match self.current_field {
            FormField::Name => FormField::Quantity,
            FormField::Price => FormField::Name,
            FormField::Quantity => FormField::Price,
        };
    }

    fn reset(&mut self) {
        self.name.clear();
        self.price.clear();
        self.quantity.clear();
        self.current_field = FormField::Name;
    }
}

/// An in-progress edit of one table cell.
pub struct CellEdit {
    pub item_id: u32,
    pub field: LineItemField,
    pub input: TextInput,
}

/// Something drawn over the workspace that takes the next key press.
pub enum Overlay {
    Message(String),
    Detail(InvoiceDetailView),
}

pub struct App<S> {
    workspace: Workspace,
    history: HistoryStore<S>,
    pub focus: Focus,
    pub form: AddForm,
    pub table_state: TableState,
    pub selected_column: LineItemField,
    pub history_state: ListState,
    pub editing: Option<CellEdit>,
    pub overlay: Option<Overlay>,
}

impl<S: Storage> App<S> {
    pub fn new(history: HistoryStore<S>) -> Self {
        let mut app = Self {
            workspace: Workspace::new(),
            history,
            focus: Focus::Form,
            form: AddForm::new(),
            table_state: TableState::default(),
            selected_column: LineItemField::Name,
            history_state: ListState::default(),
            editing: None,
            overlay: None,
        };
        app.sync_selection();
        app
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }

    /// Id of the line item under the table cursor.
    pub fn selected_item_id(&self) -> Option<u32> {
        self.table_state
            .selected()
            .and_then(|i| self.workspace.items().get(i))
            .map(|item| item.id)
    }

    /// Id of the invoice under the history cursor.
    pub fn selected_invoice_id(&self) -> Option<i64> {
        self.history_state
            .selected()
            .and_then(|i| self.history.recent_first().nth(i))
            .map(|invoice| invoice.id)
    }

    fn show_message(&mut self, message: impl Into<String>) {
        self.overlay = Some(Overlay::Message(message.into()));
    }

    /// Keeps both cursors inside their lists.
    fn sync_selection(&mut self) {
        clamp_selection(&mut self.table_state, self.workspace.len());
        clamp_selection(&mut self.history_state, self.history.len());
    }

    /// Validates the form and appends a line item.
    pub fn submit_add_form(&mut self) {
        let result = self.workspace.add_raw(
            &self.form.name.value,
            &self.form.price.value,
            &self.form.quantity.value,
        );

        match result {
            Ok(_) => {
                self.form.reset();
                self.focus = Focus::Form;
                self.sync_selection();
            }
            Err(err) => self.show_message(err.to_string()),
        }
    }

    pub fn delete_item(&mut self, id: u32) {
        self.workspace.remove(id);
        self.sync_selection();
    }

    /// Starts editing the selected cell with its current value.
    pub fn begin_cell_edit(&mut self) {
        let field = self.selected_column;
        let Some(item) = self
            .selected_item_id()
            .and_then(|id| self.workspace.get(id))
        else {
            return;
        };

        self.editing = Some(CellEdit {
            item_id: item.id,
            field,
            input: TextInput::with_value(InputKind::Text, field.raw_value(item)),
        });
    }

    /// Writes the edited text back; the cell leaving edit mode is the
    /// moment the value is validated.
    pub fn commit_cell_edit(&mut self) {
        let Some(edit) = self.editing.take() else {
            return;
        };

        if let Err(err) = self
            .workspace
            .update(edit.item_id, edit.field, &edit.input.value)
        {
            self.show_message(err.to_string());
        }
    }

    pub fn cancel_cell_edit(&mut self) {
        self.editing = None;
    }

    /// Moves the open invoice into the history.
    pub async fn save_invoice(&mut self) {
        if self.workspace.is_empty() {
            self.show_message(ValidationError::EmptyInvoice.to_string());
            return;
        }

        let items = self.workspace.snapshot();
        let summary = summarize(&items);
        if !summary.is_finite() {
            self.show_message(ValidationError::AmountTooLarge.to_string());
            return;
        }
        let now = Utc::now();
        let invoice = Invoice::new(self.history.next_invoice_id(now), now, items, summary);

        match self.history.append(invoice).await {
            Ok(()) => {
                self.workspace.clear();
                self.editing = None;
                self.history_state.select(None);
                self.sync_selection();
                self.show_message(SAVED_MESSAGE);
            }
            Err(err) => {
                error!(error = %err, "failed to persist invoice history");
                self.show_message(format!("Could not save the invoice: {}", err));
            }
        }
    }

    /// Shows a saved invoice in the detail modal. Unknown ids are ignored.
    pub fn open_history_entry(&mut self, id: i64) {
        if let Some(invoice) = self.history.find_by_id(id) {
            info!(id, "opening saved invoice");
            self.overlay = Some(Overlay::Detail(view::invoice_detail(invoice)));
        }
    }

    pub fn close_modal(&mut self) {
        self.overlay = None;
    }

    /// Dispatches one key press. Returns true when the app should exit.
    pub async fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        // Messages and the detail modal both close on any key.
        if self.overlay.is_some() {
            self.close_modal();
            return false;
        }

        if self.editing.is_some() {
            self.handle_editing_key(key.code);
            return false;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            self.save_invoice().await;
            return false;
        }

        match key.code {
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return false;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.previous();
                return false;
            }
            _ => {}
        }

        match self.focus {
            Focus::Form => {
                self.handle_form_key(key.code);
                false
            }
            Focus::Items => self.handle_items_key(key.code).await,
            Focus::History => self.handle_history_key(key.code).await,
        }
    }

    fn handle_editing_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Tab => self.commit_cell_edit(),
            KeyCode::Esc => self.cancel_cell_edit(),
            other => {
                if let Some(edit) = &mut self.editing {
                    edit.input.handle_input(other);
                }
            }
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter => self.submit_add_form(),
            KeyCode::Down => self.form.next_field(),
            KeyCode::Up => self.form.previous_field(),
            other => {
                self.form.current_input().handle_input(other);
            }
        }
    }

    async fn handle_items_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('s') => self.save_invoice().await,
            KeyCode::Down => step_selection(&mut self.table_state, self.workspace.len(), true),
            KeyCode::Up => step_selection(&mut self.table_state, self.workspace.len(), false),
            KeyCode::Right => self.selected_column = self.selected_column.next(),
            KeyCode::Left => self.selected_column = self.selected_column.previous(),
            KeyCode::Enter | KeyCode::Char('e') => self.begin_cell_edit(),
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_item_id() {
                    self.delete_item(id);
                }
            }
            _ => {}
        }
        false
    }

    async fn handle_history_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('s') => self.save_invoice().await,
            KeyCode::Down => step_selection(&mut self.history_state, self.history.len(), true),
            KeyCode::Up => step_selection(&mut self.history_state, self.history.len(), false),
            KeyCode::Enter => {
                if let Some(id) = self.selected_invoice_id() {
                    self.open_history_entry(id);
                }
            }
            _ => {}
        }
        false
    }
}

/// Cursor state shared by the item table and the history list.
trait Selection {
    fn selected(&self) -> Option<usize>;
    fn select(&mut self, index: Option<usize>);
}

impl Selection for TableState {
    fn selected(&self) -> Option<usize> {
        TableState::selected(self)
    }

    fn select(&mut self, index: Option<usize>) {
        TableState::select(self, index)
    }
}

impl Selection for ListState {
    fn selected(&self) -> Option<usize> {
        ListState::selected(self)
    }

    fn select(&mut self, index: Option<usize>) {
        ListState::select(self, index)
    }
}

fn clamp_selection(state: &mut impl Selection, len: usize) {
    match state.selected() {
        _ if len == 0 => state.select(None),
        Some(i) if i >= len => state.select(Some(len - 1)),
        None => state.select(Some(0)),
        Some(_) => {}
    }
}

/// Moves the cursor one row, wrapping at both ends.
fn step_selection(state: &mut impl Selection, len: usize, forward: bool) {
    if len == 0 {
        return;
    }

    let i = match state.selected() {
        Some(i) if forward => {
            if i >= len - 1 {
                0
            } else {
                i + 1
            }
        }
        Some(i) => {
            if i == 0 {
                len - 1
            } else {
                i - 1
            }
        }
        None => 0,
    };
    state.select(Some(i));
}
