use crate::events::EventHandler;
use crate::ui;

use color_eyre::Result;
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;
use tracing::debug;

use roster_service::{
    validate, validate_field, Field, FieldErrors, GatewayResult, Mutation, MutationOutcome, NewUser,
    UserGateway, UserRecord, UserSession,
};

// =============================================================================
// Application States
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// Waiting for the initial user list
    Loading,
    /// Browse the current page of users
    UserList,
    /// Typing into the search line
    Search,
    /// Add or edit form
    UserForm,
    /// Yes/no prompt before a delete is sent
    ConfirmDelete,
}

// =============================================================================
// Form State
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit(u64),
}

#[derive(Debug, Clone)]
pub struct FormState {
    pub mode: FormMode,
    pub draft: NewUser,
    pub focus: Field,
    pub errors: FieldErrors,
}

impl FormState {
    pub fn add() -> Self {
        Self {
            mode: FormMode::Add,
            draft: NewUser::default(),
            focus: Field::Name,
            errors: FieldErrors::new(),
        }
    }

    pub fn edit(user: &UserRecord) -> Self {
        Self {
            mode: FormMode::Edit(user.id),
            draft: user.to_new_user(),
            focus: Field::Name,
            errors: FieldErrors::new(),
        }
    }

    pub fn title(&self) -> String {
        match self.mode {
            FormMode::Add => "Add New User".to_string(),
            FormMode::Edit(id) => format!("Edit User {}", id),
        }
    }

    /// Typing into a field that shows an error re-checks just that field
    fn refresh_focused_error(&mut self) {
        if self.errors.contains(self.focus) {
            let message = validate_field(self.focus, self.draft.get(self.focus));
            self.errors.set(self.focus, message);
        }
    }
}

/// Result of a request that ran on a background task
#[derive(Debug)]
pub enum RequestOutcome {
    Loaded(GatewayResult<Vec<UserRecord>>),
    Mutation(MutationOutcome),
}

// =============================================================================
// Application
// =============================================================================

pub struct App {
    pub state: AppState,
    pub previous_states: Vec<AppState>,
    pub should_quit: bool,
    pub session: UserSession,

    // Row cursor within the current page
    pub selected_index: usize,

    // Form state
    pub form: Option<FormState>,
    pending_load: bool,

    // Gateway outcomes from spawned requests
    outcome_sender: mpsc::UnboundedSender<RequestOutcome>,
    outcome_receiver: mpsc::UnboundedReceiver<RequestOutcome>,
}

impl App {
    pub fn new(session: UserSession) -> Self {
        let (outcome_sender, outcome_receiver) = mpsc::unbounded_channel();
        Self {
            state: AppState::Loading,
            previous_states: Vec::new(),
            should_quit: false,
            session,
            selected_index: 0,
            form: None,
            pending_load: true,
            outcome_sender,
            outcome_receiver,
        }
    }

    pub async fn run(&mut self, mut terminal: DefaultTerminal) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| ui::render(self, frame))?;

            if self.pending_load {
                self.start_load();
            }

            self.handle_events()?;
            self.process_outcomes();
        }
        Ok(())
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Fetch the user list on a background task; keys stay live meanwhile
    pub fn start_load(&mut self) {
        self.pending_load = false;
        let gateway = self.session.gateway();
        let sender = self.outcome_sender.clone();
        tokio::spawn(async move {
            let result = gateway.list().await;
            let _ = sender.send(RequestOutcome::Loaded(result));
        });
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn move_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn move_down(&mut self) {
        let rows = self.session.state().view().users.len();
        if self.selected_index < rows.saturating_sub(1) {
            self.selected_index += 1;
        }
    }

    pub fn next_page(&mut self) {
        self.session.state_mut().next_page();
        self.selected_index = 0;
    }

    pub fn previous_page(&mut self) {
        self.session.state_mut().previous_page();
        self.selected_index = 0;
    }

    pub fn push_state(&mut self, new_state: AppState) {
        let old = self.state.clone();
        self.previous_states.push(old);
        self.state = new_state;
    }

    pub fn go_back(&mut self) {
        if let Some(prev) = self.previous_states.pop() {
            self.state = prev;
        } else {
            self.should_quit = true;
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn dismiss_banners(&mut self) {
        let state = self.session.state_mut();
        state.dismiss_error();
        state.dismiss_notice();
    }

    fn clamp_selection(&mut self) {
        let rows = self.session.state().view().users.len();
        self.selected_index = self.selected_index.min(rows.saturating_sub(1));
    }

    // =========================================================================
    // Search
    // =========================================================================

    pub fn start_search(&mut self) {
        if self.state == AppState::UserList {
            self.push_state(AppState::Search);
        }
    }

    pub fn search_push_char(&mut self, c: char) {
        let mut query = self.session.state().query().to_string();
        query.push(c);
        self.set_query(query);
    }

    pub fn search_pop_char(&mut self) {
        let mut query = self.session.state().query().to_string();
        if query.pop().is_some() {
            self.set_query(query);
        }
    }

    pub fn finish_search(&mut self) {
        if self.state == AppState::Search {
            self.go_back();
        }
    }

    fn set_query(&mut self, query: String) {
        self.session.state_mut().set_query(query);
        self.selected_index = 0;
    }

    // =========================================================================
    // Form
    // =========================================================================

    pub fn open_add_form(&mut self) {
        if self.session.state().is_busy() {
            return;
        }
        self.form = Some(FormState::add());
        self.push_state(AppState::UserForm);
    }

    pub fn open_edit_form(&mut self) {
        if self.session.state().is_busy() {
            return;
        }
        if let Some(form) = self.selected_user().map(FormState::edit) {
            self.form = Some(form);
            self.push_state(AppState::UserForm);
        }
    }

    pub fn form_next_field(&mut self) {
        if let Some(form) = &mut self.form {
            form.focus = form.focus.next();
        }
    }

    pub fn form_previous_field(&mut self) {
        if let Some(form) = &mut self.form {
            form.focus = form.focus.previous();
        }
    }

    pub fn form_push_char(&mut self, c: char) {
        if let Some(form) = &mut self.form {
            form.draft.get_mut(form.focus).push(c);
            form.refresh_focused_error();
        }
    }

    pub fn form_pop_char(&mut self) {
        if let Some(form) = &mut self.form {
            form.draft.get_mut(form.focus).pop();
            form.refresh_focused_error();
        }
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
        self.go_back();
    }

    /// Validate and send. Invalid input keeps the form open with inline errors.
    pub fn submit_form(&mut self) {
        let Some(form) = &mut self.form else {
            return;
        };

        form.errors = validate(&form.draft);
        if !form.errors.is_empty() {
            return;
        }

        let mutation = match form.mode {
            FormMode::Add => Mutation::Create(form.draft.clone()),
            FormMode::Edit(id) => Mutation::Update(form.draft.clone().with_id(id)),
        };

        if self.dispatch(mutation) {
            self.form = None;
            self.go_back();
        }
    }

    // =========================================================================
    // Delete
    // =========================================================================

    pub fn request_delete(&mut self) {
        let Some(id) = self.selected_user().map(|user| user.id) else {
            return;
        };
        if self.session.state_mut().request_delete(id).is_ok() {
            self.push_state(AppState::ConfirmDelete);
        }
    }

    pub fn resolve_delete(&mut self, confirmed: bool) {
        if let Ok(Some(mutation)) = self.session.state_mut().resolve_delete(confirmed) {
            self.dispatch(mutation);
        }
        if self.state == AppState::ConfirmDelete {
            self.go_back();
        }
    }

    // =========================================================================
    // Requests
    // =========================================================================

    /// Start a mutation on a background task. Returns false if the session refused it.
    fn dispatch(&mut self, mutation: Mutation) -> bool {
        if let Err(e) = self.session.state_mut().begin(&mutation) {
            debug!(error = %e, "mutation not started");
            return false;
        }

        let gateway = self.session.gateway();
        let sender = self.outcome_sender.clone();
        tokio::spawn(async move {
            let outcome = mutation.execute(gateway.as_ref()).await;
            // The receiver lives as long as the app
            let _ = sender.send(RequestOutcome::Mutation(outcome));
        });
        true
    }

    /// Apply any outcomes that arrived since the last tick
    pub fn process_outcomes(&mut self) {
        while let Ok(outcome) = self.outcome_receiver.try_recv() {
            self.apply_outcome(outcome);
        }
    }

    fn apply_outcome(&mut self, outcome: RequestOutcome) {
        // Failures are shown through the session banner
        match outcome {
            RequestOutcome::Loaded(result) => {
                let _ = self.session.state_mut().apply_load(result);
                if self.state == AppState::Loading {
                    self.state = AppState::UserList;
                }
            }
            RequestOutcome::Mutation(outcome) => {
                let _ = self.session.state_mut().complete(outcome);
            }
        }
        self.clamp_selection();
    }

    /// Wait for the next background result and apply it
    #[cfg(test)]
    pub(crate) async fn settle(&mut self) {
        if let Some(outcome) = self.outcome_receiver.recv().await {
            self.apply_outcome(outcome);
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// The user under the row cursor, if any
    pub fn selected_user(&self) -> Option<&UserRecord> {
        self.session
            .state()
            .view()
            .users
            .get(self.selected_index)
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use roster_service::{GatewayOperation, InMemoryGateway};
    use std::num::NonZeroUsize;
    use std::sync::Arc;

    fn user(id: u64, name: &str) -> UserRecord {
        UserRecord::new(id, name, format!("{}@example.com", name.to_lowercase()), "555")
    }

    async fn app_with(gateway: InMemoryGateway, page_size: usize) -> (App, Arc<InMemoryGateway>) {
        let gateway = Arc::new(gateway);
        let session = UserSession::new(gateway.clone(), NonZeroUsize::new(page_size).unwrap());
        let mut app = App::new(session);
        app.start_load();
        app.settle().await;
        (app, gateway)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap();
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    async fn settle(app: &mut App) {
        app.settle().await;
    }

    #[tokio::test]
    async fn test_quit_while_list_is_loading() {
        let gateway = Arc::new(InMemoryGateway::new(vec![user(1, "Alice")]));
        let mut app = App::new(UserSession::new(gateway, NonZeroUsize::new(5).unwrap()));

        app.start_load();
        assert_eq!(app.state, AppState::Loading);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_load_failure_still_opens_list() {
        let gateway = InMemoryGateway::new(vec![user(1, "Alice")]).failing(GatewayOperation::List);
        let (app, _) = app_with(gateway, 5).await;
        assert_eq!(app.state, AppState::UserList);
        assert!(app.session.state().error().is_some());
    }

    #[tokio::test]
    async fn test_load_moves_to_list() {
        let (app, _) = app_with(InMemoryGateway::new(vec![user(1, "Alice")]), 5).await;
        assert_eq!(app.state, AppState::UserList);
        assert_eq!(app.session.state().users().len(), 1);
    }

    #[tokio::test]
    async fn test_search_filters_and_resets_selection() {
        let users = vec![user(1, "Alice"), user(2, "Bob"), user(3, "Alina")];
        let (mut app, _) = app_with(InMemoryGateway::new(users), 5).await;

        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selected_index, 1);

        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.state, AppState::Search);
        type_text(&mut app, "ALI");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.state, AppState::UserList);
        assert_eq!(app.selected_index, 0);
        let view = app.session.state().view();
        assert_eq!(view.query, "ALI");
        assert_eq!(view.filtered_count, 2);
    }

    #[tokio::test]
    async fn test_paging_keys() {
        let users = (1..=7).map(|i| user(i, "User")).collect();
        let (mut app, _) = app_with(InMemoryGateway::new(users), 5).await;

        press(&mut app, KeyCode::Right);
        assert_eq!(app.session.state().current_page(), 2);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.session.state().current_page(), 2);
        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.session.state().current_page(), 1);
    }

    #[tokio::test]
    async fn test_invalid_form_stays_open() {
        let (mut app, gateway) = app_with(InMemoryGateway::new(Vec::new()), 5).await;

        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Ann");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.state, AppState::UserForm);
        let form = app.form.as_ref().unwrap();
        assert_eq!(form.errors.get(Field::Email), Some("Email is required"));
        assert_eq!(form.errors.get(Field::Phone), Some("Phone is required"));
        assert_eq!(gateway.calls().await, vec![GatewayOperation::List]);

        // Fixing a field clears its message as you type
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "ann@example.com");
        assert!(app.form.as_ref().unwrap().errors.get(Field::Email).is_none());
    }

    #[tokio::test]
    async fn test_add_user_through_form() {
        let gateway = InMemoryGateway::new(vec![user(1, "Alice")]).with_echo_id(Some(1));
        let (mut app, _) = app_with(gateway, 5).await;

        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Dan");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "dan@example.com");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "555-0101");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.state, AppState::UserList);
        assert!(app.session.state().is_busy());
        settle(&mut app).await;

        let state = app.session.state();
        assert_eq!(state.users().len(), 2);
        assert_eq!(state.users().all()[0], user(2, "Dan").with_phone("555-0101"));
        assert_eq!(state.notice(), Some("User added successfully."));
    }

    #[tokio::test]
    async fn test_edit_selected_user() {
        let (mut app, _) = app_with(InMemoryGateway::new(vec![user(1, "Alice")]), 5).await;

        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.form.as_ref().unwrap().mode, FormMode::Edit(1));
        type_text(&mut app, "ia");
        press(&mut app, KeyCode::Enter);
        settle(&mut app).await;

        assert_eq!(app.session.state().users().get(1).unwrap().name, "Aliceia");
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let (mut app, gateway) =
            app_with(InMemoryGateway::new(vec![user(1, "Alice"), user(2, "Bob")]), 5).await;

        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.state, AppState::ConfirmDelete);
        press(&mut app, KeyCode::Char('n'));

        assert_eq!(app.state, AppState::UserList);
        assert_eq!(app.session.state().users().len(), 2);
        assert_eq!(gateway.calls().await, vec![GatewayOperation::List]);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        settle(&mut app).await;

        assert!(!app.session.state().users().contains(2));
        assert_eq!(app.selected_index, 0);
    }

    #[tokio::test]
    async fn test_failed_delete_shows_banner_and_dismisses() {
        let gateway =
            InMemoryGateway::new(vec![user(1, "Alice")]).failing(GatewayOperation::Delete);
        let (mut app, _) = app_with(gateway, 5).await;

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        settle(&mut app).await;

        assert_eq!(
            app.session.state().error(),
            Some("Could not delete the user. Please try again.")
        );
        assert_eq!(app.session.state().users().len(), 1);

        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.session.state().error(), None);
    }

    #[tokio::test]
    async fn test_second_submit_while_busy_is_ignored() {
        let (mut app, _) = app_with(InMemoryGateway::new(vec![user(1, "Alice")]), 5).await;

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.session.state().is_busy());

        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.state, AppState::UserList);
        assert!(app.form.is_none());
        settle(&mut app).await;
    }

    trait WithPhone {
        fn with_phone(self, phone: &str) -> Self;
    }

    impl WithPhone for UserRecord {
        fn with_phone(mut self, phone: &str) -> Self {
            self.phone = phone.to_string();
            self
        }
    }
}
