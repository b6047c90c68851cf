// Session orchestration
// Sequences gateway calls with collection updates, keeps query and page
// position consistent, and surfaces errors as banners.

use crate::gateway::{GatewayError, GatewayResult, UserGateway};
use crate::models::{EchoedUser, NewUser, UserRecord};
use crate::store::{StoreError, UserCollection};
use crate::view;

use std::num::NonZeroUsize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

pub type SessionResult<T> = Result<T, SessionError>;

const LOAD_FAILED: &str = "Could not load the user list. Please try again later.";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Another change is still in progress")]
    Busy,

    #[error("The user list has not finished loading")]
    NotReady,

    #[error("No delete is awaiting confirmation")]
    NothingToConfirm,

    #[error(transparent)]
    Network(#[from] GatewayError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Overall session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Loading,
    Ready,
    /// Ready, with an error banner showing
    ErrorDisplayed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl MutationKind {
    fn failure_message(&self) -> &'static str {
        match self {
            MutationKind::Create => "Could not add the user. Please try again.",
            MutationKind::Update => "Could not update the user. Please try again.",
            MutationKind::Delete => "Could not delete the user. Please try again.",
        }
    }

    fn success_message(&self) -> &'static str {
        match self {
            MutationKind::Create => "User added successfully.",
            MutationKind::Update => "User updated successfully.",
            MutationKind::Delete => "User deleted successfully.",
        }
    }
}

/// A change request bound for the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Create(NewUser),
    Update(UserRecord),
    Delete(u64),
}

impl Mutation {
    pub fn kind(&self) -> MutationKind {
        match self {
            Mutation::Create(_) => MutationKind::Create,
            Mutation::Update(_) => MutationKind::Update,
            Mutation::Delete(_) => MutationKind::Delete,
        }
    }

    /// Run the gateway call for this mutation. Never touches session state.
    pub async fn execute(self, gateway: &dyn UserGateway) -> MutationOutcome {
        match self {
            Mutation::Create(user) => {
                let result = gateway.create(&user).await;
                MutationOutcome::Created { user, result }
            }
            Mutation::Update(record) => {
                let result = gateway.update(record.id, &record).await;
                MutationOutcome::Updated { record, result }
            }
            Mutation::Delete(id) => {
                let result = gateway.delete(id).await;
                MutationOutcome::Deleted { id, result }
            }
        }
    }
}

/// What the gateway answered for a mutation
#[derive(Debug)]
pub enum MutationOutcome {
    Created {
        user: NewUser,
        result: GatewayResult<EchoedUser>,
    },
    Updated {
        record: UserRecord,
        result: GatewayResult<()>,
    },
    Deleted {
        id: u64,
        result: GatewayResult<()>,
    },
}

impl MutationOutcome {
    pub fn kind(&self) -> MutationKind {
        match self {
            MutationOutcome::Created { .. } => MutationKind::Create,
            MutationOutcome::Updated { .. } => MutationKind::Update,
            MutationOutcome::Deleted { .. } => MutationKind::Delete,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PageState {
    page_size: NonZeroUsize,
    current_page: usize,
}

/// Everything the presentation layer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView<'a> {
    pub users: Vec<&'a UserRecord>,
    pub filtered_count: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub query: &'a str,
    pub error: Option<&'a str>,
    pub notice: Option<&'a str>,
    pub loading: bool,
    pub busy: bool,
}

impl SessionView<'_> {
    pub fn page_window(&self) -> view::PageWindow {
        view::PageWindow::new(self.current_page, self.total_pages)
    }
}

/// The session's state machine. Synchronous; the gateway call happens between
/// `begin` and `complete`.
#[derive(Debug, Clone)]
pub struct SessionState {
    users: UserCollection,
    query: String,
    page: PageState,
    loading: bool,
    error: Option<String>,
    notice: Option<String>,
    in_flight: Option<MutationKind>,
    pending_delete: Option<u64>,
}

impl SessionState {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            users: UserCollection::new(),
            query: String::new(),
            page: PageState {
                page_size,
                current_page: 1,
            },
            loading: true,
            error: None,
            notice: None,
            in_flight: None,
            pending_delete: None,
        }
    }

    // =========================================================================
    // Initial load
    // =========================================================================

    /// Apply the startup listing. A failure leaves the collection empty and
    /// shows the load banner; there is no retry.
    pub fn apply_load(&mut self, result: GatewayResult<Vec<UserRecord>>) -> SessionResult<()> {
        self.loading = false;
        self.error = None;
        match result {
            Ok(records) => {
                self.users = UserCollection::from_records(records);
                info!(count = self.users.len(), "user list loaded");
                self.reclamp();
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "initial user list failed");
                self.users = UserCollection::new();
                self.error = Some(LOAD_FAILED.to_string());
                self.reclamp();
                Err(e.into())
            }
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Start a mutation. Rejects while loading or while another is outstanding.
    pub fn begin(&mut self, mutation: &Mutation) -> SessionResult<()> {
        if self.loading {
            return Err(SessionError::NotReady);
        }
        if self.in_flight.is_some() {
            return Err(SessionError::Busy);
        }
        self.error = None;
        self.notice = None;
        self.in_flight = Some(mutation.kind());
        Ok(())
    }

    /// Apply a gateway outcome. Returns the id of the affected record.
    pub fn complete(&mut self, outcome: MutationOutcome) -> SessionResult<u64> {
        let kind = outcome.kind();
        self.in_flight = None;

        let applied = match outcome {
            MutationOutcome::Created { user, result } => result
                .map_err(SessionError::from)
                .and_then(|echo| self.apply_created(user, echo)),
            MutationOutcome::Updated { record, result } => result
                .map_err(SessionError::from)
                .and_then(|()| self.apply_updated(record)),
            MutationOutcome::Deleted { id, result } => result
                .map_err(SessionError::from)
                .and_then(|()| self.apply_deleted(id)),
        };

        match &applied {
            Ok(id) => {
                info!(?kind, id, "mutation applied");
                self.notice = Some(kind.success_message().to_string());
                self.reclamp();
            }
            Err(SessionError::Store(StoreError::NotFound(id))) => {
                warn!(?kind, id, "server acknowledged a change to a user missing locally");
                self.error = Some(format!(
                    "Local user list is out of sync with the server (user {} not found).",
                    id
                ));
            }
            Err(e) => {
                warn!(?kind, error = %e, "mutation failed");
                self.error = Some(kind.failure_message().to_string());
            }
        }
        applied
    }

    fn apply_created(&mut self, user: NewUser, echo: EchoedUser) -> SessionResult<u64> {
        let id = self.resolve_new_id(echo.id);
        self.users.insert_at_front(user.with_id(id))?;
        Ok(id)
    }

    fn apply_updated(&mut self, record: UserRecord) -> SessionResult<u64> {
        let id = record.id;
        self.users.replace(id, record)?;
        Ok(id)
    }

    fn apply_deleted(&mut self, id: u64) -> SessionResult<u64> {
        self.users.remove(id)?;
        Ok(id)
    }

    /// Keep the echoed id only when it is present and unused locally
    fn resolve_new_id(&self, echoed: Option<u64>) -> u64 {
        match echoed {
            Some(id) if !self.users.contains(id) => id,
            _ => {
                let id = self.users.next_id();
                info!(echoed = ?echoed, assigned = id, "reassigning id for created user");
                id
            }
        }
    }

    // =========================================================================
    // Delete confirmation
    // =========================================================================

    /// Arm a delete for `id`; nothing is sent until it is confirmed
    pub fn request_delete(&mut self, id: u64) -> SessionResult<()> {
        if self.loading {
            return Err(SessionError::NotReady);
        }
        if self.in_flight.is_some() {
            return Err(SessionError::Busy);
        }
        if !self.users.contains(id) {
            return Err(StoreError::NotFound(id).into());
        }
        self.pending_delete = Some(id);
        Ok(())
    }

    /// The record awaiting delete confirmation
    pub fn pending_delete(&self) -> Option<&UserRecord> {
        self.pending_delete.and_then(|id| self.users.get(id))
    }

    /// Confirm or decline the armed delete. Declining changes nothing else.
    pub fn resolve_delete(&mut self, confirmed: bool) -> SessionResult<Option<Mutation>> {
        let id = self
            .pending_delete
            .take()
            .ok_or(SessionError::NothingToConfirm)?;
        Ok(confirmed.then_some(Mutation::Delete(id)))
    }

    // =========================================================================
    // Search and pages
    // =========================================================================

    /// A new query always starts from the first page
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page.current_page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page.current_page = view::clamp_page(page, self.total_pages());
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page.current_page + 1);
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.page.current_page.saturating_sub(1));
    }

    fn reclamp(&mut self) {
        self.set_page(self.page.current_page);
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn phase(&self) -> SessionPhase {
        if self.loading {
            SessionPhase::Loading
        } else if self.error.is_some() {
            SessionPhase::ErrorDisplayed
        } else {
            SessionPhase::Ready
        }
    }

    pub fn users(&self) -> &UserCollection {
        &self.users
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn current_page(&self) -> usize {
        self.page.current_page
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page.page_size
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn filtered(&self) -> Vec<&UserRecord> {
        view::filter(self.users.all(), &self.query)
    }

    pub fn total_pages(&self) -> usize {
        view::total_pages(self.filtered().len(), self.page.page_size)
    }

    pub fn view(&self) -> SessionView<'_> {
        let filtered = self.filtered();
        let total_pages = view::total_pages(filtered.len(), self.page.page_size);
        let users =
            view::paginate(&filtered, self.page.page_size, self.page.current_page).to_vec();

        SessionView {
            users,
            filtered_count: filtered.len(),
            current_page: self.page.current_page,
            total_pages,
            query: &self.query,
            error: self.error.as_deref(),
            notice: self.notice.as_deref(),
            loading: self.loading,
            busy: self.in_flight.is_some(),
        }
    }
}

/// Owns the session state and the gateway, and runs whole request cycles.
pub struct UserSession {
    gateway: Arc<dyn UserGateway>,
    state: SessionState,
}

impl UserSession {
    pub fn new(gateway: Arc<dyn UserGateway>, page_size: NonZeroUsize) -> Self {
        Self {
            gateway,
            state: SessionState::new(page_size),
        }
    }

    pub fn gateway(&self) -> Arc<dyn UserGateway> {
        Arc::clone(&self.gateway)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    /// Initial listing
    pub async fn load(&mut self) -> SessionResult<()> {
        let result = self.gateway.list().await;
        self.state.apply_load(result)
    }

    /// Run one mutation end to end
    pub async fn submit(&mut self, mutation: Mutation) -> SessionResult<u64> {
        self.state.begin(&mutation)?;
        let outcome = mutation.execute(self.gateway.as_ref()).await;
        self.state.complete(outcome)
    }

    pub async fn create(&mut self, user: NewUser) -> SessionResult<u64> {
        self.submit(Mutation::Create(user)).await
    }

    pub async fn update(&mut self, record: UserRecord) -> SessionResult<u64> {
        self.submit(Mutation::Update(record)).await
    }

    /// Delete after asking `confirm`. Returns `None` when declined.
    pub async fn delete<F>(&mut self, id: u64, confirm: F) -> SessionResult<Option<u64>>
    where
        F: FnOnce(&UserRecord) -> bool,
    {
        self.state.request_delete(id)?;
        let confirmed = self.state.pending_delete().is_some_and(confirm);
        match self.state.resolve_delete(confirmed)? {
            Some(mutation) => self.submit(mutation).await.map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayOperation, InMemoryGateway};

    fn user(id: u64, name: &str) -> UserRecord {
        UserRecord::new(id, name, format!("{}@example.com", name.to_lowercase()), "555")
    }

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    async fn loaded(gateway: InMemoryGateway) -> (UserSession, Arc<InMemoryGateway>) {
        let gateway = Arc::new(gateway);
        let mut session = UserSession::new(gateway.clone(), size(5));
        session.load().await.unwrap();
        (session, gateway)
    }

    fn three_users() -> Vec<UserRecord> {
        vec![user(1, "Alice"), user(2, "Bob"), user(3, "Cara")]
    }

    #[tokio::test]
    async fn test_load_success() {
        let (session, _) = loaded(InMemoryGateway::new(three_users())).await;
        let state = session.state();

        assert_eq!(state.phase(), SessionPhase::Ready);
        assert_eq!(state.users().len(), 3);
        assert_eq!(state.view().total_pages, 1);
    }

    #[tokio::test]
    async fn test_load_failure_shows_banner() {
        let gateway = Arc::new(InMemoryGateway::new(three_users()).failing(GatewayOperation::List));
        let mut session = UserSession::new(gateway, size(5));
        assert_eq!(session.state().phase(), SessionPhase::Loading);

        assert!(matches!(session.load().await, Err(SessionError::Network(_))));
        let state = session.state();
        assert_eq!(state.phase(), SessionPhase::ErrorDisplayed);
        assert!(state.users().is_empty());
        assert_eq!(state.error(), Some(LOAD_FAILED));
        assert_eq!(state.view().total_pages, 1);
    }

    #[test]
    fn test_mutation_rejected_while_loading() {
        let mut state = SessionState::new(size(5));
        let mutation = Mutation::Delete(1);
        assert!(matches!(state.begin(&mutation), Err(SessionError::NotReady)));
    }

    #[tokio::test]
    async fn test_create_reassigns_colliding_id() {
        let (mut session, _) =
            loaded(InMemoryGateway::new(three_users()).with_echo_id(Some(1))).await;

        let id = session
            .create(NewUser::new("Dan", "dan@example.com", "4"))
            .await
            .unwrap();

        let state = session.state();
        assert_eq!(id, 4);
        assert_eq!(state.users().len(), 4);
        assert_eq!(state.users().all()[0].id, 4);
        assert_eq!(state.users().all()[0].name, "Dan");
        assert_eq!(state.notice(), Some("User added successfully."));
    }

    #[tokio::test]
    async fn test_create_keeps_unique_echo_id() {
        let (mut session, _) =
            loaded(InMemoryGateway::new(three_users()).with_echo_id(Some(11))).await;
        let id = session.create(NewUser::new("Eve", "e@x.io", "5")).await.unwrap();
        assert_eq!(id, 11);
    }

    #[tokio::test]
    async fn test_create_colliding_with_largest_possible_id() {
        let gateway =
            InMemoryGateway::new(vec![user(u64::MAX, "Max")]).with_echo_id(Some(u64::MAX));
        let (mut session, _) = loaded(gateway).await;

        let id = session.create(NewUser::new("Eve", "e@x.io", "5")).await.unwrap();

        assert_eq!(id, 1);
        assert_eq!(session.state().users().len(), 2);
        assert_eq!(session.state().users().all()[0].id, 1);
    }

    #[tokio::test]
    async fn test_create_without_echo_id_into_empty_collection() {
        let (mut session, _) = loaded(InMemoryGateway::new(Vec::new())).await;
        let id = session.create(NewUser::new("Eve", "e@x.io", "5")).await.unwrap();
        assert_eq!(id, 1);
        assert_eq!(session.state().users().len(), 1);
    }

    #[tokio::test]
    async fn test_create_failure_leaves_collection() {
        let (mut session, _) =
            loaded(InMemoryGateway::new(three_users()).failing(GatewayOperation::Create)).await;

        let result = session.create(NewUser::new("Dan", "dan@example.com", "4")).await;

        assert!(matches!(result, Err(SessionError::Network(_))));
        let state = session.state();
        assert_eq!(state.users().len(), 3);
        assert_eq!(state.error(), Some("Could not add the user. Please try again."));
        assert_eq!(state.phase(), SessionPhase::ErrorDisplayed);
        assert!(!state.is_busy());
    }

    #[tokio::test]
    async fn test_next_mutation_clears_previous_error() {
        let gateway = InMemoryGateway::new(three_users()).failing(GatewayOperation::Update);
        let (mut session, gateway) = loaded(gateway).await;

        assert!(session.update(user(2, "Robert")).await.is_err());
        assert!(session.state().error().is_some());

        gateway.set_failing(GatewayOperation::Update, false).await;
        session.update(user(2, "Robert")).await.unwrap();

        assert_eq!(session.state().error(), None);
        assert_eq!(session.state().users().get(2).unwrap().name, "Robert");
    }

    #[tokio::test]
    async fn test_update_missing_user_reports_not_found() {
        let (mut session, _) = loaded(InMemoryGateway::new(three_users())).await;

        let result = session.update(user(9, "Ghost")).await;

        assert!(matches!(
            result,
            Err(SessionError::Store(StoreError::NotFound(9)))
        ));
        assert!(session
            .state()
            .error()
            .unwrap()
            .contains("out of sync"));
        assert_eq!(session.state().users().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_confirmed() {
        let (mut session, gateway) = loaded(InMemoryGateway::new(three_users())).await;

        let deleted = session.delete(2, |u| u.name == "Bob").await.unwrap();

        assert_eq!(deleted, Some(2));
        assert_eq!(session.state().users().len(), 2);
        assert!(!session.state().users().contains(2));
        assert_eq!(
            gateway.calls().await,
            vec![GatewayOperation::List, GatewayOperation::Delete]
        );
    }

    #[tokio::test]
    async fn test_delete_declined_makes_no_call() {
        let (mut session, gateway) = loaded(InMemoryGateway::new(three_users())).await;
        let before = session.state().users().clone();

        let deleted = session.delete(2, |_| false).await.unwrap();

        assert_eq!(deleted, None);
        assert_eq!(session.state().users(), &before);
        assert_eq!(gateway.calls().await, vec![GatewayOperation::List]);
        assert!(session.state().pending_delete().is_none());
    }

    #[tokio::test]
    async fn test_delete_unknown_id() {
        let (mut session, gateway) = loaded(InMemoryGateway::new(three_users())).await;
        let result = session.delete(42, |_| true).await;
        assert!(matches!(
            result,
            Err(SessionError::Store(StoreError::NotFound(42)))
        ));
        assert_eq!(gateway.calls().await.len(), 1);
    }

    #[test]
    fn test_second_mutation_rejected_while_in_flight() {
        let mut state = SessionState::new(size(5));
        state.apply_load(Ok(three_users())).unwrap();

        let first = Mutation::Update(user(1, "Alicia"));
        state.begin(&first).unwrap();
        assert!(state.is_busy());
        assert!(matches!(
            state.begin(&Mutation::Delete(1)),
            Err(SessionError::Busy)
        ));
        assert!(matches!(state.request_delete(2), Err(SessionError::Busy)));

        state
            .complete(MutationOutcome::Updated {
                record: user(1, "Alicia"),
                result: Ok(()),
            })
            .unwrap();
        assert!(!state.is_busy());
        assert!(state.begin(&Mutation::Delete(1)).is_ok());
    }

    #[test]
    fn test_query_change_resets_page() {
        let mut state = SessionState::new(size(2));
        state.apply_load(Ok(three_users())).unwrap();
        state.set_page(2);
        assert_eq!(state.current_page(), 2);

        state.set_query("a");
        assert_eq!(state.current_page(), 1);

        let view = state.view();
        assert_eq!(view.filtered_count, 2);
        assert_eq!(view.users.iter().map(|u| u.id).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_search_scenario() {
        let mut state = SessionState::new(size(5));
        state
            .apply_load(Ok(vec![user(1, "Alice"), user(2, "Bob")]))
            .unwrap();
        state.set_query("ali");

        let view = state.view();
        assert_eq!(view.filtered_count, 1);
        assert_eq!(view.users[0].id, 1);
        assert_eq!(view.total_pages, 1);
    }

    #[test]
    fn test_delete_clamps_page() {
        let mut state = SessionState::new(size(2));
        state.apply_load(Ok(three_users())).unwrap();
        state.set_page(2);
        assert_eq!(state.view().users.len(), 1);

        state.begin(&Mutation::Delete(3)).unwrap();
        state
            .complete(MutationOutcome::Deleted {
                id: 3,
                result: Ok(()),
            })
            .unwrap();

        assert_eq!(state.total_pages(), 1);
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn test_set_page_clamps() {
        let mut state = SessionState::new(size(1));
        state.apply_load(Ok(three_users())).unwrap();

        state.set_page(10);
        assert_eq!(state.current_page(), 3);
        state.next_page();
        assert_eq!(state.current_page(), 3);
        state.set_page(0);
        assert_eq!(state.current_page(), 1);
        state.previous_page();
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn test_dismiss_banners() {
        let mut state = SessionState::new(size(5));
        let _ = state.apply_load(Err(GatewayError::Status {
            operation: GatewayOperation::List,
            status: 500,
        }));
        assert_eq!(state.phase(), SessionPhase::ErrorDisplayed);

        state.dismiss_error();
        assert_eq!(state.phase(), SessionPhase::Ready);
    }

    #[test]
    fn test_resolve_without_request() {
        let mut state = SessionState::new(size(5));
        assert!(matches!(
            state.resolve_delete(true),
            Err(SessionError::NothingToConfirm)
        ));
    }
}
