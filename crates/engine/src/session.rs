// Management session: turns UI commands into repository/search actions and
// engine outcomes into user-visible events.
//
// This is the single place engine failures become user-facing text; the
// repository and resolver report typed outcomes only.

use std::sync::{Arc, Mutex, PoisonError};

use patternstore_common::protocol::session::{
    NoticeLevel, PatternRef, ScopedPattern, SessionCommand, SessionEvent,
};
use patternstore_common::types::{StoredPattern, Tier};
use tracing::warn;

use crate::bridge::SettingsBridge;
use crate::error::StoreError;
use crate::search::{load_pattern, LoadOutcome, SearchHost};
use crate::store::PatternRepository;
use crate::ui::{validate_label, PromptUi};

pub struct ManagementSession<B, U, H> {
    repo: PatternRepository<B>,
    ui: U,
    host: H,
}

impl<B: SettingsBridge, U: PromptUi, H: SearchHost> ManagementSession<B, U, H> {
    pub fn new(repo: PatternRepository<B>, ui: U, host: H) -> Self {
        Self { repo, ui, host }
    }

    pub fn repository(&self) -> &PatternRepository<B> {
        &self.repo
    }

    /// Decode and process one raw UI message. Malformed payloads are
    /// rejected and logged, never partially applied.
    pub async fn handle_raw(&self, raw: &[u8]) -> Vec<SessionEvent> {
        match SessionCommand::decode(raw) {
            Ok(command) => self.handle_command(command).await,
            Err(error) => {
                warn!(%error, "rejected malformed session message");
                Vec::new()
            }
        }
    }

    /// Process one UI command. Returned events are pushed back to the UI in
    /// order; an empty vec means the command was a silent no-op (user
    /// cancellation).
    pub async fn handle_command(&self, command: SessionCommand) -> Vec<SessionEvent> {
        match command {
            SessionCommand::Ready => self.refresh(None).await,
            SessionCommand::Create { scope } => self.handle_create(scope).await,
            SessionCommand::Save { pattern } => self.handle_save(pattern).await,
            SessionCommand::Delete { id, scope } => self.handle_delete(&id, scope).await,
            SessionCommand::Load { id, scope, pattern } => {
                self.handle_load(&id, scope, pattern).await
            }
        }
    }

    async fn refresh(&self, select_pattern: Option<PatternRef>) -> Vec<SessionEvent> {
        match self.repo.list_all().await {
            Ok(lists) => vec![SessionEvent::Patterns {
                workspace: lists.workspace,
                user: lists.global,
                select_pattern,
            }],
            Err(error) => vec![failure_notice(&error)],
        }
    }

    async fn handle_create(&self, scope: Tier) -> Vec<SessionEvent> {
        match self.repo.create(scope).await {
            Ok(pattern) => self.refresh(Some(PatternRef { id: pattern.id, scope })).await,
            Err(error) => vec![failure_notice(&error)],
        }
    }

    async fn handle_save(&self, scoped: ScopedPattern) -> Vec<SessionEvent> {
        if let Some(message) = validate_label(&scoped.pattern.label) {
            return vec![SessionEvent::Notice { level: NoticeLevel::Error, message }];
        }
        match self.repo.save(scoped.scope, scoped.pattern).await {
            Ok(saved) => {
                self.refresh(Some(PatternRef { id: saved.id, scope: scoped.scope })).await
            }
            Err(error) => vec![failure_notice(&error)],
        }
    }

    async fn handle_delete(&self, id: &str, scope: Tier) -> Vec<SessionEvent> {
        let existing = match self.repo.find(scope, id).await {
            Ok(Some(pattern)) => pattern,
            Ok(None) => {
                return vec![SessionEvent::Notice {
                    level: NoticeLevel::Warning,
                    message: format!("Pattern not found in {scope} settings"),
                }];
            }
            Err(error) => return vec![failure_notice(&error)],
        };

        let message = format!("Delete pattern \"{}\"?", existing.label);
        if !self.ui.confirm(&message, "Delete").await {
            return Vec::new();
        }

        match self.repo.delete(scope, id).await {
            Ok(label) => {
                let mut events = self.refresh(None).await;
                events.push(SessionEvent::Notice {
                    level: NoticeLevel::Info,
                    message: format!("Deleted pattern \"{label}\""),
                });
                events
            }
            Err(error) => vec![failure_notice(&error)],
        }
    }

    async fn handle_load(
        &self,
        id: &str,
        scope: Tier,
        draft: Option<StoredPattern>,
    ) -> Vec<SessionEvent> {
        let pattern = match draft {
            // In-flight edits take precedence over the stored entry.
            Some(stored) => {
                let id = stored.id.clone().unwrap_or_else(|| id.to_string());
                stored.into_pattern(id)
            }
            None => match self.repo.find(scope, id).await {
                Ok(Some(pattern)) => pattern,
                Ok(None) => {
                    return vec![SessionEvent::Notice {
                        level: NoticeLevel::Error,
                        message: format!("Pattern not found in {scope} settings"),
                    }];
                }
                Err(error) => return vec![failure_notice(&error)],
            },
        };

        match load_pattern(&self.ui, &self.host, &pattern).await {
            LoadOutcome::Loaded => vec![SessionEvent::Notice {
                level: NoticeLevel::Info,
                message: format!("Loaded pattern \"{}\"", pattern.label),
            }],
            LoadOutcome::Cancelled => Vec::new(),
        }
    }
}

fn failure_notice(error: &StoreError) -> SessionEvent {
    let level = match error {
        StoreError::NotFound { .. } => NoticeLevel::Warning,
        StoreError::DuplicateLabel { .. } | StoreError::Bridge(_) => NoticeLevel::Error,
    };
    SessionEvent::Notice { level, message: error.to_string() }
}

/// At most one live management session per process: a second open request
/// gets the existing session back so callers reveal it instead of creating
/// a second in-process writer.
pub struct SessionRegistry<S> {
    active: Mutex<Option<Arc<S>>>,
}

/// Result of an open request against the registry.
pub enum Opened<S> {
    /// A new session was created and registered.
    Created(Arc<S>),
    /// A session already exists; callers should reveal it.
    Existing(Arc<S>),
}

impl<S> Opened<S> {
    #[must_use]
    pub fn session(&self) -> &Arc<S> {
        match self {
            Self::Created(session) | Self::Existing(session) => session,
        }
    }
}

impl<S> Default for SessionRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> SessionRegistry<S> {
    #[must_use]
    pub fn new() -> Self {
        Self { active: Mutex::new(None) }
    }

    /// Return the registered session, creating one via `factory` only if
    /// none exists.
    pub fn open_with(&self, factory: impl FnOnce() -> S) -> Opened<S> {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(session) = active.as_ref() {
            return Opened::Existing(Arc::clone(session));
        }
        let session = Arc::new(factory());
        *active = Some(Arc::clone(&session));
        Opened::Created(session)
    }

    #[must_use]
    pub fn current(&self) -> Option<Arc<S>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Clear the registry entry when the session's surface is torn down.
    pub fn dispose(&self) {
        self.active.lock().unwrap_or_else(PoisonError::into_inner).take();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::bridge::MemoryBridge;
    use crate::search::test_support::RecordingHost;
    use crate::ui::test_support::ScriptedUi;

    type TestSession = ManagementSession<Arc<MemoryBridge>, ScriptedUi, RecordingHost>;

    fn session_with(ui: ScriptedUi) -> (Arc<MemoryBridge>, TestSession) {
        let bridge = Arc::new(MemoryBridge::new());
        let repo = PatternRepository::new(Arc::clone(&bridge));
        (bridge, ManagementSession::new(repo, ui, RecordingHost::new()))
    }

    fn stored(label: &str, find: &str) -> StoredPattern {
        StoredPattern { label: label.into(), find: find.into(), ..StoredPattern::default() }
    }

    fn patterns_event(events: &[SessionEvent]) -> (&[patternstore_common::types::Pattern], &[patternstore_common::types::Pattern], Option<&PatternRef>) {
        for event in events {
            if let SessionEvent::Patterns { workspace, user, select_pattern } = event {
                return (workspace, user, select_pattern.as_ref());
            }
        }
        panic!("no patterns event in {events:?}");
    }

    #[tokio::test]
    async fn ready_pushes_both_lists() {
        let (bridge, session) = session_with(ScriptedUi::new());
        bridge.seed(Tier::Workspace, vec![stored("W", "w")]);
        bridge.seed(Tier::Global, vec![stored("G", "g")]);

        let events = session.handle_command(SessionCommand::Ready).await;
        let (workspace, user, select) = patterns_event(&events);
        assert_eq!(workspace.len(), 1);
        assert_eq!(workspace[0].label, "W");
        assert_eq!(user[0].label, "G");
        assert!(select.is_none());
    }

    #[tokio::test]
    async fn create_auto_selects_the_new_pattern() {
        let (_, session) = session_with(ScriptedUi::new());
        let events =
            session.handle_command(SessionCommand::Create { scope: Tier::Workspace }).await;

        let (workspace, _, select) = patterns_event(&events);
        let select = select.expect("new pattern should be selected");
        assert_eq!(select.scope, Tier::Workspace);
        assert_eq!(workspace[0].id, select.id);
        assert_eq!(workspace[0].label, "New Pattern");
    }

    #[tokio::test]
    async fn save_preserves_selection_on_the_saved_entry() {
        let (_, session) = session_with(ScriptedUi::new());
        let created = session.repository().create(Tier::Global).await.unwrap();

        let mut edited = created.to_stored();
        edited.label = "Edited".to_string();
        let events = session
            .handle_command(SessionCommand::Save {
                pattern: ScopedPattern { scope: Tier::Global, pattern: edited },
            })
            .await;

        let (_, user, select) = patterns_event(&events);
        assert_eq!(select.unwrap().id, created.id);
        assert_eq!(user[0].label, "Edited");
    }

    #[tokio::test]
    async fn save_with_blank_label_is_rejected_before_any_write() {
        let (bridge, session) = session_with(ScriptedUi::new());
        let events = session
            .handle_command(SessionCommand::Save {
                pattern: ScopedPattern { scope: Tier::Global, pattern: stored("   ", "x") },
            })
            .await;

        assert!(matches!(
            events.as_slice(),
            [SessionEvent::Notice { level: NoticeLevel::Error, .. }]
        ));
        assert!(bridge.snapshot(Tier::Global).is_empty());
    }

    #[tokio::test]
    async fn delete_asks_before_removing() {
        let (bridge, session) = session_with(ScriptedUi::new().answer_confirm(true));
        let created = session.repository().create(Tier::Workspace).await.unwrap();

        let events = session
            .handle_command(SessionCommand::Delete {
                id: created.id.clone(),
                scope: Tier::Workspace,
            })
            .await;

        let (workspace, _, _) = patterns_event(&events);
        assert!(workspace.is_empty());
        assert!(bridge.snapshot(Tier::Workspace).is_empty());
        assert!(events
            .iter()
            .any(|e| matches!(e, SessionEvent::Notice { level: NoticeLevel::Info, .. })));
    }

    #[tokio::test]
    async fn declined_delete_is_a_silent_noop() {
        let (bridge, session) = session_with(ScriptedUi::new().answer_confirm(false));
        let created = session.repository().create(Tier::Workspace).await.unwrap();

        let events = session
            .handle_command(SessionCommand::Delete { id: created.id, scope: Tier::Workspace })
            .await;

        assert!(events.is_empty());
        assert_eq!(bridge.snapshot(Tier::Workspace).len(), 1);
    }

    #[tokio::test]
    async fn delete_of_unknown_id_warns_without_confirming() {
        let ui = ScriptedUi::new();
        let (_, session) = session_with(ui);

        let events = session
            .handle_command(SessionCommand::Delete { id: "ghost".into(), scope: Tier::Global })
            .await;

        assert!(matches!(
            events.as_slice(),
            [SessionEvent::Notice { level: NoticeLevel::Warning, .. }]
        ));
        assert!(session.ui.confirms_seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn load_prefers_unsaved_draft_over_stored_entry() {
        let (_, session) = session_with(ScriptedUi::new());
        let created = session.repository().create(Tier::Global).await.unwrap();

        let mut draft = created.to_stored();
        draft.find = "draft find".to_string();
        session
            .handle_command(SessionCommand::Load {
                id: created.id,
                scope: Tier::Global,
                pattern: Some(draft),
            })
            .await;

        let invocation = session.host.last().unwrap();
        assert_eq!(invocation.query, "draft find");
    }

    #[tokio::test]
    async fn load_cancelled_at_a_placeholder_stays_silent() {
        let (_, session) = session_with(ScriptedUi::new().answer_text(None));
        let saved = session
            .repository()
            .save(Tier::Global, stored("P", "${prompt:x}"))
            .await
            .unwrap();

        let events = session
            .handle_command(SessionCommand::Load { id: saved.id, scope: Tier::Global, pattern: None })
            .await;

        assert!(events.is_empty());
        assert_eq!(session.host.count(), 0);
    }

    #[tokio::test]
    async fn load_of_unknown_id_is_an_error_notice() {
        let (_, session) = session_with(ScriptedUi::new());
        let events = session
            .handle_command(SessionCommand::Load {
                id: "ghost".into(),
                scope: Tier::Workspace,
                pattern: None,
            })
            .await;
        assert!(matches!(
            events.as_slice(),
            [SessionEvent::Notice { level: NoticeLevel::Error, .. }]
        ));
    }

    #[tokio::test]
    async fn malformed_raw_message_is_rejected() {
        let (bridge, session) = session_with(ScriptedUi::new());
        let events = session.handle_raw(br#"{"type": "drop_tables"}"#).await;
        assert!(events.is_empty());
        assert!(bridge.snapshot(Tier::Global).is_empty());
    }

    #[tokio::test]
    async fn raw_round_trip_dispatches() {
        let (_, session) = session_with(ScriptedUi::new());
        let events = session.handle_raw(br#"{"type": "ready"}"#).await;
        assert!(matches!(events.as_slice(), [SessionEvent::Patterns { .. }]));
    }

    #[test]
    fn registry_holds_at_most_one_session() {
        let registry: SessionRegistry<String> = SessionRegistry::new();
        assert!(registry.current().is_none());

        let first = registry.open_with(|| "session".to_string());
        assert!(matches!(first, Opened::Created(_)));

        let second = registry.open_with(|| panic!("factory must not run twice"));
        let Opened::Existing(existing) = second else {
            panic!("second open should reveal the existing session");
        };
        assert!(Arc::ptr_eq(first.session(), &existing));

        registry.dispose();
        assert!(registry.current().is_none());
        let reopened = registry.open_with(|| "fresh".to_string());
        assert!(matches!(reopened, Opened::Created(_)));
    }
}
