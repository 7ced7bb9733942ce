use crate::api::{ApiError, ApiErrorKind, ApiResult, NotesBackend};
use crate::autosave::{AutosaveConfig, Debouncer, EditBuffer, SaveOutcome, SaveSnapshot};
use crate::models::{CategoryRef, Note, VersionToken};
use crate::notify::{Notice, Notifier};
use crate::runtime::{Spawner, TimerId, Timers};
use crate::util::{format_epoch_ms, format_server_timestamp};
use futures::future::{AbortHandle, Abortable};
use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

/// Collaborators injected into an editor controller.
#[derive(Clone)]
pub(crate) struct EditorEnv {
    pub backend: Rc<dyn NotesBackend>,
    pub notifier: Rc<dyn Notifier>,
    pub timers: Rc<dyn Timers>,
    pub spawner: Rc<dyn Spawner>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EditorStatus {
    Idle,
    Loading,
    Saving,
    /// A failed save is waiting for its next attempt.
    RetryPending,
    /// The last save hit a version conflict; the note should be reloaded.
    ConflictBlocked,
}

/// Read-only view of the controller for rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct EditorSnapshot {
    pub title: String,
    pub content: String,
    pub category: CategoryRef,
    pub version: Option<VersionToken>,
    pub status: EditorStatus,
    pub last_edited: Option<String>,
    pub dirty: bool,
}

struct EditorState {
    buffer: EditBuffer,
    version: Option<VersionToken>,
    last_edited: Option<String>,
    debounce: Debouncer,
    retry_timers: HashMap<u64, TimerId>,
    next_retry_key: u64,
    requests: HashMap<u64, AbortHandle>,
    next_request_key: u64,
    loading: bool,
    saves_in_flight: usize,
    conflicted: bool,
    /// Bumped by `reload`; results from an older epoch are dropped.
    epoch: u64,
    torn_down: bool,
}

impl EditorState {
    fn status(&self) -> EditorStatus {
        if self.loading {
            EditorStatus::Loading
        } else if self.saves_in_flight > 0 {
            EditorStatus::Saving
        } else if !self.retry_timers.is_empty() {
            EditorStatus::RetryPending
        } else if self.conflicted {
            EditorStatus::ConflictBlocked
        } else {
            EditorStatus::Idle
        }
    }
}

struct Inner {
    note_id: String,
    env: EditorEnv,
    config: AutosaveConfig,
    state: RefCell<EditorState>,
    listeners: RefCell<Vec<Rc<dyn Fn()>>>,
}

/// Autosave controller for a single note.
///
/// Owns the edit buffer, the held version token and every timer it arms.
/// Edits re-arm a debounce timer; when it fires the buffer is snapshotted and
/// sent with the held token. Transient failures are retried with that same
/// snapshot, conflicts are surfaced once and left alone.
#[derive(Clone)]
pub(crate) struct NoteAutosaveController {
    inner: Rc<Inner>,
}

/// Keeps the saving indicator up for exactly as long as a save is in flight.
struct SavingGuard {
    inner: Rc<Inner>,
}

impl SavingGuard {
    fn enter(inner: &Rc<Inner>) -> Self {
        inner.state.borrow_mut().saves_in_flight += 1;
        Self {
            inner: inner.clone(),
        }
    }
}

impl Drop for SavingGuard {
    fn drop(&mut self) {
        {
            let mut s = self.inner.state.borrow_mut();
            s.saves_in_flight = s.saves_in_flight.saturating_sub(1);
        }
        self.inner.emit_changed();
    }
}

impl Inner {
    fn emit_changed(&self) {
        let listeners: Vec<Rc<dyn Fn()>> = self.listeners.borrow().clone();
        for listener in listeners {
            listener();
        }
    }

    fn is_stale(&self, epoch: u64) -> bool {
        let s = self.state.borrow();
        s.torn_down || s.epoch != epoch
    }
}

impl NoteAutosaveController {
    pub fn new(note_id: impl Into<String>, env: EditorEnv, config: AutosaveConfig) -> Self {
        let state = EditorState {
            buffer: EditBuffer::default(),
            version: None,
            last_edited: None,
            debounce: Debouncer::new(config.quiet_period_ms),
            retry_timers: HashMap::new(),
            next_retry_key: 0,
            requests: HashMap::new(),
            next_request_key: 0,
            loading: false,
            saves_in_flight: 0,
            conflicted: false,
            epoch: 0,
            torn_down: false,
        };

        Self {
            inner: Rc::new(Inner {
                note_id: note_id.into(),
                env,
                config,
                state: RefCell::new(state),
                listeners: RefCell::new(vec![]),
            }),
        }
    }

    /// Registers a callback run after every observable state change.
    pub fn on_change(&self, listener: impl Fn() + 'static) {
        self.inner.listeners.borrow_mut().push(Rc::new(listener));
    }

    pub fn status(&self) -> EditorStatus {
        self.inner.state.borrow().status()
    }

    pub fn is_saving(&self) -> bool {
        self.inner.state.borrow().saves_in_flight > 0
    }

    pub fn version(&self) -> Option<VersionToken> {
        self.inner.state.borrow().version.clone()
    }

    pub fn snapshot(&self) -> EditorSnapshot {
        let s = self.inner.state.borrow();
        EditorSnapshot {
            title: s.buffer.title().to_string(),
            content: s.buffer.content().to_string(),
            category: s.buffer.category().clone(),
            version: s.version.clone(),
            status: s.status(),
            last_edited: s.last_edited.clone(),
            dirty: s.buffer.is_dirty(),
        }
    }

    /// Initial load. Failures are surfaced and never retried.
    pub fn load(&self) {
        let epoch = {
            let mut s = self.inner.state.borrow_mut();
            if s.torn_down {
                return;
            }
            s.loading = true;
            s.epoch
        };
        self.inner.emit_changed();
        tracing::debug!(note_id = %self.inner.note_id, "loading note");

        let this = self.clone();
        let backend = self.inner.env.backend.clone();
        let note_id = self.inner.note_id.clone();
        self.inner.env.spawner.spawn(Box::pin(async move {
            let result = this
                .cancellable(async move { backend.get_note(&note_id).await })
                .await;
            this.finish_load(epoch, result);
        }));
    }

    /// Drops local edits and pending saves, then loads the server copy again.
    pub fn reload(&self) {
        {
            let mut s = self.inner.state.borrow_mut();
            if s.torn_down {
                return;
            }
            let timers = self.inner.env.timers.as_ref();
            s.debounce.cancel(timers);
            for (_, id) in s.retry_timers.drain() {
                timers.clear_timeout(id);
            }
            s.epoch += 1;
        }
        self.load();
    }

    fn finish_load(&self, epoch: u64, result: ApiResult<Note>) {
        if self.inner.is_stale(epoch) {
            return;
        }

        let failed = {
            let mut s = self.inner.state.borrow_mut();
            s.loading = false;
            match result {
                Ok(note) => {
                    s.buffer.seed(&note);
                    s.last_edited = Some(format_server_timestamp(note.updated_at.as_str()));
                    s.version = Some(note.updated_at);
                    s.conflicted = false;
                    tracing::debug!(note_id = %self.inner.note_id, "note loaded");
                    false
                }
                Err(e) if e.kind == ApiErrorKind::Cancelled => false,
                Err(e) => {
                    tracing::warn!(note_id = %self.inner.note_id, error = %e, "note load failed");
                    true
                }
            }
        };

        if failed {
            self.inner.env.notifier.notify(Notice::LoadFailed);
        }
        self.inner.emit_changed();
    }

    pub fn set_title(&self, title: impl Into<String>) {
        let title = title.into();
        self.edit(move |b| b.set_title(title));
    }

    pub fn set_content(&self, content: impl Into<String>) {
        let content = content.into();
        self.edit(move |b| b.set_content(content));
    }

    pub fn set_category(&self, category: CategoryRef) {
        self.edit(move |b| b.set_category(category));
    }

    fn edit(&self, apply: impl FnOnce(&mut EditBuffer)) {
        {
            let mut s = self.inner.state.borrow_mut();
            if s.torn_down {
                return;
            }
            apply(&mut s.buffer);
        }
        self.notify_changed();
        self.inner.emit_changed();
    }

    /// Re-arms the debounce timer. An empty title cancels the pending save
    /// and arms nothing.
    pub fn notify_changed(&self) {
        let mut s = self.inner.state.borrow_mut();
        if s.torn_down {
            return;
        }

        let timers = self.inner.env.timers.as_ref();
        s.debounce.cancel(timers);
        if s.buffer.title().is_empty() {
            tracing::debug!(note_id = %self.inner.note_id, "empty title, autosave not armed");
            return;
        }

        let this = self.clone();
        s.debounce.arm(timers, move |generation| {
            Box::new(move || {
                let current = this.inner.state.borrow_mut().debounce.fire(generation);
                if current {
                    this.flush();
                }
            })
        });
    }

    /// Snapshots the buffer with the held token and starts the first attempt.
    fn flush(&self) {
        let (snapshot, epoch) = {
            let s = self.inner.state.borrow();
            if s.torn_down {
                return;
            }
            (s.buffer.snapshot(s.version.as_ref()), s.epoch)
        };
        tracing::debug!(
            note_id = %self.inner.note_id,
            revision = snapshot.revision,
            "autosave triggered"
        );
        self.spawn_attempt(snapshot, 0, epoch);
    }

    fn spawn_attempt(&self, snapshot: SaveSnapshot, retries: u32, epoch: u64) {
        let this = self.clone();
        self.inner.env.spawner.spawn(Box::pin(async move {
            this.run_attempt(snapshot, retries, epoch).await;
        }));
    }

    async fn run_attempt(&self, snapshot: SaveSnapshot, retries: u32, epoch: u64) {
        if self.inner.is_stale(epoch) {
            return;
        }
        let _saving = SavingGuard::enter(&self.inner);
        self.inner.emit_changed();

        let backend = self.inner.env.backend.clone();
        let note_id = self.inner.note_id.clone();
        let request = snapshot.request.clone();
        let result = self
            .cancellable(async move { backend.update_note(&note_id, &request).await })
            .await;

        self.reconcile(snapshot, retries, epoch, SaveOutcome::classify(result));
    }

    fn reconcile(&self, snapshot: SaveSnapshot, retries: u32, epoch: u64, outcome: SaveOutcome) {
        if self.inner.is_stale(epoch) {
            tracing::debug!(note_id = %self.inner.note_id, "dropping stale save result");
            return;
        }

        match outcome {
            SaveOutcome::Saved(token) => {
                let now = self.inner.env.timers.now_ms();
                let mut s = self.inner.state.borrow_mut();
                tracing::debug!(
                    note_id = %self.inner.note_id,
                    version = token.as_str(),
                    "note saved"
                );
                s.version = Some(token);
                s.buffer.mark_saved(snapshot.revision);
                s.last_edited = Some(format_epoch_ms(now));
                s.conflicted = false;
            }
            SaveOutcome::Conflict => {
                tracing::warn!(note_id = %self.inner.note_id, "save rejected: version conflict");
                self.inner.state.borrow_mut().conflicted = true;
                self.inner.env.notifier.notify(Notice::SaveConflict);
            }
            SaveOutcome::Transient(e) => match self.inner.config.retry.next_delay(retries) {
                Some(delay_ms) => {
                    tracing::warn!(
                        note_id = %self.inner.note_id,
                        error = %e,
                        retry = retries + 1,
                        "save failed, retrying"
                    );
                    self.schedule_retry(snapshot, retries + 1, delay_ms, epoch);
                }
                None => {
                    tracing::warn!(
                        note_id = %self.inner.note_id,
                        error = %e,
                        "save failed, giving up"
                    );
                    self.inner.env.notifier.notify(Notice::SaveFailed);
                }
            },
            SaveOutcome::Cancelled => {}
        }
    }

    fn schedule_retry(&self, snapshot: SaveSnapshot, retries: u32, delay_ms: u32, epoch: u64) {
        let key = {
            let mut s = self.inner.state.borrow_mut();
            s.next_retry_key += 1;
            s.next_retry_key
        };

        let this = self.clone();
        let id = self.inner.env.timers.set_timeout(
            delay_ms,
            Box::new(move || {
                let live = this.inner.state.borrow_mut().retry_timers.remove(&key).is_some();
                if live {
                    this.spawn_attempt(snapshot, retries, epoch);
                }
            }),
        );
        self.inner.state.borrow_mut().retry_timers.insert(key, id);
    }

    /// Runs a request that teardown can abort.
    fn cancellable<T>(
        &self,
        fut: impl Future<Output = ApiResult<T>>,
    ) -> impl Future<Output = ApiResult<T>> {
        let (handle, registration) = AbortHandle::new_pair();
        let key = {
            let mut s = self.inner.state.borrow_mut();
            s.next_request_key += 1;
            let key = s.next_request_key;
            s.requests.insert(key, handle);
            key
        };

        let inner = self.inner.clone();
        async move {
            let result = Abortable::new(fut, registration).await;
            inner.state.borrow_mut().requests.remove(&key);
            result.unwrap_or_else(|_aborted| Err(ApiError::cancelled()))
        }
    }

    /// Cancels every timer and in-flight request. Late results are dropped.
    pub fn teardown(&self) {
        let handles: Vec<AbortHandle> = {
            let mut s = self.inner.state.borrow_mut();
            if s.torn_down {
                return;
            }
            s.torn_down = true;
            let timers = self.inner.env.timers.as_ref();
            s.debounce.cancel(timers);
            for (_, id) in s.retry_timers.drain() {
                timers.clear_timeout(id);
            }
            let handles: Vec<AbortHandle> = s.requests.drain().map(|(_, handle)| handle).collect();
            handles
        };

        tracing::debug!(
            note_id = %self.inner.note_id,
            aborted = handles.len(),
            "editor torn down"
        );
        for handle in handles {
            handle.abort();
        }
        self.inner.listeners.borrow_mut().clear();
    }
}
