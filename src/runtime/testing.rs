//! Deterministic stand-ins for the browser event loop and the notes API.

use super::{Spawner, TimerId, Timers};
use crate::api::{
    ApiError, ApiErrorKind, ApiResult, CreateCategoryRequest, NotesBackend, UpdateNoteRequest,
    UpdateNoteResponse,
};
use crate::models::{Category, CategorySummary, Note, VersionToken};
use crate::notify::{Notice, Notifier};
use async_trait::async_trait;
use futures::channel::oneshot;
use futures::executor::LocalPool;
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::Rc;

#[derive(Default)]
struct ManualState {
    now: i64,
    next_id: TimerId,
    pending: BTreeMap<(i64, TimerId), Box<dyn FnOnce()>>,
    due_by_id: HashMap<TimerId, i64>,
}

/// Virtual clock: timers only fire when the test advances time.
#[derive(Default)]
pub(crate) struct ManualTimers {
    state: RefCell<ManualState>,
}

impl ManualTimers {
    pub fn pending_count(&self) -> usize {
        self.state.borrow().pending.len()
    }

    fn pop_due(&self, until: i64) -> Option<Box<dyn FnOnce()>> {
        let mut s = self.state.borrow_mut();
        let key = *s.pending.keys().next()?;
        if key.0 > until {
            return None;
        }
        s.now = key.0;
        s.due_by_id.remove(&key.1);
        s.pending.remove(&key)
    }

    fn set_now(&self, now: i64) {
        self.state.borrow_mut().now = now;
    }
}

impl Timers for ManualTimers {
    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerId {
        let mut s = self.state.borrow_mut();
        s.next_id += 1;
        let id = s.next_id;
        let due = s.now + i64::from(delay_ms);
        s.pending.insert((due, id), callback);
        s.due_by_id.insert(id, due);
        id
    }

    fn clear_timeout(&self, id: TimerId) {
        let mut s = self.state.borrow_mut();
        if let Some(due) = s.due_by_id.remove(&id) {
            s.pending.remove(&(due, id));
        }
    }

    fn now_ms(&self) -> i64 {
        self.state.borrow().now
    }
}

pub(crate) struct PoolSpawner(futures::executor::LocalSpawner);

impl Spawner for PoolSpawner {
    fn spawn(&self, fut: LocalBoxFuture<'static, ()>) {
        self.0
            .spawn_local(fut)
            .expect("local pool should accept tasks");
    }
}

/// Manual clock plus a single-threaded executor, advanced together.
pub(crate) struct Harness {
    pub timers: Rc<ManualTimers>,
    pub spawner: Rc<PoolSpawner>,
    pool: RefCell<LocalPool>,
}

impl Harness {
    pub fn new() -> Self {
        let pool = LocalPool::new();
        let spawner = Rc::new(PoolSpawner(pool.spawner()));
        Self {
            timers: Rc::new(ManualTimers::default()),
            spawner,
            pool: RefCell::new(pool),
        }
    }

    pub fn now(&self) -> i64 {
        self.timers.now_ms()
    }

    pub fn run_until_stalled(&self) {
        self.pool.borrow_mut().run_until_stalled();
    }

    /// Moves the clock forward, firing due timers in order and draining
    /// spawned work after each one.
    pub fn advance(&self, ms: i64) {
        let target = self.now() + ms;
        self.run_until_stalled();
        while let Some(callback) = self.timers.pop_due(target) {
            callback();
            self.run_until_stalled();
        }
        self.timers.set_now(target);
    }
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    pub notices: RefCell<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn count(&self, notice: Notice) -> usize {
        self.notices.borrow().iter().filter(|n| **n == notice).count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }
}

pub(crate) enum Scripted<T> {
    Ready(ApiResult<T>),
    /// Resolves when the test sends on the paired channel.
    Held(oneshot::Receiver<ApiResult<T>>),
}

impl<T> Scripted<T> {
    async fn resolve(self) -> ApiResult<T> {
        match self {
            Scripted::Ready(result) => result,
            Scripted::Held(rx) => rx.await.unwrap_or_else(|_| Err(ApiError::cancelled())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct UpdateCall {
    pub at_ms: i64,
    pub note_id: String,
    pub request: UpdateNoteRequest,
}

/// Scripted notes API. Unscripted saves succeed with `v1`, `v2`, ...
pub(crate) struct FakeBackend {
    clock: Rc<ManualTimers>,
    pub notes: RefCell<VecDeque<Scripted<Note>>>,
    pub updates: RefCell<VecDeque<Scripted<UpdateNoteResponse>>>,
    pub category_lists: RefCell<VecDeque<ApiResult<Vec<Category>>>>,
    pub created_categories: RefCell<VecDeque<ApiResult<Category>>>,
    pub update_calls: RefCell<Vec<UpdateCall>>,
    pub create_calls: RefCell<Vec<CreateCategoryRequest>>,
    pub get_calls: Cell<usize>,
}

impl FakeBackend {
    pub fn new(clock: Rc<ManualTimers>) -> Self {
        Self {
            clock,
            notes: RefCell::default(),
            updates: RefCell::default(),
            category_lists: RefCell::default(),
            created_categories: RefCell::default(),
            update_calls: RefCell::default(),
            create_calls: RefCell::default(),
            get_calls: Cell::new(0),
        }
    }

    pub fn push_note(&self, result: ApiResult<Note>) {
        self.notes.borrow_mut().push_back(Scripted::Ready(result));
    }

    pub fn push_update(&self, result: ApiResult<UpdateNoteResponse>) {
        self.updates.borrow_mut().push_back(Scripted::Ready(result));
    }

    pub fn hold_update(&self) -> oneshot::Sender<ApiResult<UpdateNoteResponse>> {
        let (tx, rx) = oneshot::channel();
        self.updates.borrow_mut().push_back(Scripted::Held(rx));
        tx
    }

    pub fn hold_note(&self) -> oneshot::Sender<ApiResult<Note>> {
        let (tx, rx) = oneshot::channel();
        self.notes.borrow_mut().push_back(Scripted::Held(rx));
        tx
    }

    pub fn update_calls(&self) -> Vec<UpdateCall> {
        self.update_calls.borrow().clone()
    }
}

#[async_trait(?Send)]
impl NotesBackend for FakeBackend {
    async fn get_note(&self, _note_id: &str) -> ApiResult<Note> {
        self.get_calls.set(self.get_calls.get() + 1);
        let next = self.notes.borrow_mut().pop_front();
        match next {
            Some(scripted) => scripted.resolve().await,
            None => Err(ApiError::http(404, "not scripted".to_string(), "Failed to fetch note data")),
        }
    }

    async fn update_note(
        &self,
        note_id: &str,
        req: &UpdateNoteRequest,
    ) -> ApiResult<UpdateNoteResponse> {
        let call_no = {
            let mut calls = self.update_calls.borrow_mut();
            calls.push(UpdateCall {
                at_ms: self.clock.now_ms(),
                note_id: note_id.to_string(),
                request: req.clone(),
            });
            calls.len()
        };
        let next = self.updates.borrow_mut().pop_front();
        match next {
            Some(scripted) => scripted.resolve().await,
            None => Ok(UpdateNoteResponse {
                updated_at: VersionToken(format!("v{call_no}")),
            }),
        }
    }

    async fn list_categories(&self) -> ApiResult<Vec<Category>> {
        let next = self.category_lists.borrow_mut().pop_front();
        next.unwrap_or_else(|| Ok(vec![]))
    }

    async fn create_category(&self, req: &CreateCategoryRequest) -> ApiResult<Category> {
        self.create_calls.borrow_mut().push(req.clone());
        let next = self.created_categories.borrow_mut().pop_front();
        next.unwrap_or_else(|| Err(network_error()))
    }
}

pub(crate) fn network_error() -> ApiError {
    ApiError {
        kind: ApiErrorKind::Network,
        message: "error sending request".to_string(),
    }
}

pub(crate) fn token(s: &str) -> VersionToken {
    VersionToken(s.to_string())
}

pub(crate) fn saved(s: &str) -> ApiResult<UpdateNoteResponse> {
    Ok(UpdateNoteResponse {
        updated_at: token(s),
    })
}

pub(crate) fn note(title: &str, content: &str, category: Option<&str>, version: &str) -> Note {
    Note {
        id: "n1".to_string(),
        title: title.to_string(),
        content: content.to_string(),
        category: category.map(|id| CategorySummary { id: id.to_string() }),
        updated_at: token(version),
    }
}
