use crate::runtime::Timers;
use leptos::prelude::*;
use std::cell::Cell;
use std::rc::Rc;
use strum::Display;

/// User-visible outcomes. `Display` is the message shown to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
pub(crate) enum Notice {
    #[strum(to_string = "Error fetching note data.")]
    LoadFailed,
    #[strum(to_string = "Conflict detected. Please reload the note.")]
    SaveConflict,
    #[strum(to_string = "Error saving note. Please try again.")]
    SaveFailed,
    #[strum(to_string = "Failed to load categories. Please try again later.")]
    CategoryListFailed,
    #[strum(to_string = "Failed to create category")]
    CategoryCreateFailed,
    #[strum(to_string = "Category created successfully")]
    CategoryCreated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NoticeLevel {
    Success,
    Destructive,
}

impl Notice {
    pub fn level(self) -> NoticeLevel {
        match self {
            Notice::CategoryCreated => NoticeLevel::Success,
            _ => NoticeLevel::Destructive,
        }
    }
}

pub(crate) trait Notifier {
    fn notify(&self, notice: Notice);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Toast {
    pub id: u64,
    pub notice: Notice,
}

/// Renders notices as toasts that dismiss themselves after `ttl_ms`.
#[derive(Clone)]
pub(crate) struct ToastNotifier {
    pub toasts: RwSignal<Vec<Toast>>,
    timers: Rc<dyn Timers>,
    next_id: Rc<Cell<u64>>,
    ttl_ms: u32,
}

impl ToastNotifier {
    pub fn new(timers: Rc<dyn Timers>) -> Self {
        Self {
            toasts: RwSignal::new(vec![]),
            timers,
            next_id: Rc::new(Cell::new(0)),
            ttl_ms: 4000,
        }
    }

    pub fn dismiss(&self, id: u64) {
        self.toasts.update(|list| list.retain(|t| t.id != id));
    }
}

impl Notifier for ToastNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level() {
            NoticeLevel::Success => tracing::info!(%notice, "notice"),
            NoticeLevel::Destructive => tracing::warn!(%notice, "notice"),
        }

        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.toasts.update(|list| list.push(Toast { id, notice }));

        let toasts = self.toasts;
        self.timers.set_timeout(
            self.ttl_ms,
            Box::new(move || {
                let _ = toasts.try_update(|list| list.retain(|t| t.id != id));
            }),
        );
    }
}
