mod categories;
mod note_autosave;

pub(crate) use categories::{color_for, CategoryCreateError, CategoryStore, CATEGORY_PALETTE};
pub(crate) use note_autosave::{EditorEnv, EditorSnapshot, EditorStatus, NoteAutosaveController};

use crate::api::{ApiClient, EnvConfig, NotesBackend};
use crate::auth::StoredCredential;
use crate::notify::{Notifier, Toast, ToastNotifier};
use crate::runtime::{BrowserTimers, LocalSpawner, Timers};
use leptos::prelude::*;
use std::rc::Rc;

/// Browser-side collaborators shared by every page.
#[derive(Clone)]
pub(crate) struct Services {
    pub backend: Rc<dyn NotesBackend>,
    pub notifier: Rc<ToastNotifier>,
    pub timers: Rc<dyn Timers>,
}

impl Services {
    pub fn from_browser() -> Self {
        let timers: Rc<dyn Timers> = Rc::new(BrowserTimers);
        let backend = Rc::new(ApiClient::new(EnvConfig::new(), Rc::new(StoredCredential)));
        Self {
            backend,
            notifier: Rc::new(ToastNotifier::new(timers.clone())),
            timers,
        }
    }

    pub fn editor_env(&self) -> EditorEnv {
        let notifier: Rc<dyn Notifier> = self.notifier.clone();
        EditorEnv {
            backend: self.backend.clone(),
            notifier,
            timers: self.timers.clone(),
            spawner: Rc::new(LocalSpawner),
        }
    }

    pub fn category_store(&self) -> CategoryStore {
        CategoryStore::new(self.backend.clone(), self.notifier.clone())
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub services: StoredValue<Services, LocalStorage>,
    pub toasts: RwSignal<Vec<Toast>>,
}

impl AppState {
    pub fn new() -> Self {
        let services = Services::from_browser();
        let toasts = services.notifier.toasts;
        Self {
            services: StoredValue::new_local(services),
            toasts,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);
