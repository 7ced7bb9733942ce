use crate::api::UpdateNoteRequest;
use crate::models::{CategoryRef, Note, VersionToken};

/// In-memory copy of the fields being edited.
///
/// Every setter bumps `revision`; a save records the revision it carried so
/// the buffer only reads as clean when nothing changed after the snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct EditBuffer {
    title: String,
    content: String,
    category: CategoryRef,
    revision: u64,
    saved_revision: u64,
}

/// Payload captured when a save starts. Retries resend this exact value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SaveSnapshot {
    pub request: UpdateNoteRequest,
    pub revision: u64,
}

impl EditBuffer {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn category(&self) -> &CategoryRef {
        &self.category
    }

    pub fn is_dirty(&self) -> bool {
        self.revision != self.saved_revision
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.revision += 1;
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.revision += 1;
    }

    pub fn set_category(&mut self, category: CategoryRef) {
        self.category = category;
        self.revision += 1;
    }

    /// Replace the buffer with the server's copy; the result is clean.
    pub fn seed(&mut self, note: &Note) {
        self.title = note.title.clone();
        self.content = note.content.clone();
        self.category = note.category_ref();
        self.revision += 1;
        self.saved_revision = self.revision;
    }

    pub fn mark_saved(&mut self, revision: u64) {
        self.saved_revision = self.saved_revision.max(revision);
    }

    pub fn snapshot(&self, version: Option<&VersionToken>) -> SaveSnapshot {
        SaveSnapshot {
            request: UpdateNoteRequest {
                title: self.title.clone(),
                content: self.content.clone(),
                category_id: self.category.id().map(str::to_string),
                updated_at: version.cloned(),
            },
            revision: self.revision,
        }
    }
}
