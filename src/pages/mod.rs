mod note_editor;

pub use note_editor::NoteEditorPage;
