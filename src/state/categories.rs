use crate::api::{ApiError, CreateCategoryRequest, NotesBackend};
use crate::models::{Category, CategoryRef};
use crate::notify::{Notice, Notifier};
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

/// Preset colors offered when creating a category.
pub(crate) const CATEGORY_PALETTE: [&str; 6] = [
    "#EF9C66", "#FCDC94", "#C8CFA0", "#78ABA8", "#FF9E9E", "#C0ACD0",
];

/// Card tint when the note's category is unknown.
pub(crate) const FALLBACK_COLOR: &str = "gray";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub(crate) enum CategoryInputError {
    #[error("Category name cannot be empty")]
    EmptyName,
    #[error("Pick a color for the category")]
    MissingColor,
    #[error("Invalid color: {0}")]
    InvalidColor(String),
}

#[derive(Clone, Debug, Error)]
pub(crate) enum CategoryCreateError {
    #[error(transparent)]
    Invalid(#[from] CategoryInputError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

pub(crate) fn is_hex_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

pub(crate) fn validate_category_input(
    name: &str,
    color: &str,
) -> Result<CreateCategoryRequest, CategoryInputError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CategoryInputError::EmptyName);
    }
    let color = color.trim();
    if color.is_empty() {
        return Err(CategoryInputError::MissingColor);
    }
    if !is_hex_color(color) {
        return Err(CategoryInputError::InvalidColor(color.to_string()));
    }
    Ok(CreateCategoryRequest {
        name: name.to_string(),
        color: color.to_string(),
    })
}

pub(crate) fn color_for(categories: &[Category], selected: &CategoryRef) -> String {
    selected
        .id()
        .and_then(|id| categories.iter().find(|c| c.id == id))
        .map(|c| c.color.clone())
        .unwrap_or_else(|| FALLBACK_COLOR.to_string())
}

/// Categories available to the note editor, plus inline creation.
#[derive(Clone)]
pub(crate) struct CategoryStore {
    backend: Rc<dyn NotesBackend>,
    notifier: Rc<dyn Notifier>,
    categories: Rc<RefCell<Vec<Category>>>,
}

impl CategoryStore {
    pub fn new(backend: Rc<dyn NotesBackend>, notifier: Rc<dyn Notifier>) -> Self {
        Self {
            backend,
            notifier,
            categories: Rc::new(RefCell::new(vec![])),
        }
    }

    pub fn categories(&self) -> Vec<Category> {
        self.categories.borrow().clone()
    }

    /// Fetches the list; on failure the list degrades to empty.
    pub async fn refresh(&self) -> Vec<Category> {
        let list = match self.backend.list_categories().await {
            Ok(list) => {
                tracing::debug!(count = list.len(), "categories loaded");
                list
            }
            Err(e) => {
                tracing::warn!(error = %e, "category list failed");
                self.notifier.notify(Notice::CategoryListFailed);
                vec![]
            }
        };
        *self.categories.borrow_mut() = list.clone();
        list
    }

    /// Single attempt; the new category is appended on success.
    pub async fn create(&self, name: &str, color: &str) -> Result<Category, CategoryCreateError> {
        let req = validate_category_input(name, color)?;

        match self.backend.create_category(&req).await {
            Ok(category) => {
                tracing::debug!(id = %category.id, name = %category.name, "category created");
                self.categories.borrow_mut().push(category.clone());
                self.notifier.notify(Notice::CategoryCreated);
                Ok(category)
            }
            Err(e) => {
                tracing::warn!(error = %e, "category create failed");
                self.notifier.notify(Notice::CategoryCreateFailed);
                Err(e.into())
            }
        }
    }
}
