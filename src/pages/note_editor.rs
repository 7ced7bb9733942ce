use crate::autosave::AutosaveConfig;
use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, ButtonVariant, Card, CardContent, CardMeta,
    Dialog, DialogFooter, Input, Label, Spinner, Textarea, ToastViewport,
};
use crate::models::{Category, CategoryRef};
use crate::notify::NoticeLevel;
use crate::state::{
    color_for, AppContext, CategoryCreateError, CategoryStore, EditorSnapshot, EditorStatus,
    NoteAutosaveController, CATEGORY_PALETTE,
};
use crate::storage::{load_json_from_storage, save_json_to_storage, LAST_COLOR_KEY};
use icons::{Circle, X};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use leptos_router::params::Params;

const NEW_CATEGORY_OPTION: &str = "__new__";

#[derive(Params, PartialEq, Clone, Debug)]
pub struct NoteRouteParams {
    pub note_id: Option<String>,
}

/// Route entry: remounts the editor whenever the note id changes so each
/// note gets a fresh controller and the previous one is torn down.
#[component]
pub fn NoteEditorPage() -> impl IntoView {
    let params = leptos_router::hooks::use_params::<NoteRouteParams>();
    let note_id = move || {
        params
            .get()
            .ok()
            .and_then(|p| p.note_id)
            .unwrap_or_default()
    };

    view! {
        <div class="bg-[#faf1e3] h-screen flex flex-col">
            {move || {
                let id = note_id();
                if id.trim().is_empty() {
                    view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }
                        .into_any()
                } else {
                    view! { <NoteEditor note_id=id /> }.into_any()
                }
            }}
            <Toaster />
        </div>
    }
}

#[component]
fn NoteEditor(note_id: String) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let services = app_state.0.services;

    let controller = services.with_value(|s| {
        NoteAutosaveController::new(note_id.clone(), s.editor_env(), AutosaveConfig::default())
    });
    let store = services.with_value(|s| s.category_store());

    let editor: RwSignal<EditorSnapshot> = RwSignal::new(controller.snapshot());
    {
        let c = controller.clone();
        controller.on_change(move || {
            let _ = editor.try_set(c.snapshot());
        });
    }
    controller.load();

    let controller = StoredValue::new_local(controller);
    on_cleanup(move || {
        let _ = controller.try_with_value(|c| c.teardown());
    });

    let categories: RwSignal<Vec<Category>> = RwSignal::new(vec![]);
    let categories_loading: RwSignal<bool> = RwSignal::new(true);
    {
        let store = store.clone();
        spawn_local(async move {
            let list = store.refresh().await;
            let _ = categories.try_set(list);
            let _ = categories_loading.try_set(false);
        });
    }
    let store = StoredValue::new_local(store);

    let add_category_open: RwSignal<bool> = RwSignal::new(false);

    let title = Signal::derive(move || editor.with(|e| e.title.clone()));
    let content = Signal::derive(move || editor.with(|e| e.content.clone()));
    let selected = Signal::derive(move || editor.with(|e| e.category.clone()));
    let color = Signal::derive(move || categories.with(|list| color_for(list, &selected.get())));

    let on_title = Callback::new(move |v: String| controller.with_value(|c| c.set_title(v)));
    let on_content = Callback::new(move |v: String| controller.with_value(|c| c.set_content(v)));
    let on_category =
        Callback::new(move |v: CategoryRef| controller.with_value(|c| c.set_category(v)));
    let on_reload = Callback::new(move |_: ()| controller.with_value(|c| c.reload()));

    view! {
        <div class="px-4 md:px-8 lg:px-12 pt-4 md:pt-8 lg:pt-12">
            <header class="flex justify-between items-center mb-4">
                <CategorySelector
                    categories=categories
                    loading=categories_loading
                    selected=selected
                    on_change=on_category
                    on_create=Callback::new(move |_: ()| add_category_open.set(true))
                />
                <CloseButton />
            </header>
            <Show
                when=move || editor.with(|e| e.status == EditorStatus::ConflictBlocked)
                fallback=|| ().into_view()
            >
                <ConflictBanner on_reload=on_reload />
            </Show>
        </div>
        <div class="px-4 md:px-8 lg:px-12 pb-4 md:pb-8 lg:pb-12 flex-1">
            <NoteCard
                color=color
                title=title
                content=content
                on_title=on_title
                on_content=on_content
                last_edited=Signal::derive(move || editor.with(|e| e.last_edited.clone()))
                status=Signal::derive(move || editor.with(|e| e.status))
            />
        </div>
        <AddCategoryDialog open=add_category_open store=store categories=categories />
    }
}

#[component]
fn CategorySelector(
    categories: RwSignal<Vec<Category>>,
    loading: RwSignal<bool>,
    selected: Signal<CategoryRef>,
    on_change: Callback<CategoryRef>,
    on_create: Callback<()>,
) -> impl IntoView {
    let current_value = move || selected.get().id().unwrap_or_default().to_string();

    let handle_change = move |ev: web_sys::Event| {
        let value = event_target_value(&ev);
        if value == NEW_CATEGORY_OPTION {
            on_create.run(());
            // Snap the native select back to the note's real category.
            if let Some(el) = ev
                .target()
                .and_then(|t| wasm_bindgen::JsCast::dyn_into::<web_sys::HtmlSelectElement>(t).ok())
            {
                el.set_value(&current_value());
            }
            return;
        }
        on_change.run(CategoryRef::from(Some(value)));
    };

    view! {
        <div class="flex items-center gap-2">
            <Circle
                class="size-4"
                attr:style=move || {
                    let color = categories.with(|list| color_for(list, &selected.get()));
                    format!("fill: {color}; stroke-width: 0;")
                }
            />
            <select
                class="w-[240px] h-10 rounded-md border border-[#957139] bg-transparent px-3"
                prop:value=current_value
                on:change=handle_change
                disabled=move || loading.get()
            >
                <option value="" disabled=true>"Select Category"</option>
                <For
                    each=move || categories.get()
                    key=|c| c.id.clone()
                    children=move |c: Category| {
                        view! { <option value=c.id.clone()>{c.name.clone()}</option> }
                    }
                />
                <option value=NEW_CATEGORY_OPTION>"+ Create New Category"</option>
            </select>
        </div>
    }
}

#[component]
fn CloseButton() -> impl IntoView {
    let navigate = StoredValue::new(use_navigate());
    view! {
        <Button
            variant=ButtonVariant::Ghost
            size=ButtonSize::Icon
            attr:aria-label="Close note"
            on:click=move |_| navigate.with_value(|nav| nav("/notes", Default::default()))
        >
            <X class="size-10 text-[#957139]" attr:style="stroke-width: 1;" />
        </Button>
    }
}

#[component]
fn ConflictBanner(on_reload: Callback<()>) -> impl IntoView {
    view! {
        <div class="mb-4 flex items-center justify-between rounded-md border border-destructive px-4 py-2 text-sm">
            <span>"This note was changed elsewhere. Reload to continue editing."</span>
            <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=move |_| on_reload.run(())>
                "Reload"
            </Button>
        </div>
    }
}

#[component]
fn NoteCard(
    color: Signal<String>,
    title: Signal<String>,
    content: Signal<String>,
    on_title: Callback<String>,
    on_content: Callback<String>,
    last_edited: Signal<Option<String>>,
    status: Signal<EditorStatus>,
) -> impl IntoView {
    // Hex colors get a translucent fill; named fallbacks are used as-is.
    let style = move || {
        let c = color.get();
        let fill = if c.starts_with('#') { format!("{c}80") } else { c.clone() };
        format!("border-color: {c}; background-color: {fill};")
    };

    view! {
        <Card attr:style=style>
            <CardContent>
                <CardMeta>
                    // Reserve space to avoid layout shift/flicker.
                    <div class="h-4 w-4 mr-2 shrink-0">
                        <Show
                            when=move || status.get() == EditorStatus::Saving
                            fallback=|| ().into_view()
                        >
                            <Spinner />
                        </Show>
                    </div>
                    <Label class="text-xs">
                        "Last Edited: " {move || last_edited.get().unwrap_or_default()}
                    </Label>
                </CardMeta>
                <Input
                    class="text-2xl md:text-3xl font-bold mb-4 font-serif"
                    placeholder="Note Title"
                    value=title
                    on_input=on_title
                />
                <Textarea
                    class="text-base md:text-lg flex-grow"
                    placeholder="Pour your heart out..."
                    value=content
                    on_input=on_content
                />
            </CardContent>
        </Card>
    }
}

#[component]
fn AddCategoryDialog(
    open: RwSignal<bool>,
    store: StoredValue<CategoryStore, LocalStorage>,
    categories: RwSignal<Vec<Category>>,
) -> impl IntoView {
    let name: RwSignal<String> = RwSignal::new(String::new());
    let selected_color: RwSignal<String> =
        RwSignal::new(load_json_from_storage::<String>(LAST_COLOR_KEY).unwrap_or_default());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let submitting: RwSignal<bool> = RwSignal::new(false);

    let can_submit = move || {
        !submitting.get() && !name.get().trim().is_empty() && !selected_color.get().is_empty()
    };

    let submit = move |_| {
        if !can_submit() {
            return;
        }
        let Some(store) = store.try_get_value() else {
            return;
        };
        let name_val = name.get_untracked();
        let color_val = selected_color.get_untracked();
        submitting.set(true);
        error.set(None);

        spawn_local(async move {
            match store.create(&name_val, &color_val).await {
                Ok(_) => {
                    save_json_to_storage(LAST_COLOR_KEY, &color_val);
                    let _ = categories.try_set(store.categories());
                    let _ = name.try_set(String::new());
                    let _ = open.try_set(false);
                }
                Err(CategoryCreateError::Invalid(e)) => {
                    let _ = error.try_set(Some(e.to_string()));
                }
                // Already surfaced as a toast; keep the dialog open for another try.
                Err(CategoryCreateError::Api(_)) => {}
            }
            let _ = submitting.try_set(false);
        });
    };

    view! {
        <Dialog open=open title="Create New Category">
            <Input
                class="mb-4 border border-[#957139] rounded-md py-2"
                placeholder="Enter name"
                value=name
                on_input=Callback::new(move |v: String| name.set(v))
            />
            <div class="flex justify-between mb-6 p-4 border border-[#957139] rounded-md">
                {CATEGORY_PALETTE
                    .iter()
                    .map(|color| {
                        let color = color.to_string();
                        let c2 = color.clone();
                        let c3 = color.clone();
                        view! {
                            <button
                                type="button"
                                aria-label=color.clone()
                                class=move || {
                                    if selected_color.get() == c2 {
                                        "size-4 rounded-full cursor-pointer transition-transform scale-110 ring-2 ring-offset-2 ring-[#957139]"
                                    } else {
                                        "size-4 rounded-full cursor-pointer transition-transform"
                                    }
                                }
                                style=format!("background-color: {color};")
                                on:click=move |_| selected_color.set(c3.clone())
                            />
                        }
                    })
                    .collect_view()}
            </div>
            <Show when=move || error.get().is_some() fallback=|| ().into_view()>
                <p class="mb-4 text-sm text-destructive">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <DialogFooter>
                <Button attr:disabled=move || !can_submit() on:click=submit>
                    "Create Category"
                </Button>
            </DialogFooter>
        </Dialog>
    }
}

#[component]
fn Toaster() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let toasts = app_state.0.toasts;
    let services = app_state.0.services;

    view! {
        <ToastViewport>
            <For
                each=move || toasts.get()
                key=|t| t.id
                children=move |t| {
                    let border = match t.notice.level() {
                        NoticeLevel::Success => "border-green-600 bg-green-50",
                        NoticeLevel::Destructive => "border-destructive bg-red-50",
                    };
                    let id = t.id;
                    view! {
                        <Alert class=border>
                            <AlertDescription>{t.notice.to_string()}</AlertDescription>
                            <button
                                type="button"
                                class="text-gray-500"
                                aria-label="Dismiss"
                                on:click=move |_| services.with_value(|s| s.notifier.dismiss(id))
                            >
                                <X class="size-4" />
                            </button>
                        </Alert>
                    }
                }
            />
        </ToastViewport>
    }
}
