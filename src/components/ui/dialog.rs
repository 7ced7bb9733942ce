use icons::X;
use leptos::prelude::*;
use leptos_ui::clx;
use tw_merge::*;

mod components {
    use super::*;
    clx! {DialogHeader, div, "flex justify-between items-center mb-6"}
    clx! {DialogTitle, h2, "text-xl font-bold"}
    clx! {DialogFooter, footer, "flex justify-end"}
}

pub use components::*;

/// Modal driven by an `open` signal; clicking the backdrop or the X closes it.
#[component]
pub fn Dialog(
    open: RwSignal<bool>,
    #[prop(optional, into)] title: String,
    #[prop(optional, into)] class: String,
    children: ChildrenFn,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "relative bg-[#FAF1E3] p-6 rounded-lg shadow-lg w-[425px] max-w-[calc(100%-2rem)]",
        class
    );
    let children = StoredValue::new(children);
    let title = StoredValue::new(title);
    let merged_class = StoredValue::new(merged_class);

    view! {
        <Show when=move || open.get() fallback=|| ().into_view()>
            <div data-name="DialogBackdrop" class="fixed inset-0 z-40 bg-black/50" />
            <div
                data-name="DialogContent"
                class="fixed inset-0 z-50 flex items-center justify-center"
                on:click=move |ev: web_sys::MouseEvent| {
                    if ev.target() == ev.current_target() {
                        open.set(false);
                    }
                }
            >
                <div class=merged_class.get_value() role="dialog" aria-modal="true">
                    <DialogHeader>
                        <DialogTitle>{title.get_value()}</DialogTitle>
                        <button
                            type="button"
                            class="size-6 text-gray-500 cursor-pointer"
                            aria-label="Close dialog"
                            on:click=move |_| open.set(false)
                        >
                            <X />
                        </button>
                    </DialogHeader>
                    {move || children.with_value(|c| c())}
                </div>
            </div>
        </Show>
    }
}
