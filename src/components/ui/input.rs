use leptos::prelude::*;
use tw_merge::tw_merge;
use wasm_bindgen::JsCast;

#[component]
pub fn Input(
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] placeholder: String,
    #[prop(into, optional)] id: String,

    // One-way value plus change callback, so the owner decides what an edit does.
    //
    // NOTE: We avoid `bind:value=...` because Leptos binding APIs/macros have
    // changed across versions. This manual wiring is stable.
    #[prop(into)] value: Signal<String>,
    #[prop(into)] on_input: Callback<String>,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "placeholder:text-muted-foreground flex w-full min-w-0 bg-transparent px-3 py-1 outline-none border-none shadow-none",
        class
    );

    let handle_input = move |ev: web_sys::Event| {
        if let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        {
            on_input.run(input.value());
        }
    };

    view! {
        <input
            data-name="Input"
            type="text"
            class=merged_class
            placeholder=placeholder
            id=id
            prop:value=move || value.get()
            on:input=handle_input
        />
    }
}
