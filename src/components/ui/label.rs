use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Label, span, "flex items-center gap-2 text-sm leading-none text-[#957139] select-none"}
}

pub use components::*;
