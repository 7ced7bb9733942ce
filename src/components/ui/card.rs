use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Card, div, "rounded-xl border-2 shadow-md h-full"}
    clx! {CardContent, div, "px-6 md:px-8 lg:px-12 py-3 md:py-4 lg:py-6 h-full flex flex-col"}
    clx! {CardMeta, div, "flex justify-end text-xs"}
}

pub use components::*;
