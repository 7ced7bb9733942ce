use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {ToastViewport, ol, "fixed bottom-4 right-4 z-[100] flex flex-col gap-2 w-[360px] max-w-[calc(100%-2rem)]"}
    clx! {Alert, li, "relative w-full rounded-lg border px-4 py-3 text-sm shadow-lg flex items-start justify-between gap-3"}
    clx! {AlertDescription, p, "text-sm [&_p]:leading-relaxed"}
}

pub use components::*;
