use leptos::prelude::*;
use leptos_ui::variants;

variants! {
    Button {
        base: "inline-flex items-center justify-center gap-2 whitespace-nowrap rounded-md text-sm font-medium transition-colors disabled:pointer-events-none disabled:bg-gray-400 disabled:cursor-not-allowed [&_svg]:pointer-events-none [&_svg:not([class*='size-'])]:size-4 shrink-0 [&_svg]:shrink-0 outline-none focus-visible:ring-2 focus-visible:ring-[#957139]/50 w-fit hover:cursor-pointer select-none",
        variants: {
            variant: {
                Default: "bg-[#957139] text-[#FAFAFA] hover:bg-black",
                Outline: "border border-[#957139] bg-transparent text-[#957139] hover:bg-[#957139]/10",
                Ghost: "bg-transparent hover:bg-[#957139]/10",
                Destructive: "bg-destructive text-white hover:bg-destructive/90",
            },
            size: {
                Default: "h-10 px-4 py-2",
                Sm: "h-8 px-3 gap-1.5",
                Lg: "h-12 px-6",
                Icon: "size-10",
            }
        },
        component: {
            element: button,
            support_href: true,
            support_aria_current: true
        }
    }
}
