use crate::bindings;
use crate::layout::center::SectionsHost;
use crate::layout::global_context::AppGlobalContext;
use crate::layout::left::Sidebar;
use crate::layout::right::StatusPanel;
use crate::layout::Shell;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    let ctx = AppGlobalContext::new();
    provide_context(ctx);
    ctx.init_router_integration();

    // The runtime needs the section elements, so it starts after the first render.
    Effect::new(move |_| bindings::boot(ctx));

    view! {
        <Shell
            left=|| view! { <Sidebar /> }.into_any()
            center=|| view! { <SectionsHost /> }.into_any()
            right=|| view! { <StatusPanel /> }.into_any()
        />
    }
}
