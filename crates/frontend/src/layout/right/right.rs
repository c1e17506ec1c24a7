use crate::layout::global_context::AppGlobalContext;
use leptos::prelude::*;

#[component]
pub fn Right(children: Children) -> impl IntoView {
    let ctx = expect_context::<AppGlobalContext>();
    let is_open = move || ctx.right_open.get();

    view! {
        <aside
            data-zone="right"
            class="right-panel"
            class:right-panel--hidden=move || !is_open()
        >
            {children()}
        </aside>
    }
}
