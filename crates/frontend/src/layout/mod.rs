pub mod center;
pub mod global_context;
pub mod left;
pub mod navigation;
pub mod right;

use crate::shared::icons::icon;
use global_context::AppGlobalContext;
use leptos::prelude::*;
use thaw::*;

/// Оболочка приложения.
///
/// ```text
/// +------------------------------------------+
/// |               TopBar                     |
/// +------------------------------------------+
/// |  Sidebar  |   Sections    |  Diagnóstico |
/// |   (Left)  |   (Center)    |   (Right)    |
/// +------------------------------------------+
/// ```
#[component]
pub fn Shell<L, C, R>(left: L, center: C, right: R) -> impl IntoView
where
    L: Fn() -> AnyView + 'static + Send,
    C: Fn() -> AnyView + 'static + Send,
    R: Fn() -> AnyView + 'static + Send,
{
    view! {
        <div class="app-layout">
            <TopBar />
            <div class="app-body">
                <left::Left>
                    {left()}
                </left::Left>
                <center::Center>
                    {center()}
                </center::Center>
                <right::Right>
                    {right()}
                </right::Right>
            </div>
        </div>
    }
}

#[component]
fn TopBar() -> impl IntoView {
    let ctx = expect_context::<AppGlobalContext>();

    view! {
        <header class="top-bar">
            <Button
                size=ButtonSize::Small
                appearance=ButtonAppearance::Subtle
                on_click=move |_| ctx.toggle_left()
            >
                {icon("menu")}
            </Button>
            <span class="top-bar__brand">"BIOMA"</span>
            <span class="top-bar__section">
                {move || ctx.active_section.get().unwrap_or_default()}
            </span>
            <Button
                size=ButtonSize::Small
                appearance=ButtonAppearance::Subtle
                on_click=move |_| ctx.toggle_right()
            >
                {icon("activity")}
            </Button>
        </header>
    }
}
