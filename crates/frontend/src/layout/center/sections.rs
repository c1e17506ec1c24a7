//! Статическая разметка секций.
//!
//! Каждая секция - `<section id=<id> class="section">`, скрытая до первой
//! навигации. Внутри - доверенные контейнеры из таблицы политик и, если
//! есть, под-вкладки (`.sub-nav-btn` + `.sub-tab-content`).

use crate::bindings;
use crate::shared::render_controller::policy_for;
use contracts::shared::sections::{subtab_key, SectionId};
use leptos::prelude::*;

/// Container ids from the section policy not already used by a sub-tab panel.
fn container_ids(section: SectionId) -> Vec<String> {
    let panels: Vec<String> = section
        .sub_tabs()
        .iter()
        .map(|(sub, _)| subtab_key(section.as_str(), sub))
        .collect();
    policy_for(section.as_str())
        .map(|policy| {
            policy
                .containers
                .iter()
                .filter_map(|selector| selector.strip_prefix('#'))
                .filter(|id| !panels.iter().any(|p| p == id))
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

#[component]
fn SubTabs(section: SectionId) -> impl IntoView {
    let main = section.as_str();
    let tabs = section.sub_tabs();

    view! {
        <div class="sub-nav">
            {tabs.iter().enumerate().map(|(index, (sub, label))| {
                view! {
                    <button
                        class="sub-nav-btn"
                        class:active={index == 0}
                        data-subtab=*sub
                        on:click=move |_| bindings::switch_sub_tab(main.to_string(), sub.to_string())
                    >
                        {*label}
                    </button>
                }
            }).collect_view()}
        </div>
        {tabs.iter().enumerate().map(|(index, (sub, _))| {
            view! {
                <div
                    id=subtab_key(main, sub)
                    class="sub-tab-content"
                    class:active={index == 0}
                    style:display={if index == 0 { "block" } else { "none" }}
                ></div>
            }
        }).collect_view()}
    }
}

#[component]
pub fn SectionsHost() -> impl IntoView {
    view! {
        <div class="sections">
            {SectionId::ALL.into_iter().map(|section| {
                let has_sub_tabs = !section.sub_tabs().is_empty();
                view! {
                    <section id=section.as_str() class="section" style:display="none">
                        <h2 class="section__title">{section.label()}</h2>
                        {has_sub_tabs.then(|| view! { <SubTabs section=section /> })}
                        {container_ids(section).into_iter().map(|id| {
                            view! { <div id=id class="section__container"></div> }
                        }).collect_view()}
                    </section>
                }
            }).collect_view()}
        </div>
    }
}
