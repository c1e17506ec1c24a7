//! Sidebar: группы секций салона.
//!
//! Ссылки не навешивают обработчиков сами: текст `data-handler` разбирает
//! делегированный слушатель кликов документа (см. `crate::bindings`).

use crate::layout::global_context::AppGlobalContext;
use crate::shared::icons::{icon, section_icon};
use contracts::shared::sections::SectionId;
use leptos::prelude::*;

#[derive(Clone, Debug, PartialEq)]
struct MenuGroup {
    id: &'static str,
    label: &'static str,
    items: Vec<SectionId>,
}

fn get_menu_groups() -> Vec<MenuGroup> {
    vec![
        MenuGroup {
            id: "operacao",
            label: "Operação",
            items: vec![
                SectionId::Dashboard,
                SectionId::Agendamentos,
                SectionId::Clientes,
                SectionId::Profissionais,
                SectionId::Servicos,
            ],
        },
        MenuGroup {
            id: "gestao",
            label: "Gestão",
            items: vec![
                SectionId::Produtos,
                SectionId::Estoque,
                SectionId::Financeiro,
                SectionId::Importar,
            ],
        },
        MenuGroup {
            id: "relacionamento",
            label: "Relacionamento",
            items: vec![SectionId::Comunidade, SectionId::Avaliacoes],
        },
        MenuGroup {
            id: "administracao",
            label: "Administração",
            items: vec![SectionId::Sistema, SectionId::Configuracoes],
        },
    ]
}

/// Handler text the click listener recognises.
pub fn link_handler(section: SectionId) -> String {
    format!("goTo('{}')", section.as_str())
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = expect_context::<AppGlobalContext>();

    view! {
        <nav class="sidebar app-sidebar__content">
            {get_menu_groups().into_iter().map(|group| {
                view! {
                    <div class="app-sidebar__group" data-group=group.id>
                        <div class="app-sidebar__group-label">{group.label}</div>
                        {group.items.into_iter().map(|section| {
                            let id = section.as_str();
                            view! {
                                <a
                                    href="#"
                                    class="app-sidebar__item"
                                    class:app-sidebar__item--active=move || {
                                        ctx.active_section.get().as_deref() == Some(id)
                                    }
                                    data-handler=link_handler(section)
                                >
                                    <span class="app-sidebar__item-content">
                                        {icon(section_icon(section))}
                                        <span>{section.label()}</span>
                                    </span>
                                </a>
                            }
                        }).collect_view()}
                    </div>
                }
            }).collect_view()}
        </nav>
    }
}
