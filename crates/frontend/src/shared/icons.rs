use contracts::shared::sections::SectionId;
use leptos::prelude::*;

/// Имя иконки для пункта меню секции.
pub fn section_icon(section: SectionId) -> &'static str {
    match section {
        SectionId::Dashboard => "dashboard",
        SectionId::Agendamentos => "calendar",
        SectionId::Clientes => "users",
        SectionId::Profissionais => "user",
        SectionId::Servicos => "scissors",
        SectionId::Produtos => "package",
        SectionId::Estoque => "boxes",
        SectionId::Financeiro => "cash",
        SectionId::Comunidade => "message",
        SectionId::Importar => "upload",
        SectionId::Sistema => "shield",
        SectionId::Configuracoes => "settings",
        SectionId::Avaliacoes => "star",
    }
}

pub fn icon(name: &str) -> AnyView {
    let body = match name {
        "dashboard" => view! {
            <rect x="3" y="3" width="7" height="9" rx="1"/>
            <rect x="14" y="3" width="7" height="5" rx="1"/>
            <rect x="14" y="12" width="7" height="9" rx="1"/>
            <rect x="3" y="16" width="7" height="5" rx="1"/>
        }
        .into_any(),
        "calendar" => view! {
            <rect x="3" y="4" width="18" height="18" rx="2"/>
            <path d="M16 2v4M8 2v4M3 10h18"/>
        }
        .into_any(),
        "users" => view! {
            <circle cx="9" cy="7" r="4"/>
            <path d="M3 21v-2a4 4 0 0 1 4-4h4a4 4 0 0 1 4 4v2"/>
            <path d="M16 3.1a4 4 0 0 1 0 7.8M21 21v-2a4 4 0 0 0-3-3.9"/>
        }
        .into_any(),
        "user" => view! {
            <circle cx="12" cy="8" r="4"/>
            <path d="M4 21v-1a6 6 0 0 1 6-6h4a6 6 0 0 1 6 6v1"/>
        }
        .into_any(),
        "scissors" => view! {
            <circle cx="6" cy="6" r="3"/>
            <circle cx="6" cy="18" r="3"/>
            <path d="M20 4 8.1 15.9M14.5 14.5 20 20M8.1 8.1 12 12"/>
        }
        .into_any(),
        "package" => view! {
            <path d="M21 8 12 3 3 8v8l9 5 9-5z"/>
            <path d="M3 8l9 5 9-5M12 13v8"/>
        }
        .into_any(),
        "boxes" => view! {
            <rect x="2" y="13" width="9" height="8" rx="1"/>
            <rect x="13" y="13" width="9" height="8" rx="1"/>
            <rect x="7.5" y="3" width="9" height="8" rx="1"/>
        }
        .into_any(),
        "cash" => view! {
            <rect x="2" y="6" width="20" height="12" rx="2"/>
            <circle cx="12" cy="12" r="2.5"/>
        }
        .into_any(),
        "message" => view! {
            <path d="M21 15a2 2 0 0 1-2 2H7l-4 4V5a2 2 0 0 1 2-2h14a2 2 0 0 1 2 2z"/>
        }
        .into_any(),
        "upload" => view! {
            <path d="M21 15v4a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2v-4"/>
            <path d="M17 8l-5-5-5 5M12 3v12"/>
        }
        .into_any(),
        "shield" => view! {
            <path d="M12 22s8-4 8-10V5l-8-3-8 3v7c0 6 8 10 8 10z"/>
        }
        .into_any(),
        "settings" => view! {
            <circle cx="12" cy="12" r="3"/>
            <path d="M12 2v3M12 19v3M4.9 4.9l2.1 2.1M17 17l2.1 2.1M2 12h3M19 12h3M4.9 19.1 7 17M17 7l2.1-2.1"/>
        }
        .into_any(),
        "star" => view! {
            <path d="m12 2 3.1 6.3 6.9 1-5 4.9 1.2 6.8L12 17.8 5.8 21l1.2-6.8-5-4.9 6.9-1z"/>
        }
        .into_any(),
        "menu" => view! {
            <path d="M3 6h18M3 12h18M3 18h18"/>
        }
        .into_any(),
        "activity" => view! {
            <path d="M22 12h-4l-3 9L9 3l-3 9H2"/>
        }
        .into_any(),
        _ => view! {
            <circle cx="12" cy="12" r="9"/>
        }
        .into_any(),
    };

    view! {
        <svg width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" aria-hidden="true">
            {body}
        </svg>
    }
    .into_any()
}
