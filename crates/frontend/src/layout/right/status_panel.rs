//! StatusPanel - диагностика рантайма в правой панели.
//!
//! Показывает снимок `RuntimeStatus` (текущая секция, флаги загрузки, ключи
//! кэша, хвост истории, пробелы конфигурации) и кнопки ручного управления.

use crate::bindings;
use crate::layout::global_context::AppGlobalContext;
use contracts::shared::runtime::RuntimeStatus;
use leptos::prelude::*;
use thaw::*;

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

fn loading_line(status: &RuntimeStatus) -> String {
    let keys: Vec<String> = status
        .state
        .loading_keys()
        .into_iter()
        .map(String::from)
        .collect();
    join_or_dash(&keys)
}

#[component]
pub fn StatusPanel() -> impl IntoView {
    let ctx = expect_context::<AppGlobalContext>();
    let status = ctx.status;

    view! {
        <div class="status-panel">
            <div class="status-panel__header">
                <h3>"Diagnóstico"</h3>
            </div>

            <Flex vertical=false gap=FlexGap::Small>
                <Button
                    size=ButtonSize::Small
                    appearance=ButtonAppearance::Secondary
                    on_click=move |_| bindings::refresh()
                >
                    "🔄 Atualizar"
                </Button>
                <Button
                    size=ButtonSize::Small
                    appearance=ButtonAppearance::Secondary
                    on_click=move |_| bindings::back()
                >
                    "⬅️ Voltar"
                </Button>
            </Flex>

            {move || match status.get() {
                None => view! { <p class="status-panel__empty">"Runtime não iniciado"</p> }.into_any(),
                Some(snapshot) => {
                    let current = snapshot
                        .state
                        .current_section
                        .clone()
                        .unwrap_or_else(|| "-".to_string());
                    let history = snapshot
                        .state
                        .history_tail
                        .iter()
                        .rev()
                        .map(|entry| {
                            let time = entry
                                .recorded_at()
                                .map(|t| t.format("%H:%M:%S").to_string())
                                .unwrap_or_default();
                            view! { <li>{format!("{} {}", time, entry.section)}</li> }
                        })
                        .collect_view();
                    view! {
                        <dl class="status-panel__grid">
                            <dt>"Seção"</dt>
                            <dd>{current}</dd>
                            <dt>"Carregando"</dt>
                            <dd>{loading_line(&snapshot)}</dd>
                            <dt>"Cache"</dt>
                            <dd>{join_or_dash(&snapshot.state.cache_keys)}</dd>
                            <dt>"Sem política"</dt>
                            <dd>{join_or_dash(&snapshot.config_gaps)}</dd>
                            <dt>"Histórico"</dt>
                            <dd>{format!("{} entradas", snapshot.state.history_len)}</dd>
                        </dl>
                        <ul class="status-panel__history">{history}</ul>
                    }
                    .into_any()
                }
            }}

            <Flex vertical=true gap=FlexGap::Small>
                <Button
                    size=ButtonSize::Small
                    appearance=ButtonAppearance::Subtle
                    on_click=move |_| bindings::clear_cache()
                >
                    "Limpar cache"
                </Button>
                <Button
                    size=ButtonSize::Small
                    appearance=ButtonAppearance::Subtle
                    on_click=move |_| bindings::reset_loading()
                >
                    "Liberar carregamentos"
                </Button>
                <Button
                    size=ButtonSize::Small
                    appearance=ButtonAppearance::Subtle
                    on_click=move |_| {
                        let removed = bindings::clean_all();
                        log::info!("🧽 Manual clean: {} element(s)", removed);
                    }
                >
                    "Limpar seções"
                </Button>
                <Button
                    size=ButtonSize::Small
                    appearance=ButtonAppearance::Subtle
                    on_click=move |_| bindings::reset_system()
                >
                    "Reiniciar sistema"
                </Button>
            </Flex>
        </div>
    }
}
