//! Каталог секций приложения - единственный источник правды для id секций.
//!
//! Набор секций фиксирован на этапе сборки. Навигация, состояние и политика
//! контента ключуются строковым id; `SectionId` даёт типизированный доступ
//! к известным секциям, а функции ниже задают соглашение об именах загрузчиков.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionId {
    Dashboard,
    Agendamentos,
    Clientes,
    Profissionais,
    Servicos,
    Produtos,
    Estoque,
    Financeiro,
    Comunidade,
    Importar,
    Sistema,
    Configuracoes,
    Avaliacoes,
}

impl SectionId {
    pub const ALL: [SectionId; 13] = [
        SectionId::Dashboard,
        SectionId::Agendamentos,
        SectionId::Clientes,
        SectionId::Profissionais,
        SectionId::Servicos,
        SectionId::Produtos,
        SectionId::Estoque,
        SectionId::Financeiro,
        SectionId::Comunidade,
        SectionId::Importar,
        SectionId::Sistema,
        SectionId::Configuracoes,
        SectionId::Avaliacoes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionId::Dashboard => "dashboard",
            SectionId::Agendamentos => "agendamentos",
            SectionId::Clientes => "clientes",
            SectionId::Profissionais => "profissionais",
            SectionId::Servicos => "servicos",
            SectionId::Produtos => "produtos",
            SectionId::Estoque => "estoque",
            SectionId::Financeiro => "financeiro",
            SectionId::Comunidade => "comunidade",
            SectionId::Importar => "importar",
            SectionId::Sistema => "sistema",
            SectionId::Configuracoes => "configuracoes",
            SectionId::Avaliacoes => "avaliacoes",
        }
    }

    /// Заголовок пункта меню.
    pub fn label(&self) -> &'static str {
        match self {
            SectionId::Dashboard => "Dashboard",
            SectionId::Agendamentos => "Agendamentos",
            SectionId::Clientes => "Clientes",
            SectionId::Profissionais => "Profissionais",
            SectionId::Servicos => "Serviços",
            SectionId::Produtos => "Produtos",
            SectionId::Estoque => "Estoque",
            SectionId::Financeiro => "Financeiro",
            SectionId::Comunidade => "Comunidade",
            SectionId::Importar => "Importar",
            SectionId::Sistema => "Sistema / Auditoria",
            SectionId::Configuracoes => "Configurações",
            SectionId::Avaliacoes => "Avaliações",
        }
    }

    /// Под-вкладки секции: `(id, заголовок)`. Панель под-вкладки имеет id
    /// `<секция>-<id>`.
    pub fn sub_tabs(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            SectionId::Financeiro => &[("resumo", "Resumo"), ("lancamentos", "Lançamentos")],
            SectionId::Estoque => &[("lista", "Itens"), ("movimentacoes", "Movimentações")],
            _ => &[],
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown section id `{s}`"))
    }
}

/// Первая буква в верхнем регистре, остальное без изменений.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `clientes` -> `loadClientes`
pub fn section_loader_name(section: &str) -> String {
    format!("load{}", capitalize(section))
}

/// `(financeiro, receitas)` -> `loadFinanceiroReceitas`
pub fn subtab_loader_name(main_tab: &str, sub_tab: &str) -> String {
    format!("load{}{}", capitalize(main_tab), capitalize(sub_tab))
}

/// Составной ключ состояния для под-вкладки: `financeiro-receitas`.
pub fn subtab_key(main_tab: &str, sub_tab: &str) -> String {
    format!("{main_tab}-{sub_tab}")
}
