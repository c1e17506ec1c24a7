use contracts::shared::content_policy::SectionPolicy;
use contracts::shared::sections::SectionId;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// Таблица политик, заполняется один раз при загрузке страницы.
static POLICY_TABLE: Lazy<BTreeMap<String, SectionPolicy>> = Lazy::new(|| {
    SectionId::ALL
        .into_iter()
        .map(|section| (section.as_str().to_string(), build_policy(section)))
        .collect()
});

fn build_policy(section: SectionId) -> SectionPolicy {
    match section {
        SectionId::Dashboard => SectionPolicy::new(
            &["dashboard", "resumo", "metricas", "grafico"],
            &["estoque-movimentacao", "tabela-produtos", "importar-planilha"],
            &["#dashboard-cards", "#dashboard-charts"],
        ),
        SectionId::Agendamentos => SectionPolicy::new(
            &["agendamento", "agenda", "horario", "calendario"],
            &["estoque", "produto", "financeiro-lancamento"],
            &["#agendamentos-lista", "#agenda-calendario"],
        ),
        SectionId::Clientes => SectionPolicy::new(
            &["cliente", "contato", "historico"],
            &["estoque", "produto", "movimentacao"],
            &["#clientes-lista", "#cliente-detalhes"],
        ),
        SectionId::Profissionais => SectionPolicy::new(
            &["profissional", "comissao", "especialidade"],
            &["estoque", "produto"],
            &["#profissionais-lista"],
        ),
        SectionId::Servicos => SectionPolicy::new(
            &["servico", "categoria", "preco", "duracao"],
            &["estoque", "movimentacao"],
            &["#servicos-lista"],
        ),
        SectionId::Produtos => SectionPolicy::new(
            &["produto", "estoque", "fornecedor", "preco"],
            &["agendamento", "financeiro-lancamento"],
            &["#produtos-lista", "#produtos-estoque"],
        ),
        SectionId::Estoque => SectionPolicy::new(
            &["estoque", "produto", "movimentacao", "inventario"],
            &["agendamento", "cliente-ficha"],
            &["#estoque-lista", "#estoque-movimentacoes", "#inventario-container"],
        ),
        SectionId::Financeiro => SectionPolicy::new(
            &["financeiro", "receita", "despesa", "caixa"],
            &["estoque", "produto"],
            &["#financeiro-resumo", "#financeiro-lancamentos"],
        ),
        SectionId::Comunidade => SectionPolicy::new(
            &["comunidade", "post", "feed", "comentario"],
            &["estoque", "produto", "financeiro"],
            &["#comunidade-feed"],
        ),
        SectionId::Importar => SectionPolicy::new(
            &["importar", "planilha", "upload", "csv"],
            &["estoque-movimentacao", "agendamento-card"],
            &["#importar-container", "#importar-preview"],
        ),
        SectionId::Sistema => SectionPolicy::new(
            &["sistema", "auditoria", "log"],
            &["estoque", "produto"],
            &["#sistema-auditoria"],
        ),
        SectionId::Configuracoes => SectionPolicy::new(
            &["configuracao", "preferencia", "usuario"],
            &["estoque", "produto"],
            &["#configuracoes-form"],
        ),
        SectionId::Avaliacoes => SectionPolicy::new(
            &["avaliacao", "nota", "comentario"],
            &["estoque", "produto"],
            &["#avaliacoes-lista"],
        ),
    }
}

/// Read-only view of the whole table.
pub fn policy_table() -> &'static BTreeMap<String, SectionPolicy> {
    &POLICY_TABLE
}

pub fn policy_for(section: &str) -> Option<&'static SectionPolicy> {
    POLICY_TABLE.get(section)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_section_is_registered() {
        for section in SectionId::ALL {
            assert!(policy_for(section.as_str()).is_some(), "{section} missing");
        }
        assert_eq!(policy_table().len(), SectionId::ALL.len());
        assert!(policy_for("relatorios").is_none());
    }

    #[test]
    fn test_financeiro_polices_inventory() {
        let policy = policy_for("financeiro").unwrap();
        assert!(policy.forbidden.contains(&"estoque".to_string()));
        assert!(policy.forbidden.contains(&"produto".to_string()));
        assert!(policy.containers.contains(&"#financeiro-resumo".to_string()));
    }

    #[test]
    fn test_sections_never_forbid_own_allowed_keywords() {
        for (section, policy) in policy_table() {
            for allowed in &policy.allowed {
                assert!(
                    policy.forbidden_match(allowed).is_none(),
                    "{section}: `{allowed}` is both allowed and forbidden"
                );
            }
        }
    }
}
