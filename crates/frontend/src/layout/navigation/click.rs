//! Разбор текста обработчика ссылки сайдбара.

/// Sidebar links intercepted by the document click listener.
pub const SIDEBAR_LINK_SELECTOR: &str = ".sidebar a";

/// Attributes holding the handler text, in lookup order.
pub const HANDLER_ATTRIBUTES: [&str; 2] = ["onclick", "data-handler"];

const NAVIGATION_CALLS: [&str; 4] = ["window.goTo", "goTo", "showSection", "navigateTo"];

/// Extracts the section id from handler text such as `goTo('clientes')`,
/// `showSection("estoque")`, `navigateTo('servicos')` or
/// `window.goTo('agenda'); return false;`.
pub fn parse_section_handler(text: &str) -> Option<String> {
    let text = text.trim();
    for call in NAVIGATION_CALLS {
        let mut search_from = 0;
        while let Some(pos) = text[search_from..].find(call) {
            let start = search_from + pos;
            search_from = start + call.len();

            // `goTo` inside `window.goTo` is handled by the longer form;
            // `xgoTo(` is a different function.
            if let Some(prev) = text[..start].chars().next_back() {
                if prev.is_alphanumeric() || prev == '_' {
                    continue;
                }
            }
            if let Some(section) = quoted_argument(&text[search_from..]) {
                return Some(section);
            }
        }
    }
    None
}

/// `('x')` / `("x")` with optional whitespace, returns `x` when non-empty.
fn quoted_argument(rest: &str) -> Option<String> {
    let rest = rest.trim_start().strip_prefix('(')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    let rest = &rest[1..];
    let end = rest.find(quote)?;
    let section = rest[..end].trim();
    let after = rest[end + 1..].trim_start();
    if section.is_empty() || !after.starts_with(')') {
        return None;
    }
    Some(section.to_string())
}
