//! Адреса API для загрузчиков секций.
//!
//! Сервер BIOMA отдаёт фронтенд и API с одного origin, поэтому база берётся
//! из `window.location.origin`.

/// Origin текущей страницы, например "https://bioma.example.com".
/// Пустая строка вне браузера.
pub fn api_base() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default()
}

/// Full API URL for `path` on the current origin.
pub fn api_url(path: &str) -> String {
    join_url(&api_base(), path)
}

/// Joins base and path with exactly one `/` between them.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", base, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url_slashes() {
        assert_eq!(
            join_url("https://bioma.app", "/api/clientes"),
            "https://bioma.app/api/clientes"
        );
        assert_eq!(join_url("https://bioma.app/", "api/servicos"), "https://bioma.app/api/servicos");
        assert_eq!(join_url("", "/api/estoque"), "/api/estoque");
    }
}
