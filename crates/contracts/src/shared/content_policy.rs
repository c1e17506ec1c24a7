use serde::{Deserialize, Serialize};

/// Политика контента одной секции.
///
/// `forbidden` - ключевые слова, которым не место в секции (сравнение без
/// учёта регистра, по подстроке). `containers` - селекторы доверенных
/// контейнеров: их содержимое никогда не удаляется и не проверяется.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SectionPolicy {
    pub allowed: Vec<String>,
    pub forbidden: Vec<String>,
    pub containers: Vec<String>,
}

impl SectionPolicy {
    pub fn new(allowed: &[&str], forbidden: &[&str], containers: &[&str]) -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            allowed: owned(allowed),
            forbidden: owned(forbidden),
            containers: owned(containers),
        }
    }

    /// First forbidden keyword found in `content`, if any.
    pub fn forbidden_match(&self, content: &str) -> Option<&str> {
        let haystack = content.to_lowercase();
        self.forbidden
            .iter()
            .find(|keyword| haystack.contains(&keyword.to_lowercase()))
            .map(String::as_str)
    }
}
