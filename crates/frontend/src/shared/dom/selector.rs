//! Minimal CSS selector support for the in-memory DOM.
//!
//! Supported: `tag`, `*`, `#id`, `.class`, `[attr]`, `[attr=value]`,
//! compounds of those (`a.nav-link[data-section]`), the descendant
//! combinator (`.sidebar a`) and comma-separated lists.

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Compound {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<(String, Option<String>)>,
}

/// Compounds left to right; each one must match an ancestor of the next.
#[derive(Debug, Clone, PartialEq)]
pub struct Complex(pub Vec<Compound>);

#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList(pub Vec<Complex>);

/// What a selector needs to know about an element.
pub trait SelectorSubject: Sized {
    fn tag(&self) -> String;
    fn id(&self) -> String;
    fn has_class(&self, class: &str) -> bool;
    fn attr(&self, name: &str) -> Option<String>;
    fn parent_element(&self) -> Option<Self>;
}

impl SelectorList {
    pub fn parse(input: &str) -> Option<Self> {
        let groups = split_top_level(input, ',');
        let mut list = Vec::with_capacity(groups.len());
        for group in groups {
            let group = group.trim();
            if group.is_empty() {
                return None;
            }
            let mut compounds = Vec::new();
            for part in split_whitespace_top_level(group) {
                compounds.push(parse_compound(&part)?);
            }
            list.push(Complex(compounds));
        }
        if list.is_empty() {
            None
        } else {
            Some(SelectorList(list))
        }
    }

    pub fn matches<S: SelectorSubject>(&self, subject: &S) -> bool {
        self.0.iter().any(|complex| complex.matches(subject))
    }
}

impl Complex {
    fn matches<S: SelectorSubject>(&self, subject: &S) -> bool {
        let Some((last, rest)) = self.0.split_last() else {
            return false;
        };
        if !last.matches(subject) {
            return false;
        }
        // Greedy right-to-left: the nearest matching ancestor is always safe
        // for descendant-only combinators.
        let mut remaining = rest;
        let mut cursor = subject.parent_element();
        while let Some((needed, before)) = remaining.split_last() {
            loop {
                match cursor {
                    Some(ref node) if needed.matches(node) => {
                        cursor = node.parent_element();
                        break;
                    }
                    Some(node) => cursor = node.parent_element(),
                    None => return false,
                }
            }
            remaining = before;
        }
        true
    }
}

impl Compound {
    pub fn matches<S: SelectorSubject>(&self, subject: &S) -> bool {
        if let Some(tag) = &self.tag {
            if !subject.tag().eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if subject.id() != *id {
                return false;
            }
        }
        if !self.classes.iter().all(|c| subject.has_class(c)) {
            return false;
        }
        self.attrs.iter().all(|(name, value)| match (subject.attr(name), value) {
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => actual == *expected,
            (None, _) => false,
        })
    }
}

fn parse_compound(part: &str) -> Option<Compound> {
    let mut compound = Compound::default();
    let chars: Vec<char> = part.chars().collect();
    let mut i = 0;

    let read_ident = |start: usize| -> (String, usize) {
        let mut end = start;
        while end < chars.len() && (chars[end].is_alphanumeric() || chars[end] == '-' || chars[end] == '_') {
            end += 1;
        }
        (chars[start..end].iter().collect(), end)
    };

    if i < chars.len() && chars[i] == '*' {
        i += 1;
    } else if i < chars.len() && chars[i].is_alphabetic() {
        let (tag, end) = read_ident(i);
        compound.tag = Some(tag);
        i = end;
    }

    while i < chars.len() {
        match chars[i] {
            '#' => {
                let (id, end) = read_ident(i + 1);
                if id.is_empty() {
                    return None;
                }
                compound.id = Some(id);
                i = end;
            }
            '.' => {
                let (class, end) = read_ident(i + 1);
                if class.is_empty() {
                    return None;
                }
                compound.classes.push(class);
                i = end;
            }
            '[' => {
                let close = chars[i..].iter().position(|c| *c == ']')? + i;
                let inner: String = chars[i + 1..close].iter().collect();
                let attr = match inner.split_once('=') {
                    Some((name, value)) => {
                        let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
                        (name.trim().to_string(), Some(value.to_string()))
                    }
                    None => (inner.trim().to_string(), None),
                };
                if attr.0.is_empty() {
                    return None;
                }
                compound.attrs.push(attr);
                i = close + 1;
            }
            _ => return None,
        }
    }
    Some(compound)
}

fn split_top_level(input: &str, separator: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_brackets = false;
    for c in input.chars() {
        match c {
            '[' => in_brackets = true,
            ']' => in_brackets = false,
            _ => {}
        }
        if c == separator && !in_brackets {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    parts.push(current);
    parts
}

fn split_whitespace_top_level(input: &str) -> Vec<String> {
    split_top_level(&input.replace(char::is_whitespace, " "), ' ')
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compound_and_lists() {
        let list = SelectorList::parse("a.nav-link[data-section=clientes], #financeiro-resumo").unwrap();
        assert_eq!(list.0.len(), 2);
        let first = &list.0[0].0[0];
        assert_eq!(first.tag.as_deref(), Some("a"));
        assert_eq!(first.classes, vec!["nav-link".to_string()]);
        assert_eq!(
            first.attrs,
            vec![("data-section".to_string(), Some("clientes".to_string()))]
        );
        assert_eq!(list.0[1].0[0].id.as_deref(), Some("financeiro-resumo"));
    }

    #[test]
    fn test_descendant_combinator() {
        let list = SelectorList::parse(".sidebar   a").unwrap();
        assert_eq!(list.0[0].0.len(), 2);
    }

    #[test]
    fn test_invalid_selectors() {
        assert!(SelectorList::parse("").is_none());
        assert!(SelectorList::parse("div > p").is_none());
        assert!(SelectorList::parse("#").is_none());
        assert!(SelectorList::parse("a,").is_none());
    }
}
