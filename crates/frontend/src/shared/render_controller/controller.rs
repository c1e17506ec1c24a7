use super::policy::{policy_for, policy_table};
use crate::shared::dom::DomHost;
use crate::shared::state::StateManager;
use crate::shared::timing::Scheduler;
use contracts::shared::content_policy::SectionPolicy;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

/// Which text an element is judged by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemovalGranularity {
    /// id + classes + full text of the subtree. A wrapper whose descendants
    /// mention a forbidden keyword is removed together with them.
    #[default]
    Subtree,
    /// id + classes + the element's direct text only. Only the offending
    /// element goes; its ancestors survive.
    OwnContent,
}

/// Polices rendered content against the per-section policy table.
#[derive(Clone)]
pub struct RenderController<D: DomHost> {
    dom: D,
    state: StateManager,
    scheduler: Rc<dyn Scheduler>,
    granularity: RemovalGranularity,
    pending_cleanups: Rc<RefCell<HashSet<String>>>,
    guarded: Rc<RefCell<HashSet<String>>>,
}

impl<D: DomHost> RenderController<D> {
    pub fn new(dom: D, state: StateManager, scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            dom,
            state,
            scheduler,
            granularity: RemovalGranularity::default(),
            pending_cleanups: Rc::new(RefCell::new(HashSet::new())),
            guarded: Rc::new(RefCell::new(HashSet::new())),
        }
    }

    pub fn with_granularity(mut self, granularity: RemovalGranularity) -> Self {
        self.granularity = granularity;
        self
    }

    pub fn granularity(&self) -> RemovalGranularity {
        self.granularity
    }

    pub fn policies(&self) -> &'static BTreeMap<String, SectionPolicy> {
        policy_table()
    }

    pub fn is_registered(&self, section: &str) -> bool {
        policy_for(section).is_some()
    }

    /// `false` when `content` contains one of the section's forbidden keywords.
    /// Sections without a policy are permissive.
    pub fn is_content_allowed(&self, section: &str, content: &str) -> bool {
        match policy_for(section) {
            Some(policy) => policy.forbidden_match(content).is_none(),
            None => {
                log::warn!("⚠️ No content policy for section '{}', allowing", section);
                true
            }
        }
    }

    pub fn validate_element(&self, element: &D::Node, section: &str) -> bool {
        let content = self.combined_content(element);
        let Some(policy) = policy_for(section) else {
            return self.is_content_allowed(section, &content);
        };
        match policy.forbidden_match(&content) {
            Some(keyword) => {
                log::debug!(
                    "🚫 '{}' rejects element #{} (keyword '{}')",
                    section,
                    self.dom.id(element),
                    keyword
                );
                false
            }
            None => true,
        }
    }

    fn combined_content(&self, element: &D::Node) -> String {
        let text = match self.granularity {
            RemovalGranularity::Subtree => self.dom.text_content(element),
            RemovalGranularity::OwnContent => self.dom.own_text(element),
        };
        format!(
            "{} {} {}",
            self.dom.id(element),
            self.dom.class_list(element).join(" "),
            text
        )
        .to_lowercase()
    }

    /// Inside, equal to, or wrapping one of the section's trusted containers.
    fn is_protected(&self, element: &D::Node, policy: &SectionPolicy) -> bool {
        policy.containers.iter().any(|selector| {
            self.dom.closest(element, selector).is_some()
                || !self.dom.query_all(Some(element), selector).is_empty()
        })
    }

    /// Removes every descendant of the section that violates its policy.
    /// Returns the number of removed elements.
    pub fn clean_section(&self, section: &str) -> usize {
        let Some(policy) = policy_for(section) else {
            log::warn!("⚠️ clean_section: no policy for '{}'", section);
            return 0;
        };
        let Some(root) = self.dom.element_by_id(section) else {
            log::debug!("clean_section: '{}' not in DOM", section);
            return 0;
        };

        let mut removed = 0;
        for element in self.dom.descendants(&root) {
            // Already gone with a removed ancestor.
            if !self.dom.is_connected(&element) {
                continue;
            }
            if self.is_protected(&element, policy) {
                continue;
            }
            if !self.validate_element(&element, section) {
                self.dom.remove(&element);
                removed += 1;
            }
        }

        if removed > 0 {
            log::info!("🧽 '{}': removed {} foreign element(s)", section, removed);
        }
        removed
    }

    pub fn clean_all(&self) -> usize {
        policy_table()
            .keys()
            .map(|section| self.clean_section(section))
            .sum()
    }

    /// Cleans `section` after `delay_ms`. Requests arriving while one is
    /// already pending for the section are merged into it.
    pub fn schedule_cleanup(&self, section: &str, delay_ms: u32) {
        if !self.pending_cleanups.borrow_mut().insert(section.to_string()) {
            return;
        }
        let controller = self.clone();
        let section = section.to_string();
        self.scheduler.schedule_once(
            delay_ms,
            Box::new(move || {
                controller.pending_cleanups.borrow_mut().remove(&section);
                controller.clean_section(&section);
            }),
        );
    }

    /// Attaches an addition observer to every registered section present in
    /// the DOM. Returns how many new guards were installed.
    pub fn setup_section_guards(&self) -> usize {
        let delay = self.state.config().guard_delay_ms;
        let mut installed = 0;

        for (section, policy) in policy_table() {
            if self.guarded.borrow().contains(section) {
                continue;
            }
            let Some(root) = self.dom.element_by_id(section) else {
                continue;
            };

            let controller = self.clone();
            let section_key = section.clone();
            self.dom.observe_additions(
                &root,
                Rc::new(move |added: Vec<D::Node>| {
                    let violating = added.iter().any(|node| {
                        controller.dom.is_connected(node)
                            && !controller.is_protected(node, policy)
                            && !controller.validate_element(node, &section_key)
                    });
                    if violating {
                        controller.schedule_cleanup(&section_key, delay);
                    }
                }),
            );
            self.guarded.borrow_mut().insert(section.clone());
            installed += 1;
        }

        log::info!("🛡️ Section guards installed: {}", installed);
        installed
    }

    /// Synchronous check of what a renderer reports it just added.
    /// Cleans the section when anything violates; returns the removed count.
    pub fn reconcile(&self, section: &str, rendered: &[D::Node]) -> usize {
        let Some(policy) = policy_for(section) else {
            log::warn!("⚠️ reconcile: no policy for '{}'", section);
            return 0;
        };
        let violating = rendered.iter().any(|node| {
            self.dom.is_connected(node)
                && !self.is_protected(node, policy)
                && !self.validate_element(node, section)
        });
        if violating {
            self.clean_section(section)
        } else {
            0
        }
    }

    /// Guarded render: admission check, loading flag, render, cleanup.
    ///
    /// `Ok(None)` means the render was not admitted. A render error clears
    /// the loading flag and is returned unchanged.
    pub fn safe_render<T, E, F>(&self, section: &str, render: F) -> Result<Option<T>, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if !self.state.can_load(section) {
            log::warn!("⚠️ safe_render: '{}' not admitted", section);
            return Ok(None);
        }
        self.state.set_loading(section, true);

        match render() {
            Ok(value) => {
                self.clean_section(section);
                self.state.set_loading(section, false);
                Ok(Some(value))
            }
            Err(e) => {
                self.state.set_loading(section, false);
                Err(e)
            }
        }
    }
}
