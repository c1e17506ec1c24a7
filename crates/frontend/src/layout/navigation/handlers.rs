//! Ordered navigation handler chain.
//!
//! Each registered handler wraps the ones registered before it and decides
//! whether to delegate through [`Next`]. The most recently registered handler
//! runs first.

use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("navigation handler failed for '{section}': {message}")]
pub struct HandlerError {
    pub section: String,
    pub message: String,
}

impl HandlerError {
    pub fn new(section: &str, message: impl Into<String>) -> Self {
        Self {
            section: section.to_string(),
            message: message.into(),
        }
    }
}

pub trait NavigationHandler {
    fn handle(&self, section: &str, next: Next<'_>) -> Result<(), HandlerError>;
}

impl<F> NavigationHandler for F
where
    F: Fn(&str, Next<'_>) -> Result<(), HandlerError>,
{
    fn handle(&self, section: &str, next: Next<'_>) -> Result<(), HandlerError> {
        self(section, next)
    }
}

/// The handlers registered before the current one.
pub struct Next<'a> {
    rest: &'a [Rc<dyn NavigationHandler>],
}

impl Next<'_> {
    pub fn run(self, section: &str) -> Result<(), HandlerError> {
        match self.rest.split_last() {
            Some((handler, rest)) => handler.handle(section, Next { rest }),
            None => Ok(()),
        }
    }
}

/// Wraps a plain callback from an earlier layer (for example a `window.goTo`
/// installed before the runtime) as the innermost step: the rest of the chain
/// runs first, then the callback.
pub fn legacy_callback<F>(call: F) -> Rc<dyn NavigationHandler>
where
    F: Fn(&str) -> Result<(), String> + 'static,
{
    Rc::new(move |section: &str, next: Next<'_>| {
        next.run(section)?;
        call(section).map_err(|message| HandlerError::new(section, message))
    })
}

#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Rc<RefCell<Vec<Rc<dyn NavigationHandler>>>>,
}

impl HandlerChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `handler` as the new outermost layer.
    pub fn register(&self, handler: Rc<dyn NavigationHandler>) {
        self.handlers.borrow_mut().push(handler);
    }

    pub fn len(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.borrow().is_empty()
    }

    pub fn run(&self, section: &str) -> Result<(), HandlerError> {
        // Snapshot so handlers may register further layers while running.
        let snapshot = self.handlers.borrow().clone();
        Next { rest: &snapshot }.run(section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
        delegate: bool,
    ) -> Rc<dyn NavigationHandler> {
        Rc::new(move |section: &str, next: Next<'_>| {
            log.borrow_mut().push(format!("{name}:{section}"));
            if delegate {
                next.run(section)
            } else {
                Ok(())
            }
        })
    }

    #[test]
    fn test_outermost_runs_first_and_delegates() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let chain = HandlerChain::new();
        chain.register(recorder("legacy", log.clone(), true));
        chain.register(recorder("fixes", log.clone(), true));
        chain.register(recorder("melhorias", log.clone(), true));

        chain.run("clientes").unwrap();
        assert_eq!(
            *log.borrow(),
            vec!["melhorias:clientes", "fixes:clientes", "legacy:clientes"]
        );
    }

    #[test]
    fn test_handler_may_stop_delegation() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let chain = HandlerChain::new();
        chain.register(recorder("legacy", log.clone(), true));
        chain.register(recorder("override", log.clone(), false));

        chain.run("estoque").unwrap();
        assert_eq!(*log.borrow(), vec!["override:estoque"]);
    }

    #[test]
    fn test_error_propagates_to_caller() {
        let chain = HandlerChain::new();
        chain.register(Rc::new(
            |section: &str, _next: Next<'_>| -> Result<(), HandlerError> {
                Err(HandlerError::new(section, "legacy goTo missing"))
            },
        ));
        chain.register(Rc::new(|section: &str, next: Next<'_>| next.run(section)));

        let err = chain.run("financeiro").unwrap_err();
        assert_eq!(err.section, "financeiro");
        assert!(chain.len() == 2 && !chain.is_empty());
    }

    #[test]
    fn test_legacy_callback_maps_errors() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let seen = calls.clone();
        let chain = HandlerChain::new();
        chain.register(legacy_callback(move |section| {
            seen.borrow_mut().push(section.to_string());
            Err("TypeError: showSection is not a function".to_string())
        }));

        let err = chain.run("agendamentos").unwrap_err();
        assert_eq!(
            err,
            HandlerError::new("agendamentos", "TypeError: showSection is not a function")
        );
        assert_eq!(*calls.borrow(), vec!["agendamentos".to_string()]);
    }

    #[test]
    fn test_empty_chain_is_ok() {
        assert!(HandlerChain::new().run("dashboard").is_ok());
    }
}
