//! Checkpoints: named extension points exposing candidate lists.
//!
//! Every kind's candidate list passes through its checkpoint before any file
//! lookup happens. Observers may inspect, reorder, extend or empty the list.

use std::fmt;

use crate::hooks::{HookId, HookList};

use super::kind::TemplateKind;

type ObserverFn = Box<dyn Fn(TemplateKind, &mut Vec<String>)>;

struct Observer {
    kind: Option<TemplateKind>,
    callback: ObserverFn,
}

/// Registry of checkpoint observers.
#[derive(Default)]
pub struct Checkpoints {
    observers: HookList<Observer>,
}

impl Checkpoints {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe the checkpoint of a single kind.
    pub fn observe<F>(
        &mut self,
        kind: TemplateKind,
        name: impl Into<String>,
        priority: i32,
        callback: F,
    ) -> HookId
    where
        F: Fn(&mut Vec<String>) + 'static,
    {
        self.observers.add(
            name,
            priority,
            Observer {
                kind: Some(kind),
                callback: Box::new(move |_, list| callback(list)),
            },
        )
    }

    /// Observe every checkpoint.
    pub fn observe_all<F>(&mut self, name: impl Into<String>, priority: i32, callback: F) -> HookId
    where
        F: Fn(TemplateKind, &mut Vec<String>) + 'static,
    {
        self.observers.add(
            name,
            priority,
            Observer {
                kind: None,
                callback: Box::new(callback),
            },
        )
    }

    /// Remove an observer.
    pub fn remove(&mut self, id: HookId) -> bool {
        self.observers.remove(id)
    }

    /// Check whether an observer is registered under `name`.
    pub fn has_observer(&self, name: &str) -> bool {
        self.observers.contains(name)
    }

    /// Pass `templates` through the checkpoint for `kind`.
    pub fn emit(&self, kind: TemplateKind, templates: &mut Vec<String>) {
        tracing::debug!(
            checkpoint = %kind.checkpoint_name(),
            candidates = templates.len(),
            "Emitting template hierarchy"
        );

        for observer in self.observers.iter() {
            if observer.kind.is_none_or(|k| k == kind) {
                (observer.callback)(kind, templates);
            }
        }
    }
}

impl fmt::Debug for Checkpoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checkpoints")
            .field("observers", &self.observers.names())
            .finish()
    }
}
