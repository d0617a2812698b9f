//! Stylesheet registry.
//!
//! Tracks registered stylesheet handles, their dependencies and inline CSS,
//! the order they were enqueued, and which have already been printed.

use std::collections::HashMap;

use crate::html::escape_attribute;

/// A registered stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    pub handle: String,
    pub src: Option<String>,
    pub deps: Vec<String>,
    pub ver: Option<String>,
    pub inline: Vec<String>,
}

impl Style {
    /// Render the `<link>` element (when there is a source) followed by the
    /// inline `<style>` block (when there is inline CSS).
    pub fn render(&self) -> String {
        let mut out = String::new();

        if let Some(src) = self.src.as_deref().filter(|s| !s.is_empty()) {
            let href = match &self.ver {
                Some(ver) => {
                    let sep = if src.contains('?') { '&' } else { '?' };
                    format!("{}{}ver={}", src, sep, ver)
                }
                None => src.to_string(),
            };
            out.push_str(&format!(
                "<link rel='stylesheet' id='{}-css' href='{}' media='all' />\n",
                self.handle,
                escape_attribute(&href).replace('\'', "&#039;")
            ));
        }

        if !self.inline.is_empty() {
            out.push_str(&format!(
                "<style id='{}-inline-css'>\n{}\n</style>\n",
                self.handle,
                self.inline.join("\n")
            ));
        }

        out
    }
}

/// Registry of stylesheets for one request.
#[derive(Debug, Clone, Default)]
pub struct StyleRegistry {
    styles: HashMap<String, Style>,
    queue: Vec<String>,
    done: Vec<String>,
}

impl StyleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a stylesheet. Returns `false` if the handle is taken.
    pub fn register(
        &mut self,
        handle: &str,
        src: Option<&str>,
        deps: &[&str],
        ver: Option<&str>,
    ) -> bool {
        if self.styles.contains_key(handle) {
            return false;
        }
        self.styles.insert(
            handle.to_string(),
            Style {
                handle: handle.to_string(),
                src: src.map(String::from),
                deps: deps.iter().map(|d| d.to_string()).collect(),
                ver: ver.map(String::from),
                inline: Vec::new(),
            },
        );
        true
    }

    /// Remove a stylesheet and drop it from the queue.
    pub fn deregister(&mut self, handle: &str) -> bool {
        self.queue.retain(|h| h != handle);
        self.styles.remove(handle).is_some()
    }

    /// Queue a registered stylesheet for printing.
    pub fn enqueue(&mut self, handle: &str) -> bool {
        if !self.styles.contains_key(handle) {
            tracing::debug!(handle, "Ignoring enqueue of unregistered style");
            return false;
        }
        if !self.queue.iter().any(|h| h == handle) {
            self.queue.push(handle.to_string());
        }
        true
    }

    /// Register (if needed) and enqueue a stylesheet.
    pub fn enqueue_style(
        &mut self,
        handle: &str,
        src: Option<&str>,
        deps: &[&str],
        ver: Option<&str>,
    ) -> bool {
        self.register(handle, src, deps, ver);
        self.enqueue(handle)
    }

    /// Attach inline CSS to a registered stylesheet.
    pub fn add_inline(&mut self, handle: &str, css: &str) -> bool {
        match self.styles.get_mut(handle) {
            Some(style) => {
                style.inline.push(css.to_string());
                true
            }
            None => false,
        }
    }

    /// Look up a stylesheet.
    pub fn get(&self, handle: &str) -> Option<&Style> {
        self.styles.get(handle)
    }

    /// Whether `handle` has been printed.
    pub fn is_done(&self, handle: &str) -> bool {
        self.done.iter().any(|h| h == handle)
    }

    /// Printed handles, in print order.
    pub fn done(&self) -> &[String] {
        &self.done
    }

    /// Enqueued handles, in enqueue order.
    pub fn queue(&self) -> &[String] {
        &self.queue
    }

    /// Expand `handles` with their dependencies, dependencies first, leaving
    /// out anything already printed or unregistered.
    pub fn resolve(&self, handles: &[String]) -> Vec<String> {
        #[derive(Clone, Copy, PartialEq)]
        enum State {
            Visiting,
            Visited,
        }

        fn visit<'a>(
            handle: &'a str,
            registry: &'a StyleRegistry,
            state: &mut HashMap<&'a str, State>,
            order: &mut Vec<String>,
        ) {
            if state.contains_key(handle) || registry.is_done(handle) {
                return;
            }
            let Some(style) = registry.styles.get(handle) else {
                tracing::debug!(handle, "Skipping unregistered style dependency");
                return;
            };
            state.insert(handle, State::Visiting);
            for dep in &style.deps {
                if state.get(dep.as_str()) == Some(&State::Visiting) {
                    tracing::debug!(handle, dep = %dep, "Ignoring circular style dependency");
                    continue;
                }
                visit(dep, registry, state, order);
            }
            state.insert(handle, State::Visited);
            order.push(handle.to_string());
        }

        let mut state = HashMap::new();
        let mut order = Vec::new();
        for handle in handles {
            visit(handle, self, &mut state, &mut order);
        }
        order
    }

    /// Render handles without marking them printed.
    pub fn render(&self, handles: &[String]) -> String {
        handles
            .iter()
            .filter_map(|h| self.styles.get(h))
            .map(Style::render)
            .collect()
    }

    /// Print `handles` and their dependencies, marking them printed.
    pub fn print_handles(&mut self, handles: &[String]) -> String {
        let order = self.resolve(handles);
        let html = self.render(&order);
        self.done.extend(order);
        html
    }

    /// Print the queue (the head pass).
    pub fn print_styles(&mut self) -> String {
        let queue = self.queue.clone();
        let html = self.print_handles(&queue);
        tracing::debug!(printed = self.done.len(), "Printed head styles");
        html
    }

    /// Print whatever was enqueued since the last print (the footer pass).
    pub fn print_late_styles(&mut self) -> String {
        let before = self.done.len();
        let queue = self.queue.clone();
        let html = self.print_handles(&queue);
        tracing::debug!(late = self.done.len() - before, "Printed late styles");
        html
    }
}
