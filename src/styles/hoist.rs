//! Hoisting of late-printed styles into the head.
//!
//! Classic themes print stylesheets while the body renders, after the head
//! has already been sent. With the whole document captured by the
//! enhancement buffer, those late styles can be moved back up:
//!
//! 1. [`StyleHoister::print_head`] prints the early styles followed by a
//!    uniquely marked placeholder element.
//! 2. Late styles print in the footer as usual.
//! 3. The hoisting transform marks any late styles that never printed as
//!    printed, removes every late `<link>`/`<style>` from the document and
//!    puts them all, in print order, where the placeholder was.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use uuid::Uuid;

use crate::enhancement::Enhancer;
use crate::hooks::DEFAULT_PRIORITY;
use crate::html::TagProcessor;

use super::registry::StyleRegistry;

/// Id of the placeholder element printed in the head.
pub const PLACEHOLDER_ID: &str = "late-styles-placeholder";

/// Name of the hoisting transform and its started listener.
pub const HOIST_HOOK: &str = "hoist_late_printed_styles";

/// Moves late-printed styles into the head of the captured document.
#[derive(Debug, Clone)]
pub struct StyleHoister {
    registry: Rc<RefCell<StyleRegistry>>,
    marker: String,
    head_printed: Rc<Cell<Option<usize>>>,
}

impl StyleHoister {
    /// Create a hoister over a shared registry.
    pub fn new(registry: Rc<RefCell<StyleRegistry>>) -> Self {
        Self {
            registry,
            marker: format!("late_styles_placeholder:{}", Uuid::new_v4()),
            head_printed: Rc::new(Cell::new(None)),
        }
    }

    /// The shared registry.
    pub fn registry(&self) -> &Rc<RefCell<StyleRegistry>> {
        &self.registry
    }

    /// The placeholder element printed in the head.
    pub fn placeholder(&self) -> String {
        format!("<style id=\"{}\">/*{}*/</style>", PLACEHOLDER_ID, self.marker)
    }

    /// Print the head styles followed by the placeholder.
    pub fn print_head(&self) -> String {
        let mut registry = self.registry.borrow_mut();
        let mut html = registry.print_styles();
        self.head_printed.set(Some(registry.done().len()));
        html.push_str(&self.placeholder());
        html.push('\n');
        html
    }

    /// Print styles enqueued since the head.
    pub fn print_footer(&self) -> String {
        self.registry.borrow_mut().print_late_styles()
    }

    /// Handles printed after the head, in print order.
    pub fn late_handles(&self) -> Vec<String> {
        match self.head_printed.get() {
            Some(count) => self.registry.borrow().done()[count..].to_vec(),
            None => Vec::new(),
        }
    }

    /// Move late styles in `html` to the placeholder.
    ///
    /// Returns `html` unchanged when the placeholder is absent.
    pub fn hoist(&self, html: &str) -> String {
        if !html.contains(&self.marker) {
            tracing::debug!("No late style placeholder in document");
            return html.to_string();
        }

        // Styles enqueued after the head still belong in it even when no
        // footer pass printed them.
        let unprinted = self.registry.borrow_mut().print_late_styles();
        if !unprinted.is_empty() {
            tracing::debug!("Collected late styles the footer never printed");
        }

        let late = self.late_handles();
        let block = self.registry.borrow().render(&late);
        let late_ids: Vec<(String, String)> = late
            .iter()
            .map(|h| (format!("{}-css", h), format!("{}-inline-css", h)))
            .collect();

        let mut processor = TagProcessor::new(html);
        let mut removed = 0usize;
        while processor.next_tag() {
            let tag = processor.tag().unwrap_or_default().to_string();
            if tag != "LINK" && tag != "STYLE" {
                continue;
            }
            let id = processor.get_attribute("id").unwrap_or_default();

            if tag == "STYLE"
                && id == PLACEHOLDER_ID
                && processor
                    .modifiable_text()
                    .is_some_and(|text| text.contains(&self.marker))
            {
                processor.replace_element(&block);
                continue;
            }

            let is_late = late_ids.iter().any(|(css, inline)| {
                (tag == "LINK" && id == *css) || (tag == "STYLE" && id == *inline)
            });
            if is_late {
                processor.remove_element();
                removed += 1;
            }
        }

        tracing::debug!(hoisted = late.len(), removed, "Hoisted late styles");
        processor.into_html()
    }

    /// Register the hoisting transform unless it is already registered.
    pub fn hoist_late_printed_styles(&self, enhancer: &Enhancer) {
        if enhancer.has_transform(HOIST_HOOK) {
            return;
        }
        let hoister = self.clone();
        enhancer.add_filter(HOIST_HOOK, DEFAULT_PRIORITY, move |html| {
            Ok(hoister.hoist(html))
        });
    }

    /// Register the hoisting transform when the buffer starts.
    pub fn install(&self, enhancer: &Enhancer) {
        if enhancer.has_started_listener(HOIST_HOOK) {
            return;
        }
        let hoister = self.clone();
        enhancer.on_started(HOIST_HOOK, DEFAULT_PRIORITY, move |e| {
            hoister.hoist_late_printed_styles(e)
        });
    }
}
