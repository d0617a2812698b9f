//! Template enhancement output buffer.
//!
//! The [`Enhancer`] decides whether the rendered template should be
//! captured, opens the capturing scope on an [`OutputStack`], and on flush
//! runs the registered transforms over the captured document.
//!
//! Lifecycle of one request:
//!
//! 1. [`Enhancer::start`] checks [`Enhancer::should_buffer`]. If false, nothing
//!    is opened and no event fires.
//! 2. Otherwise a non-flushable scope named [`BUFFER_NAME`] is opened and the
//!    "started" listeners run. They may register further transforms.
//! 3. When the scope is end-flushed, [`Enhancer::finalize`] runs the
//!    transforms (HTML responses only) and fires the "finalized" listeners
//!    with the final text.
//! 4. When the scope is end-cleaned instead, nothing runs.

use std::cell::RefCell;
use std::fmt;
use std::io::Write;
use std::rc::Rc;

use crate::error::{Result, TrellisError};
use crate::hooks::{HookId, HookList};

use super::buffer::OutputStack;

/// Name of the scope opened by [`Enhancer::start`].
pub const BUFFER_NAME: &str = "finalize_template_enhancement_output_buffer";

/// Content type assumed until one is set.
pub const DEFAULT_CONTENT_TYPE: &str = "text/html";

/// Explicit decision overriding the transform-based default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferOverride {
    /// Buffer even when no transform is registered.
    Force,
    /// Never buffer. Wins over every `Force` and every transform.
    Block,
}

/// A transform receives the current text and the original captured text,
/// and returns the full replacement text.
pub type TransformFn = Rc<dyn Fn(&str, &str) -> Result<String>>;

type StartedFn = Rc<dyn Fn(&Enhancer)>;
type FinalizedFn = Rc<dyn Fn(&str)>;

struct EnhancerState {
    overrides: HookList<BufferOverride>,
    transforms: HookList<TransformFn>,
    started: HookList<StartedFn>,
    finalized: HookList<FinalizedFn>,
    content_type: String,
    started_count: usize,
    finalized_count: usize,
}

impl Default for EnhancerState {
    fn default() -> Self {
        Self {
            overrides: HookList::new(),
            transforms: HookList::new(),
            started: HookList::new(),
            finalized: HookList::new(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            started_count: 0,
            finalized_count: 0,
        }
    }
}

/// Shared handle to the enhancement pipeline of one request.
///
/// Clones share state, so a clone captured in the scope's finalize handler
/// sees transforms registered after the scope was opened.
#[derive(Clone, Default)]
pub struct Enhancer {
    state: Rc<RefCell<EnhancerState>>,
}

impl Enhancer {
    /// Create a pipeline with no transforms and no overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transform. Lower priorities run first; equal priorities
    /// run in registration order.
    pub fn add_transform<F>(&self, name: impl Into<String>, priority: i32, transform: F) -> HookId
    where
        F: Fn(&str, &str) -> Result<String> + 'static,
    {
        self.state
            .borrow_mut()
            .transforms
            .add(name, priority, Rc::new(transform))
    }

    /// Register a transform that only needs the current text.
    pub fn add_filter<F>(&self, name: impl Into<String>, priority: i32, filter: F) -> HookId
    where
        F: Fn(&str) -> Result<String> + 'static,
    {
        self.add_transform(name, priority, move |filtered, _original| filter(filtered))
    }

    /// Remove every transform registered under `name`.
    pub fn remove_transform(&self, name: &str) -> bool {
        self.state.borrow_mut().transforms.remove_named(name) > 0
    }

    /// Check whether a transform is registered under `name`.
    pub fn has_transform(&self, name: &str) -> bool {
        self.state.borrow().transforms.contains(name)
    }

    /// Check whether any transform is registered.
    pub fn has_transforms(&self) -> bool {
        !self.state.borrow().transforms.is_empty()
    }

    /// Transform names in execution order.
    pub fn transform_names(&self) -> Vec<String> {
        self.state
            .borrow()
            .transforms
            .names()
            .into_iter()
            .map(String::from)
            .collect()
    }

    /// Set a named buffering override, replacing any earlier one with the
    /// same name.
    pub fn set_override(&self, name: impl Into<String>, value: BufferOverride) {
        let name = name.into();
        let mut state = self.state.borrow_mut();
        state.overrides.remove_named(&name);
        state.overrides.add(name, 0, value);
    }

    /// Remove a named buffering override.
    pub fn remove_override(&self, name: &str) -> bool {
        self.state.borrow_mut().overrides.remove_named(name) > 0
    }

    /// Listen for the "buffer started" event.
    pub fn on_started<F>(&self, name: impl Into<String>, priority: i32, listener: F) -> HookId
    where
        F: Fn(&Enhancer) + 'static,
    {
        self.state
            .borrow_mut()
            .started
            .add(name, priority, Rc::new(listener))
    }

    /// Check whether a "buffer started" listener is registered under `name`.
    pub fn has_started_listener(&self, name: &str) -> bool {
        self.state.borrow().started.contains(name)
    }

    /// Listen for the "finalized" event, which carries the final text.
    pub fn on_finalized<F>(&self, name: impl Into<String>, priority: i32, listener: F) -> HookId
    where
        F: Fn(&str) + 'static,
    {
        self.state
            .borrow_mut()
            .finalized
            .add(name, priority, Rc::new(listener))
    }

    /// Set the response content type. Only HTML responses are transformed.
    pub fn set_content_type(&self, content_type: &str) -> Result<()> {
        let mime = content_type.split(';').next().unwrap_or_default().trim();
        match mime.split_once('/') {
            Some((main, sub)) if !main.is_empty() && !sub.is_empty() => {
                self.state.borrow_mut().content_type = content_type.trim().to_string();
                Ok(())
            }
            _ => Err(TrellisError::InvalidMimeType {
                mime: content_type.to_string(),
            }),
        }
    }

    /// The response content type.
    pub fn content_type(&self) -> String {
        self.state.borrow().content_type.clone()
    }

    /// Whether the response content type is HTML.
    pub fn is_html_response(&self) -> bool {
        is_html_content_type(&self.state.borrow().content_type)
    }

    /// Whether the template output should be captured.
    pub fn should_buffer(&self) -> bool {
        let state = self.state.borrow();
        if state.overrides.iter().any(|o| *o == BufferOverride::Block) {
            return false;
        }
        !state.transforms.is_empty() || state.overrides.iter().any(|o| *o == BufferOverride::Force)
    }

    /// Open the enhancement scope on `stack`.
    ///
    /// Returns `false` without touching the stack when buffering is not
    /// wanted.
    pub fn start<W: Write>(&self, stack: &mut OutputStack<W>) -> bool {
        if !self.should_buffer() {
            tracing::debug!("Template enhancement buffer not needed");
            return false;
        }

        let enhancer = self.clone();
        stack.start_with_handler(
            BUFFER_NAME,
            Box::new(move |content: &str| enhancer.finalize(content)),
            false,
        );

        let listeners = {
            let mut state = self.state.borrow_mut();
            state.started_count += 1;
            state.started.snapshot()
        };
        for (name, listener) in listeners {
            tracing::debug!(listener = %name, "Running buffer started listener");
            listener(self);
        }
        true
    }

    /// Run the transforms over `content` and fire the "finalized" event.
    ///
    /// With no transforms, or a non-HTML response, `content` is returned
    /// unchanged. Transform errors are returned as
    /// [`TrellisError::TransformFailed`] and skip the "finalized" event.
    pub fn finalize(&self, content: &str) -> Result<String> {
        let (transforms, is_html) = {
            let state = self.state.borrow();
            (
                state.transforms.snapshot(),
                is_html_content_type(&state.content_type),
            )
        };

        let output = if transforms.is_empty() || !is_html {
            content.to_string()
        } else {
            let mut filtered = content.to_string();
            for (name, transform) in transforms {
                tracing::debug!(transform = %name, "Running output transform");
                filtered = transform(&filtered, content).map_err(|e| match e {
                    TrellisError::TransformFailed { .. } => e,
                    other => TrellisError::TransformFailed {
                        transform: name.clone(),
                        message: other.to_string(),
                    },
                })?;
            }
            filtered
        };

        let listeners = {
            let mut state = self.state.borrow_mut();
            state.finalized_count += 1;
            state.finalized.snapshot()
        };
        for (_, listener) in listeners {
            listener(&output);
        }
        Ok(output)
    }

    /// How many times the "buffer started" event fired.
    pub fn did_started(&self) -> usize {
        self.state.borrow().started_count
    }

    /// How many times the "finalized" event fired.
    pub fn did_finalized(&self) -> usize {
        self.state.borrow().finalized_count
    }
}

impl fmt::Debug for Enhancer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Enhancer")
            .field("transforms", &state.transforms.names())
            .field("overrides", &state.overrides.names())
            .field("content_type", &state.content_type)
            .finish()
    }
}

/// Whether `content_type` names an HTML document.
pub fn is_html_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}
