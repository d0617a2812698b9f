//! Nested output buffering scopes.
//!
//! An [`OutputStack`] collects text written during rendering. Each scope
//! accumulates text until it is closed; closing by flush runs the scope's
//! finalize handler and forwards the result to the scope below (or to the
//! sink when the stack is empty). Closing by clean discards the text.

use std::fmt;
use std::io::Write;

use serde::Serialize;

use crate::error::{Result, TrellisError};

/// Callback run on a scope's content when it is flushed.
pub type FinalizeHandler = Box<dyn FnMut(&str) -> Result<String>>;

struct Scope {
    name: String,
    buffer: String,
    flushable: bool,
    handler: Option<FinalizeHandler>,
}

/// Snapshot of the innermost scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopeStatus {
    pub name: String,
    pub level: usize,
    pub flushable: bool,
    pub has_handler: bool,
}

/// A stack of buffering scopes over a sink.
pub struct OutputStack<W: Write> {
    sink: W,
    scopes: Vec<Scope>,
}

impl<W: Write> OutputStack<W> {
    /// Create an empty stack writing to `sink`.
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            scopes: Vec::new(),
        }
    }

    /// Number of open scopes.
    pub fn level(&self) -> usize {
        self.scopes.len()
    }

    /// Open a plain, flushable scope with no handler.
    pub fn start(&mut self, name: impl Into<String>) {
        self.push(name.into(), None, true);
    }

    /// Open a scope with a finalize handler.
    pub fn start_with_handler(
        &mut self,
        name: impl Into<String>,
        handler: FinalizeHandler,
        flushable: bool,
    ) {
        self.push(name.into(), Some(handler), flushable);
    }

    fn push(&mut self, name: String, handler: Option<FinalizeHandler>, flushable: bool) {
        tracing::debug!(scope = %name, level = self.scopes.len() + 1, "Opening output scope");
        self.scopes.push(Scope {
            name,
            buffer: String::new(),
            flushable,
            handler,
        });
    }

    /// Write text to the innermost scope, or to the sink if none is open.
    pub fn write(&mut self, text: &str) -> Result<()> {
        match self.scopes.last_mut() {
            Some(scope) => scope.buffer.push_str(text),
            None => self.sink.write_all(text.as_bytes())?,
        }
        Ok(())
    }

    /// Content accumulated in the innermost scope.
    pub fn contents(&self) -> Option<&str> {
        self.scopes.last().map(|s| s.buffer.as_str())
    }

    /// Flush the innermost scope's content to its parent without closing it.
    ///
    /// Returns `Ok(false)` and leaves the content in place when the scope is
    /// not flushable.
    pub fn flush(&mut self) -> Result<bool> {
        let scope = self
            .scopes
            .last_mut()
            .ok_or(TrellisError::NoActiveBuffer { operation: "flush" })?;

        if !scope.flushable {
            tracing::debug!(scope = %scope.name, "Rejected flush of non-flushable scope");
            return Ok(false);
        }

        let content = std::mem::take(&mut scope.buffer);
        let output = match scope.handler.as_mut() {
            Some(handler) => handler(&content)?,
            None => content,
        };
        self.write_below(self.scopes.len() - 1, &output)?;
        Ok(true)
    }

    /// Empty the innermost scope, keeping it open.
    pub fn clean(&mut self) -> Result<()> {
        let scope = self
            .scopes
            .last_mut()
            .ok_or(TrellisError::NoActiveBuffer { operation: "clean" })?;
        scope.buffer.clear();
        Ok(())
    }

    /// Close the innermost scope and discard its content. The handler does
    /// not run.
    pub fn end_clean(&mut self) -> Result<()> {
        let scope = self
            .scopes
            .pop()
            .ok_or(TrellisError::NoActiveBuffer { operation: "end_clean" })?;
        tracing::debug!(scope = %scope.name, level = self.scopes.len(), "Discarded output scope");
        Ok(())
    }

    /// Close the innermost scope and return its raw content. The handler
    /// does not run.
    pub fn get_clean(&mut self) -> Result<String> {
        let scope = self
            .scopes
            .pop()
            .ok_or(TrellisError::NoActiveBuffer { operation: "get_clean" })?;
        Ok(scope.buffer)
    }

    /// Close the innermost scope, run its handler, and forward the result.
    ///
    /// The scope is removed before the handler runs, so the level is restored
    /// even when the handler fails. On failure the content is dropped and the
    /// error is returned.
    pub fn end_flush(&mut self) -> Result<()> {
        let mut scope = self
            .scopes
            .pop()
            .ok_or(TrellisError::NoActiveBuffer { operation: "end_flush" })?;

        let output = match scope.handler.as_mut() {
            Some(handler) => handler(&scope.buffer)?,
            None => std::mem::take(&mut scope.buffer),
        };
        tracing::debug!(scope = %scope.name, level = self.scopes.len(), "Flushed output scope");
        self.write_below(self.scopes.len(), &output)
    }

    /// Status of the innermost scope.
    pub fn status(&self) -> Option<ScopeStatus> {
        self.scopes.last().map(|s| ScopeStatus {
            name: s.name.clone(),
            level: self.scopes.len(),
            flushable: s.flushable,
            has_handler: s.handler.is_some(),
        })
    }

    /// Flush every open scope and return the sink.
    pub fn finish(mut self) -> Result<W> {
        while !self.scopes.is_empty() {
            self.end_flush()?;
        }
        self.sink.flush()?;
        Ok(self.sink)
    }

    /// The underlying sink.
    pub fn sink(&self) -> &W {
        &self.sink
    }

    // Write to the scope at `index - 1`, or the sink when `index` is zero.
    fn write_below(&mut self, index: usize, text: &str) -> Result<()> {
        match index.checked_sub(1) {
            Some(parent) => self.scopes[parent].buffer.push_str(text),
            None => self.sink.write_all(text.as_bytes())?,
        }
        Ok(())
    }
}

impl<W: Write> fmt::Debug for OutputStack<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.scopes.iter().map(|s| s.name.as_str()).collect();
        f.debug_struct("OutputStack").field("scopes", &names).finish()
    }
}
