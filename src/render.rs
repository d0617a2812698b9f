//! Request rendering.
//!
//! Ties the pieces together for one request: resolve and locate the
//! template, set up the enhancement buffer from configuration, write the
//! template through the buffer (printing styles at the head and footer
//! markers), and return the finalized document.

use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

use serde::Serialize;

use crate::config::{BufferMode, StyleConfig, TrellisConfig};
use crate::enhancement::{install_rules, BufferOverride, Enhancer, OutputStack};
use crate::error::Result;
use crate::hierarchy::{HierarchyResolver, QueryContext, Selection, ThemeLocator};
use crate::styles::{
    load_classic_theme_block_styles_on_demand, AssetLoading, StyleHoister, StyleRegistry,
    HOIST_HOOK,
};

/// Where head styles are printed in a template.
pub const HEAD_MARKER: &str = "<!-- trellis:head -->";

/// Where footer (late) styles are printed in a template.
pub const FOOTER_MARKER: &str = "<!-- trellis:footer -->";

/// Name of the override set from the `enhancement.buffer` setting.
pub const CONFIG_OVERRIDE: &str = "config";

/// Used when the theme has no matching template at all.
pub const FALLBACK_TEMPLATE: &str = "<!DOCTYPE html>\n<html>\n<head>\n<!-- trellis:head -->\n</head>\n<body>\n<!-- trellis:footer -->\n</body>\n</html>\n";

/// Result of rendering one request.
#[derive(Debug, Clone, Serialize)]
pub struct Rendered {
    /// Template used, or `None` when the fallback was rendered.
    pub selection: Option<Selection>,
    /// Whether the enhancement buffer captured the output.
    pub buffered: bool,
    /// Transforms that ran, in order.
    pub transforms: Vec<String>,
    /// Block asset loading mode.
    pub asset_loading: AssetLoading,
    /// Final document.
    pub html: String,
}

/// Renders requests against a configured theme.
#[derive(Debug)]
pub struct Renderer {
    config: TrellisConfig,
    resolver: HierarchyResolver,
    locator: ThemeLocator,
}

impl Renderer {
    /// Create a renderer from configuration.
    pub fn new(config: TrellisConfig) -> Self {
        let resolver = HierarchyResolver::new(config.site.clone());
        let locator = ThemeLocator::from_theme(&config.theme);
        Self {
            config,
            resolver,
            locator,
        }
    }

    /// The hierarchy resolver, for registering checkpoint observers.
    pub fn resolver_mut(&mut self) -> &mut HierarchyResolver {
        &mut self.resolver
    }

    /// Render `ctx` to a finished document.
    pub fn render(&self, ctx: &QueryContext) -> Result<Rendered> {
        let selection = self.resolver.select_template(ctx, &self.locator);
        let template = match &selection {
            Some(selection) => {
                tracing::info!(template = %selection.name, kind = %selection.kind, "Rendering template");
                fs::read_to_string(&selection.path)?
            }
            None => {
                tracing::info!("No theme template matched; rendering fallback");
                FALLBACK_TEMPLATE.to_string()
            }
        };

        let enhancer = self.enhancer()?;
        let hoister = StyleHoister::new(Rc::new(RefCell::new(StyleRegistry::new())));
        let asset_loading =
            load_classic_theme_block_styles_on_demand(&self.config.theme, &enhancer, &hoister);

        let (early, late): (Vec<&StyleConfig>, Vec<&StyleConfig>) =
            self.config.styles.iter().partition(|s| !s.late);
        register_styles(&hoister, &early);

        let mut out = OutputStack::new(Vec::new());
        let buffered = enhancer.start(&mut out);
        // The started listener installed above registers the hoist transform
        // before start() returns.
        let hoisting = enhancer.has_transform(HOIST_HOOK);

        let (before_head, rest) = split_marker(&template, HEAD_MARKER);
        out.write(before_head)?;
        if let Some(rest) = rest {
            let head = if hoisting {
                hoister.print_head()
            } else {
                hoister.registry().borrow_mut().print_styles()
            };
            out.write(&head)?;
            register_styles(&hoister, &late);

            let (body, after_footer) = split_marker(rest, FOOTER_MARKER);
            out.write(body)?;
            if let Some(after_footer) = after_footer {
                out.write(&hoister.print_footer())?;
                out.write(after_footer)?;
            }
        }

        let sink = out.finish()?;
        let html = String::from_utf8(sink).map_err(anyhow::Error::from)?;

        Ok(Rendered {
            selection,
            buffered,
            transforms: enhancer.transform_names(),
            asset_loading,
            html,
        })
    }

    // Per-request pipeline built from the enhancement settings.
    fn enhancer(&self) -> Result<Enhancer> {
        let settings = &self.config.enhancement;
        let enhancer = Enhancer::new();
        match settings.buffer {
            BufferMode::Auto => {}
            BufferMode::Force => enhancer.set_override(CONFIG_OVERRIDE, BufferOverride::Force),
            BufferMode::Block => enhancer.set_override(CONFIG_OVERRIDE, BufferOverride::Block),
        }
        if let Some(content_type) = &settings.content_type {
            enhancer.set_content_type(content_type)?;
        }
        install_rules(&enhancer, settings.rules.clone());
        Ok(enhancer)
    }
}

fn register_styles(hoister: &StyleHoister, styles: &[&StyleConfig]) {
    let mut registry = hoister.registry().borrow_mut();
    for style in styles {
        let deps: Vec<&str> = style.deps.iter().map(String::as_str).collect();
        registry.enqueue_style(&style.handle, style.src.as_deref(), &deps, style.ver.as_deref());
        for css in &style.inline {
            registry.add_inline(&style.handle, css);
        }
    }
}

// Split at the first `marker`, dropping the marker itself.
fn split_marker<'a>(text: &'a str, marker: &str) -> (&'a str, Option<&'a str>) {
    match text.split_once(marker) {
        Some((before, after)) => (before, Some(after)),
        None => (text, None),
    }
}
