//! Template hierarchy resolution.
//!
//! The resolver walks [`TemplateKind::ORDER`], builds the candidate list for
//! every kind whose condition holds, passes each list through its checkpoint,
//! and merges the results. Selection then returns the first merged candidate
//! that exists in the theme, falling back to the `index` kind.

use std::path::PathBuf;

use serde::Serialize;

use super::candidates::candidates_for;
use super::checkpoint::Checkpoints;
use super::context::{QueryContext, SiteOptions};
use super::kind::TemplateKind;
use super::locate::ThemeLocator;

/// One kind's candidate list after its checkpoint ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindHierarchy {
    pub kind: TemplateKind,
    pub checkpoint: String,
    pub templates: Vec<String>,
}

/// The template chosen for a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    /// Kind whose list produced the match.
    pub kind: TemplateKind,
    /// Candidate name that matched.
    pub name: String,
    /// File found for it.
    pub path: PathBuf,
}

/// Resolves query contexts into ordered template candidates.
#[derive(Debug, Default)]
pub struct HierarchyResolver {
    options: SiteOptions,
    checkpoints: Checkpoints,
}

impl HierarchyResolver {
    /// Create a resolver for the given site options.
    pub fn new(options: SiteOptions) -> Self {
        Self {
            options,
            checkpoints: Checkpoints::new(),
        }
    }

    /// Site options in effect.
    pub fn options(&self) -> &SiteOptions {
        &self.options
    }

    /// Checkpoint registry, for registering observers.
    pub fn checkpoints_mut(&mut self) -> &mut Checkpoints {
        &mut self.checkpoints
    }

    /// Kinds whose conditions hold for `ctx`, in walk order.
    pub fn matching_kinds(&self, ctx: &QueryContext) -> Vec<TemplateKind> {
        let conditions = ctx.conditions(&self.options);
        TemplateKind::ORDER
            .iter()
            .copied()
            .filter(|kind| kind.matches(&conditions))
            .collect()
    }

    /// Candidate list for a single kind, after its checkpoint ran.
    pub fn hierarchy(&self, kind: TemplateKind, ctx: &QueryContext) -> Vec<String> {
        let mut templates = candidates_for(kind, ctx);
        self.checkpoints.emit(kind, &mut templates);
        templates
    }

    /// Candidate lists of every matching kind, in walk order.
    pub fn resolve_by_kind(&self, ctx: &QueryContext) -> Vec<KindHierarchy> {
        self.matching_kinds(ctx)
            .into_iter()
            .map(|kind| KindHierarchy {
                kind,
                checkpoint: kind.checkpoint_name(),
                templates: self.hierarchy(kind, ctx),
            })
            .collect()
    }

    /// The merged candidate list for `ctx`, most specific first.
    ///
    /// ```
    /// use trellis::hierarchy::{HierarchyResolver, QueryContext, SiteOptions, Term};
    ///
    /// let resolver = HierarchyResolver::new(SiteOptions::default());
    /// let ctx = QueryContext::term(Term::new(7, "news", "category"));
    /// assert_eq!(
    ///     resolver.resolve_templates(&ctx),
    ///     vec!["category-news.php", "category-7.php", "category.php", "archive.php"]
    /// );
    /// ```
    pub fn resolve_templates(&self, ctx: &QueryContext) -> Vec<String> {
        self.resolve_by_kind(ctx)
            .into_iter()
            .flat_map(|h| h.templates)
            .collect()
    }

    /// Select the template to render for `ctx`.
    ///
    /// Every matching checkpoint fires before any lookup. The first candidate
    /// that exists wins; if none does, the `index` list is tried. `None`
    /// means the caller must use its own generic default.
    pub fn select_template(&self, ctx: &QueryContext, locator: &ThemeLocator) -> Option<Selection> {
        let hierarchies = self.resolve_by_kind(ctx);

        for hierarchy in &hierarchies {
            for name in &hierarchy.templates {
                if let Some(path) = locator.locate(std::slice::from_ref(name)) {
                    return Some(Selection {
                        kind: hierarchy.kind,
                        name: name.clone(),
                        path,
                    });
                }
            }
        }

        let fallback = self.hierarchy(TemplateKind::Index, ctx);
        for name in &fallback {
            if let Some(path) = locator.locate(std::slice::from_ref(name)) {
                return Some(Selection {
                    kind: TemplateKind::Index,
                    name: name.clone(),
                    path,
                });
            }
        }

        tracing::debug!("No template found in theme");
        None
    }
}
