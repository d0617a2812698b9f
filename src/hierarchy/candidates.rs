//! Candidate template names for each [`TemplateKind`].
//!
//! Every function returns names most specific first. Generic fallbacks that
//! belong to another kind (`archive.php`, `singular.php`) are left to that
//! kind, so the merged walk lists them once per matching kind.

use super::context::{Queried, QueryContext};
use super::kind::TemplateKind;
use super::slug::slug_variants;

/// Template override value meaning "use the hierarchy".
const DEFAULT_TEMPLATE: &str = "default";

/// Candidate names for `kind` under `ctx`.
pub fn candidates_for(kind: TemplateKind, ctx: &QueryContext) -> Vec<String> {
    match kind {
        TemplateKind::Embed => embed(ctx),
        TemplateKind::NotFound => vec!["404.php".to_string()],
        TemplateKind::Search => vec!["search.php".to_string()],
        TemplateKind::FrontPage => vec!["front-page.php".to_string()],
        TemplateKind::Home => vec!["home.php".to_string(), "index.php".to_string()],
        TemplateKind::PrivacyPolicy => vec!["privacy-policy.php".to_string()],
        TemplateKind::PostTypeArchive | TemplateKind::Archive => archive(ctx),
        TemplateKind::Taxonomy => taxonomy(ctx),
        TemplateKind::Attachment => attachment(ctx),
        TemplateKind::Single => single(ctx),
        TemplateKind::Page => page(ctx),
        TemplateKind::Singular => vec!["singular.php".to_string()],
        TemplateKind::Category => term_archive(ctx, "category"),
        TemplateKind::Tag => term_archive(ctx, "tag"),
        TemplateKind::Author => author(ctx),
        TemplateKind::Date => vec!["date.php".to_string()],
        TemplateKind::Paged => vec!["paged.php".to_string()],
        TemplateKind::Index => vec!["index.php".to_string()],
    }
}

/// Whether a per-item template override may be used as a file name.
///
/// Rejects the `default` marker, parent-directory traversal, `./` segments,
/// absolute paths and drive prefixes.
pub fn is_valid_template_override(template: &str) -> bool {
    if template.is_empty() || template == DEFAULT_TEMPLATE {
        return false;
    }
    if template.contains("..") || template.contains("./") {
        return false;
    }
    if template.starts_with('/') || template.starts_with('\\') {
        return false;
    }
    let bytes = template.as_bytes();
    !(bytes.len() >= 2 && bytes[1] == b':')
}

fn embed(ctx: &QueryContext) -> Vec<String> {
    let mut templates = Vec::new();
    if let Some(post) = ctx.post() {
        if let Some(format) = post.effective_format() {
            templates.push(format!("embed-{}-{}.php", post.post_type, format));
        }
        templates.push(format!("embed-{}.php", post.post_type));
    }
    templates.push("embed.php".to_string());
    templates
}

fn archive(ctx: &QueryContext) -> Vec<String> {
    let mut templates = Vec::new();
    if let Queried::PostTypeArchive { post_type } = &ctx.queried {
        if !post_type.is_empty() {
            templates.push(format!("archive-{}.php", post_type));
        }
    }
    templates.push("archive.php".to_string());
    templates
}

fn taxonomy(ctx: &QueryContext) -> Vec<String> {
    let mut templates = Vec::new();
    if let Some(term) = ctx.term_object() {
        let prefix = format!("taxonomy-{}", term.taxonomy);
        for slug in slug_variants(&term.slug) {
            templates.push(format!("{}-{}.php", prefix, slug));
        }
        templates.push(format!("{}-{}.php", prefix, term.id));
        templates.push(format!("{}.php", prefix));
    }
    templates.push("taxonomy.php".to_string());
    templates
}

fn term_archive(ctx: &QueryContext, prefix: &str) -> Vec<String> {
    let mut templates = Vec::new();
    if let Some(term) = ctx.term_object() {
        for slug in slug_variants(&term.slug) {
            templates.push(format!("{}-{}.php", prefix, slug));
        }
        if term.id != 0 {
            templates.push(format!("{}-{}.php", prefix, term.id));
        }
    }
    templates.push(format!("{}.php", prefix));
    templates
}

fn author(ctx: &QueryContext) -> Vec<String> {
    let mut templates = Vec::new();
    if let Queried::Author(author) = &ctx.queried {
        if !author.nicename.is_empty() {
            templates.push(format!("author-{}.php", author.nicename));
        }
        templates.push(format!("author-{}.php", author.id));
    }
    templates.push("author.php".to_string());
    templates
}

fn attachment(ctx: &QueryContext) -> Vec<String> {
    let mut templates = Vec::new();
    if let Some(mime) = ctx.post().and_then(|p| p.mime_type.as_deref()) {
        match mime.split_once('/') {
            Some((main, sub)) if !main.is_empty() && !sub.is_empty() => {
                templates.push(format!("{}-{}.php", main, sub));
                templates.push(format!("{}.php", sub));
                templates.push(format!("{}.php", main));
            }
            _ if !mime.is_empty() => templates.push(format!("{}.php", mime)),
            _ => {}
        }
    }
    templates.push("attachment.php".to_string());
    templates
}

fn single(ctx: &QueryContext) -> Vec<String> {
    let mut templates = Vec::new();
    if let Some(post) = ctx.post() {
        if !post.is_attachment() {
            push_override(&mut templates, post.template.as_deref());
        }
        for slug in slug_variants(&post.slug) {
            templates.push(format!("single-{}-{}.php", post.post_type, slug));
        }
        templates.push(format!("single-{}.php", post.post_type));
    }
    templates.push("single.php".to_string());
    templates
}

fn page(ctx: &QueryContext) -> Vec<String> {
    let mut templates = Vec::new();
    if let Some(post) = ctx.post() {
        push_override(&mut templates, post.template.as_deref());
        for slug in slug_variants(&post.slug) {
            templates.push(format!("page-{}.php", slug));
        }
        if post.id != 0 {
            templates.push(format!("page-{}.php", post.id));
        }
    }
    templates.push("page.php".to_string());
    templates
}

fn push_override(templates: &mut Vec<String>, template: Option<&str>) {
    if let Some(template) = template {
        if is_valid_template_override(template) {
            templates.push(template.to_string());
        } else {
            tracing::debug!(template, "Ignoring invalid template override");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::context::{Post, Term};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn taxonomy_with_encoded_slug() {
        let ctx = QueryContext::term(Term::new(9, "foo-😀", "taxo"));
        assert_eq!(
            candidates_for(TemplateKind::Taxonomy, &ctx),
            names(&[
                "taxonomy-taxo-foo-😀.php",
                "taxonomy-taxo-foo-%f0%9f%98%80.php",
                "taxonomy-taxo-9.php",
                "taxonomy-taxo.php",
                "taxonomy.php",
            ])
        );
    }

    #[test]
    fn category_uses_category_prefix() {
        let ctx = QueryContext::term(Term::new(5, "news", "category"));
        assert_eq!(
            candidates_for(TemplateKind::Category, &ctx),
            names(&["category-news.php", "category-5.php", "category.php"])
        );
    }

    #[test]
    fn single_ignores_default_override() {
        let ctx = QueryContext::singular(Post::new(1, "hi", "post").with_template("default"));
        assert_eq!(
            candidates_for(TemplateKind::Single, &ctx),
            names(&["single-post-hi.php", "single-post.php", "single.php"])
        );
    }

    #[test]
    fn page_rejects_traversal_override() {
        let ctx = QueryContext::singular(Post::page(2, "about").with_template("../evil.php"));
        let list = candidates_for(TemplateKind::Page, &ctx);
        assert_eq!(list[0], "page-about.php");
    }

    #[test]
    fn attachment_without_subtype() {
        let ctx = QueryContext::singular(Post::attachment(3, "doc", "text"));
        assert_eq!(
            candidates_for(TemplateKind::Attachment, &ctx),
            names(&["text.php", "attachment.php"])
        );
    }

    #[test]
    fn attachment_without_mime() {
        let ctx = QueryContext::singular(Post::new(3, "doc", "attachment"));
        assert_eq!(
            candidates_for(TemplateKind::Attachment, &ctx),
            names(&["attachment.php"])
        );
    }

    #[test]
    fn post_type_archive_names_type() {
        let ctx = QueryContext::post_type_archive("book");
        assert_eq!(
            candidates_for(TemplateKind::PostTypeArchive, &ctx),
            names(&["archive-book.php", "archive.php"])
        );
    }

    #[test]
    fn plain_archive_is_generic() {
        let ctx = QueryContext::date(1984, None, None);
        assert_eq!(
            candidates_for(TemplateKind::Archive, &ctx),
            names(&["archive.php"])
        );
    }

    #[test]
    fn embed_without_format() {
        let ctx = QueryContext::embed(Post::page(6, "x"));
        assert_eq!(
            candidates_for(TemplateKind::Embed, &ctx),
            names(&["embed-page.php", "embed.php"])
        );
    }

    #[test]
    fn override_validation() {
        assert!(is_valid_template_override("templates/page.php"));
        assert!(!is_valid_template_override("default"));
        assert!(!is_valid_template_override(""));
        assert!(!is_valid_template_override("../x.php"));
        assert!(!is_valid_template_override("./x.php"));
        assert!(!is_valid_template_override("/etc/x.php"));
        assert!(!is_valid_template_override("C:x.php"));
    }
}
