//! Template kinds and their checkpoint names.

use serde::Serialize;
use std::fmt;

use super::context::Conditions;

/// One kind of template lookup. Each kind has its own candidate rules and
/// its own checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    Embed,
    #[serde(rename = "404")]
    NotFound,
    Search,
    FrontPage,
    Home,
    PrivacyPolicy,
    PostTypeArchive,
    Taxonomy,
    Attachment,
    Single,
    Page,
    Singular,
    Category,
    Tag,
    Author,
    Date,
    Archive,
    Paged,
    Index,
}

impl TemplateKind {
    /// Kinds in the order their conditions are checked. `Index` is the
    /// fallback and is not part of the walk.
    pub const ORDER: [TemplateKind; 18] = [
        TemplateKind::Embed,
        TemplateKind::NotFound,
        TemplateKind::Search,
        TemplateKind::FrontPage,
        TemplateKind::Home,
        TemplateKind::PrivacyPolicy,
        TemplateKind::PostTypeArchive,
        TemplateKind::Taxonomy,
        TemplateKind::Attachment,
        TemplateKind::Single,
        TemplateKind::Page,
        TemplateKind::Singular,
        TemplateKind::Category,
        TemplateKind::Tag,
        TemplateKind::Author,
        TemplateKind::Date,
        TemplateKind::Archive,
        TemplateKind::Paged,
    ];

    /// Short name of the kind (`front_page`, `404`, ...).
    pub fn name(self) -> &'static str {
        match self {
            TemplateKind::Embed => "embed",
            TemplateKind::NotFound => "404",
            TemplateKind::Search => "search",
            TemplateKind::FrontPage => "front_page",
            TemplateKind::Home => "home",
            TemplateKind::PrivacyPolicy => "privacy_policy",
            TemplateKind::PostTypeArchive => "post_type_archive",
            TemplateKind::Taxonomy => "taxonomy",
            TemplateKind::Attachment => "attachment",
            TemplateKind::Single => "single",
            TemplateKind::Page => "page",
            TemplateKind::Singular => "singular",
            TemplateKind::Category => "category",
            TemplateKind::Tag => "tag",
            TemplateKind::Author => "author",
            TemplateKind::Date => "date",
            TemplateKind::Archive => "archive",
            TemplateKind::Paged => "paged",
            TemplateKind::Index => "index",
        }
    }

    /// Name of the checkpoint that exposes this kind's candidate list,
    /// e.g. `frontpage_template_hierarchy`.
    pub fn checkpoint_name(self) -> String {
        format!("{}_template_hierarchy", self.name().replace('_', ""))
    }

    /// Whether this kind applies under the given conditions.
    pub fn matches(self, c: &Conditions) -> bool {
        match self {
            TemplateKind::Embed => c.is_embed,
            TemplateKind::NotFound => c.is_404,
            TemplateKind::Search => c.is_search,
            TemplateKind::FrontPage => c.is_front_page,
            TemplateKind::Home => c.is_home,
            TemplateKind::PrivacyPolicy => c.is_privacy_policy,
            TemplateKind::PostTypeArchive => c.is_post_type_archive,
            TemplateKind::Taxonomy => c.is_tax,
            TemplateKind::Attachment => c.is_attachment,
            TemplateKind::Single => c.is_single,
            TemplateKind::Page => c.is_page,
            TemplateKind::Singular => c.is_singular,
            TemplateKind::Category => c.is_category,
            TemplateKind::Tag => c.is_tag,
            TemplateKind::Author => c.is_author,
            TemplateKind::Date => c.is_date,
            TemplateKind::Archive => c.is_archive,
            TemplateKind::Paged => c.is_paged,
            TemplateKind::Index => true,
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkpoint_names_drop_underscores() {
        assert_eq!(
            TemplateKind::FrontPage.checkpoint_name(),
            "frontpage_template_hierarchy"
        );
        assert_eq!(
            TemplateKind::PostTypeArchive.checkpoint_name(),
            "posttypearchive_template_hierarchy"
        );
        assert_eq!(
            TemplateKind::NotFound.checkpoint_name(),
            "404_template_hierarchy"
        );
    }

    #[test]
    fn every_walked_kind_has_unique_checkpoint() {
        let mut names: Vec<String> = TemplateKind::ORDER
            .iter()
            .map(|k| k.checkpoint_name())
            .collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), TemplateKind::ORDER.len());
    }

    #[test]
    fn index_is_fallback_only() {
        assert!(!TemplateKind::ORDER.contains(&TemplateKind::Index));
        assert!(TemplateKind::Index.matches(&Conditions::default()));
    }

    #[test]
    fn display_uses_name() {
        assert_eq!(TemplateKind::PrivacyPolicy.to_string(), "privacy_policy");
    }
}
