//! Query context: what the current request is asking for.
//!
//! A [`QueryContext`] is an immutable snapshot produced by the router. It
//! names the queried object; the condition tags the resolver branches on are
//! derived from it together with [`SiteOptions`].

use serde::{Deserialize, Serialize};

/// Post type used by static pages.
pub const PAGE_POST_TYPE: &str = "page";

/// Post type used by media attachments.
pub const ATTACHMENT_POST_TYPE: &str = "attachment";

/// A single piece of content (post, page, attachment or custom type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Content id.
    pub id: u64,

    /// URL slug, raw or percent-encoded.
    #[serde(default, alias = "post_name")]
    pub slug: String,

    /// Post type (`post`, `page`, `attachment`, or a custom type).
    #[serde(default = "default_post_type")]
    pub post_type: String,

    /// Mime type, for attachments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// Post format (`quote`, `gallery`, ...). `standard` means none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Explicit per-item template assignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

fn default_post_type() -> String {
    "post".to_string()
}

impl Post {
    /// Create a post of the given type.
    pub fn new(id: u64, slug: impl Into<String>, post_type: impl Into<String>) -> Self {
        Self {
            id,
            slug: slug.into(),
            post_type: post_type.into(),
            mime_type: None,
            format: None,
            template: None,
        }
    }

    /// Create a static page.
    pub fn page(id: u64, slug: impl Into<String>) -> Self {
        Self::new(id, slug, PAGE_POST_TYPE)
    }

    /// Create a media attachment with a mime type.
    pub fn attachment(id: u64, slug: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self::new(id, slug, ATTACHMENT_POST_TYPE).with_mime_type(mime_type)
    }

    /// Set the per-item template assignment.
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Set the post format.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Set the mime type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Whether this is a static page.
    pub fn is_page(&self) -> bool {
        self.post_type == PAGE_POST_TYPE
    }

    /// Whether this is a media attachment.
    pub fn is_attachment(&self) -> bool {
        self.post_type == ATTACHMENT_POST_TYPE
    }

    /// The post format, treating `standard` as no format.
    pub fn effective_format(&self) -> Option<&str> {
        self.format
            .as_deref()
            .filter(|f| !f.is_empty() && *f != "standard")
    }
}

/// A taxonomy term (category, tag, or custom taxonomy).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// Term id.
    pub id: u64,
    /// Term slug, raw or percent-encoded.
    pub slug: String,
    /// Taxonomy name. `category` and `post_tag` are special-cased.
    pub taxonomy: String,
}

impl Term {
    /// Create a term.
    pub fn new(id: u64, slug: impl Into<String>, taxonomy: impl Into<String>) -> Self {
        Self {
            id,
            slug: slug.into(),
            taxonomy: taxonomy.into(),
        }
    }

    /// Whether this term is a category.
    pub fn is_category(&self) -> bool {
        self.taxonomy == "category"
    }

    /// Whether this term is a tag.
    pub fn is_tag(&self) -> bool {
        self.taxonomy == "post_tag"
    }
}

/// An author archive subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// User id.
    pub id: u64,
    /// URL-safe author name.
    pub nicename: String,
}

/// A date archive. Granularity does not affect template choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateArchive {
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
}

/// The object a request resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Queried {
    /// Nothing matched the request.
    NotFound,
    /// A search results page.
    Search,
    /// An author archive.
    Author(Author),
    /// A category, tag or custom taxonomy archive.
    Term(Term),
    /// A year, month or day archive.
    Date(DateArchive),
    /// The archive of a custom post type.
    PostTypeArchive { post_type: String },
    /// A single post, page, attachment or custom post.
    Singular(Post),
    /// The site root when it lists the latest posts.
    Home,
    /// An embeddable rendering of a single post.
    Embed(Post),
}

/// Immutable description of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryContext {
    /// What the request resolved to.
    pub queried: Queried,

    /// Whether a page beyond the first was requested.
    #[serde(default)]
    pub paged: bool,
}

impl QueryContext {
    /// Create a context for a queried object.
    pub fn new(queried: Queried) -> Self {
        Self {
            queried,
            paged: false,
        }
    }

    /// A request that matched nothing.
    pub fn not_found() -> Self {
        Self::new(Queried::NotFound)
    }

    /// A search results page.
    pub fn search() -> Self {
        Self::new(Queried::Search)
    }

    /// An author archive.
    pub fn author(id: u64, nicename: impl Into<String>) -> Self {
        Self::new(Queried::Author(Author {
            id,
            nicename: nicename.into(),
        }))
    }

    /// A term archive.
    pub fn term(term: Term) -> Self {
        Self::new(Queried::Term(term))
    }

    /// A date archive.
    pub fn date(year: i32, month: Option<u32>, day: Option<u32>) -> Self {
        Self::new(Queried::Date(DateArchive { year, month, day }))
    }

    /// A post type archive.
    pub fn post_type_archive(post_type: impl Into<String>) -> Self {
        Self::new(Queried::PostTypeArchive {
            post_type: post_type.into(),
        })
    }

    /// A single piece of content.
    pub fn singular(post: Post) -> Self {
        Self::new(Queried::Singular(post))
    }

    /// The site root.
    pub fn home() -> Self {
        Self::new(Queried::Home)
    }

    /// An embed of a single piece of content.
    pub fn embed(post: Post) -> Self {
        Self::new(Queried::Embed(post))
    }

    /// Mark the request as paged.
    pub fn with_paged(mut self, paged: bool) -> Self {
        self.paged = paged;
        self
    }

    /// The post being displayed, for singular and embed requests.
    pub fn post(&self) -> Option<&Post> {
        match &self.queried {
            Queried::Singular(post) | Queried::Embed(post) => Some(post),
            _ => None,
        }
    }

    /// The term being archived, for term requests.
    pub fn term_object(&self) -> Option<&Term> {
        match &self.queried {
            Queried::Term(term) => Some(term),
            _ => None,
        }
    }

    /// Derive the condition tags for this request.
    pub fn conditions(&self, options: &SiteOptions) -> Conditions {
        let mut c = Conditions {
            is_paged: self.paged,
            ..Default::default()
        };

        match &self.queried {
            Queried::NotFound => c.is_404 = true,
            Queried::Search => c.is_search = true,
            Queried::Author(_) => {
                c.is_author = true;
                c.is_archive = true;
            }
            Queried::Term(term) => {
                if term.is_category() {
                    c.is_category = true;
                } else if term.is_tag() {
                    c.is_tag = true;
                } else {
                    c.is_tax = true;
                }
                c.is_archive = true;
            }
            Queried::Date(_) => {
                c.is_date = true;
                c.is_archive = true;
            }
            Queried::PostTypeArchive { .. } => {
                c.is_post_type_archive = true;
                c.is_archive = true;
            }
            Queried::Singular(post) => apply_singular(&mut c, post, options),
            Queried::Embed(post) => {
                c.is_embed = true;
                apply_singular(&mut c, post, options);
            }
            Queried::Home => {
                c.is_home = true;
                c.is_front_page = options.show_on_front == ShowOnFront::Posts;
            }
        }

        c
    }
}

fn apply_singular(c: &mut Conditions, post: &Post, options: &SiteOptions) {
    if post.is_page() && options.is_posts_page(post.id) {
        // The posts page is the blog index, not a page.
        c.is_home = true;
        return;
    }

    c.is_singular = true;
    if post.is_page() {
        c.is_page = true;
        c.is_front_page = options.is_front_page(post.id);
        c.is_privacy_policy = options.page_for_privacy_policy == Some(post.id);
    } else {
        c.is_single = true;
        c.is_attachment = post.is_attachment();
    }
}

/// Condition tags derived from a [`QueryContext`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Conditions {
    pub is_embed: bool,
    pub is_404: bool,
    pub is_search: bool,
    pub is_front_page: bool,
    pub is_home: bool,
    pub is_privacy_policy: bool,
    pub is_post_type_archive: bool,
    pub is_tax: bool,
    pub is_attachment: bool,
    pub is_single: bool,
    pub is_page: bool,
    pub is_singular: bool,
    pub is_category: bool,
    pub is_tag: bool,
    pub is_author: bool,
    pub is_date: bool,
    pub is_archive: bool,
    pub is_paged: bool,
}

/// What the site root shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShowOnFront {
    /// Latest posts.
    #[default]
    Posts,
    /// A static page.
    Page,
}

/// Site-wide reading options that influence resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteOptions {
    /// What the site root shows.
    pub show_on_front: ShowOnFront,

    /// Id of the static front page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_on_front: Option<u64>,

    /// Id of the page that lists the latest posts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_for_posts: Option<u64>,

    /// Id of the designated privacy policy page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_for_privacy_policy: Option<u64>,
}

impl SiteOptions {
    /// Options for a site with a static front page and a posts page.
    pub fn static_front(page_on_front: u64, page_for_posts: Option<u64>) -> Self {
        Self {
            show_on_front: ShowOnFront::Page,
            page_on_front: Some(page_on_front),
            page_for_posts,
            page_for_privacy_policy: None,
        }
    }

    /// Whether `id` is the static front page.
    pub fn is_front_page(&self, id: u64) -> bool {
        self.show_on_front == ShowOnFront::Page && self.page_on_front == Some(id)
    }

    /// Whether `id` is the posts page.
    pub fn is_posts_page(&self, id: u64) -> bool {
        self.show_on_front == ShowOnFront::Page && self.page_for_posts == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_conditions() {
        let c = QueryContext::not_found().conditions(&SiteOptions::default());
        assert!(c.is_404);
        assert!(!c.is_archive);
    }

    #[test]
    fn category_term_is_category_archive() {
        let ctx = QueryContext::term(Term::new(3, "news", "category"));
        let c = ctx.conditions(&SiteOptions::default());
        assert!(c.is_category);
        assert!(c.is_archive);
        assert!(!c.is_tax);
    }

    #[test]
    fn custom_taxonomy_is_tax() {
        let ctx = QueryContext::term(Term::new(3, "x", "genre"));
        let c = ctx.conditions(&SiteOptions::default());
        assert!(c.is_tax);
        assert!(!c.is_category);
        assert!(!c.is_tag);
    }

    #[test]
    fn home_with_latest_posts_is_front_page() {
        let c = QueryContext::home().conditions(&SiteOptions::default());
        assert!(c.is_home);
        assert!(c.is_front_page);
    }

    #[test]
    fn static_front_page_is_page_and_front_page() {
        let options = SiteOptions::static_front(10, Some(11));
        let c = QueryContext::singular(Post::page(10, "welcome")).conditions(&options);
        assert!(c.is_front_page);
        assert!(c.is_page);
        assert!(c.is_singular);
        assert!(!c.is_home);
    }

    #[test]
    fn posts_page_is_home_only() {
        let options = SiteOptions::static_front(10, Some(11));
        let c = QueryContext::singular(Post::page(11, "blog")).conditions(&options);
        assert!(c.is_home);
        assert!(!c.is_page);
        assert!(!c.is_singular);
        assert!(!c.is_front_page);
    }

    #[test]
    fn front_page_option_ignored_when_showing_posts() {
        let options = SiteOptions {
            page_on_front: Some(10),
            ..Default::default()
        };
        let c = QueryContext::singular(Post::page(10, "welcome")).conditions(&options);
        assert!(!c.is_front_page);
        assert!(c.is_page);
    }

    #[test]
    fn privacy_policy_page() {
        let options = SiteOptions {
            page_for_privacy_policy: Some(7),
            ..Default::default()
        };
        let c = QueryContext::singular(Post::page(7, "privacy-policy")).conditions(&options);
        assert!(c.is_privacy_policy);
        assert!(c.is_page);
    }

    #[test]
    fn attachment_is_single_and_attachment() {
        let ctx = QueryContext::singular(Post::attachment(4, "pic", "image/jpeg"));
        let c = ctx.conditions(&SiteOptions::default());
        assert!(c.is_attachment);
        assert!(c.is_single);
        assert!(c.is_singular);
    }

    #[test]
    fn embed_keeps_singular_conditions() {
        let ctx = QueryContext::embed(Post::new(5, "hello", "post"));
        let c = ctx.conditions(&SiteOptions::default());
        assert!(c.is_embed);
        assert!(c.is_single);
        assert!(c.is_singular);
    }

    #[test]
    fn paged_flag_carries_through() {
        let c = QueryContext::search()
            .with_paged(true)
            .conditions(&SiteOptions::default());
        assert!(c.is_search);
        assert!(c.is_paged);
    }

    #[test]
    fn standard_format_is_no_format() {
        let post = Post::new(1, "a", "post").with_format("standard");
        assert_eq!(post.effective_format(), None);
        let post = Post::new(1, "a", "post").with_format("quote");
        assert_eq!(post.effective_format(), Some("quote"));
    }

    #[test]
    fn context_parses_from_yaml() {
        let yaml = r#"
queried:
  type: singular
  id: 42
  post_name: "page-name-😀"
  post_type: page
  template: templates/page.php
paged: true
"#;
        let ctx: QueryContext = serde_yaml::from_str(yaml).unwrap();
        let post = ctx.post().unwrap();
        assert_eq!(post.id, 42);
        assert_eq!(post.slug, "page-name-😀");
        assert!(post.is_page());
        assert_eq!(post.template.as_deref(), Some("templates/page.php"));
        assert!(ctx.paged);
    }

    #[test]
    fn unit_variants_parse_from_yaml() {
        let ctx: QueryContext = serde_yaml::from_str("queried:\n  type: not_found\n").unwrap();
        assert_eq!(ctx.queried, Queried::NotFound);
    }

    #[test]
    fn site_options_parse_from_yaml() {
        let yaml = "show_on_front: page\npage_on_front: 3\npage_for_posts: 4\n";
        let options: SiteOptions = serde_yaml::from_str(yaml).unwrap();
        assert!(options.is_front_page(3));
        assert!(options.is_posts_page(4));
    }
}
