//! Route paths and deployment-prefix normalization.
//!
//! # Responsibilities
//! - Normalize raw browser paths into host-agnostic route paths
//! - Map route paths to fragment and title document URLs
//! - Decide whether a link is an in-app (internal) link
//!
//! # Design Decisions
//! - Route keys keep trailing slashes; only active-link comparison ignores them
//! - The base path comes from config, or is detected from the base URL's path
//! - Links are resolved against the page they are rendered on, as the browser does

use std::borrow::Borrow;
use std::fmt;

use url::Url;

use crate::config::SiteConfig;

/// A normalized in-app route, always starting with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoutePath(String);

impl RoutePath {
    /// Build a route from an already prefix-free path.
    ///
    /// Query and fragment are dropped and a leading `/` is ensured.
    pub fn new(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        if path.starts_with('/') {
            Self(path.to_string())
        } else {
            Self(format!("/{path}"))
        }
    }

    pub fn root() -> Self {
        Self("/".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Compare two routes the way active-link styling does: ignoring a trailing slash.
    pub fn same_page(&self, other: &RoutePath) -> bool {
        trim_trailing_slash(&self.0) == trim_trailing_slash(&other.0)
    }

    /// True if the last segment looks like a file name (`/cv.pdf`).
    pub fn has_extension(&self) -> bool {
        self.0
            .rsplit('/')
            .next()
            .is_some_and(|segment| segment.contains('.'))
    }
}

fn trim_trailing_slash(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

impl fmt::Display for RoutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RoutePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RoutePath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Site layout derived from [`SiteConfig`].
#[derive(Debug, Clone)]
pub struct SitePaths {
    base_url: Url,
    base_path: String,
    content_dir: String,
    home_document: String,
    extension: String,
    titles_document: String,
}

impl SitePaths {
    pub fn from_config(site: &SiteConfig) -> Result<Self, url::ParseError> {
        let mut base_url = Url::parse(&site.base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let base_path = site
            .base_path
            .clone()
            .unwrap_or_else(|| base_url.path().to_string());
        let base_path = base_path.trim_end_matches('/').to_string();

        Ok(Self {
            base_url,
            base_path,
            content_dir: site.content_dir.trim_matches('/').to_string(),
            home_document: site.home_document.clone(),
            extension: site.extension.clone(),
            titles_document: site.titles_document.clone(),
        })
    }

    /// Deployment prefix without a trailing slash; empty when hosted at the root.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Strip the deployment prefix from a raw browser path.
    pub fn normalize(&self, raw: &str) -> RoutePath {
        let path = raw.split(['?', '#']).next().unwrap_or_default();
        let base = self.base_path.as_str();
        if base.is_empty() {
            return RoutePath::new(path);
        }
        match path.strip_prefix(base) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => RoutePath::new(rest),
            _ => RoutePath::new(path),
        }
    }

    /// Browser path for a route, with the deployment prefix re-applied.
    pub fn public_path(&self, route: &RoutePath) -> String {
        format!("{}{}", self.base_path, route)
    }

    /// URL of the fragment document for `route`.
    pub fn content_url(&self, route: &RoutePath) -> Result<Url, url::ParseError> {
        let name = if route.is_root() {
            self.home_document.as_str()
        } else {
            route.as_str().trim_matches('/')
        };
        self.base_url
            .join(&format!("{}/{}.{}", self.content_dir, name, self.extension))
    }

    /// URL of the title map document.
    pub fn titles_url(&self) -> Result<Url, url::ParseError> {
        self.base_url
            .join(&format!("{}/{}", self.content_dir, self.titles_document))
    }

    /// Browser URL of the page showing `route`.
    pub fn page_url(&self, route: &RoutePath) -> Result<Url, url::ParseError> {
        self.base_url.join(&self.public_path(route))
    }

    /// Resolve a link the way the browser does, against `document` (the URL of
    /// the page it is rendered on), and classify it.
    ///
    /// A link is an in-app route when it is same-origin with the site, does not
    /// open a new browsing context, and does not point at a file with an
    /// extension. A link to `document` itself that only adds a fragment is an
    /// [`LinkTarget::Anchor`].
    pub fn classify_link(&self, href: &str, target: Option<&str>, document: &Url) -> LinkTarget {
        if !matches!(target, None | Some("" | "_self" | "_parent" | "_top")) {
            return LinkTarget::External;
        }
        let Ok(mut url) = document.join(href) else {
            return LinkTarget::External;
        };
        if url.origin() != self.base_url.origin() {
            return LinkTarget::External;
        }
        if url.fragment().is_some() {
            url.set_fragment(None);
            let mut current = document.clone();
            current.set_fragment(None);
            if url == current {
                return LinkTarget::Anchor;
            }
        }
        let route = self.normalize(url.path());
        if route.has_extension() {
            return LinkTarget::External;
        }
        LinkTarget::Route(route)
    }
}

/// What following a link would do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// Leaves the app: another origin, a new browsing context or a file.
    External,
    /// Scrolls within the page already showing.
    Anchor,
    /// Shows an in-app route.
    Route(RoutePath),
}

impl LinkTarget {
    pub fn into_route(self) -> Option<RoutePath> {
        match self {
            LinkTarget::Route(route) => Some(route),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(base_url: &str, base_path: Option<&str>) -> SitePaths {
        let config = SiteConfig {
            base_url: base_url.to_string(),
            base_path: base_path.map(str::to_string),
            ..SiteConfig::default()
        };
        SitePaths::from_config(&config).unwrap()
    }

    #[test]
    fn test_route_path_construction() {
        assert_eq!(RoutePath::new("about").as_str(), "/about");
        assert_eq!(RoutePath::new("/about?tab=1#top").as_str(), "/about");
        assert_eq!(RoutePath::new("").as_str(), "/");
        assert_ne!(RoutePath::new("/about"), RoutePath::new("/about/"));
    }

    #[test]
    fn test_same_page_ignores_trailing_slash() {
        assert!(RoutePath::new("/about").same_page(&RoutePath::new("/about/")));
        assert!(RoutePath::root().same_page(&RoutePath::new("/")));
        assert!(!RoutePath::new("/about").same_page(&RoutePath::new("/gallery")));
    }

    #[test]
    fn test_normalize_strips_detected_base_path() {
        let paths = site("https://me.github.io/portfolio/", None);
        assert_eq!(paths.base_path(), "/portfolio");
        assert_eq!(paths.normalize("/portfolio/about").as_str(), "/about");
        assert_eq!(paths.normalize("/portfolio").as_str(), "/");
        assert_eq!(paths.normalize("/portfolio/").as_str(), "/");
        assert_eq!(paths.normalize("/portfolios").as_str(), "/portfolios");
        assert_eq!(paths.public_path(&RoutePath::new("/about")), "/portfolio/about");
    }

    #[test]
    fn test_explicit_base_path_wins() {
        let paths = site("https://example.com/", Some("/site/"));
        assert_eq!(paths.base_path(), "/site");
        assert_eq!(paths.normalize("/site/gallery?x=1").as_str(), "/gallery");
    }

    #[test]
    fn test_root_hosting_has_no_prefix() {
        let paths = site("http://127.0.0.1:8000", None);
        assert_eq!(paths.base_path(), "");
        assert_eq!(paths.normalize("/about").as_str(), "/about");
        assert_eq!(paths.public_path(&RoutePath::root()), "/");
    }

    #[test]
    fn test_content_and_title_urls() {
        let paths = site("https://me.github.io/portfolio/", None);
        assert_eq!(
            paths.content_url(&RoutePath::root()).unwrap().as_str(),
            "https://me.github.io/portfolio/pages/home.html"
        );
        assert_eq!(
            paths.content_url(&RoutePath::new("/about")).unwrap().as_str(),
            "https://me.github.io/portfolio/pages/about.html"
        );
        assert_eq!(
            paths.content_url(&RoutePath::new("/works/")).unwrap().as_str(),
            "https://me.github.io/portfolio/pages/works.html"
        );
        assert_eq!(
            paths.titles_url().unwrap().as_str(),
            "https://me.github.io/portfolio/pages/titles.json"
        );
    }

    #[test]
    fn test_link_classification() {
        let paths = site("https://me.github.io/portfolio/", None);
        let home = paths.page_url(&RoutePath::root()).unwrap();
        let route = |r: &str| LinkTarget::Route(RoutePath::new(r));

        assert_eq!(paths.classify_link("/portfolio/about", None, &home), route("/about"));
        assert_eq!(
            paths.classify_link("https://me.github.io/portfolio/gallery", Some("_self"), &home),
            route("/gallery")
        );
        assert_eq!(
            paths.classify_link("/portfolio/about", Some("_blank"), &home),
            LinkTarget::External
        );
        assert_eq!(paths.classify_link("https://github.com/me", None, &home), LinkTarget::External);
        assert_eq!(paths.classify_link("/portfolio/cv.pdf", None, &home), LinkTarget::External);
        assert_eq!(paths.classify_link("mailto:me@example.com", None, &home), LinkTarget::External);
    }

    #[test]
    fn test_links_resolve_against_the_current_page() {
        let paths = site("https://me.github.io/portfolio/", None);
        let about = paths.page_url(&RoutePath::new("/about")).unwrap();
        let works = paths.page_url(&RoutePath::new("/works/")).unwrap();
        assert_eq!(about.as_str(), "https://me.github.io/portfolio/about");

        assert_eq!(paths.classify_link("#contact", None, &about), LinkTarget::Anchor);
        assert_eq!(paths.classify_link("about#contact", None, &about), LinkTarget::Anchor);
        assert_eq!(
            paths.classify_link("/portfolio/#intro", None, &about),
            LinkTarget::Route(RoutePath::root())
        );
        assert_eq!(
            paths.classify_link("gallery", None, &about),
            LinkTarget::Route(RoutePath::new("/gallery"))
        );
        assert_eq!(
            paths.classify_link("gallery", None, &works),
            LinkTarget::Route(RoutePath::new("/works/gallery"))
        );
        assert_eq!(
            paths.classify_link("../contact", None, &works),
            LinkTarget::Route(RoutePath::new("/contact"))
        );
    }
}
