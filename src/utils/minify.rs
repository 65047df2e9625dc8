//! Output minification for rendered pages and XML files.
//!
//! Both entry points are no-ops when `[build].minify` is off.

use crate::config::SiteConfig;
use std::borrow::Cow;

/// Output kind, selects the minifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Html,
    Xml,
}

/// Minify `content` according to its kind and the site config.
pub fn minify<'a>(kind: Output, content: &'a str, config: &SiteConfig) -> Cow<'a, str> {
    if !config.build.minify {
        return Cow::Borrowed(content);
    }
    match kind {
        Output::Html => Cow::Owned(minify_html_inner(content)),
        Output::Xml => Cow::Owned(minify_xml_inner(content)),
    }
}

/// Minify HTML using `minify_html`, keeping tags that templates may rely on.
fn minify_html_inner(html: &str) -> String {
    let mut cfg = minify_html::Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.keep_comments = false;
    cfg.minify_css = true;
    cfg.minify_js = true;
    let bytes = minify_html::minify(html.as_bytes(), &cfg);
    String::from_utf8(bytes).unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
}

/// Minify XML by dropping indentation and blank lines.
fn minify_xml_inner(xml: &str) -> String {
    xml.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}
