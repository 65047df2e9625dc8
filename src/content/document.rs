//! Rich-text document fields.
//!
//! A document field (a person's biography) is stored as the body of its
//! entry file as Markdown and parsed with `pulldown-cmark`. The event stream
//! is gated by [`DocumentOptions`] before it reaches the HTML writer:
//!
//! | Construct                          | Gate         | When off                 |
//! |------------------------------------|--------------|--------------------------|
//! | Bold, italic, strikethrough        | `formatting` | inner text kept          |
//! | Headings, lists, quotes, code      | `formatting` | plain paragraphs         |
//! | Divider (`---`)                    | `dividers`   | literal `---` paragraph  |
//! | Link (`[text](href)`)              | `links`      | link text kept           |
//! | Image (`![alt](src)`)              | `images`     | alt text kept            |
//!
//! Raw HTML is never passed through; it is rendered as escaped text.
//! Script-like link and image targets are always dropped.

use crate::config::ImageStorage;
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};
use serde::{Serialize, Serializer};

/// Which constructs a document field accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentOptions {
    pub formatting: bool,
    pub dividers: bool,
    pub links: bool,
    /// Image storage; `None` disables images.
    #[serde(serialize_with = "editor_images")]
    pub images: Option<ImageStorage>,
}

fn editor_images<S: Serializer>(images: &Option<ImageStorage>, serializer: S) -> Result<S::Ok, S::Error> {
    images.as_ref().map(ImageStorage::for_editor).serialize(serializer)
}

impl DocumentOptions {
    /// Everything enabled, images stored in `images`.
    pub fn full(images: ImageStorage) -> Self {
        Self {
            formatting: true,
            dividers: true,
            links: true,
            images: Some(images),
        }
    }

    fn parser_options(&self) -> Options {
        let mut options = Options::empty();
        if self.formatting {
            options.insert(Options::ENABLE_STRIKETHROUGH);
        }
        options
    }
}

/// A document source bound to the options it is rendered with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    source: String,
    options: DocumentOptions,
}

impl Document {
    pub fn parse(source: &str, options: &DocumentOptions) -> Self {
        Self {
            source: source.to_owned(),
            options: options.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.events().is_empty()
    }

    /// Render as HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::with_capacity(self.source.len() * 3 / 2);
        html::push_html(&mut out, self.events().into_iter());
        out
    }

    /// Plain text of the first paragraph, for meta descriptions.
    pub fn summary(&self) -> String {
        let mut text = String::new();
        let mut inside = false;

        for event in self.events() {
            match event {
                Event::Start(Tag::Paragraph) => inside = true,
                Event::End(TagEnd::Paragraph) if inside => break,
                Event::Text(t) | Event::Code(t) if inside => text.push_str(&t),
                Event::SoftBreak | Event::HardBreak if inside => text.push(' '),
                _ => {}
            }
        }
        text.trim().to_owned()
    }

    /// Parser events after applying the option gates.
    fn events(&self) -> Vec<Event<'_>> {
        let options = &self.options;
        let mut out = Vec::new();
        // Replacement for the matching end event of every open tag.
        let mut ends: Vec<Option<Event<'_>>> = Vec::new();

        for event in Parser::new_ext(&self.source, options.parser_options()) {
            match event {
                Event::Start(tag) => {
                    let (start, end) = gate(tag, options);
                    out.extend(start);
                    ends.push(end);
                }
                Event::End(_) => out.extend(ends.pop().flatten()),
                Event::Html(raw) | Event::InlineHtml(raw) => out.push(Event::Text(raw)),
                Event::Code(code) if !options.formatting => out.push(Event::Text(code)),
                Event::Rule if !options.dividers => out.extend([
                    Event::Start(Tag::Paragraph),
                    Event::Text(CowStr::Borrowed("---")),
                    Event::End(TagEnd::Paragraph),
                ]),
                other => out.push(other),
            }
        }
        out
    }
}

type Gated<'a> = (Option<Event<'a>>, Option<Event<'a>>);

/// Decide what a start tag becomes, and what its end tag becomes.
fn gate<'a>(tag: Tag<'a>, options: &DocumentOptions) -> Gated<'a> {
    let unwrap: Gated<'a> = (None, None);
    let paragraph = || -> Gated<'a> {
        (
            Some(Event::Start(Tag::Paragraph)),
            Some(Event::End(TagEnd::Paragraph)),
        )
    };

    match tag {
        Tag::Strong | Tag::Emphasis | Tag::Strikethrough | Tag::BlockQuote(_) | Tag::List(_)
            if !options.formatting =>
        {
            unwrap
        }
        Tag::Heading { .. } | Tag::Item | Tag::CodeBlock(_) if !options.formatting => paragraph(),
        Tag::Link { ref dest_url, .. } if !options.links || !is_safe_href(dest_url.trim()) => unwrap,
        Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        } => match &options.images {
            Some(storage) if is_safe_href(dest_url.trim()) => keep(Tag::Image {
                link_type,
                dest_url: CowStr::from(storage.resolve(&dest_url)),
                title,
                id,
            }),
            _ => unwrap,
        },
        Tag::HtmlBlock => paragraph(),
        other => keep(other),
    }
}

fn keep(tag: Tag<'_>) -> Gated<'_> {
    let end = tag.to_end();
    (Some(Event::Start(tag)), Some(Event::End(end)))
}

/// Whether a link target may appear in rendered output.
pub fn is_safe_href(href: &str) -> bool {
    let lower = href.to_ascii_lowercase();
    !(lower.starts_with("javascript:") || lower.starts_with("vbscript:") || lower.starts_with("data:"))
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
