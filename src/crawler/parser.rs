//! Chapter page parser
//!
//! This module turns one chapter page into ordered verse records:
//! - Verse numbers open a new verse (`span.number`)
//! - Section headings attach to the verse that follows (`font.smallTitle`)
//! - Footnote markers (`a.comment`) and footnote bodies (`div.D2`) are paired
//! - Hidden, image and script nodes are skipped
//!
//! Everything happens in one depth-first walk of the content container.

use scraper::{ElementRef, Html, Node, Selector};
use thiserror::Error;

/// Selector for the element wrapping the chapter text
const CONTAINER_SELECTOR: &str = "div#tdBible1";

/// Errors raised while parsing a chapter page
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty html input")]
    EmptyInput,

    #[error("content container div#tdBible1 not found")]
    ContainerNotFound,
}

/// Parsed contents of one chapter page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterData {
    /// Verses in document order
    pub verses: Vec<VerseData>,
}

/// A single verse extracted from the page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerseData {
    pub number: u32,

    /// Verse text with whitespace collapsed
    pub text: String,

    /// Heading printed immediately before this verse, if any
    pub section_title: Option<String>,

    pub footnotes: Vec<FootnoteData>,
}

impl VerseData {
    pub fn has_footnote(&self) -> bool {
        !self.footnotes.is_empty()
    }
}

/// A footnote attached to a verse
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FootnoteData {
    /// Reference glyph shown in the verse text, e.g. "1)"
    pub marker: String,

    pub content: String,
}

/// Mutable state carried through the traversal
#[derive(Debug, Default)]
struct ParseState {
    verses: Vec<VerseData>,
    current: Option<usize>,
    pending_title: Option<String>,
}

impl ParseState {
    fn start_verse(&mut self, number: u32) {
        self.verses.push(VerseData {
            number,
            section_title: self.pending_title.take(),
            ..VerseData::default()
        });
        self.current = Some(self.verses.len() - 1);
    }

    fn current_verse(&mut self) -> Option<&mut VerseData> {
        self.current.and_then(|idx| self.verses.get_mut(idx))
    }

    fn add_text(&mut self, text: &str) {
        if let Some(verse) = self.current_verse() {
            verse.text.push_str(text);
        }
    }

    fn add_footnote_marker(&mut self, marker: String) {
        if let Some(verse) = self.current_verse() {
            verse.footnotes.push(FootnoteData {
                marker,
                content: String::new(),
            });
        }
    }

    /// Fills the nearest preceding footnote of the current verse that has no content yet
    fn set_footnote_content(&mut self, content: String) {
        let Some(verse) = self.current_verse() else {
            return;
        };

        if let Some(slot) = verse
            .footnotes
            .iter_mut()
            .rev()
            .find(|f| f.content.is_empty())
        {
            slot.content = content;
        }
    }

    fn finish(self) -> ChapterData {
        let verses = self
            .verses
            .into_iter()
            .map(|mut verse| {
                verse.text = normalize_whitespace(&verse.text);
                verse
            })
            .collect();

        ChapterData { verses }
    }
}

/// Parses one chapter page into verses
///
/// # Arguments
///
/// * `html` - The decoded page body
///
/// # Returns
///
/// * `Ok(ChapterData)` - Verses in document order (possibly none)
/// * `Err(ParseError)` - Input was empty or the content container is missing
///
/// # Example
///
/// ```
/// use bible_harvest::crawler::parse_chapter_html;
///
/// let html = r#"<div id="tdBible1">
///     <font class="smallTitle">천지 창조</font>
///     <span class="number">1&nbsp;</span>태초에 하나님이 천지를 창조하시니라
/// </div>"#;
/// let chapter = parse_chapter_html(html).unwrap();
/// assert_eq!(chapter.verses.len(), 1);
/// assert_eq!(chapter.verses[0].section_title.as_deref(), Some("천지 창조"));
/// ```
pub fn parse_chapter_html(html: &str) -> Result<ChapterData, ParseError> {
    if html.trim().is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let document = Html::parse_document(html);

    let container_selector =
        Selector::parse(CONTAINER_SELECTOR).map_err(|_| ParseError::ContainerNotFound)?;
    let container = document
        .select(&container_selector)
        .next()
        .ok_or(ParseError::ContainerNotFound)?;

    let mut state = ParseState::default();
    walk_element(container, &mut state);

    Ok(state.finish())
}

/// Visits an element, dispatching on the markup conventions of the source site
fn walk_element(element: ElementRef<'_>, state: &mut ParseState) {
    let value = element.value();

    match value.name() {
        "font" if has_class(element, "smallTitle") => {
            state.pending_title = Some(collect_text(element).trim().to_string());
            return;
        }
        "span" if has_class(element, "number") => {
            let raw = collect_text(element).replace('\u{a0}', "");
            if let Ok(number) = raw.trim().parse::<u32>() {
                state.start_verse(number);
            }
            return;
        }
        "a" if has_class(element, "comment") => {
            let marker = collect_text(element).trim().to_string();
            if !marker.is_empty() {
                state.add_footnote_marker(marker);
            }
            return;
        }
        "div" if has_class(element, "D2") => {
            let content = collect_text(element).trim().to_string();
            if !content.is_empty() {
                state.set_footnote_content(content);
            }
            return;
        }
        "img" | "script" | "style" => return,
        _ => {}
    }

    if is_hidden(element) {
        return;
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => state.add_text(text),
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    walk_element(child_element, state);
                }
            }
            _ => {}
        }
    }
}

fn has_class(element: ElementRef<'_>, name: &str) -> bool {
    element.value().classes().any(|class| class == name)
}

/// True when the inline style hides the element
fn is_hidden(element: ElementRef<'_>) -> bool {
    element
        .value()
        .attr("style")
        .map(|style| {
            let compact: String = style
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_ascii_lowercase();
            compact.contains("display:none")
        })
        .unwrap_or(false)
}

fn collect_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Collapses runs of whitespace to a single space and trims the ends
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
