use std::sync::OnceLock;

use regex::Regex;

/// Rich text handed over by the deck provider.
///
/// The provider guarantees the markup is already sanitized; this type marks
/// that promise so detail bodies can't be mixed up with plain strings. Only
/// the content loader builds one. Rendering interprets a small tag subset
/// (`p`, `strong`/`b`, `em`/`i`, `ul`/`ol`, `li`, `br`) and drops every other
/// tag, so nothing in here is ever executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedMarkup(String);

#[derive(Debug, Clone, PartialEq)]
pub enum MarkupBlock {
    Paragraph(Vec<Span>),
    List { ordered: bool, items: Vec<Vec<Span>> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

impl TrustedMarkup {
    pub(crate) fn from_provider(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn blocks(&self) -> Vec<MarkupBlock> {
        parse_blocks(&self.0)
    }

    /// Text content only, one line per block.
    pub fn plain_text(&self) -> String {
        self.blocks()
            .iter()
            .map(|block| match block {
                MarkupBlock::Paragraph(spans) => spans_text(spans),
                MarkupBlock::List { items, .. } => items
                    .iter()
                    .map(|item| format!("- {}", spans_text(item)))
                    .collect::<Vec<_>>()
                    .join("\n"),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn spans_text(spans: &[Span]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)<\s*(/?)\s*([a-zA-Z][a-zA-Z0-9]*)[^>]*>").expect("valid tag regex")
    })
}

fn entity_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("valid entity regex")
    })
}

#[derive(Default)]
struct BlockBuilder {
    blocks: Vec<MarkupBlock>,
    paragraph: Vec<Span>,
    list: Option<(bool, Vec<Vec<Span>>)>,
    item: Option<Vec<Span>>,
    bold: usize,
    italic: usize,
    skip_depth: usize,
}

impl BlockBuilder {
    fn text(&mut self, raw: &str) {
        if self.skip_depth > 0 {
            return;
        }
        let decoded = decode_entities(raw);
        let bold = self.bold > 0;
        let italic = self.italic > 0;
        if let Some(item) = self.item.as_mut() {
            push_text(item, &decoded, bold, italic);
        } else if self.list.is_some() {
            // Text between list items: open an implicit item unless it is
            // only whitespace.
            if !decoded.trim().is_empty() {
                let mut item = Vec::new();
                push_text(&mut item, &decoded, bold, italic);
                self.item = Some(item);
            }
        } else {
            push_text(&mut self.paragraph, &decoded, bold, italic);
        }
    }

    fn line_break(&mut self) {
        let target = match self.item.as_mut() {
            Some(item) => item,
            None => &mut self.paragraph,
        };
        trim_end(target);
        target.push(Span {
            text: "\n".to_string(),
            bold: false,
            italic: false,
        });
    }

    fn flush_paragraph(&mut self) {
        let mut spans = std::mem::take(&mut self.paragraph);
        trim_end(&mut spans);
        if !spans.is_empty() {
            self.blocks.push(MarkupBlock::Paragraph(spans));
        }
    }

    fn finish_item(&mut self) {
        if let Some(mut item) = self.item.take() {
            trim_end(&mut item);
            if let Some((_, items)) = self.list.as_mut() {
                if !item.is_empty() {
                    items.push(item);
                }
            }
        }
    }

    fn open_list(&mut self, ordered: bool) {
        self.flush_paragraph();
        self.finish_list();
        self.list = Some((ordered, Vec::new()));
    }

    fn finish_list(&mut self) {
        self.finish_item();
        if let Some((ordered, items)) = self.list.take() {
            if !items.is_empty() {
                self.blocks.push(MarkupBlock::List { ordered, items });
            }
        }
    }

    fn open_tag(&mut self, name: &str) {
        match name {
            "script" | "style" => self.skip_depth += 1,
            _ if self.skip_depth > 0 => {}
            "p" | "div" => {
                if self.list.is_none() {
                    self.flush_paragraph();
                }
            }
            "ul" => self.open_list(false),
            "ol" => self.open_list(true),
            "li" => {
                if self.list.is_none() {
                    self.open_list(false);
                }
                self.finish_item();
                self.item = Some(Vec::new());
            }
            "strong" | "b" => self.bold += 1,
            "em" | "i" => self.italic += 1,
            "br" => self.line_break(),
            _ => {}
        }
    }

    fn close_tag(&mut self, name: &str) {
        match name {
            "script" | "style" => self.skip_depth = self.skip_depth.saturating_sub(1),
            _ if self.skip_depth > 0 => {}
            "p" | "div" => {
                if self.list.is_none() {
                    self.flush_paragraph();
                }
            }
            "ul" | "ol" => self.finish_list(),
            "li" => self.finish_item(),
            "strong" | "b" => self.bold = self.bold.saturating_sub(1),
            "em" | "i" => self.italic = self.italic.saturating_sub(1),
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<MarkupBlock> {
        self.finish_list();
        self.flush_paragraph();
        self.blocks
    }
}

fn parse_blocks(markup: &str) -> Vec<MarkupBlock> {
    let mut builder = BlockBuilder::default();
    let mut last = 0;
    for caps in tag_regex().captures_iter(markup) {
        let Some(whole) = caps.get(0) else { continue };
        builder.text(&markup[last..whole.start()]);
        last = whole.end();

        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let name = caps
            .get(2)
            .map(|m| m.as_str().to_ascii_lowercase())
            .unwrap_or_default();
        if closing {
            builder.close_tag(&name);
        } else {
            builder.open_tag(&name);
        }
    }
    builder.text(&markup[last..]);
    builder.finish()
}

/// Append text with HTML whitespace rules: runs collapse to one space and
/// leading space at the start of a block is dropped.
fn push_text(spans: &mut Vec<Span>, text: &str, bold: bool, italic: bool) {
    let mut collapsed = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() && ch != '\u{a0}' {
            if !in_space {
                collapsed.push(' ');
            }
            in_space = true;
        } else {
            collapsed.push(if ch == '\u{a0}' { ' ' } else { ch });
            in_space = false;
        }
    }

    let at_line_start = spans
        .last()
        .map(|s| s.text.is_empty() || s.text.ends_with(' ') || s.text.ends_with('\n'))
        .unwrap_or(true);
    let text = if at_line_start {
        collapsed.trim_start()
    } else {
        collapsed.as_str()
    };
    if text.is_empty() {
        return;
    }

    match spans.last_mut() {
        Some(prev) if prev.bold == bold && prev.italic == italic && prev.text != "\n" => {
            prev.text.push_str(text);
        }
        _ => spans.push(Span {
            text: text.to_string(),
            bold,
            italic,
        }),
    }
}

fn trim_end(spans: &mut Vec<Span>) {
    while let Some(last) = spans.last_mut() {
        let trimmed_len = last.text.trim_end_matches(' ').len();
        last.text.truncate(trimmed_len);
        if last.text.is_empty() {
            spans.pop();
        } else {
            break;
        }
    }
}

fn decode_entities(text: &str) -> String {
    entity_regex()
        .replace_all(text, |caps: &regex::Captures| {
            let entity = &caps[1];
            let decoded = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match entity {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some('\u{a0}'),
                    "ndash" => Some('\u{2013}'),
                    "mdash" => Some('\u{2014}'),
                    "copy" => Some('\u{a9}'),
                    _ => None,
                }
            };
            decoded
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markup(s: &str) -> TrustedMarkup {
        TrustedMarkup::from_provider(s)
    }

    #[test]
    fn test_heading_paragraph_and_list() {
        let blocks = markup(
            "\n  <p><strong>Achievements:</strong></p>\n  <ul>\n    <li>Egypt Cup 2024</li>\n    <li>CAF Champions League 2025</li>\n  </ul>\n",
        )
        .blocks();
        assert_eq!(blocks.len(), 2);
        match &blocks[0] {
            MarkupBlock::Paragraph(spans) => {
                assert_eq!(spans.len(), 1);
                assert_eq!(spans[0].text, "Achievements:");
                assert!(spans[0].bold);
            }
            other => panic!("expected paragraph, got {other:?}"),
        }
        match &blocks[1] {
            MarkupBlock::List { ordered, items } => {
                assert!(!ordered);
                assert_eq!(items.len(), 2);
                assert_eq!(spans_text(&items[1]), "CAF Champions League 2025");
            }
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn test_whitespace_collapses() {
        let blocks = markup("<p>  one \n\n   two   <em>three</em>  </p>").blocks();
        let MarkupBlock::Paragraph(spans) = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(spans_text(spans), "one two three");
        assert!(spans[1].italic);
    }

    #[test]
    fn test_unknown_tags_are_dropped() {
        let blocks = markup("<p>safe <span class=\"x\">text</span><script>alert(1)</script></p>")
            .blocks();
        assert_eq!(blocks.len(), 1);
        let MarkupBlock::Paragraph(spans) = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(spans_text(spans), "safe text");
    }

    #[test]
    fn test_entities_decode() {
        let blocks = markup("<p>3,000 &ndash; 7,000 &amp; more &#65;&#x42; &bogus;</p>").blocks();
        let MarkupBlock::Paragraph(spans) = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(spans_text(spans), "3,000 \u{2013} 7,000 & more AB &bogus;");
    }

    #[test]
    fn test_bare_text_becomes_paragraph() {
        let blocks = markup("just text").blocks();
        assert_eq!(
            blocks,
            vec![MarkupBlock::Paragraph(vec![Span {
                text: "just text".to_string(),
                bold: false,
                italic: false,
            }])]
        );
    }

    #[test]
    fn test_line_break_and_ordered_list() {
        let m = markup("<p>a<br>b</p><ol><li>first</li><li>second</li></ol>");
        assert_eq!(m.plain_text(), "a\nb\n- first\n- second");
        assert!(matches!(
            m.blocks()[1],
            MarkupBlock::List { ordered: true, .. }
        ));
    }

    #[test]
    fn test_empty_markup() {
        assert!(markup("  \n ").is_empty());
        assert!(markup("<p> </p>").blocks().is_empty());
    }
}
