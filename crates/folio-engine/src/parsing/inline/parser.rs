use crate::parsing::markup::{find_first_close, find_matching_close, read_open_tag};

use super::{
    cursor::Cursor,
    kinds::{
        Button, Emphasis, Frame, Media, MdLink, Newline, RawContainer, Strong, TAG_OPEN,
        is_token_start,
    },
    style::parse_style,
    types::{ContainerTag, InlineNode},
};

/// Deepest bold, italic or container nesting that is decoded. Openers
/// beyond it are literal text.
pub const MAX_NESTING: usize = 64;

/// Parses one text run into a sequence of [`InlineNode`]s.
///
/// Never fails: anything that does not form a complete token is kept as
/// literal text.
pub fn parse_inline(s: &str) -> Vec<InlineNode> {
    parse(s, 0).0
}

/// Parses `s` from byte `start` to its end, returning the nodes and the
/// index where parsing stopped.
///
/// Inner content of a bold, italic or container token is parsed by calling
/// this again on `s` truncated at the token's close, so no state is shared
/// between levels. Nesting stops at [`MAX_NESTING`].
///
/// # Token Precedence
/// At each position, in order: link, bold (`**` before `*`), italic, tag,
/// newline. Every step either consumes a whole token or at least one
/// literal byte, so parsing always terminates.
pub fn parse(s: &str, start: usize) -> (Vec<InlineNode>, usize) {
    parse_nested(s, start, 0)
}

fn parse_nested(s: &str, start: usize, depth: usize) -> (Vec<InlineNode>, usize) {
    let mut cur = Cursor::at(s, start);
    let mut out = vec![];
    let mut text_start = cur.i;

    while !cur.eof() {
        if !cur.peek().is_some_and(is_token_start) {
            cur.bump();
            continue;
        }
        let at = cur.i;
        if let Some(node) = try_parse_token(&mut cur, depth) {
            push_text(&mut out, &s[text_start..at]);
            out.push(node);
            text_start = cur.i;
            continue;
        }
        // An unmatched `**` is consumed whole so its second `*` cannot open
        // an italic.
        let width = if cur.starts_with(Strong::DELIM.as_bytes()) {
            2
        } else {
            1
        };
        cur.bump_n(width);
    }

    push_text(&mut out, &s[text_start..cur.i]);
    (out, cur.i)
}

/// Appends literal text, merging with a preceding text node.
fn push_text(out: &mut Vec<InlineNode>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(InlineNode::Text(prev)) = out.last_mut() {
        prev.push_str(text);
    } else {
        out.push(InlineNode::Text(text.to_string()));
    }
}

fn try_parse_token(cur: &mut Cursor<'_>, depth: usize) -> Option<InlineNode> {
    match cur.peek()? {
        MdLink::OPEN => try_parse_link(cur),
        b'*' if cur.starts_with(Strong::DELIM.as_bytes()) => {
            try_parse_delimited(cur, Strong::DELIM, depth).map(InlineNode::Strong)
        }
        b'*' => try_parse_delimited(cur, Emphasis::DELIM, depth).map(InlineNode::Em),
        TAG_OPEN => try_parse_tag(cur, depth),
        Newline::LF => {
            cur.bump();
            Some(InlineNode::LineBreak)
        }
        b'\r' if cur.starts_with(Newline::CRLF) => {
            cur.bump_n(Newline::CRLF.len());
            Some(InlineNode::LineBreak)
        }
        _ => None,
    }
}

/// Attempts `[text](href)` at the cursor. The cursor only moves on success.
fn try_parse_link(cur: &mut Cursor<'_>) -> Option<InlineNode> {
    let s = cur.s;
    let open = cur.i;
    let text_end = Cursor::at(s, open + 1).find(MdLink::TEXT_CLOSE)?;
    if !s[text_end..].starts_with(MdLink::MID) {
        return None;
    }
    let href_start = text_end + MdLink::MID.len();
    let href_end = Cursor::at(s, href_start).find(MdLink::CLOSE)?;
    let href = s[href_start..href_end].trim();
    if href.is_empty() {
        return None;
    }

    cur.i = href_end + MdLink::CLOSE.len();
    Some(InlineNode::Link {
        text: s[open + 1..text_end].to_string(),
        href: href.to_string(),
    })
}

/// Attempts a `delim ... delim` pair, scanning forward for the next
/// occurrence of the delimiter. Empty content does not count as a match.
fn try_parse_delimited(
    cur: &mut Cursor<'_>,
    delim: &str,
    depth: usize,
) -> Option<Vec<InlineNode>> {
    if depth >= MAX_NESTING {
        return None;
    }
    let s = cur.s;
    let inner_start = cur.i + delim.len();
    let close = Cursor::at(s, inner_start).find(delim)?;
    if close == inner_start {
        return None;
    }

    let (children, _) = parse_nested(&s[..close], inner_start, depth + 1);
    cur.i = close + delim.len();
    Some(children)
}

/// Attempts one of the tag tokens at the cursor.
fn try_parse_tag(cur: &mut Cursor<'_>, depth: usize) -> Option<InlineNode> {
    let s = cur.s;
    let tag = read_open_tag(s, cur.i)?;

    if let Some(kind) = ContainerTag::from_name(&tag.name) {
        if tag.self_closing || depth >= MAX_NESTING {
            return None;
        }
        let (close_start, close_end) = find_matching_close(s, tag.end, &tag.name)?;
        let (children, _) = parse_nested(&s[..close_start], tag.end, depth + 1);
        cur.i = close_end;
        return Some(InlineNode::Container {
            tag: kind,
            class: non_empty(tag.attr(RawContainer::CLASS)),
            style: tag
                .attr(RawContainer::STYLE)
                .map(parse_style)
                .unwrap_or_default(),
            children,
        });
    }

    match tag.name.as_str() {
        Media::NAME => {
            let src = non_empty(tag.attr(Media::SRC))?;
            cur.i = tag.end;
            Some(InlineNode::Media {
                src,
                alt: tag.attr(Media::ALT).unwrap_or_default().to_string(),
            })
        }
        Frame::NAME => {
            let src = non_empty(tag.attr(Frame::SRC))?;
            let end = if tag.self_closing {
                tag.end
            } else {
                find_first_close(s, tag.end, Frame::NAME)?.1
            };
            cur.i = end;
            Some(InlineNode::Frame { src })
        }
        Button::NAME if !tag.self_closing => {
            let href = non_empty(tag.attr(Button::HREF))?;
            let (close_start, close_end) = find_first_close(s, tag.end, Button::NAME)?;
            cur.i = close_end;
            Some(InlineNode::Button {
                label: s[tag.end..close_start].to_string(),
                href,
            })
        }
        _ => None,
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn text(s: &str) -> InlineNode {
        InlineNode::Text(s.to_string())
    }

    #[test]
    fn parse_simple_text() {
        assert_eq!(parse_inline("hello world"), vec![text("hello world")]);
    }

    #[test]
    fn empty_input_has_no_nodes() {
        assert_eq!(parse_inline(""), vec![]);
    }

    #[test]
    fn link_is_self_contained() {
        let nodes = parse_inline("[Visit **now**](https://example.com) site");
        assert_eq!(
            nodes,
            vec![
                InlineNode::Link {
                    text: "Visit **now**".into(),
                    href: "https://example.com".into(),
                },
                text(" site"),
            ]
        );
    }

    #[rstest]
    #[case("[no close")]
    #[case("[text] (gap)")]
    #[case("[text](no close")]
    #[case("[text]()")]
    fn broken_links_are_literal(#[case] input: &str) {
        assert_eq!(parse_inline(input), vec![text(input)]);
    }

    #[test]
    fn bold_and_italic() {
        let nodes = parse_inline("a **b** *c* d");
        assert_eq!(
            nodes,
            vec![
                text("a "),
                InlineNode::Strong(vec![text("b")]),
                text(" "),
                InlineNode::Em(vec![text("c")]),
                text(" d"),
            ]
        );
    }

    #[test]
    fn bold_content_is_parsed_recursively() {
        let nodes = parse_inline("**a *b* [c](d)**");
        assert_eq!(
            nodes,
            vec![InlineNode::Strong(vec![
                text("a "),
                InlineNode::Em(vec![text("b")]),
                text(" "),
                InlineNode::Link {
                    text: "c".into(),
                    href: "d".into()
                },
            ])]
        );
    }

    #[test]
    fn unmatched_bold_is_literal() {
        let nodes = parse_inline("a **b");
        assert_eq!(nodes, vec![text("a **b")]);
    }

    #[test]
    fn unmatched_bold_does_not_open_italic() {
        assert_eq!(parse_inline("**a*"), vec![text("**a*")]);
    }

    #[test]
    fn empty_delimiters_are_literal() {
        assert_eq!(parse_inline("****"), vec![text("****")]);
        assert_eq!(parse_inline("a * b"), vec![text("a * b")]);
    }

    #[test]
    fn newlines_become_breaks() {
        assert_eq!(
            parse_inline("Line1\nLine2\r\nLine3"),
            vec![
                text("Line1"),
                InlineNode::LineBreak,
                text("Line2"),
                InlineNode::LineBreak,
                text("Line3"),
            ]
        );
    }

    #[test]
    fn nested_same_name_containers() {
        let nodes = parse_inline(r#"<div class="a"><div class="b">X</div>Y</div>"#);
        assert_eq!(
            nodes,
            vec![InlineNode::Container {
                tag: ContainerTag::Div,
                class: Some("a".into()),
                style: Default::default(),
                children: vec![
                    InlineNode::Container {
                        tag: ContainerTag::Div,
                        class: Some("b".into()),
                        style: Default::default(),
                        children: vec![text("X")],
                    },
                    text("Y"),
                ],
            }]
        );
    }

    #[test]
    fn container_keeps_only_class_and_style() {
        let nodes = parse_inline(r#"<span class="hl" style="color:red" onclick="x()">hi</span>"#);
        match &nodes[0] {
            InlineNode::Container {
                tag, class, style, ..
            } => {
                assert_eq!(*tag, ContainerTag::Span);
                assert_eq!(class.as_deref(), Some("hl"));
                assert_eq!(style.get("color").map(String::as_str), Some("red"));
                assert_eq!(style.len(), 1);
            }
            other => panic!("expected container, got {other:?}"),
        }
    }

    #[rstest]
    #[case("span")]
    #[case("div")]
    fn deep_container_nesting_is_capped(#[case] name: &str) {
        let n = 5_000;
        let (open, close) = (format!("<{name}>"), format!("</{name}>"));
        let input = format!("{}x{}", open.repeat(n), close.repeat(n));

        let nodes = parse_inline(&input);

        let mut depth = 0;
        let mut level = nodes.as_slice();
        while let [InlineNode::Container { children, .. }] = level {
            depth += 1;
            level = children.as_slice();
        }
        assert_eq!(depth, MAX_NESTING);
        let rest = n - MAX_NESTING;
        assert_eq!(
            level,
            [text(&format!("{}x{}", open.repeat(rest), close.repeat(rest)))]
        );
    }

    #[test]
    fn bold_inside_capped_containers_is_literal() {
        let input = format!(
            "{}**x**{}",
            "<span>".repeat(MAX_NESTING),
            "</span>".repeat(MAX_NESTING)
        );

        let nodes = parse_inline(&input);

        let mut level = nodes.as_slice();
        while let [InlineNode::Container { children, .. }] = level {
            level = children.as_slice();
        }
        assert_eq!(level, [text("**x**")]);
    }

    #[test]
    fn mismatched_tag_names_never_match() {
        let nodes = parse_inline("<span>a</div>");
        assert_eq!(nodes, vec![text("<span>a</div>")]);
    }

    #[test]
    fn unmatched_opener_is_literal() {
        assert_eq!(parse_inline("<div>open"), vec![text("<div>open")]);
    }

    #[test]
    fn media_consumes_only_itself() {
        let nodes = parse_inline(r#"see <img src="a.png" alt="A"> here</img>"#);
        assert_eq!(
            nodes,
            vec![
                text("see "),
                InlineNode::Media {
                    src: "a.png".into(),
                    alt: "A".into()
                },
                text(" here</img>"),
            ]
        );
    }

    #[test]
    fn media_without_src_is_literal() {
        assert_eq!(parse_inline("<img alt=x>"), vec![text("<img alt=x>")]);
    }

    #[test]
    fn frame_discards_body_and_first_close_wins() {
        let nodes =
            parse_inline(r#"<iframe src="https://v.example/1">junk</iframe>after</iframe>"#);
        assert_eq!(
            nodes,
            vec![
                InlineNode::Frame {
                    src: "https://v.example/1".into()
                },
                text("after</iframe>"),
            ]
        );
    }

    #[test]
    fn unclosed_frame_is_literal() {
        let input = r#"<iframe src="x">"#;
        assert_eq!(parse_inline(input), vec![text(input)]);
    }

    #[test]
    fn button_label_is_literal() {
        let nodes = parse_inline(r#"<button href="/buy">**Buy** now</button>"#);
        assert_eq!(
            nodes,
            vec![InlineNode::Button {
                label: "**Buy** now".into(),
                href: "/buy".into()
            }]
        );
    }

    #[test]
    fn button_without_href_is_literal() {
        let input = "<button>Buy</button>";
        assert_eq!(parse_inline(input), vec![text(input)]);
    }

    #[test]
    fn unknown_tags_are_literal() {
        let input = "<script>alert(1)</script>";
        assert_eq!(parse_inline(input), vec![text(input)]);
    }

    #[test]
    fn multibyte_text_is_preserved() {
        let input = "héllo **wörld** ✓";
        assert_eq!(
            parse_inline(input),
            vec![
                text("héllo "),
                InlineNode::Strong(vec![text("wörld")]),
                text(" ✓"),
            ]
        );
    }

    #[test]
    fn parse_reports_end_index() {
        let s = "ab**c**";
        let (nodes, end) = parse(s, 2);
        assert_eq!(nodes, vec![InlineNode::Strong(vec![text("c")])]);
        assert_eq!(end, s.len());
    }
}
