//! Fixed presentation templates.

use super::tree::{Activation, RenderNode};

pub const DEFAULT_FRAME_ASPECT_RATIO: f64 = 16.0 / 9.0;

pub fn link(href: &str, children: Vec<RenderNode>) -> RenderNode {
    RenderNode::element("a")
        .with_attr("href", href)
        .on_activate(Activation::Link(href.to_string()))
        .with_children(children)
}

/// An inline image with the click-to-enlarge affordance.
pub fn zoomable_image(src: &str, alt: &str) -> RenderNode {
    RenderNode::element("img")
        .with_class("zoomable")
        .with_attr("src", src)
        .with_attr("alt", alt)
        .on_activate(Activation::Image(src.to_string()))
}

/// Frame embed inside a fixed aspect-ratio box (`ratio` is width / height).
pub fn framed(src: &str, ratio: f64) -> RenderNode {
    let ratio = if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        DEFAULT_FRAME_ASPECT_RATIO
    };
    RenderNode::element("div")
        .with_class("frame-embed")
        .with_style("position", "relative")
        .with_style("padding-top", format!("{:.2}%", 100.0 / ratio))
        .with_child(
            RenderNode::element("iframe")
                .with_attr("src", src)
                .with_attr("allowfullscreen", "")
                .with_style("position", "absolute")
                .with_style("top", "0")
                .with_style("left", "0")
                .with_style("width", "100%")
                .with_style("height", "100%"),
        )
}

/// Call-to-action control.
pub fn button(label: &str, href: &str) -> RenderNode {
    link(href, vec![RenderNode::text(label)]).with_class("cta-button")
}

pub fn image_block(src: &str) -> RenderNode {
    RenderNode::element("figure")
        .with_class("image-block")
        .with_child(zoomable_image(src, ""))
}

pub fn file_download(url: &str, name: &str, size_mb: f64) -> RenderNode {
    RenderNode::element("a")
        .with_class("file-download")
        .with_attr("href", url)
        .with_attr("download", name)
        .on_activate(Activation::Link(url.to_string()))
        .with_child(RenderNode::text(format!("{name} ({size_mb:.1} MB)")))
}

pub fn trusted_markup(html: &str) -> RenderNode {
    RenderNode::element("div")
        .with_class("code-block")
        .with_child(RenderNode::raw(html))
}

pub fn script_output(html: String) -> RenderNode {
    RenderNode::element("div")
        .with_class("code-output")
        .with_child(RenderNode::raw(html))
}

/// Local error panel replacing one failed code block.
pub fn code_error(message: &str) -> RenderNode {
    RenderNode::element("div")
        .with_class("code-error")
        .with_attr("role", "alert")
        .with_child(RenderNode::text(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn frame_uses_padding_box() {
        assert_snapshot!(framed("https://v.example/1", 16.0 / 9.0).to_html(), @r#"<div class="frame-embed" style="padding-top:56.25%;position:relative"><iframe allowfullscreen="" src="https://v.example/1" style="height:100%;left:0;position:absolute;top:0;width:100%"></iframe></div>"#);
    }

    #[test]
    fn invalid_ratio_falls_back() {
        assert_eq!(framed("x", 0.0), framed("x", DEFAULT_FRAME_ASPECT_RATIO));
        assert_eq!(framed("x", f64::NAN), framed("x", DEFAULT_FRAME_ASPECT_RATIO));
    }

    #[test]
    fn file_label_has_size() {
        assert_snapshot!(file_download("/f/a.pdf", "a.pdf", 2.0).to_html(), @r#"<a class="file-download" download="a.pdf" href="/f/a.pdf">a.pdf (2.0 MB)</a>"#);
    }

    #[test]
    fn button_is_an_activating_link() {
        let node = button("Buy", "/shop");
        assert_eq!(node.activations(), vec![&Activation::Link("/shop".into())]);
        assert_eq!(node.to_html(), r#"<a class="cta-button" href="/shop">Buy</a>"#);
    }
}
