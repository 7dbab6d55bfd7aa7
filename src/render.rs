//! Markdown preview rendering.
//!
//! Thin adapter over comrak: raw markdown text in, an HTML fragment out.
//! Rendering is pure and stateless, so callers can re-render on every
//! edit without coordination.

use comrak::{Options, markdown_to_html};

/// Convert markdown text to an HTML fragment.
///
/// Tables and bare-URL autolinking are enabled; GFM autolink rules keep
/// trailing punctuation out of the link span. Raw HTML in the source is
/// not passed through to the output, so the fragment can be inserted into
/// a preview pane without a separate sanitization pass.
pub fn to_html(text: &str) -> String {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.autolink = true;
    markdown_to_html(text, &options)
}
