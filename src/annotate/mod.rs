//! Click-to-highlight behaviour for rendered SVG graphs.
//!
//! The script only relies on Graphviz SVG conventions: every edge is a `g.edge`
//! whose `<title>` reads `source->target`, and every node is a `g.node` whose
//! `<title>` and `<text>` carry the node identifier.

use crate::error::{DepvizError, Result};

pub const HIGHLIGHT_SCRIPT: &str = include_str!("highlight.js");

const SVG_CLOSE: &str = "</svg>";

/// Embeds [`HIGHLIGHT_SCRIPT`] just before the closing `</svg>` tag.
pub fn annotate_svg(svg: &str) -> Result<String> {
    let close = svg.rfind(SVG_CLOSE).ok_or_else(|| {
        DepvizError::collaborator("annotate", "no closing </svg> tag in layout output")
    })?;

    let mut out = String::with_capacity(svg.len() + HIGHLIGHT_SCRIPT.len() + 64);
    out.push_str(&svg[..close]);
    out.push_str("<script type=\"text/javascript\"><![CDATA[\n");
    out.push_str(HIGHLIGHT_SCRIPT);
    out.push_str("]]></script>\n");
    out.push_str(&svg[close..]);
    Ok(out)
}
