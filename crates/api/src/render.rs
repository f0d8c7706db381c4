//! Minimal HTML rendering of owner views.

use domain::{Model, RenderError, ViewRenderer};

/// Renders every view as a small HTML page listing its model as JSON.
///
/// Enough to drive the pages from a browser or a test; real templates would
/// plug in through [`ViewRenderer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

fn title(view_name: &str) -> &str {
    match view_name {
        "owners/createOrUpdateOwnerForm" => "Owner",
        "owners/findOwners" => "Find Owners",
        "owners/ownersList" => "Owners",
        "owners/ownerDetails" => "Owner Information",
        other => other,
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

impl ViewRenderer for HtmlRenderer {
    fn render(&self, view_name: &str, model: &Model) -> Result<String, RenderError> {
        let data = serde_json::to_string_pretty(model).map_err(|e| RenderError {
            view: view_name.to_string(),
            reason: e.to_string(),
        })?;

        Ok(format!(
            "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
             <body data-view=\"{view}\">\n<h2>{title}</h2>\n<pre>{data}</pre>\n</body>\n</html>\n",
            title = escape_html(title(view_name)),
            view = escape_html(view_name),
            data = escape_html(&data),
        ))
    }
}
