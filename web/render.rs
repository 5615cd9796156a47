//! HTML for the prediction pages. Every page is rendered whole on each
//! request; there is no client-side state.

use crate::flow::Outcome;
use crate::schema::{Disease, FieldKind, FieldSpec};
use std::borrow::Cow;

pub const APP_TITLE: &str = "Multiple Disease Prediction System";

const STYLE: &str = r#"
body, .app {
    margin: 0;
    min-height: 100vh;
    font-family: "Source Sans Pro", "Segoe UI", sans-serif;
    background: linear-gradient(to right, #FFDDC1, #FFEBEE, #D7FFD9, #E3F2FD);
}
.app { display: flex; }
.sidebar { width: 16rem; padding: 1.5rem 1rem; background: rgba(255, 255, 255, 0.6); }
.sidebar h2 { font-size: 1.1rem; margin-top: 0; }
.sidebar ul { list-style: none; padding: 0; }
.sidebar a { display: block; padding: 0.5rem 0.75rem; margin: 0.25rem 0; border-radius: 0.5rem; color: #31333F; text-decoration: none; }
.sidebar a.active { background: #FF4B4B; color: white; }
main { flex: 1; padding: 2rem 3rem; }
.grid { display: grid; grid-template-columns: repeat(5, minmax(0, 1fr)); gap: 0.75rem 1rem; }
.field { display: flex; flex-direction: column; font-size: 0.9rem; }
.field.wide { grid-column: 1 / -1; max-width: 20rem; }
.field input, .field select { margin-top: 0.25rem; padding: 0.4rem; border: 1px solid #ccc; border-radius: 0.4rem; }
button { margin-top: 1.25rem; padding: 0.5rem 1rem; border-radius: 0.5rem; border: 1px solid #ccc; background: white; cursor: pointer; }
.outcome { margin-top: 1.5rem; padding: 0.75rem 1rem; border-radius: 0.5rem; }
.outcome.danger { color: red; background: #FFF0F0; }
.outcome.safe { color: green; background: #EEFBEF; }
.outcome.warning { color: #7A5C00; background: #FFF8DB; }
.outcome.error { color: #9B1C1C; background: #FFE4E4; }
"#;

/// Escapes text for use in element content and quoted attribute values.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

/// Initial form values: empty text inputs and the first option of each selection.
pub fn default_values(disease: Disease) -> Vec<String> {
    disease
        .fields()
        .iter()
        .map(|field| match field.kind {
            FieldKind::Numeric => String::new(),
            FieldKind::Choice(options) => options.first().map(|o| o.to_string()).unwrap_or_default(),
        })
        .collect()
}

/// Wire name of the field at `index`.
pub fn field_name(index: usize) -> String {
    format!("f{index}")
}

fn navigation(out: &mut String, selected: Disease) {
    out.push_str("<nav><ul>");
    for disease in Disease::ALL {
        let class = if disease == selected { " class=\"active\"" } else { "" };
        out.push_str(&format!(
            "<li><a href=\"/{}\"{}>{} {}</a></li>",
            disease.slug(),
            class,
            disease.menu_icon(),
            escape_html(disease.menu_label())
        ));
    }
    out.push_str("</ul></nav>");
}

fn field(out: &mut String, index: usize, spec: &FieldSpec, value: &str) {
    let name = field_name(index);
    let label = format!("{} {}", spec.icon, spec.label);
    match spec.kind {
        FieldKind::Numeric => {
            out.push_str(&format!(
                "<div class=\"field\"><label for=\"{name}\">{}</label>\
                 <input type=\"text\" id=\"{name}\" name=\"{name}\" value=\"{}\"></div>",
                escape_html(&label),
                escape_html(value)
            ));
        }
        FieldKind::Choice(options) => {
            out.push_str(&format!(
                "<div class=\"field wide\"><label for=\"{name}\">{}</label>\
                 <select id=\"{name}\" name=\"{name}\">",
                escape_html(&label)
            ));
            for option in options {
                let selected = if *option == value { " selected" } else { "" };
                out.push_str(&format!(
                    "<option value=\"{0}\"{selected}>{0}</option>",
                    escape_html(option)
                ));
            }
            out.push_str("</select></div>");
        }
    }
}

fn outcome_line(out: &mut String, outcome: &Outcome) {
    let tag = if outcome.verdict().is_some() { "h3" } else { "div" };
    out.push_str(&format!(
        "<{tag} class=\"outcome {}\">{}</{tag}>",
        outcome.tone().css_class(),
        escape_html(outcome.message())
    ));
}

/// Renders one disease page. `values` holds one entry per form field.
pub fn page(disease: Disease, values: &[String], outcome: Option<&Outcome>) -> String {
    let mut out = String::with_capacity(8 * 1024);
    out.push_str(&format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{} | {}</title><style>{}</style></head><body><div class=\"app\">\
         <aside class=\"sidebar\"><h2>🏥 {}</h2>",
        escape_html(disease.title()),
        APP_TITLE,
        STYLE,
        APP_TITLE
    ));
    navigation(&mut out, disease);
    out.push_str(&format!(
        "</aside><main><h1 style=\"color:{};\">{}</h1>\
         <form method=\"post\" action=\"/{}\"><div class=\"grid\">",
        disease.accent(),
        escape_html(disease.title()),
        disease.slug()
    ));

    for (index, spec) in disease.fields().iter().enumerate() {
        let value = values.get(index).map(String::as_str).unwrap_or("");
        field(&mut out, index, spec, value);
    }

    out.push_str(&format!(
        "</div><button type=\"submit\">{}</button></form>",
        escape_html(disease.submit_label())
    ));
    if let Some(outcome) = outcome {
        outcome_line(&mut out, outcome);
    }
    out.push_str("</main></div></body></html>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_and_quotes() {
        assert_eq!(
            escape_html(r#"<b>"x" & 'y'</b>"#),
            "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;"
        );
        assert!(matches!(escape_html("plain 1.5"), Cow::Borrowed(_)));
    }

    #[test]
    fn page_lists_every_field_and_navigation_choice() {
        for disease in Disease::ALL {
            let html = page(disease, &default_values(disease), None);
            for index in 0..disease.fields().len() {
                assert!(html.contains(&format!("name=\"{}\"", field_name(index))));
            }
            for other in Disease::ALL {
                assert!(html.contains(&format!("href=\"/{}\"", other.slug())));
            }
            assert!(!html.contains("class=\"outcome"));
        }
    }

    #[test]
    fn kidney_gender_is_a_selection_defaulting_to_the_first_option() {
        let values = default_values(Disease::Kidney);
        assert_eq!(values[0], "Male");
        let html = page(Disease::Kidney, &values, None);
        assert!(html.contains("<option value=\"Male\" selected>Male</option>"));
        assert!(html.contains("<option value=\"Female\">Female</option>"));
    }
}
