//! Page digest extraction for the `read_dom` tool.
//!
//! Parses serialized page content, drops script/style text and collects a
//! fixed, capped set of interactive elements in a stable order: buttons,
//! then links, then input fields.

use scraper::{ElementRef, Html, Node, Selector};

use crate::types::{InteractiveElement, PageDigest};

/// Maximum number of elements kept per category.
pub const PER_CATEGORY_LIMIT: usize = 10;
/// Maximum number of characters in the text preview, before the marker.
pub const PREVIEW_LIMIT: usize = 500;

const TRUNCATION_MARKER: &str = "...";
const BUTTON_SELECTOR: &str = r#"button, input[type="button"], input[type="submit"]"#;
const LINK_SELECTOR: &str = "a[href]";
const INPUT_SELECTOR: &str = "input, textarea";

/// Build a [`PageDigest`] from raw markup.
pub fn extract_page_digest(html: &str, url: &str, title: &str) -> PageDigest {
    let document = Html::parse_document(html);
    let text = visible_text(&document);

    let mut interactive_elements = Vec::with_capacity(PER_CATEGORY_LIMIT * 3);
    interactive_elements.extend(collect_buttons(&document));
    interactive_elements.extend(collect_links(&document));
    interactive_elements.extend(collect_inputs(&document));

    PageDigest {
        url: url.to_string(),
        title: title.to_string(),
        text_preview: preview(&text),
        interactive_elements,
        total_text_length: text.chars().count(),
    }
}

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("built-in selector must parse")
}

fn visible_text(document: &Html) -> String {
    let mut out = String::new();
    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            matches!(
                ancestor.value(),
                Node::Element(element) if matches!(element.name(), "script" | "style")
            )
        });
        if !hidden {
            out.push_str(text);
        }
    }
    out
}

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_LIMIT {
        let mut truncated: String = text.chars().take(PREVIEW_LIMIT).collect();
        truncated.push_str(TRUNCATION_MARKER);
        truncated
    } else {
        text.to_string()
    }
}

fn stripped_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn non_empty_attr(element: &ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn collect_buttons(document: &Html) -> Vec<InteractiveElement> {
    let buttons = selector(BUTTON_SELECTOR);
    document
        .select(&buttons)
        .take(PER_CATEGORY_LIMIT)
        .filter_map(|element| {
            let mut text = stripped_text(&element);
            if text.is_empty() {
                text = non_empty_attr(&element, "value")?;
            }
            Some(InteractiveElement {
                kind: "button".to_string(),
                text: Some(text),
                href: None,
                placeholder: None,
                name: None,
                selector: locator(&element),
            })
        })
        .collect()
}

fn collect_links(document: &Html) -> Vec<InteractiveElement> {
    let links = selector(LINK_SELECTOR);
    document
        .select(&links)
        .take(PER_CATEGORY_LIMIT)
        .filter_map(|element| {
            let text = stripped_text(&element);
            if text.is_empty() {
                return None;
            }
            Some(InteractiveElement {
                kind: "link".to_string(),
                text: Some(text),
                href: element.value().attr("href").map(str::to_string),
                placeholder: None,
                name: None,
                selector: locator(&element),
            })
        })
        .collect()
}

fn collect_inputs(document: &Html) -> Vec<InteractiveElement> {
    let inputs = selector(INPUT_SELECTOR);
    document
        .select(&inputs)
        .take(PER_CATEGORY_LIMIT)
        .map(|element| {
            let input_type = non_empty_attr(&element, "type").unwrap_or_else(|| "text".to_string());
            InteractiveElement {
                kind: format!("input_{input_type}"),
                text: None,
                href: None,
                placeholder: non_empty_attr(&element, "placeholder"),
                name: non_empty_attr(&element, "name"),
                selector: locator(&element),
            }
        })
        .collect()
}

/// Best-effort CSS locator: `#id` > `tag.class` > `tag[name='..']` > `tag`.
fn locator(element: &ElementRef<'_>) -> String {
    let value = element.value();
    let tag = value.name();

    if let Some(id) = value.id().filter(|id| !id.is_empty()) {
        return format!("#{id}");
    }

    let classes: Vec<&str> = value
        .attr("class")
        .map(|class| class.split_whitespace().collect())
        .unwrap_or_default();
    if !classes.is_empty() {
        return format!("{tag}.{}", classes.join("."));
    }

    if let Some(name) = value.attr("name").filter(|name| !name.is_empty()) {
        return format!("{tag}[name='{name}']");
    }

    tag.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest(html: &str) -> PageDigest {
        extract_page_digest(html, "https://example.com/", "Example")
    }

    #[test]
    fn script_and_style_text_is_dropped() {
        let page = digest(
            "<html><head><style>body { color: red }</style></head>\
             <body><p>Hello</p><script>var secret = 1;</script><p>World</p></body></html>",
        );
        assert!(page.text_preview.contains("Hello"));
        assert!(page.text_preview.contains("World"));
        assert!(!page.text_preview.contains("secret"));
        assert!(!page.text_preview.contains("color"));
        assert_eq!(page.total_text_length, "HelloWorld".len());
    }

    #[test]
    fn preview_is_capped_with_marker() {
        let body = "a".repeat(1_200);
        let page = digest(&format!("<html><body><p>{body}</p></body></html>"));
        assert_eq!(page.total_text_length, 1_200);
        assert_eq!(page.text_preview.chars().count(), PREVIEW_LIMIT + 3);
        assert!(page.text_preview.ends_with("..."));
    }

    #[test]
    fn short_text_is_not_marked() {
        let page = digest("<html><body><p>short</p></body></html>");
        assert_eq!(page.text_preview, "short");
    }

    #[test]
    fn categories_are_ordered_and_capped() {
        let mut html = String::from("<html><body>");
        for i in 0..15 {
            html.push_str(&format!("<input name=\"field{i}\">"));
            html.push_str(&format!("<a href=\"/p{i}\">Link {i}</a>"));
            html.push_str(&format!("<button>Button {i}</button>"));
        }
        html.push_str("</body></html>");

        let page = digest(&html);
        assert_eq!(page.interactive_elements.len(), 30);

        let kinds: Vec<&str> = page
            .interactive_elements
            .iter()
            .map(|element| element.kind.as_str())
            .collect();
        assert!(kinds[..10].iter().all(|kind| *kind == "button"));
        assert!(kinds[10..20].iter().all(|kind| *kind == "link"));
        assert!(kinds[20..].iter().all(|kind| *kind == "input_text"));
        assert_eq!(page.interactive_elements[0].text.as_deref(), Some("Button 0"));
        assert_eq!(page.interactive_elements[10].href.as_deref(), Some("/p0"));
    }

    #[test]
    fn locator_priority_is_id_class_name_tag() {
        let page = digest(
            r#"<html><body>
                <button id="go" class="primary">A</button>
                <button class="btn primary">B</button>
                <button name="submit">C</button>
                <button>D</button>
            </body></html>"#,
        );
        let selectors: Vec<&str> = page
            .interactive_elements
            .iter()
            .map(|element| element.selector.as_str())
            .collect();
        assert_eq!(
            selectors,
            vec!["#go", "button.btn.primary", "button[name='submit']", "button"]
        );
    }

    #[test]
    fn buttons_fall_back_to_value_and_skip_empty() {
        let page = digest(
            r#"<html><body>
                <input type="submit" value="Send">
                <button>   </button>
                <a href="/empty"></a>
            </body></html>"#,
        );
        let buttons: Vec<&InteractiveElement> = page
            .interactive_elements
            .iter()
            .filter(|element| element.kind == "button")
            .collect();
        assert_eq!(buttons.len(), 1);
        assert_eq!(buttons[0].text.as_deref(), Some("Send"));
        assert!(page
            .interactive_elements
            .iter()
            .all(|element| element.kind != "link"));
    }

    #[test]
    fn inputs_carry_type_placeholder_and_name() {
        let page = digest(
            r#"<html><body>
                <input type="email" name="mail" placeholder="you@example.com">
                <textarea></textarea>
            </body></html>"#,
        );
        let inputs: Vec<&InteractiveElement> = page
            .interactive_elements
            .iter()
            .filter(|element| element.kind.starts_with("input_"))
            .collect();
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0].kind, "input_email");
        assert_eq!(inputs[0].placeholder.as_deref(), Some("you@example.com"));
        assert_eq!(inputs[0].selector, "input[name='mail']");
        assert_eq!(inputs[1].kind, "input_text");
        assert_eq!(inputs[1].selector, "textarea");
    }
}
