//! Visible text of an HTML rendering.

use scraper::Html;

/// Concatenate every text node of `html` in document order.
///
/// No separators are inserted between nodes, so block boundaries only show up
/// where the markup itself carries whitespace.
pub fn html_text_content(html: &str) -> String {
    let document = Html::parse_document(html);
    document.root_element().text().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_content_concatenates_nodes() {
        let html = "<html><body><p>안녕<b>하세요</b></p>\n<p>둘째</p></body></html>";
        assert_eq!(html_text_content(html), "안녕하세요\n둘째");
    }

    #[test]
    fn test_text_content_fragment() {
        assert_eq!(html_text_content("<div>본문</div>"), "본문");
    }

    #[test]
    fn test_text_content_empty() {
        assert_eq!(html_text_content(""), "");
    }
}
