use scraper::{Html, Selector};

/// Read-only accessor over a rendered page. Lookups that fail — bad
/// selector, missing element, missing attribute — degrade to None rather
/// than erroring, so extraction never has a failure path.
pub trait PageAccessor {
    /// Text content of the first element matching `selector`.
    fn text(&self, selector: &str) -> Option<String>;

    /// Attribute `name` of the first element matching `selector`.
    fn attr(&self, selector: &str, name: &str) -> Option<String>;

    /// Text content of every element matching `selector`.
    fn texts(&self, selector: &str) -> Option<Vec<String>>;

    /// Attribute `name` of every element matching `selector`, skipping
    /// elements without it.
    fn attrs(&self, selector: &str, name: &str) -> Option<Vec<String>>;
}

/// PageAccessor over a parsed HTML document.
pub struct HtmlPage {
    doc: Html,
}

impl HtmlPage {
    pub fn parse(html: &str) -> Self {
        Self {
            doc: Html::parse_document(html),
        }
    }
}

impl PageAccessor for HtmlPage {
    fn text(&self, selector: &str) -> Option<String> {
        let sel = Selector::parse(selector).ok()?;
        let element = self.doc.select(&sel).next()?;
        Some(element.text().collect::<String>().trim().to_string())
    }

    fn attr(&self, selector: &str, name: &str) -> Option<String> {
        let sel = Selector::parse(selector).ok()?;
        self.doc
            .select(&sel)
            .next()?
            .value()
            .attr(name)
            .map(|v| v.to_string())
    }

    fn texts(&self, selector: &str) -> Option<Vec<String>> {
        let sel = Selector::parse(selector).ok()?;
        Some(
            self.doc
                .select(&sel)
                .map(|el| el.text().collect::<String>().trim().to_string())
                .collect(),
        )
    }

    fn attrs(&self, selector: &str, name: &str) -> Option<Vec<String>> {
        let sel = Selector::parse(selector).ok()?;
        Some(
            self.doc
                .select(&sel)
                .filter_map(|el| el.value().attr(name).map(|v| v.to_string()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: &str = r#"
        <div class="post">
            <h2 id="title">Hello <b>world</b></h2>
            <a class="link" href="https://example.com/a">a</a>
            <a class="link" href="https://example.com/b">b</a>
            <span class="tag">one</span>
            <span class="tag">two</span>
        </div>
    "#;

    #[test]
    fn text_collects_nested_content() {
        let page = HtmlPage::parse(HTML);
        assert_eq!(page.text("#title").as_deref(), Some("Hello world"));
    }

    #[test]
    fn missing_element_is_none() {
        let page = HtmlPage::parse(HTML);
        assert_eq!(page.text(".nope"), None);
        assert_eq!(page.attr(".nope", "href"), None);
    }

    #[test]
    fn bad_selector_is_none_not_panic() {
        let page = HtmlPage::parse(HTML);
        assert_eq!(page.text("p..["), None);
        assert_eq!(page.attrs("p..[", "href"), None);
    }

    #[test]
    fn attrs_collects_every_match() {
        let page = HtmlPage::parse(HTML);
        let hrefs = page.attrs(".link", "href").unwrap();
        assert_eq!(hrefs, vec!["https://example.com/a", "https://example.com/b"]);
    }

    #[test]
    fn texts_collects_every_match() {
        let page = HtmlPage::parse(HTML);
        assert_eq!(page.texts(".tag").unwrap(), vec!["one", "two"]);
    }

    #[test]
    fn missing_attribute_is_skipped() {
        let page = HtmlPage::parse(HTML);
        assert_eq!(page.attrs(".tag", "href").unwrap().len(), 0);
    }
}
