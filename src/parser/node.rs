use scraper::{ElementRef, Selector};

/// Minimal tree-of-nodes capability the extractors need: find descendants by
/// tag (optionally narrowed by class), walk up to the enclosing element, and
/// read text content. Keeps the extraction logic decoupled from the concrete
/// parsing library.
pub trait DocumentNode: Copy {
    /// Descendant elements with the given tag name, document order.
    fn find_tag(&self, tag: &str) -> Vec<Self>;
    /// Descendant elements with the given tag name carrying `class`.
    fn find_tag_class(&self, tag: &str, class: &str) -> Vec<Self>;
    /// Enclosing element, if any.
    fn parent_element(&self) -> Option<Self>;
    /// Concatenated text of every text node under this element.
    fn text_content(&self) -> String;
}

impl<'a> DocumentNode for ElementRef<'a> {
    fn find_tag(&self, tag: &str) -> Vec<Self> {
        let selector = Selector::parse(tag).expect("tag name must be a valid selector");
        self.select(&selector).collect()
    }

    fn find_tag_class(&self, tag: &str, class: &str) -> Vec<Self> {
        let selector =
            Selector::parse(&format!("{tag}.{class}")).expect("tag.class must be a valid selector");
        self.select(&selector).collect()
    }

    fn parent_element(&self) -> Option<Self> {
        (**self).parent().and_then(ElementRef::wrap)
    }

    fn text_content(&self) -> String {
        self.text().collect()
    }
}

// ── Tests ──
