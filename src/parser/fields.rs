use std::sync::LazyLock;

use regex::Regex;

use super::node::DocumentNode;
use super::OrderRecord;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

// Label captions exactly as they appear in the export markup, trailing
// spaces included. Matching is deliberately exact: a looser match could
// attribute a value to the wrong field.
pub const ORDER_NUMBER_CAPTION: &str = "شماره سفارش: ";
pub const ORDER_DATE_CAPTION: &str = "تاریخ ثبت سفارش: ";
pub const FULL_NAME_CAPTION: &str = "نام و نام‌خانوادگی: ";
pub const PHONE_CAPTION: &str = "شماره تماس:";
pub const ZIPCODE_CAPTION: &str = "کد پستی گیرنده:";
pub const ADDRESS_CAPTION: &str = "آدرس گیرنده:";

/// Fill the six scalar fields of `order` from caption-labeled spans in the
/// block. A missing caption leaves its field empty.
pub fn extract_scalar_fields<N: DocumentNode>(block: &N, order: &mut OrderRecord) {
    let slots: [(&str, &mut String); 6] = [
        (ORDER_NUMBER_CAPTION, &mut order.order_number),
        (ORDER_DATE_CAPTION, &mut order.order_date),
        (FULL_NAME_CAPTION, &mut order.full_name),
        (PHONE_CAPTION, &mut order.phone),
        (ZIPCODE_CAPTION, &mut order.zipcode),
        (ADDRESS_CAPTION, &mut order.address),
    ];
    for (caption, slot) in slots {
        *slot = extract_field(block, caption);
    }
}

/// Text of the element enclosing the first span whose text equals `caption`,
/// with the caption itself removed. Empty string when no span matches.
pub fn extract_field<N: DocumentNode>(block: &N, caption: &str) -> String {
    let label = block
        .find_tag("span")
        .into_iter()
        .find(|span| span.text_content() == caption);
    let Some(parent) = label.and_then(|span| span.parent_element()) else {
        return String::new();
    };
    normalize_text(&parent.text_content().replace(caption, ""))
}

/// Collapse whitespace runs to single spaces and trim the ends.
pub fn normalize_text(raw: &str) -> String {
    WHITESPACE_RE.replace_all(raw, " ").trim().to_string()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn extract_from(html: &str, caption: &str) -> String {
        let doc = Html::parse_document(html);
        let root = doc.root_element();
        extract_field(&root, caption)
    }

    #[test]
    fn exact_caption_yields_sibling_text() {
        let html = "<div><span>شماره تماس:</span> 09121234567</div>";
        assert_eq!(extract_from(html, PHONE_CAPTION), "09121234567");
    }

    #[test]
    fn caption_with_trailing_space_matches_verbatim() {
        let html = "<div><span>شماره سفارش: </span>140212345</div>";
        assert_eq!(extract_from(html, ORDER_NUMBER_CAPTION), "140212345");
    }

    #[test]
    fn whitespace_variant_caption_does_not_match() {
        // Same label without the trailing space the caption carries.
        let html = "<div><span>شماره سفارش:</span>140212345</div>";
        assert_eq!(extract_from(html, ORDER_NUMBER_CAPTION), "");
    }

    #[test]
    fn missing_caption_returns_empty() {
        let html = "<div><span>چیز دیگری</span>مقدار</div>";
        assert_eq!(extract_from(html, ADDRESS_CAPTION), "");
    }

    #[test]
    fn multiline_value_is_collapsed() {
        let html = "<div><span>آدرس گیرنده:</span>\n تهران،\n خیابان ولیعصر </div>";
        assert_eq!(extract_from(html, ADDRESS_CAPTION), "تهران، خیابان ولیعصر");
    }

    #[test]
    fn every_scalar_field_is_present() {
        let html = "<div>\
            <div><span>شماره سفارش: </span>1</div>\
            <div><span>نام و نام‌خانوادگی: </span>سارا محمدی</div>\
            </div>";
        let doc = Html::parse_document(html);
        let root = doc.root_element();
        let mut order = OrderRecord::default();
        extract_scalar_fields(&root, &mut order);
        assert_eq!(order.order_number, "1");
        assert_eq!(order.full_name, "سارا محمدی");
        // Unlabeled fields degrade to empty strings, never to an error.
        assert_eq!(order.order_date, "");
        assert_eq!(order.phone, "");
        assert_eq!(order.zipcode, "");
        assert_eq!(order.address, "");
    }

    #[test]
    fn normalize_collapses_runs() {
        assert_eq!(normalize_text("  a \n\t b  "), "a b");
        assert_eq!(normalize_text(""), "");
    }
}
