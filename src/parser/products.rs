use super::fields::normalize_text;
use super::node::DocumentNode;
use super::ProductLine;

const PRODUCTS_TABLE_CLASS: &str = "products";
const ATTRS_SPAN_CLASS: &str = "product-attrs";

/// Extract the line items of one order block, in row order. Rows with fewer
/// than four cells or without a product-name heading are header/decoration
/// rows or damaged markup; they are skipped and the rest of the table still
/// parses.
pub fn extract_products<N: DocumentNode>(block: &N) -> Vec<ProductLine> {
    let Some(table) = block
        .find_tag_class("table", PRODUCTS_TABLE_CLASS)
        .into_iter()
        .next()
    else {
        return Vec::new();
    };

    let mut lines = Vec::new();
    for row in table.find_tag("tr") {
        let cells = row.find_tag("td");
        if cells.len() < 4 {
            continue;
        }
        let info = cells[1];
        let Some(heading) = info.find_tag("h2").into_iter().next() else {
            continue;
        };

        lines.push(ProductLine {
            name: normalize_text(&heading.text_content()),
            attrs: first_text(&info.find_tag_class("span", ATTRS_SPAN_CLASS)),
            code: first_text(&cells[2].find_tag("span")),
            quantity: first_text(&cells[3].find_tag("span")),
        });
    }
    lines
}

/// Normalized text of the first element, or empty when there is none.
fn first_text<N: DocumentNode>(elements: &[N]) -> String {
    elements
        .first()
        .map(|e| normalize_text(&e.text_content()))
        .unwrap_or_default()
}

// ── Tests ──
