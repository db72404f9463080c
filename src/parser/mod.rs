pub mod fields;
pub mod node;
pub mod products;

use scraper::Html;

use node::DocumentNode;

const ORDER_WRAPPER_CLASS: &str = "wrapper";

/// One customer order pulled out of the export document. Scalar fields are
/// empty strings when the source block does not carry them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderRecord {
    pub order_number: String,
    pub order_date: String,
    pub full_name: String,
    pub phone: String,
    pub zipcode: String,
    pub address: String,
    pub products: Vec<ProductLine>,
}

/// One line item of an order, in document row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductLine {
    pub name: String,
    pub attrs: String,
    pub code: String,
    pub quantity: String,
}

impl OrderRecord {
    /// Scalar fields paired with their display labels, in report order.
    /// Kept in one table so the label strings live in a single place.
    pub fn labeled_fields(&self) -> [(&'static str, &str); 6] {
        [
            ("شماره سفارش:", &self.order_number),
            ("تاریخ ثبت سفارش:", &self.order_date),
            ("نام و نام‌خانوادگی:", &self.full_name),
            ("شماره تماس:", &self.phone),
            ("کد پستی گیرنده:", &self.zipcode),
            ("آدرس گیرنده:", &self.address),
        ]
    }
}

/// Every order-wrapper block in the document, top to bottom. Empty means the
/// document carries no orders; callers treat that as a failure, not success.
pub fn locate_orders<N: DocumentNode>(root: &N) -> Vec<N> {
    root.find_tag_class("table", ORDER_WRAPPER_CLASS)
}

/// Parse a raw HTML export into order records, one per wrapper block.
pub fn parse_orders(html: &str) -> Vec<OrderRecord> {
    let document = Html::parse_document(html);
    let root = document.root_element();
    locate_orders(&root).iter().map(extract_order).collect()
}

/// Two-pass extraction per block: labeled scalar fields, then line items.
fn extract_order<N: DocumentNode>(block: &N) -> OrderRecord {
    let mut order = OrderRecord::default();
    fields::extract_scalar_fields(block, &mut order);
    order.products = products::extract_products(block);
    order
}

// ── Tests ──
