use chrono::Local;

use crate::parser::{OrderRecord, ProductLine};

pub const REPORT_TITLE: &str = "فاکتورهای استخراج شده";

const PRODUCT_HEADERS: [&str; 4] = ["نام محصول", "ویژگی‌ها", "کد", "تعداد"];

/// Render the consolidated invoice report: one section per order, numbered
/// by position in `orders` regardless of the order_number field. Every
/// interpolated value is escaped; the export markup is third-party content.
pub fn render(orders: &[OrderRecord]) -> String {
    let mut sections = String::new();
    for (i, order) in orders.iter().enumerate() {
        render_order(&mut sections, i + 1, order);
    }

    let generated_at = Local::now().format("%Y-%m-%d %H:%M");
    format!(
        r#"<!DOCTYPE html>
<html lang="fa">
<head>
<meta charset="UTF-8" />
<title>{REPORT_TITLE}</title>
<style>
body {{
    direction: rtl;
    font-family: Tahoma, Arial, sans-serif;
    margin: 20px;
    font-size: 14px;
}}
table.products {{
    border-collapse: collapse;
    width: 100%;
    margin-top: 10px;
}}
table.products th, table.products td {{
    border: 1px solid #ccc;
    padding: 8px;
    text-align: right;
}}
table.products th {{
    background-color: #eee;
}}
</style>
</head>
<body>
<p>تاریخ تهیه گزارش: {generated_at}</p>
{sections}</body>
</html>
"#
    )
}

fn render_order(out: &mut String, number: usize, order: &OrderRecord) {
    out.push_str(
        "<section style=\"border:1px solid #ccc; margin-bottom:30px; padding:10px;\">\n",
    );
    out.push_str(&format!("<h2>سفارش شماره {number}</h2>\n"));
    render_products(out, &order.products);
    for (label, value) in order.labeled_fields() {
        out.push_str(&format!(
            "<div><strong>{label}</strong> {}</div>\n",
            escape_html(value)
        ));
    }
    out.push_str("</section>\n");
}

fn render_products(out: &mut String, products: &[ProductLine]) {
    out.push_str("<table class=\"products\">\n<thead>\n<tr>");
    for header in PRODUCT_HEADERS {
        out.push_str(&format!("<th>{header}</th>"));
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");
    // Missing fields become empty cells; a row is never dropped here.
    for product in products {
        out.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&product.name),
            escape_html(&product.attrs),
            escape_html(&product.code),
            escape_html(&product.quantity),
        ));
    }
    out.push_str("</tbody>\n</table>\n");
}

/// Escape text for interpolation into HTML content.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ── Tests ──
