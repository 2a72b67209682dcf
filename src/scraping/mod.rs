pub mod card;
pub mod fetch_html_content;
pub mod get_fashion_data;
pub mod parse_product_details;
pub mod product_record;
