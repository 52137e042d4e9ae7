pub mod admin_page;
pub mod listings;
pub mod sitemap;
