pub mod claims;
pub mod insights;
mod text;

pub use text::KeywordCategory;
