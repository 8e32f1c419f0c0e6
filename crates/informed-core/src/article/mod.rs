mod category;
mod models;
mod normalizer;

pub use category::{categorize, match_category};
pub use models::{strip_query, to_iso, Article, Category};
pub use normalizer::{clean_text, first_image_src, source_label, ArticleNormalizer, Rejection};
