pub mod classify;
pub mod format;
pub mod markdown;
pub mod model;
pub mod response;
pub mod router;

pub use classify::UrlClassifier;
pub use format::PageFormatter;
pub use markdown::GemtextRenderer;
pub use response::Response;
pub use router::Router;
