pub mod cli;
pub mod md2gem;
pub mod reddit_client;
pub mod scgi;

/// Re-export commonly used types from adapters
pub use md2gem::Md2Gemtext;
pub use reddit_client::{Credentials, RedditClientAdapter};
pub use scgi::ScgiServer;

/// Generic message for faults caught at the entry-point boundary. Kept
/// deliberately vague so internal detail never reaches the client.
pub const GENERIC_ERR_MSG: &str = "Got unexpected error. This could include the page not being \
     available, Reddit being down, or some other error. Details of the error have been logged.";
