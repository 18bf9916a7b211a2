//! Helper functions shared by the summarizer, the generator and templates

mod date;
mod html;
mod readtime;
mod url;

pub use date::*;
pub use html::*;
pub use readtime::*;
pub use url::*;
