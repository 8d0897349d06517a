//! Terminal client for a past exam paper repository.
//!
//! Search papers by branch, subject, year, semester and exam type, and
//! contribute new PDFs, against a remote repository over HTTP.

pub mod browse;
pub mod config;
pub mod papers;
pub mod view;

pub use config::Config;
pub use papers::{HttpPaperClient, PaperRepository};
pub use view::{Session, ViewState};
