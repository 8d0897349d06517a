//! The papers view: search filters, upload form, results and status line.

pub mod render;
pub mod session;
pub mod state;

pub use render::render_results;
pub use session::{Session, UploadOutcome};
pub use state::{SearchTicket, UploadRequest, ViewState};
