//! View-models for each screen region. Each owns its own fetched copy of
//! backend state and reconciles only through reloads.
pub mod collaborators;
pub mod document_detail;
pub mod document_list;
pub mod search_bar;
pub mod tag_manager;
pub mod tag_presence;
pub mod upload_form;

pub use collaborators::{Confirm, Navigator, Route};
pub use document_detail::{DeleteOutcome, DetailState, DocumentDetailSession, TagChange};
pub use document_list::DocumentList;
pub use search_bar::SearchBar;
pub use tag_manager::{DeleteTagOutcome, TagManager};
pub use tag_presence::TagPresence;
pub use upload_form::UploadForm;
