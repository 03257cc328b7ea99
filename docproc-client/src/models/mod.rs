pub mod document;
pub mod page;
pub mod tag;
pub mod upload;

pub use document::{CreatedDocument, Document, DocumentId, SearchHit};
pub use page::{ListBody, Page, PageRequest, PageWindow};
pub use tag::{names_match, AddTagRequest, Tag, TagDeleted, TagId};
pub use upload::UploadFile;
