pub mod list;
pub mod manage;
pub mod result;
pub mod types;
pub mod upload;

pub use list::{get_document, list_documents};
pub use manage::{delete_document, download_document, get_selected, select_document};
pub use result::get_result;
pub use types::{DocumentMetadata, DocumentResponse, ListDocumentsQuery};
pub use upload::upload_document;
