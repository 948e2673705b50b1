mod applications;
mod download;
mod error;

pub use applications::{list_applications, ApplicationList};
pub use download::download_resume;
pub use error::AdminError;
