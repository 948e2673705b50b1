mod admin;
mod health_check;
mod pages;
mod submit;

pub use admin::{download_resume, list_applications, AdminError, ApplicationList};
pub use health_check::health_check;
pub use pages::{admin_page, index_page, StaticDirectory};
pub use submit::{submit, SubmitError, SubmitResponse};
