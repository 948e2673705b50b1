mod candidate_email;
mod candidate_name;
mod new_application;
mod resume_file;

pub use candidate_email::CandidateEmail;
pub use candidate_name::CandidateName;
pub use new_application::{ApplicationForm, DomainError, NewApplication, RequiredText};
pub use resume_file::{ResumeExtension, ResumeFile, ResumeFileName, UploadedFile};
