pub mod attendee;
pub mod lead;
pub mod sale;
pub mod user;
pub mod webinar;

pub use attendee::{Attendee, AttendeeStatus};
pub use lead::Lead;
pub use sale::{Sale, SaleStatus};
pub use user::User;
pub use webinar::{Webinar, WebinarStatus};
