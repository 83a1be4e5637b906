pub mod attendee;
pub mod base;
pub mod lead;
pub mod sale;
pub mod user;
pub mod webinar;

pub use attendee::AttendeeDao;
pub use lead::LeadDao;
pub use sale::SaleDao;
pub use user::UserDao;
pub use webinar::WebinarDao;
