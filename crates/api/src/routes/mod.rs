pub mod attendee;
pub mod auth;
pub mod customer;
pub mod dashboard;
pub mod lead;
pub mod payment;
pub mod sale;
pub mod webinar;
