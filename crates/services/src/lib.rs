pub mod attendance;
pub mod auth;
pub mod dao;
pub mod lifecycle;
pub mod notification;
pub mod payments;

pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use notification::Notifier;
pub use payments::PaymentService;
