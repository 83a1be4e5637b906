use aireach_config::Settings;
use aireach_services::{
    AttendanceService, AuthService, Notifier, PaymentService,
    dao::{AttendeeDao, LeadDao, SaleDao, UserDao, WebinarDao},
};
use mongodb::Database;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: Settings,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserDao>,
    pub webinars: Arc<WebinarDao>,
    pub attendees: Arc<AttendeeDao>,
    pub leads: Arc<LeadDao>,
    pub sales: Arc<SaleDao>,
    pub notifier: Notifier,
    pub attendance: Arc<AttendanceService>,
    pub payments: Arc<PaymentService>,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> Self {
        let auth = Arc::new(AuthService::new(settings.jwt.clone()));
        let users = Arc::new(UserDao::new(&db));
        let webinars = Arc::new(WebinarDao::new(&db));
        let attendees = Arc::new(AttendeeDao::new(&db));
        let leads = Arc::new(LeadDao::new(&db));
        let sales = Arc::new(SaleDao::new(&db));
        let notifier = Notifier::new(&settings.email);
        let attendance = Arc::new(AttendanceService::new(
            webinars.clone(),
            attendees.clone(),
            leads.clone(),
            notifier.clone(),
            &settings.app,
        ));
        let payments = Arc::new(PaymentService::new(&settings.stripe));

        Self {
            db,
            settings,
            auth,
            users,
            webinars,
            attendees,
            leads,
            sales,
            notifier,
            attendance,
            payments,
        }
    }
}
