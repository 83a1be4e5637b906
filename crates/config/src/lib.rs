mod settings;

pub use settings::{
    AppSettings, DatabaseSettings, EmailSettings, JwtSettings, Settings, StripeSettings,
};
