pub mod settings;

pub use settings::{
    ApplicationSettings, DatabaseSettings, EmailSettings, JwtSettings, Settings,
};
