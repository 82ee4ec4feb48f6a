pub mod business;
pub mod settings;

pub use business::BusinessRepository;
pub use settings::SettingsRepository;
