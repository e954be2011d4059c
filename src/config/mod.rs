pub mod settings;

pub use settings::{AppSettings, Environment, ScoringSettings, SessionSettings, Settings};
