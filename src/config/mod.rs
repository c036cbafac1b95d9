mod settings;

pub use settings::{
    DEFAULT_SHEETS_API_BASE, DigestConfig, ServerConfig, Settings, SheetsConfig, SlackConfig,
    load_settings,
};
