use strum::{Display, EnumString};

/// Deployment environment, picked with `APP_ENVIRONMENT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    /// Config file for this environment, without the extension.
    pub fn config_path(&self) -> String {
        format!("config/{self}")
    }
}
