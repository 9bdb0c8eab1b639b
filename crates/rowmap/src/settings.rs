use serde::Deserialize;

/// Process-wide mapping settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// When set, a null column leaves its field as constructed instead of
    /// writing the coerced null into it.
    pub ignore_db_null: bool,
}

impl Settings {
    pub fn ignore_db_null(mut self, ignore: bool) -> Self {
        self.ignore_db_null = ignore;
        self
    }
}
