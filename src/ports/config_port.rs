//! Configuration access port trait.
//!
//! Values are looked up by INI-style `[section] key`. Absent keys are not
//! errors; callers decide the default.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// Default implementation: `get_string` with a fallback.
    fn get_string_or(&self, section: &str, key: &str, default: &str) -> String {
        self.get_string(section, key)
            .unwrap_or_else(|| default.to_string())
    }
}
