pub type SwitcherResult<T> = Result<T, SwitcherError>;

#[derive(thiserror::Error, Debug)]
pub enum SwitcherError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("unsupported target: {0}")]
    UnsupportedTarget(String),
}

impl SwitcherError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn unsupported_target(msg: impl Into<String>) -> Self {
        Self::UnsupportedTarget(msg.into())
    }
}
