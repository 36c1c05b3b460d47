use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameError {
    /// A frame or fire input arrived before `World::set_player`.
    NoPlayer,
    InvalidConfig {
        field: &'static str,
        reason: String,
    },
}

impl GameError {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPlayer => write!(f, "invalid state: no player craft has been bound"),
            Self::InvalidConfig { field, reason } => {
                write!(f, "invalid config `{field}`: {reason}")
            }
        }
    }
}

impl std::error::Error for GameError {}
