#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validate(String),

    #[error("calorie prediction failed: {0}")]
    Prediction(String),

    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Unknown(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::Unknown(value.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Unknown(value.into())
    }
}

#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::Error::Validate(format!($msg)))
    };
    ($err:expr $(,)?) => {
        return Err($crate::Error::Validate(format!($err)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::Error::Validate(format!($fmt, $($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reject(value: f64) -> Result<f64> {
        if value <= 0.0 {
            crate::bail!("value must be positive, got {value}");
        }

        Ok(value)
    }

    #[test]
    fn test_bail_returns_validate_error() {
        let err = reject(-1.0).unwrap_err();
        assert!(matches!(err, Error::Validate(_)));
        assert_eq!(err.to_string(), "value must be positive, got -1");
        assert_eq!(reject(2.0).unwrap(), 2.0);
    }
}
