#[derive(Debug)]
pub enum Error {
    RecordNotFound,
    AlreadyExists,
    DbError(diesel::result::Error),
    DbPoolError(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RecordNotFound => write!(f, "Record not found in database"),
            Self::AlreadyExists => write!(f, "Record already exists in database"),
            Self::DbError(e) => write!(f, "Database error: {}", e),
            Self::DbPoolError(s) => write!(f, "Database pool error: {}", s),
        }
    }
}

impl std::error::Error for Error {}

impl From<diesel::result::Error> for Error {
    fn from(error: diesel::result::Error) -> Self {
        match error {
            diesel::result::Error::NotFound => Self::RecordNotFound,
            _ => Self::DbError(error),
        }
    }
}

impl<E: std::fmt::Debug> From<deadpool::managed::PoolError<E>> for Error {
    fn from(error: deadpool::managed::PoolError<E>) -> Self {
        Self::DbPoolError(format!("{:?}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = Error::RecordNotFound;
        assert_eq!(error.to_string(), "Record not found in database");

        let error = Error::AlreadyExists;
        assert_eq!(error.to_string(), "Record already exists in database");

        let error = Error::DbPoolError("connection failed".to_string());
        assert_eq!(error.to_string(), "Database pool error: connection failed");
    }

    #[test]
    fn test_error_from_diesel_not_found() {
        let diesel_error = diesel::result::Error::NotFound;
        let error: Error = diesel_error.into();
        assert!(matches!(error, Error::RecordNotFound));
    }
}
