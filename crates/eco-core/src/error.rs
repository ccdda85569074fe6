//! Error types for the simulation.

use crate::types::{EntityId, Point};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Point {0} is already occupied")]
    PointOccupied(Point),

    #[error("Point {0} is outside the world")]
    OutOfBounds(Point),

    #[error("Entity {0} not found")]
    EntityNotFound(EntityId),

    #[error("No path from {from} to {to}")]
    PathNotFound { from: Point, to: Point },

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl Error {
    /// Whether the caller is expected to recover by picking another target.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::PointOccupied(_) | Error::PathNotFound { .. })
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_errors() {
        assert!(Error::PointOccupied(Point::new(1, 1)).is_recoverable());
        assert!(Error::PathNotFound {
            from: Point::new(0, 0),
            to: Point::new(3, 0),
        }
        .is_recoverable());
        assert!(!Error::EntityNotFound(EntityId(7)).is_recoverable());
    }

    #[test]
    fn test_error_messages() {
        let err = Error::PointOccupied(Point::new(2, 3));
        assert_eq!(err.to_string(), "Point (2, 3) is already occupied");

        let err = Error::EntityNotFound(EntityId(4));
        assert_eq!(err.to_string(), "Entity #4 not found");
    }
}
