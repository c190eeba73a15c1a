pub mod catalog;
pub mod d410_store_performance;
pub mod d411_sales_overview;
pub mod session;

use axum::http::StatusCode;

use crate::shared::catalog::FilterError;
use crate::shared::record_source::SourceError;
use crate::system::session::SessionError;

/// Maps a service error to the response status.
pub fn status_for(err: &anyhow::Error) -> StatusCode {
    if err.downcast_ref::<FilterError>().is_some() {
        return StatusCode::BAD_REQUEST;
    }
    if err.downcast_ref::<SourceError>().is_some() {
        return StatusCode::BAD_GATEWAY;
    }
    match err.downcast_ref::<SessionError>() {
        Some(SessionError::NotFound(_)) => StatusCode::NOT_FOUND,
        Some(SessionError::Filter(_)) => StatusCode::BAD_REQUEST,
        None => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_status_for() {
        let filter = anyhow::Error::from(FilterError::InvalidWeek("Week 0".into()));
        assert_eq!(status_for(&filter), StatusCode::BAD_REQUEST);

        let source = anyhow::Error::from(SourceError::Unavailable("down".into()));
        assert_eq!(status_for(&source), StatusCode::BAD_GATEWAY);

        let session = anyhow::Error::from(SessionError::NotFound(Uuid::nil()));
        assert_eq!(status_for(&session), StatusCode::NOT_FOUND);

        assert_eq!(
            status_for(&anyhow::anyhow!("boom")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
