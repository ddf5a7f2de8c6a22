//! Mapping of use case errors to HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    domain::{RepositoryError, ValueObjectError},
    infrastructure::dto::http::ErrorDto,
    usecase::{
        CreateRoomError, GetMessageHistoryError, GetRoomDetailError, GetRoomsError, LoginError,
        RegisterError, SearchUsersError,
    },
};

/// Error response with a JSON `{"error": ...}` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Store failures are logged here and hidden from the client.
    fn internal(error: impl std::fmt::Display) -> Self {
        tracing::error!("Request failed: {}", error);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorDto {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<ValueObjectError> for ApiError {
    fn from(error: ValueObjectError) -> Self {
        Self::bad_request(error.to_string())
    }
}

impl From<RepositoryError> for ApiError {
    fn from(error: RepositoryError) -> Self {
        Self::internal(error)
    }
}

impl From<RegisterError> for ApiError {
    fn from(error: RegisterError) -> Self {
        match error {
            RegisterError::InvalidInput(_) => Self::bad_request(error.to_string()),
            RegisterError::EmailTaken | RegisterError::UsernameTaken => {
                Self::new(StatusCode::CONFLICT, error.to_string())
            }
            RegisterError::Credential(_) | RegisterError::Repository(_) => Self::internal(error),
        }
    }
}

impl From<LoginError> for ApiError {
    fn from(error: LoginError) -> Self {
        match error {
            LoginError::InvalidCredentials => Self::unauthorized(error.to_string()),
            LoginError::Credential(_) | LoginError::Repository(_) => Self::internal(error),
        }
    }
}

impl From<SearchUsersError> for ApiError {
    fn from(error: SearchUsersError) -> Self {
        Self::internal(error)
    }
}

impl From<CreateRoomError> for ApiError {
    fn from(error: CreateRoomError) -> Self {
        match error {
            CreateRoomError::InvalidInput(_) | CreateRoomError::InvalidSender(_) => {
                Self::bad_request(error.to_string())
            }
            CreateRoomError::Repository(_) => Self::internal(error),
        }
    }
}

impl From<GetRoomsError> for ApiError {
    fn from(error: GetRoomsError) -> Self {
        match error {
            GetRoomsError::InvalidInput(_) => Self::bad_request(error.to_string()),
            GetRoomsError::Repository(_) => Self::internal(error),
        }
    }
}

impl From<GetRoomDetailError> for ApiError {
    fn from(error: GetRoomDetailError) -> Self {
        match error {
            GetRoomDetailError::RoomNotFound => Self::new(StatusCode::NOT_FOUND, error.to_string()),
            GetRoomDetailError::Unauthorized => Self::new(StatusCode::FORBIDDEN, error.to_string()),
            GetRoomDetailError::Repository(_) => Self::internal(error),
        }
    }
}

impl From<GetMessageHistoryError> for ApiError {
    fn from(error: GetMessageHistoryError) -> Self {
        match error {
            GetMessageHistoryError::InvalidInput(_) => Self::bad_request(error.to_string()),
            GetMessageHistoryError::Unauthorized => {
                Self::new(StatusCode::FORBIDDEN, error.to_string())
            }
            GetMessageHistoryError::Repository(_) => Self::internal(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usecase_errors_map_to_status_codes() {
        // テスト項目: ユースケースのエラーが対応する HTTP ステータスに変換される
        // given (前提条件) / when (操作) / then (期待する結果):
        assert_eq!(
            ApiError::from(RegisterError::EmailTaken).status,
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(LoginError::InvalidCredentials).status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(CreateRoomError::InvalidSender("u9".to_string())).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(GetRoomDetailError::RoomNotFound).status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(GetMessageHistoryError::Unauthorized).status,
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_store_failure_details_are_hidden() {
        // テスト項目: ストア障害の詳細はレスポンスに含まれない
        // given (前提条件):
        let error = GetRoomsError::Repository(RepositoryError::Unavailable(
            "db-host-17 refused connection".to_string(),
        ));

        // when (操作):
        let api_error = ApiError::from(error);

        // then (期待する結果):
        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.message, "internal server error");
    }
}
