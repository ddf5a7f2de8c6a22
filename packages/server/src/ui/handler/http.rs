//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    domain::{RoomId, UserId},
    infrastructure::dto::http::{
        CreateRoomRequest, LoginRequest, LoginResponse, MessageDto, MessageHistoryQuery, PageDto,
        PageQuery, ParticipantDto, RegisterRequest, RoomDto, SearchQuery, UserDto,
    },
    ui::{error::ApiError, extractor::Caller, state::AppState},
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Register a new user
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    let user = state
        .register_user_usecase
        .execute(request.username, request.email, request.password)
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Exchange credentials for a token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let token = state
        .login_usecase
        .execute(&request.email, &request.password)
        .await?;
    Ok(Json(LoginResponse { token }))
}

/// Search other users by username or email
pub async fn search_users(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    let users = state
        .search_users_usecase
        .execute(&query.query, &caller)
        .await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// Get the caller's rooms
pub async fn get_rooms(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageDto<RoomDto>>, ApiError> {
    let (rooms, total) = state
        .get_rooms_usecase
        .execute(caller, query.page, query.limit)
        .await?;

    // View から DTO への変換
    Ok(Json(PageDto {
        data: rooms.into_iter().map(Into::into).collect(),
        total,
        page: query.page,
        limit: query.limit,
    }))
}

/// Create a room, or return the existing direct room for the same pair
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Json(request): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<RoomDto>), ApiError> {
    let user_ids = request
        .user_ids
        .into_iter()
        .map(UserId::new)
        .collect::<Result<Vec<_>, _>>()?;

    let room = state
        .create_room_usecase
        .execute(caller, user_ids, request.is_group, request.room_name)
        .await?;
    Ok((StatusCode::CREATED, Json(room.into())))
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDto>, ApiError> {
    let room = state
        .get_room_detail_usecase
        .execute(RoomId::new(room_id)?, caller)
        .await?;
    Ok(Json(room.into()))
}

/// Get room members with their socket paths
pub async fn get_room_participants(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Path(room_id): Path<String>,
) -> Result<Json<Vec<ParticipantDto>>, ApiError> {
    let room_id = RoomId::new(room_id)?;
    // 参加者でなければ詳細取得と同じエラーを返す
    state
        .get_room_detail_usecase
        .execute(room_id.clone(), caller)
        .await?;

    let participants = state
        .get_room_detail_usecase
        .participants(room_id)
        .await?;
    Ok(Json(participants.into_iter().map(Into::into).collect()))
}

/// Get one page of a room's messages as seen by the caller
pub async fn get_message_history(
    State(state): State<Arc<AppState>>,
    Caller(caller): Caller,
    Query(query): Query<MessageHistoryQuery>,
) -> Result<Json<PageDto<MessageDto>>, ApiError> {
    let (messages, total) = state
        .get_message_history_usecase
        .execute(caller, RoomId::new(query.room_id)?, query.page, query.limit)
        .await?;

    Ok(Json(PageDto {
        data: messages.into_iter().map(Into::into).collect(),
        total,
        page: query.page,
        limit: query.limit,
    }))
}
