//! Shared handler state.

use std::sync::Arc;

use crate::usecase::{
    CreateRoomUseCase, GetMessageHistoryUseCase, GetRoomDetailUseCase, GetRoomsUseCase,
    LoginUseCase, RegisterUserUseCase, SearchUsersUseCase,
};

/// Shared application state
pub struct AppState {
    /// RegisterUserUseCase（ユーザー登録のユースケース）
    pub register_user_usecase: Arc<RegisterUserUseCase>,
    /// LoginUseCase（ログインのユースケース）
    pub login_usecase: Arc<LoginUseCase>,
    /// SearchUsersUseCase（ユーザー検索のユースケース）
    pub search_users_usecase: Arc<SearchUsersUseCase>,
    /// CreateRoomUseCase（ルーム作成のユースケース）
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// GetMessageHistoryUseCase（メッセージ履歴取得のユースケース）
    pub get_message_history_usecase: Arc<GetMessageHistoryUseCase>,
}
