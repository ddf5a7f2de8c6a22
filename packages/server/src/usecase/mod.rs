//! UseCase 層
//!
//! One struct per operation. Each use case receives its dependencies as
//! `Arc<dyn Trait>` through its constructor and returns its own error type.

mod create_room;
mod error;
mod get_message_history;
mod get_room_detail;
mod get_rooms;
mod login;
mod pagination;
mod register_user;
mod save_message;
mod search_users;
mod update_message_status;
pub mod view;

pub use create_room::CreateRoomUseCase;
pub use error::{
    CreateRoomError, GetMessageHistoryError, GetRoomDetailError, GetRoomsError, LoginError,
    RegisterError, SaveMessageError, SearchUsersError, UpdateMessageStatusError,
};
pub use get_message_history::GetMessageHistoryUseCase;
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use login::LoginUseCase;
pub use pagination::{MAX_PAGE_LIMIT, PageRequest};
pub use register_user::RegisterUserUseCase;
pub use save_message::SaveMessageUseCase;
pub use search_users::SearchUsersUseCase;
pub use update_message_status::UpdateMessageStatusUseCase;
pub use view::{Direction, MessageView, ParticipantSummary, RoomSummary, UserSummary};
