//! Request handlers.

mod http;

pub use http::{
    create_room, get_message_history, get_room_detail, get_room_participants, get_rooms,
    health_check, login, register, search_users,
};
