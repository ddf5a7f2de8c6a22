//! HTTP server.

use std::{future::Future, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::usecase::{
    CreateRoomUseCase, GetMessageHistoryUseCase, GetRoomDetailUseCase, GetRoomsUseCase,
    LoginUseCase, RegisterUserUseCase, SearchUsersUseCase,
};

use super::{
    handler::{
        create_room, get_message_history, get_room_detail, get_room_participants, get_rooms,
        health_check, login, register, search_users,
    },
    state::AppState,
};

/// Chat API server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     register_user_usecase,
///     login_usecase,
///     search_users_usecase,
///     create_room_usecase,
///     get_rooms_usecase,
///     get_room_detail_usecase,
///     get_message_history_usecase,
/// );
/// server.run("127.0.0.1".to_string(), 8080, shutdown_signal()).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(
        register_user_usecase: Arc<RegisterUserUseCase>,
        login_usecase: Arc<LoginUseCase>,
        search_users_usecase: Arc<SearchUsersUseCase>,
        create_room_usecase: Arc<CreateRoomUseCase>,
        get_rooms_usecase: Arc<GetRoomsUseCase>,
        get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
        get_message_history_usecase: Arc<GetMessageHistoryUseCase>,
    ) -> Self {
        Self {
            state: Arc::new(AppState {
                register_user_usecase,
                login_usecase,
                search_users_usecase,
                create_room_usecase,
                get_rooms_usecase,
                get_room_detail_usecase,
                get_message_history_usecase,
            }),
        }
    }

    /// Routes with request tracing.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/health", get(health_check))
            .route("/api/users/register", post(register))
            .route("/api/users/login", post(login))
            .route("/api/users/search", get(search_users))
            .route("/api/rooms", get(get_rooms).post(create_room))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .route("/api/rooms/{room_id}/participants", get(get_room_participants))
            .route("/api/messages/history", get(get_message_history))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Serve until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run<F>(
        self,
        host: String,
        port: u16,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("Chat API listening on {}", listener.local_addr()?);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}
