//! Obrolan chat backend.
//!
//! Serves the HTTP API and, alongside it, consumes message and status
//! records from the configured queue.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin obrolan-server
//! cargo run --bin obrolan-server --features kafka -- --queue kafka --kafka-brokers localhost:9092
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use obrolan_server::{
    config::{QueueBackend, ServerConfig},
    domain::{MessageQueue, SocketPathAllocator},
    infrastructure::{
        credential::{BcryptPasswordHasher, OpaqueTokenIssuer},
        queue::InMemoryQueue,
        repository::InMemoryStore,
    },
    ingestion::{IngestionConsumer, RecordDispatcher},
    ui::{Server, shutdown_signal},
    usecase::{
        CreateRoomUseCase, GetMessageHistoryUseCase, GetRoomDetailUseCase, GetRoomsUseCase,
        LoginUseCase, RegisterUserUseCase, SaveMessageUseCase, SearchUsersUseCase,
        UpdateMessageStatusUseCase,
    },
};
use obrolan_shared::{logger::setup_logger, time::SystemClock};
use tokio::sync::watch;

/// How long a record in flight may take to finish after shutdown
const CONSUMER_STOP_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    // Initialize dependencies in order:
    // 1. Store and credentials
    // 2. UseCases
    // 3. Queue consumer
    // 4. Server

    // 1. Create the store (in-memory database) and credential helpers
    let store = InMemoryStore::new();
    let clock = Arc::new(SystemClock);
    let password_hasher = Arc::new(BcryptPasswordHasher::new(config.bcrypt_cost));
    let token_issuer = Arc::new(OpaqueTokenIssuer);

    // 2. Create UseCases
    let register_user_usecase = Arc::new(RegisterUserUseCase::new(
        store.users.clone(),
        password_hasher.clone(),
        SocketPathAllocator::new(config.socket_path_capacity),
        clock.clone(),
    ));
    let login_usecase = Arc::new(LoginUseCase::new(
        store.users.clone(),
        password_hasher,
        token_issuer,
    ));
    let search_users_usecase = Arc::new(SearchUsersUseCase::new(store.users.clone()));
    let create_room_usecase = Arc::new(CreateRoomUseCase::new(
        store.rooms.clone(),
        store.users.clone(),
        clock.clone(),
    ));
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(store.rooms.clone()));
    let get_room_detail_usecase = Arc::new(GetRoomDetailUseCase::new(store.rooms.clone()));
    let get_message_history_usecase = Arc::new(GetMessageHistoryUseCase::new(
        store.rooms.clone(),
        store.messages.clone(),
    ));
    let save_message_usecase = Arc::new(SaveMessageUseCase::new(
        store.rooms.clone(),
        store.messages.clone(),
        store.users.clone(),
        clock.clone(),
    ));
    let update_message_status_usecase = Arc::new(UpdateMessageStatusUseCase::new(
        store.messages.clone(),
        clock.clone(),
    ));

    // One Ctrl+C stops both the consumer and the server
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });
    let stopped = |mut rx: watch::Receiver<bool>| async move {
        let _ = rx.wait_for(|stop| *stop).await;
    };

    // 3. Create the queue and start consuming
    let mut producer = None;
    let queue: Arc<dyn MessageQueue> = match config.queue_backend {
        QueueBackend::Memory => {
            let (memory_producer, memory_queue) = InMemoryQueue::channel();
            tracing::warn!(
                "In-memory queue selected: nothing publishes to it, so no messages will be \
                 ingested. Use --queue kafka to consume from a broker"
            );
            producer = Some(memory_producer);
            Arc::new(memory_queue)
        }
        QueueBackend::Kafka => kafka_queue(&config),
    };
    let consumer = IngestionConsumer::new(
        queue,
        RecordDispatcher::new(save_message_usecase, update_message_status_usecase),
        clock,
    );
    let consumer_handle = tokio::spawn(consumer.run(stopped(shutdown_rx.clone())));

    // 4. Create and run the server
    let server = Server::new(
        register_user_usecase,
        login_usecase,
        search_users_usecase,
        create_room_usecase,
        get_rooms_usecase,
        get_room_detail_usecase,
        get_message_history_usecase,
    );
    if let Err(e) = server
        .run(config.host, config.port, stopped(shutdown_rx))
        .await
    {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    match tokio::time::timeout(CONSUMER_STOP_TIMEOUT, consumer_handle).await {
        Ok(Ok((exit, stats))) => tracing::info!("Consumer finished: {:?} {:?}", exit, stats),
        Ok(Err(e)) => tracing::error!("Consumer task failed: {}", e),
        Err(_) => tracing::warn!("Consumer did not stop within {:?}", CONSUMER_STOP_TIMEOUT),
    }
    drop(producer);
}

#[cfg(feature = "kafka")]
fn kafka_queue(config: &ServerConfig) -> Arc<dyn MessageQueue> {
    use obrolan_server::infrastructure::queue::KafkaQueue;

    match KafkaQueue::new(
        &config.kafka_brokers,
        &config.kafka_topic,
        &config.kafka_group_id,
    ) {
        Ok(queue) => Arc::new(queue),
        Err(e) => {
            tracing::error!("Failed to create Kafka consumer: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(not(feature = "kafka"))]
fn kafka_queue(_config: &ServerConfig) -> Arc<dyn MessageQueue> {
    tracing::error!(
        "Kafka backend requested but obrolan-server was built without the `kafka` feature"
    );
    std::process::exit(1);
}
