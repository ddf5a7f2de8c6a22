//! Command line and environment configuration.

use clap::{Parser, ValueEnum};

use crate::domain::SOCKET_PATH_CAPACITY;

/// Where ingested records come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QueueBackend {
    /// In-process channel with no external producers; nothing is ingested.
    /// Meant for running the HTTP API alone and for tests.
    Memory,
    /// Kafka consumer group (requires the `kafka` feature)
    Kafka,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "obrolan-server")]
#[command(about = "Chat backend with queue-driven message ingestion", long_about = None)]
pub struct ServerConfig {
    /// Host address to bind the HTTP API to
    #[arg(short = 'H', long, env = "APP_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the HTTP API to
    #[arg(short = 'p', long, env = "APP_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Source of ingested records
    #[arg(long = "queue", env = "QUEUE_BACKEND", value_enum, default_value_t = QueueBackend::Memory)]
    pub queue_backend: QueueBackend,

    /// Kafka bootstrap servers
    #[arg(long, env = "KAFKA_HOST", default_value = "localhost:9092")]
    pub kafka_brokers: String,

    /// Topic carrying message and status records
    #[arg(long, env = "KAFKA_TOPIC", default_value = "chat")]
    pub kafka_topic: String,

    /// Consumer group ID
    #[arg(long = "kafka-group", env = "KAFKA_GROUP_ID", default_value = "chat-be-group")]
    pub kafka_group_id: String,

    /// Users served by one socket path
    #[arg(long, env = "SOCKET_PATH_CAPACITY", default_value_t = SOCKET_PATH_CAPACITY)]
    pub socket_path_capacity: usize,

    /// bcrypt work factor for password hashes
    #[arg(long, env = "BCRYPT_COST", default_value_t = bcrypt::DEFAULT_COST)]
    pub bcrypt_cost: u32,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}
