use crate::app_config::{AppConfig, TestTopicConfig};
use crate::dashboard_api::{router, AppState};
use anyhow::Context;
use kafka_dashboard::admin::AdminWrapper;
use kafka_dashboard::backend::{KafkaBrokerClient, ZookeeperCoordinationClient};
use kafka_dashboard::commands::create_topic::{create_topic, CreateTopicCommandInternal};
use kafka_dashboard::commands::produce_sample_messages::{
    produce_sample_messages, ProduceSampleMessagesCommandInternal,
};
use kafka_dashboard::connection_settings::ConnectionSettings;
use kafka_dashboard::producer::ProducerWrapper;
use kafka_dashboard::relay::LiveRelay;
use kafka_dashboard::snapshot::SnapshotAggregator;
use kafka_dashboard::watcher::{TopicRegistry, TopicWatcher};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, info_span, warn, Instrument};

pub async fn run_until_stopped(config: AppConfig) -> Result<(), anyhow::Error> {
    let connection_settings = config
        .kafka
        .connection_settings()
        .context("While reading kafka settings")?;
    let request_timeout = config.collector.request_timeout();

    let coordination = Arc::new(
        ZookeeperCoordinationClient::connect(&config.zookeeper.nodes)
            .await
            .context("While connecting to ZooKeeper")?,
    );
    let broker = Arc::new(
        KafkaBrokerClient::create(connection_settings.clone(), request_timeout)
            .context("While creating broker client")?,
    );
    let admin = AdminWrapper::create(&connection_settings, request_timeout)
        .context("While creating admin client")?;

    let shutdown = CancellationToken::new();
    let mut seeding = None;
    if let Some(test_topic) = &config.test_topic {
        if create_test_topic(&admin, test_topic).await {
            seeding = seed_test_topic(
                &connection_settings,
                request_timeout,
                test_topic,
                shutdown.clone(),
            );
        }
    }

    let registry = Arc::new(TopicRegistry::new());
    let watcher = TopicWatcher::new(
        coordination.clone(),
        registry.clone(),
        config.watcher.settings(),
    )
    .spawn(shutdown.clone());

    let state = Arc::new(AppState {
        aggregator: SnapshotAggregator::new(
            coordination,
            broker.clone(),
            registry,
            config.collector.settings(),
        ),
        relay: LiveRelay::new(broker.clone()),
        broker,
        admin,
        security_protocol: connection_settings.security_protocol,
        viewer_buffer: config.relay.viewer_buffer,
        metrics_interval: config.relay.metrics_interval(),
    });

    let app = router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let address = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("While binding {address}"))?;
    info!("Listening {address}");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal(shutdown.clone()))
        .await
        .context("While serving http");

    shutdown.cancel();
    if let Err(e) = watcher.await {
        error!("Topic watcher failed: {:?}", e);
    }
    if let Some(seeding) = seeding {
        if let Err(e) = seeding.await {
            error!("Seeding test topic failed: {:?}", e);
        }
    }

    served
}

/// Returns whether the test topic exists afterwards.
async fn create_test_topic(admin: &AdminWrapper, topic: &TestTopicConfig) -> bool {
    let command = CreateTopicCommandInternal {
        name: topic.name.clone(),
        partitions: topic.partitions,
        replication: topic.replication,
    };

    match create_topic(admin, command).await {
        Ok(true) => {
            info!("Test topic {} created", topic.name);
            true
        }
        Ok(false) => {
            info!("Test topic {} already exists", topic.name);
            true
        }
        Err(e) => {
            warn!("Failed to create test topic {}: {}", topic.name, e);
            false
        }
    }
}

fn seed_test_topic(
    connection_settings: &ConnectionSettings,
    send_timeout: Duration,
    topic: &TestTopicConfig,
    shutdown: CancellationToken,
) -> Option<JoinHandle<usize>> {
    if topic.sample_messages == 0 {
        return None;
    }

    let producer = match ProducerWrapper::create(connection_settings, send_timeout) {
        Ok(producer) => producer,
        Err(e) => {
            warn!("Failed to create producer for test topic {}: {:#}", topic.name, e);
            return None;
        }
    };
    let command = ProduceSampleMessagesCommandInternal {
        topic: topic.name.clone(),
        count: topic.sample_messages,
        interval: topic.sample_interval(),
    };

    let future = async move { produce_sample_messages(&producer, command, shutdown).await }
        .instrument(info_span!("Seeding test topic"));
    Some(tokio::spawn(future))
}

async fn wait_for_shutdown_signal(shutdown: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => {
                error!("Failed to listen for shutdown signal: {}", e);
                shutdown.cancelled().await
            }
        },
        _ = shutdown.cancelled() => {}
    }
}
