use log::{error, info};

use reformmed_agent::{
    bounded, register_with_retry, run_sampler, run_sender, AgentConfig, Identity,
    MetricsCollector, RegisterRequest, ServerClient, QUEUE_CAPACITY, REGISTER_ATTEMPTS,
    REGISTER_RETRY_DELAY,
};

fn os_type() -> &'static str {
    if cfg!(target_os = "windows") {
        "windows"
    } else {
        "linux"
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AgentConfig::from_env();
    info!("{}", "=".repeat(50));
    info!("  REFORMMED monitor agent");
    info!("  system   : {}", config.system_name);
    info!("  location : {}", config.location);
    info!("  server   : {}", config.server_url);
    info!("  interval : {:?}", config.interval);
    info!("{}", "=".repeat(50));

    let http = reqwest::Client::new();
    let client = ServerClient::new(&config, http.clone());
    let identity = Identity::detect(&config.system_name, &config.location);
    let hostname = identity.hostname.clone();

    let mut collector = MetricsCollector::new(identity, http);
    collector.warm_up().await;

    let registration = RegisterRequest {
        system_name: config.system_name.clone(),
        location: config.location.clone(),
        os_type: os_type().to_string(),
        hostname,
        public_ip: collector.public_ip().await,
    };
    match register_with_retry(&client, &registration, REGISTER_ATTEMPTS, REGISTER_RETRY_DELAY)
        .await
    {
        Ok(response) => info!(
            "registered, table: {}",
            response.table_name.as_deref().unwrap_or("unknown")
        ),
        Err(err) => {
            error!("{err}, exiting");
            std::process::exit(1);
        }
    }

    let (queue_tx, queue_rx) = bounded(QUEUE_CAPACITY);
    tokio::spawn(run_sender(queue_rx, client, queue_tx.clone()));

    info!("sending metrics every {:?}", config.interval);
    run_sampler(collector, queue_tx, config.interval).await;
}
