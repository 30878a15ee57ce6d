use house_price::{
    configuration::get_configuration,
    startup,
    telemetry::{get_subscriber, init_subscriber},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("house-price".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber)?;

    let cfg = get_configuration()?;
    startup::run(cfg).await
}
