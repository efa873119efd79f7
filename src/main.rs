use ridefare::config::Settings;
use ridefare::engine::Engine;
use ridefare::error::Error;
use ridefare::server::serve;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let settings = Settings::from_env()?;
    let engine = Engine::with_quote_ttl(settings.load_pricing()?, settings.quote_ttl)?;

    serve(engine, settings.bind_addr).await
}
