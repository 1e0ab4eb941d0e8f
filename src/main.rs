use std::sync::Arc;

use taxifare::config::Settings;
use taxifare::engine::Engine;
use taxifare::error::Error;
use taxifare::external::mapbox::MapboxDirections;
use taxifare::server::serve;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let settings = Settings::from_env()?;
    let pricing = settings.pricing()?;
    let directions = MapboxDirections::from_env()?;

    let engine = Engine::new(pricing, Arc::new(directions))?;

    serve(engine, settings.addr).await
}
