use pcsensor_exporter::logging;
use pcsensor_exporter::server::serve;
use pcsensor_exporter::settings::load_from_cli;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = load_from_cli()
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string()))?;

    logging::init(&config.logging)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string()))?;

    serve(config).await
}
