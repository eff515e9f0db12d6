use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = decyde_api::Args::parse();

	decyde_api::run(args).await
}
