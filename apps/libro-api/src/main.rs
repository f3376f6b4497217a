use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = libro_api::Args::parse();

	libro_api::run(args).await
}
