use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = bds_api::Args::parse();

	bds_api::run(args).await
}
