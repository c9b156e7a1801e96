mod api;
mod config;
mod error;
mod main_lib;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    main_lib::run().await
}
