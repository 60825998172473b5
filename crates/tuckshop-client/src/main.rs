#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tuckshop_client::run().await
}
