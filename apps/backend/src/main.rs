#[tokio::main]
async fn main() -> anyhow::Result<()> {
    con_bravura_backend::run().await
}
