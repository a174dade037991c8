#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    rapor_tk::run().await?;
    Ok(())
}
