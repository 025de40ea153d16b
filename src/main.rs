#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = registrar_rust::run().await {
        eprintln!("registrar-rust fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
