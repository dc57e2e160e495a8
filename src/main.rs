#[tokio::main]
async fn main() {
    if let Err(e) = especialistas::run().await {
        eprintln!("especialistas: {e}");
        std::process::exit(1);
    }
}
