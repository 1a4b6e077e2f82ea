#[tokio::main]
async fn main() {
    if let Err(e) = tasklist_lib::run().await {
        eprintln!("tasklist: {e}");
        std::process::exit(1);
    }
}
