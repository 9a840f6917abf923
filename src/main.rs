#[tokio::main]
async fn main() {
    let code = td::cli::run().await;
    std::process::exit(code);
}
