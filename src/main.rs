#[tokio::main]
async fn main() {
    jobboard::boot::boot().await;
}
