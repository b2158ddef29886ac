#[tokio::main]
async fn main() -> std::io::Result<()> {
    booking_portal::run().await
}
