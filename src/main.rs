#[actix_web::main]
async fn main() -> std::io::Result<()> {
    datastory_lib::run().await
}
