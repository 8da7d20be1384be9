#[actix_web::main]
async fn main() -> std::io::Result<()> {
    legaldoc_server::run().await
}
