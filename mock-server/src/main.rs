use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let db = mock_server::new_db();
    if let Ok(name) = std::env::var("SEED_SPACE") {
        let id = db.write().await.seed_space(&name);
        println!("seeded space {name} ({id})");
    }
    let listener = TcpListener::bind(&addr).await?;
    println!("listening on {addr}");
    mock_server::run_with(listener, db).await
}
