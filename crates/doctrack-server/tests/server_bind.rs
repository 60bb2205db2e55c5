use axum::Router;
use doctrack_server::bootstrap;
use doctrack_server::config::ServerConfig;
use doctrack_server::settings::Settings;

#[tokio::test]
async fn serve_reports_an_address_in_use() {
    let taken = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let settings = Settings {
        addr: taken.local_addr().expect("local addr"),
        db_url: String::new(),
        db_pool_max: 1,
        jwt_secret: "secret".to_string(),
        require_secret: true,
        config: ServerConfig::default(),
    };

    let err = bootstrap::serve(&settings, Router::new())
        .await
        .expect_err("bind should fail");
    assert!(err.starts_with("failed to bind 127.0.0.1:"));
}
