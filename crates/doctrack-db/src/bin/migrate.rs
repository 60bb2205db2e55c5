use doctrack_db::{
    connect_postgres, migrate, normalize_database_url, redact_database_url, table_counts,
};

#[tokio::main]
async fn main() {
    let raw_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let db_url = normalize_database_url(&raw_url);
    println!("connecting to {}", redact_database_url(&db_url));
    let pool = connect_postgres(&db_url)
        .await
        .expect("failed to connect to database");
    migrate(&pool).await.expect("failed to run migrations");
    let counts = table_counts(&pool).await.expect("failed to count rows");
    println!("documents: {}, users: {}", counts.documents, counts.users);
}
