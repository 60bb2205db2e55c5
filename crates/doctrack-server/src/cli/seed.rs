use doctrack_db::seed::seed_demo_data;
use doctrack_db::PgPool;

pub async fn run(db: &PgPool) -> Result<(), String> {
    let report = seed_demo_data(db)
        .await
        .map_err(|err| format!("seed failed: {err}"))?;
    println!(
        "seeded {} user(s) and {} document(s)",
        report.users, report.documents
    );
    Ok(())
}
