use tracing_subscriber::{fmt, EnvFilter};
use utx::models::db_config::ConnectionOptions;
use utx::provider_manager::provider_mgr;
use utx::rdbc::value::Value;
use utx::rdbc::DEFAULT_PROVIDER_NAME;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::new("debug")).init();

    let url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "mysql://root@localhost:3306/mysql".to_string());

    let manager = provider_mgr();
    manager
        .register(DEFAULT_PROVIDER_NAME, ConnectionOptions::new(url))
        .await?;
    let session = manager
        .session(DEFAULT_PROVIDER_NAME)
        .ok_or_else(|| anyhow::anyhow!("provider not registered"))?;

    let rows = session
        .transaction(|conn| async move {
            conn.execute("CREATE TEMPORARY TABLE utx_demo (id INT, name VARCHAR(64))", &[])
                .await?;
            conn.execute(
                "INSERT INTO utx_demo (id, name) VALUES (?, ?)",
                &[Value::from(1), Value::from("jason")],
            )
            .await?;
            conn.query("SELECT id, name FROM utx_demo", &[]).await
        })
        .await?;
    println!("{rows:?}");

    manager.end_all().await;
    Ok(())
}
