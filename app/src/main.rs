// Handlers share one thread; each request is a task on it.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    konza_pizza_manager::run().await
}
