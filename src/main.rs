use tracing::error;

#[tokio::main]
async fn main() {
    if let Err(error) = lingji_entitlements::run().await {
        error!("Entitlement service exited with error: {}", error);
        std::process::exit(1);
    }
}
