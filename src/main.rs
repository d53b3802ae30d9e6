use std::sync::Arc;

use store_builder::api::{HttpStorefrontApi, MockStorefrontApi, StorefrontApi};
use store_builder::cli;
use store_builder::config::WizardConfig;
use store_builder::wizard::WizardOrchestrator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // Point STOREFRONT_API_URL at a real backend; otherwise the wizard runs
    // against the in-memory demo catalog.
    let api: Arc<dyn StorefrontApi> = match std::env::var("STOREFRONT_API_URL") {
        Ok(url) => {
            eprintln!("🏬 Store Builder v{}", env!("CARGO_PKG_VERSION"));
            eprintln!("   Backend: {url}\n");
            Arc::new(HttpStorefrontApi::new(url))
        }
        Err(_) => {
            eprintln!("🏬 Store Builder v{}", env!("CARGO_PKG_VERSION"));
            eprintln!("   Backend: in-memory demo (set STOREFRONT_API_URL for a real one)\n");
            Arc::new(MockStorefrontApi::new())
        }
    };

    let orch = WizardOrchestrator::new(api, WizardConfig::default());
    orch.start(None).await;
    cli::run(&orch).await
}
