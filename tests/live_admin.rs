//! Admin user management against a real OrangeHRM through WebDriver.
//!
//! Needs a running chromedriver and a reachable OrangeHRM instance described
//! by `e2e.toml` (or the file named in `ORANGEHRM_E2E_CONFIG`). Run with:
//!
//! ```text
//! chromedriver --port=9515 &
//! cargo test --test live_admin -- --ignored
//! ```

use orangehrm_admin_e2e::scenarios::{self, NewUser};
use orangehrm_admin_e2e::{Harness, Settings};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "orangehrm_admin_e2e=info".into()),
        )
        .with_test_writer()
        .try_init();
}

fn live_harness() -> anyhow::Result<Harness<orangehrm_admin_e2e::WebDriverLauncher>> {
    init_tracing();
    let settings = Settings::load()?;
    Ok(Harness::from_settings(settings)?)
}

#[tokio::test]
#[ignore = "requires chromedriver and a live OrangeHRM"]
async fn test_admin_can_add_user() -> anyhow::Result<()> {
    let harness = live_harness()?;
    let user = NewUser::random();

    let change = harness
        .run("test_admin_can_add_user", |session, settings| {
            Box::pin(async move { scenarios::add_user(session, settings, &user).await })
        })
        .await?;

    change.expect_delta(1)?;
    Ok(())
}

#[tokio::test]
#[ignore = "requires chromedriver and a live OrangeHRM"]
async fn test_admin_can_delete_user() -> anyhow::Result<()> {
    let harness = live_harness()?;
    let user = NewUser::random();

    let change = harness
        .run("test_admin_can_delete_user", |session, settings| {
            Box::pin(async move { scenarios::delete_user(session, settings, &user).await })
        })
        .await?;

    change.expect_delta(-1)?;
    Ok(())
}
