//! Trigger an aggregation run

use anyhow::Result;

use crate::client::{AggregationOutcome, ApiClient};
use crate::output::{print_error, print_success, print_warning};
use crate::WindowArg;

pub async fn run(client: &ApiClient, account: &str, window: WindowArg) -> Result<()> {
    let outcome = client.trigger_aggregation(account, window.as_str()).await?;

    match outcome {
        AggregationOutcome::Success => {
            print_success(&format!(
                "Aggregated account {account} at {} granularity",
                window.as_str()
            ));
            Ok(())
        }
        AggregationOutcome::PartialFailure(failed) => {
            print_warning(&format!(
                "Aggregation for account {account} completed with {} failed namespace(s)",
                failed.len()
            ));
            for failure in &failed {
                print_error(&format!("  {}: {}", failure.namespace, failure.error));
            }
            anyhow::bail!("{} namespace(s) failed", failed.len())
        }
    }
}
