//! Seed the aggregator with the demo fixture dataset

use anyhow::Result;
use chrono::{SecondsFormat, TimeZone, Utc};

use crate::client::{ApiClient, NamespaceRegistration, Sample};
use crate::output::print_success;

/// Seed namespaces and samples for two demo accounts
pub async fn run(client: &ApiClient) -> Result<()> {
    for registration in registrations() {
        client.post_no_content("namespaces", &registration).await?;
    }
    print_success("Registered namespaces for account1 and account2");

    let samples = samples();
    let count = samples.len();
    client.post_no_content("samples", &samples).await?;
    print_success(&format!("Ingested {count} samples"));

    Ok(())
}

fn registrations() -> Vec<NamespaceRegistration> {
    vec![
        NamespaceRegistration {
            account: "account1".to_string(),
            namespaces: vec!["namespace1".to_string(), "namespace2".to_string()],
        },
        NamespaceRegistration {
            account: "account2".to_string(),
            namespaces: vec!["namespace3".to_string(), "namespace4".to_string()],
        },
    ]
}

fn samples() -> Vec<Sample> {
    // Every fixture sample lands in the same hour window.
    let timestamp = Utc
        .with_ymd_and_hms(2021, 1, 1, 0, 0, 0)
        .single()
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| "2021-01-01T00:00:00Z".to_string());

    let fixture = [
        ("account1", "namespace1", "container1", 0.1, 0.2),
        ("account1", "namespace1", "container2", 0.3, 0.4),
        ("account1", "namespace2", "container3", 0.5, 0.6),
        ("account2", "namespace3", "container4", 0.7, 0.8),
        ("account2", "namespace4", "container5", 0.9, 1.0),
    ];

    fixture
        .into_iter()
        .map(|(account, namespace, container, cpu, memory)| Sample {
            account: account.to_string(),
            namespace: namespace.to_string(),
            container: container.to_string(),
            timestamp: timestamp.clone(),
            cpu_usage: cpu,
            memory_usage: memory,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_covers_both_accounts() {
        let samples = samples();
        assert_eq!(samples.len(), 5);
        assert_eq!(samples.iter().filter(|s| s.account == "account1").count(), 3);
        assert_eq!(samples.iter().filter(|s| s.account == "account2").count(), 2);
    }

    #[test]
    fn test_fixture_namespaces_match_registrations() {
        let registered: Vec<String> = registrations()
            .into_iter()
            .flat_map(|r| r.namespaces)
            .collect();
        for sample in samples() {
            assert!(registered.contains(&sample.namespace), "{}", sample.namespace);
        }
    }
}
