// src/pipeline/monitor.rs

//! The monitoring cycle.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::extract::SourceExtractor;
use crate::models::{Alert, Config, Domain, Snapshot, render_digest};
use crate::notify::Notifier;
use crate::pipeline::detect;
use crate::storage::{RunLog, StateStore};

/// Run one full monitoring cycle.
///
/// Strictly sequential: self-test notify, build both snapshots, reconcile
/// against stored state, then push a digest if anything fired. A persist
/// failure is the one hard error; everything upstream degrades in place.
pub async fn run_monitor(
    config: &Config,
    store: &dyn StateStore,
    notifier: &Notifier,
) -> Result<()> {
    let now = Utc::now();
    let extractor = SourceExtractor::new(&config.monitor)?;

    // Liveness signal for the notification channel itself, independent of
    // alert detection.
    notifier
        .send("✅ treadwatch heartbeat: monitoring run starting.")
        .await;

    let law = build(&extractor, config, Domain::Law, now).await;
    let sanctions = build(&extractor, config, Domain::Sanctions, now).await;

    let alerts = reconcile(config, store, now, &law, &sanctions).await?;

    if alerts.is_empty() {
        log::info!("No changes detected");
    } else {
        log::info!("{} alert(s) detected", alerts.len());
        notifier
            .send(&render_digest("treadwatch updates:", &alerts))
            .await;
    }

    // Final cycle report on stdout
    let report = serde_json::json!({ "law": law, "sanctions": sanctions });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

async fn build(
    extractor: &SourceExtractor,
    config: &Config,
    domain: Domain,
    now: DateTime<Utc>,
) -> Snapshot {
    let sources = config.sources_for(domain);
    super::build_snapshot(extractor, domain, &sources, now).await
}

/// Diff fresh snapshots against stored state, persist them, and append a
/// run log when alerts fired.
///
/// Persistence is unconditional: the stored snapshot always reflects the
/// latest fetch, even on a silent refresh with zero alerts.
pub async fn reconcile(
    config: &Config,
    store: &dyn StateStore,
    now: DateTime<Utc>,
    law: &Snapshot,
    sanctions: &Snapshot,
) -> Result<Vec<Alert>> {
    let prev_law = store.load_previous(Domain::Law).await;
    let prev_sanctions = store.load_previous(Domain::Sanctions).await;

    let mut alerts = detect(&config.sources_for(Domain::Law), &prev_law, law);
    alerts.extend(detect(
        &config.sources_for(Domain::Sanctions),
        &prev_sanctions,
        sanctions,
    ));

    store.persist(Domain::Law, law).await?;
    store.persist(Domain::Sanctions, sanctions).await?;

    if !alerts.is_empty() {
        let record = RunLog {
            timestamp: now,
            alerts: alerts.clone(),
            law: law.clone(),
            sanctions: sanctions.clone(),
        };
        store.append_run_log(&record).await?;
    }

    Ok(alerts)
}
