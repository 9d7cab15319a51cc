// src/pipeline/snapshot.rs

//! Snapshot building.

use chrono::{DateTime, Utc};

use crate::extract::{Extraction, SourceExtractor};
use crate::models::{Domain, Snapshot, SourceConfig};

/// Build one domain's snapshot by extracting every source in turn.
///
/// Best-effort and strictly sequential: a failed extraction becomes an
/// absent field and the remaining sources are still processed.
pub async fn build_snapshot(
    extractor: &SourceExtractor,
    domain: Domain,
    sources: &[&SourceConfig],
    now: DateTime<Utc>,
) -> Snapshot {
    log::info!("Building {} snapshot ({} sources)", domain, sources.len());

    let mut snapshot = Snapshot::at(now);
    for source in sources {
        log::info!("Fetching {} ({})", source.name, source.url);
        let extraction = extractor.extract(source).await;
        if let Extraction::Absent(reason) = &extraction {
            log::warn!("{}: value unavailable ({})", source.name, reason);
        }
        snapshot.set(source.field.clone(), extraction.into_field_value());
    }
    snapshot
}
