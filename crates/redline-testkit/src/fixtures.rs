//! Press-release fixtures
//!
//! Four drafts of one press release, in the order the drafting workflow
//! produces them, plus helpers to put them on disk for CLI tests.

use std::path::{Path, PathBuf};

pub const DRAFT_V1: &str = "\
**Acme Launches Beacon**

*Demand forecasting for retail teams*

Acme today announced Beacon, a forecasting tool for retail teams.

## Key benefits

- Weekly demand forecasts
- Stock alerts

Frequently Asked Questions

How much does it cost?

Beacon is free during the beta.
";

pub const DRAFT_V2: &str = "\
**Acme Launches Beacon**

*Demand forecasting for small retail teams*

Acme today announced Beacon, a forecasting tool that helps small retail teams plan weekly stock with confidence.

## Key benefits

- Weekly demand forecasts
- Stock alerts
- Supplier reports

Frequently Asked Questions

How much does it cost?

Beacon is free during the beta.
";

pub const DRAFT_V3: &str = "\
**Acme Launches Beacon**

*Demand forecasting for small retail teams*

Acme today announced Beacon, a forecasting tool that helps small retail teams plan weekly stock with confidence.

> \"Beacon cut our stockouts in half.\" - Jordan Lee, store owner

## Key benefits

- Weekly demand forecasts
- Stock alerts
- Supplier reports

Frequently Asked Questions

How much does it cost?

Beacon costs $40 per store per month after the beta.
";

pub const DRAFT_V4: &str = "\
**Acme Launches Beacon for Small Retailers**

*Demand forecasting for small retail teams*

Acme today announced Beacon, a forecasting tool that helps small retail teams plan weekly stock with confidence.

> \"Beacon cut our stockouts in half.\" - Jordan Lee, store owner

## Key benefits

- Weekly demand forecasts
- Stock alerts
- Supplier reports

Frequently Asked Questions

How much does it cost?

Beacon costs $40 per store per month after the beta.
";

/// All drafts, oldest first
pub const DRAFTS: [&str; 4] = [DRAFT_V1, DRAFT_V2, DRAFT_V3, DRAFT_V4];

/// Version-set JSON as the drafting backend emits it
pub fn version_set_json() -> String {
    let mut map = std::collections::BTreeMap::new();
    for (key, draft) in ["v1_draft", "v2_refined", "v3_validated", "v4_final"]
        .into_iter()
        .zip(DRAFTS)
    {
        map.insert(key, draft);
    }
    serde_json::to_string_pretty(&map).expect("fixture map serializes")
}

/// Write `content` to `dir/name` and return the path
pub fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("Failed to write fixture");
    path
}
