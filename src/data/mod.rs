/// Data layer: core types, loading, and chart queries.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + validate rows → LaunchDataset
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ LaunchDataset │  Vec<LaunchRecord>, payload bounds (read-only)
///   └───────────────┘
///        │
///        ├──────────────────────┐
///        ▼                      ▼
///   ┌────────────────┐   ┌─────────────────┐
///   │ success_counts │   │ payload_scatter │  (site, range) → chart data
///   └────────────────┘   └─────────────────┘
/// ```

pub mod loader;
pub mod model;
pub mod query;
