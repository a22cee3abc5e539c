/// Data layer: core types, loading, projection, filtering and summaries.
///
/// Architecture:
/// ```text
///  liikenneonnettomuudet_Helsingissa.csv  (file or http)
///        │
///        ▼
///   ┌──────────┐     ┌────────────┐
///   │  loader   │ ──▶ │ projection │  GK25 (EPSG:3879) → WGS84
///   └──────────┘     └────────────┘
///        │  RowOutcome per line, rejected rows counted
///        ▼
///   ┌─────────────────┐
///   │ AccidentDataset │  Vec<AccidentRecord>, file order
///   └─────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year + seriousness → filtered indices
///   └──────────┘
///        │
///        ├──▶ aggregate  (counts per kind, bar chart)
///        └──▶ features   (GeoJSON points, map export)
/// ```

pub mod aggregate;
pub mod features;
pub mod filter;
pub mod loader;
pub mod model;
pub mod projection;
