/// Data layer: core types and loading.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .xlsx / .xls / .ods
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  sniff format, parse first sheet → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  header + ragged rows of CellValue
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
