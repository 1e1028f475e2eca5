/// Data layer: cell classification, loading, and row cleansing.
///
/// Architecture:
/// ```text
///   .csv / .tsv / .txt
///        │
///        ▼
///   ┌──────────┐
///   │  numeric  │  is this token a finite float literal?
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  find header row → parse table → coerce cells
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  drop every row holding a missing cell
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ LoadedSignal  │  SignalTable + sampling rate
///   └──────────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod numeric;
