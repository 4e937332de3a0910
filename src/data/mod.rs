/// Data layer: raw file parsing and the list models built on it.
///
/// Architecture:
/// ```text
///  .csv / .txt
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → time-major Grid (+ warning on failure)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ DataFile  │  owns the Grid, builds one AxisListModel lazily
///   └──────────┘
///        │                         ┌─────────────────────┐
///        ├────────────────────────►│ FileCollectionModel │  ordered files
///        ▼                         └─────────────────────┘
///   ┌───────────────┐
///   │ AxisListModel │  rows = wavelengths or times, payload = (x, y)
///   └───────────────┘
/// ```

pub mod axis_list;
pub mod export;
pub mod files;
pub mod loader;
pub mod model;
pub mod substitute;
