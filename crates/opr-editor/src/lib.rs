//! OPR Editor - Editing use cases
//!
//! This crate orchestrates the domain model, persistence and geocoding
//! ports: the editor session that owns the canonical dataset, the map
//! synchronization bridge, the debounced search box and the import
//! enrichment pipeline.

pub mod bridge;
pub mod import;
pub mod search;
pub mod session;

pub use bridge::{
    Camera, LineRequest, LineUpdate, MapBridge, MapEvent, MapView, Marker, MarkerColor, MarkerId,
    RecordingView, RenderPlan,
};
pub use import::{ImportPipeline, ImportReport, LookupEvent};
pub use search::{SearchBox, SearchOutcome, SearchRequest};
pub use session::EditorSession;
