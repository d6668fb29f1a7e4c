// Paginated document layout for the PDF download.
// Pure and CPU-bound: callers on the async runtime wrap it in tokio::task::spawn_blocking.

pub mod font_metrics;
pub mod formatter;
pub mod wrap;

// Re-export the public API consumed by the render handlers.
pub use formatter::{layout, DocumentLayout, LayoutError, PageGeometry};
