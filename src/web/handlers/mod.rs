pub mod calendar_handlers;
pub mod candidate_handlers;
pub mod extraction_handlers;
pub mod kpi_handlers;
pub mod note_handlers;
pub mod project_handlers;
pub mod system_handlers;
pub mod task_handlers;

pub use calendar_handlers::*;
pub use candidate_handlers::*;
pub use extraction_handlers::*;
pub use kpi_handlers::*;
pub use note_handlers::*;
pub use project_handlers::*;
pub use system_handlers::*;
pub use task_handlers::*;
