// ==========================================
// spooltrack - domain layer
// ==========================================
// Plain entities and value types. No data access, no business rules here.
// ==========================================

pub mod model;
pub mod printer;
pub mod spool;
pub mod types;

pub use model::{ModelWithTags, PrintModel, Tag};
pub use printer::{Nozzle, NozzleWithPrinter, Printer, PrinterDetail, PrinterWithNozzle};
pub use spool::{FilamentSpool, FilamentSpoolDetail, FilamentUsage, FilamentUsageDetail};
pub use types::{DashboardSummary, MaterialRollup, Paginated, Pagination, SpoolFilter};
