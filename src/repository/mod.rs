// ==========================================
// spooltrack - repository layer
// ==========================================
// Data access only; no business rules. Every repository shares the process
// connection behind Arc<Mutex<Connection>>.
// ==========================================

pub mod error;
pub mod model_repo;
pub mod nozzle_repo;
pub mod printer_repo;
pub mod spool_repo;

pub use error::{RepositoryError, RepositoryResult};
pub use model_repo::ModelRepository;
pub use nozzle_repo::NozzleRepository;
pub use printer_repo::PrinterRepository;
pub use spool_repo::{SpoolRepository, UsageApplyResult};
