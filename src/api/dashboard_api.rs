// ==========================================
// DashboardApi - fleet summary and per-material rollups
// ==========================================
// Counters are pushed into the store as COUNT queries; the per-material
// rollup loads the spool set and groups in application code. Fine at this
// scale; push the grouping into SQL if the spool count ever gets serious.
// ==========================================

use std::collections::HashMap;
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::domain::types::{DashboardSummary, MaterialRollup};
use crate::repository::model_repo::ModelRepository;
use crate::repository::nozzle_repo::NozzleRepository;
use crate::repository::printer_repo::PrinterRepository;
use crate::repository::spool_repo::SpoolRepository;

pub struct DashboardApi {
    spool_repo: Arc<SpoolRepository>,
    printer_repo: Arc<PrinterRepository>,
    nozzle_repo: Arc<NozzleRepository>,
    model_repo: Arc<ModelRepository>,
}

impl DashboardApi {
    pub fn new(
        spool_repo: Arc<SpoolRepository>,
        printer_repo: Arc<PrinterRepository>,
        nozzle_repo: Arc<NozzleRepository>,
        model_repo: Arc<ModelRepository>,
    ) -> Self {
        Self {
            spool_repo,
            printer_repo,
            nozzle_repo,
            model_repo,
        }
    }

    /// Fleet-wide counters. Low-stock and unopened are independent
    /// categories; the same spool can land in both.
    pub fn summary(&self) -> ApiResult<DashboardSummary> {
        Ok(DashboardSummary {
            total_spools: self.spool_repo.count()?,
            total_printers: self.printer_repo.count()?,
            total_nozzles: self.nozzle_repo.count()?,
            total_models: self.model_repo.count()?,
            low_stock_spools: self.spool_repo.count_low_stock()?,
            unopened_spools: self.spool_repo.count_unopened()?,
        })
    }

    /// Per-material rollups, grouped by material string as stored (no
    /// normalization), in order of first appearance.
    ///
    /// Residual value is pro-rated: price * remaining/total per spool. A
    /// spool with total_weight == 0 contributes zero value instead of
    /// poisoning the sum with NaN.
    pub fn materials_summary(&self, unopened_only: bool) -> ApiResult<Vec<MaterialRollup>> {
        let spools = self.spool_repo.list_all(unopened_only)?;

        let mut rollups: Vec<MaterialRollup> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for spool in &spools {
            let idx = match index.get(&spool.material) {
                Some(&idx) => idx,
                None => {
                    index.insert(spool.material.clone(), rollups.len());
                    rollups.push(MaterialRollup {
                        material: spool.material.clone(),
                        count: 0,
                        total_weight: 0.0,
                        total_value: 0.0,
                        colors: Vec::new(),
                    });
                    rollups.len() - 1
                }
            };

            let rollup = &mut rollups[idx];
            rollup.count += 1;
            rollup.total_weight += spool.remaining_weight; // grams until the end
            if spool.total_weight > 0.0 {
                rollup.total_value += spool.price * spool.remaining_weight / spool.total_weight;
            }
            if !rollup.colors.contains(&spool.color_hex) {
                rollup.colors.push(spool.color_hex.clone());
            }
        }

        // grams -> kilograms
        for rollup in &mut rollups {
            rollup.total_weight /= 1000.0;
        }

        Ok(rollups)
    }
}
