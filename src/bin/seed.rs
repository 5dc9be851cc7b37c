// ==========================================
// spooltrack - demo data seeder
// ==========================================
// Populates a database with a realistic starter inventory. Usage history is
// recorded through the accounting path, so remaining weights end up where a
// real history would leave them.
//
// Usage: SPOOLTRACK_DB=./spooltrack.db cargo run --bin seed
// ==========================================

use spooltrack::api::{
    CreateFilamentPayload, CreateModelPayload, CreateNozzlePayload, CreatePrinterPayload,
    CreateUsagePayload, UpdateNozzlePayload,
};
use spooltrack::app::AppState;
use spooltrack::config::ServerConfig;
use spooltrack::logging;

fn filament(
    brand: &str,
    material: &str,
    color_name: &str,
    color_hex: &str,
    total: f64,
    remaining: f64,
    price: f64,
    purchase_date: &str,
    store: &str,
    opened: Option<&str>,
    location: &str,
    notes: &str,
) -> CreateFilamentPayload {
    CreateFilamentPayload {
        brand: brand.to_string(),
        material: material.to_string(),
        color_name: color_name.to_string(),
        color_hex: color_hex.to_string(),
        diameter: 1.75,
        total_weight: total,
        remaining_weight: remaining,
        price,
        purchase_date: Some(purchase_date.to_string()),
        store: Some(store.to_string()),
        url: None,
        opened: Some(opened.is_some()),
        opened_date: opened.map(|d| d.to_string()),
        location: Some(location.to_string()),
        notes: Some(notes.to_string()),
    }
}

fn main() -> anyhow::Result<()> {
    logging::init();

    let config = ServerConfig::from_env();
    tracing::info!(db = %config.db_path, "seeding database");

    let state = AppState::new(&config.db_path)?;

    // Nozzles
    let nozzle = |size: f64, material: &str, condition: &str, notes: &str| CreateNozzlePayload {
        size,
        material: material.to_string(),
        condition: condition.to_string(),
        notes: Some(notes.to_string()),
        printer_id: None,
    };
    let n1 = state
        .nozzle_api
        .create(nozzle(0.4, "Brass", "Used", "Standard nozzle for most prints"))?;
    let n2 = state
        .nozzle_api
        .create(nozzle(0.6, "Hardened Steel", "New", "For abrasive filaments"))?;
    let n3 = state
        .nozzle_api
        .create(nozzle(0.4, "Hardened Steel", "Used", "Bambu Lab standard"))?;
    let _n4 = state
        .nozzle_api
        .create(nozzle(0.2, "Brass", "New", "For detailed prints"))?;

    // Printers, then mount the nozzles
    let p1 = state.printer_api.create(CreatePrinterPayload {
        name: "Prusa MK4".to_string(),
        model: "Original Prusa MK4".to_string(),
        notes: Some("Main workhorse printer".to_string()),
        current_nozzle_id: Some(n1.id.clone()),
    })?;
    let p2 = state.printer_api.create(CreatePrinterPayload {
        name: "Bambu X1C".to_string(),
        model: "Bambu Lab X1 Carbon".to_string(),
        notes: Some("Fast multi-color prints".to_string()),
        current_nozzle_id: Some(n3.id.clone()),
    })?;
    for (nozzle_id, printer_id) in [(&n1.id, &p1.id), (&n2.id, &p1.id), (&n3.id, &p2.id)] {
        state.nozzle_api.update(
            nozzle_id,
            UpdateNozzlePayload {
                printer_id: Some(printer_id.clone()),
                ..Default::default()
            },
        )?;
    }

    // Models with tags
    let m1 = state.model_api.create(CreateModelPayload {
        name: "Benchy".to_string(),
        link: Some("https://www.thingiverse.com/thing:763622".to_string()),
        notes: Some("Calibration print".to_string()),
        tags: vec!["Functional".to_string()],
    })?;
    let m2 = state.model_api.create(CreateModelPayload {
        name: "Dragon Miniature".to_string(),
        link: Some("https://www.myminifactory.com".to_string()),
        notes: Some("Fantasy miniature".to_string()),
        tags: vec!["Miniature".to_string()],
    })?;
    state.model_api.create(CreateModelPayload {
        name: "Vase Spiral".to_string(),
        link: None,
        notes: Some("Decoration piece".to_string()),
        tags: vec!["Decoration".to_string()],
    })?;

    // Spools. The two with usage history start full; the usage records
    // below bring them down to their real remaining weight.
    let spools = [
        filament("Prusament", "PLA", "Galaxy Black", "#1a1a2e", 1000.0, 1000.0, 24.99, "2024-11-15", "Prusa Research", Some("2024-11-20"), "Shelf A1", "Premium quality"),
        filament("eSUN", "PETG", "Transparent Blue", "#4a90e2", 1000.0, 1000.0, 19.99, "2024-12-01", "Amazon", None, "Storage Box 2", "Backup spool"),
        filament("Polymaker", "ABS", "Fire Red", "#e74c3c", 1000.0, 1000.0, 22.50, "2024-10-20", "Local Store", Some("2024-10-22"), "Shelf A2", "Good for enclosure"),
        filament("Overture", "TPU", "Clear Natural", "#f5f5dc", 500.0, 500.0, 26.99, "2024-12-15", "Amazon", None, "Shelf B1", "Flexible filament"),
        filament("Prusament", "PLA", "Lipstick Red", "#c0392b", 1000.0, 200.0, 24.99, "2024-09-10", "Prusa Research", Some("2024-09-12"), "Shelf A1", "Running low!"),
        filament("ColorFabb", "PETG", "Signal White", "#ffffff", 750.0, 600.0, 28.99, "2024-11-01", "ColorFabb Store", Some("2024-11-05"), "Shelf A3", "Premium quality"),
        filament("Sunlu", "PLA", "Silk Gold", "#ffd700", 1000.0, 850.0, 18.99, "2024-12-10", "Amazon", Some("2024-12-12"), "Shelf A1", "Beautiful finish"),
        filament("Polymaker", "ASA", "Black", "#000000", 1000.0, 1000.0, 27.99, "2024-12-20", "Local Store", None, "Storage Box 1", "UV resistant"),
        filament("eSUN", "PLA+", "Galaxy Purple", "#9b59b6", 1000.0, 380.0, 21.99, "2024-10-05", "Amazon", Some("2024-10-08"), "Shelf A2", "Stronger than PLA"),
        filament("Bambu Lab", "PLA", "Matte Orange", "#ff6347", 1000.0, 920.0, 19.99, "2024-12-18", "Bambu Store", Some("2024-12-20"), "Shelf B2", "Optimized for Bambu"),
    ];

    let mut created = Vec::new();
    for payload in spools {
        created.push(state.filament_api.create(payload)?);
    }

    // Usage history
    state.filament_api.record_usage(
        &created[0].id,
        CreateUsagePayload {
            grams_used: 250.0,
            usage_date: Some("2024-11-22".to_string()),
            printer_id: Some(p1.id.clone()),
            model_id: Some(m1.model.id.clone()),
            notes: Some("Calibration print".to_string()),
        },
    )?;
    state.filament_api.record_usage(
        &created[2].id,
        CreateUsagePayload {
            grams_used: 550.0,
            usage_date: Some("2024-10-25".to_string()),
            printer_id: Some(p2.id.clone()),
            model_id: Some(m2.model.id.clone()),
            notes: Some("Large miniature".to_string()),
        },
    )?;

    tracing::info!(spools = created.len(), "seeding completed");
    Ok(())
}
