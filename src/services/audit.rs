// src/services/audit.rs
//
// Fire-and-forget audit trail. Entries are appended as JSON lines after
// every successful mutation; a failed append is logged and swallowed so it
// can never fail the mutation it describes.
use crate::utils::store::storage_dir;
use chrono::Utc;
use log::warn;
use serde_json::json;
use std::fs::{self, OpenOptions};
use std::io::Write;

pub fn record(actor: &str, action: &str, entity_id: &str, metadata: serde_json::Value) {
    let entry = json!({
        "at": Utc::now().to_rfc3339(),
        "actor": actor,
        "action": action,
        "entity_id": entity_id,
        "metadata": metadata,
    });

    let dir = storage_dir();
    if let Err(e) = fs::create_dir_all(&dir) {
        warn!("Audit log unavailable: {:?}", e);
        return;
    }

    let result = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("audit.log"))
        .and_then(|mut file| writeln!(file, "{}", entry));

    if let Err(e) = result {
        warn!("Failed to append audit entry for {}: {:?}", action, e);
    }
}
