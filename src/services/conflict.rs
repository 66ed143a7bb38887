// src/services/conflict.rs
use crate::models::{ConflictWarning, Delegation, ServiceError};
use crate::utils::store::Collection;
use chrono::NaiveDate;
use std::sync::Arc;

// Finds existing active delegations to a recipient whose date windows
// collide with a candidate window. Both interval ends are inclusive, so a
// grant ending on day D and one starting on day D count as overlapping.
// Advisory only: the manager surfaces the result as a warning, never as an
// error, because two delegators may legitimately grant the same recipient
// distinct permission sets at the same time.
#[derive(Clone)]
pub struct ConflictDetector {
    delegations: Arc<dyn Collection<Delegation>>,
}

impl ConflictDetector {
    pub fn new(delegations: Arc<dyn Collection<Delegation>>) -> Self {
        Self { delegations }
    }

    // Returns the first conflict in store order; enumerating every overlap
    // is not needed for display purposes.
    pub fn find_conflict(
        &self,
        to_user_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        exclude_id: Option<&str>,
    ) -> Result<Option<ConflictWarning>, ServiceError> {
        for existing in self.delegations.list()? {
            if existing.to_user_id != to_user_id || !existing.is_active {
                continue;
            }
            if exclude_id == Some(existing.id.as_str()) {
                continue;
            }
            if existing.overlaps(start_date, end_date) {
                return Ok(Some(ConflictWarning {
                    delegation_id: existing.id,
                    from_user_id: existing.from_user_id,
                    start_date: existing.start_date,
                    end_date: existing.end_date,
                }));
            }
        }

        Ok(None)
    }
}
