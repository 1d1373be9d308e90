//! Narrow read interfaces onto the collaborators the ledger does not own.

use crate::errors::AppResult;
use crate::models::vehicle::Vehicle;
use crate::models::week::Week;

/// Weeks and their assignment lines, owned by the scheduling grid.
pub trait SchedulingGrid {
    /// One week with all of its lines, if the grid knows it.
    fn week(&self, week_id: i64) -> AppResult<Option<Week>>;

    /// Every week, ascending by id. Lines may be left empty.
    fn weeks(&self) -> AppResult<Vec<Week>>;
}

/// Vehicle identities, owned by the master catalog.
pub trait VehicleCatalog {
    fn active_vehicles(&self) -> AppResult<Vec<Vehicle>>;
}
