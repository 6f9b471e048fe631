use anyhow::anyhow;
use dashboard_stats::infra::storage::entity::column_names;

use super::CheckResult;

pub const NAME: &str = "Model Definition";

/// Compare against the entity's static column listing.
pub fn check(entity: &str, column: &str) -> anyhow::Result<CheckResult> {
    let columns = column_names(entity).ok_or_else(|| anyhow!("unknown entity '{entity}'"))?;

    Ok(if columns.iter().any(|c| c == column) {
        CheckResult::new(NAME).fail(format!("Entity '{entity}' still defines '{column}'"))
    } else {
        CheckResult::new(NAME)
            .pass(format!("Entity '{entity}' does not define '{column}'"))
            .note(format!("Columns: {}", columns.join(", ")))
    })
}
