use std::path::Path;

use anyhow::{Context, Result};

/// Writes a two-column `category,count` CSV artifact.
pub fn write_category_counts(counts: &[(String, u64)], path: &Path) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["category", "count"])?;
    for (category, count) in counts {
        writer.write_record([category.as_str(), count.to_string().as_str()])?;
    }
    writer.flush()?;
    Ok(())
}
