//! Extract-then-plan for an installed loader file

use std::path::Path;

use syslinux_patch::{plan_patches, PatchOptions, PatchPlan};

use crate::error::InstallError;
use crate::extract_sectors;

/// Map `installed_path` and compute its patch plan from `image`
///
/// The file at `installed_path` must already hold the full image followed
/// by the two ADV sectors.
pub fn plan_install(
    installed_path: impl AsRef<Path>,
    image: &[u8],
    options: &PatchOptions,
) -> Result<PatchPlan, InstallError> {
    let path = installed_path.as_ref();
    let sectors = extract_sectors(path)?;

    let label = path.to_string_lossy();
    let plan = plan_patches(&label, image, &sectors, options)?;

    if plan.feedback.has_warnings() {
        log::warn!("{}: patch plan has omitted fields", label);
    }

    Ok(plan)
}
