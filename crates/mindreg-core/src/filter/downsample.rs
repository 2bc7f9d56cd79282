//! Integer-factor downsampling.

use crate::error::{CoreError, Result};
use crate::spatial::Spacing3;
use crate::volume::Volume;

/// Downsample a volume by an integer shrink factor.
///
/// Keeps every `factor`-th voxel along each axis starting at index 0, so the
/// output origin equals the input origin and the spacing is multiplied by
/// the factor. Callers smooth before downsampling to avoid aliasing.
pub fn downsample(volume: &Volume, factor: usize) -> Result<Volume> {
    if factor == 0 {
        return Err(CoreError::invalid_volume(
            "shrink factor must be positive".to_string(),
        ));
    }
    if factor == 1 {
        return Ok(volume.clone());
    }
    let size = volume.size();
    let out_size = [
        (size[0] + factor - 1) / factor,
        (size[1] + factor - 1) / factor,
        (size[2] + factor - 1) / factor,
    ];
    let spacing = volume.spacing().as_array();
    let out_spacing = Spacing3::new([
        spacing[0] * factor as f64,
        spacing[1] * factor as f64,
        spacing[2] * factor as f64,
    ])?;

    let mut data = Vec::with_capacity(out_size[0] * out_size[1] * out_size[2]);
    for k in 0..out_size[2] {
        for j in 0..out_size[1] {
            for i in 0..out_size[0] {
                data.push(volume.get(i * factor, j * factor, k * factor));
            }
        }
    }
    Volume::new(
        out_size,
        out_spacing,
        *volume.origin(),
        *volume.direction(),
        data,
    )
}
