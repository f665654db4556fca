// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Unit rectification
//!
//! Scale factors between two units. Angular units have no intrinsic linear
//! size, so callers supply `angular_to_linear_ratio`: how many linear
//! ratio-to-base units one angular ratio-to-base unit is worth.

use gcs_lite_geometry::{eq_one_eps, TransfoMatrix, TransfoModel};

use crate::gcs::Gcs;
use crate::units::Unit;

/// Ratio to base expressed on the linear scale
#[inline]
fn linear_equivalent_ratio(unit: &Unit, angular_to_linear_ratio: f64) -> f64 {
    if unit.is_angular() {
        unit.ratio_to_base() * angular_to_linear_ratio
    } else {
        unit.ratio_to_base()
    }
}

fn create_unit_rectification_scale(source: &Unit, target: &Unit, angular_to_linear_ratio: f64) -> f64 {
    linear_equivalent_ratio(source, angular_to_linear_ratio)
        / linear_equivalent_ratio(target, angular_to_linear_ratio)
}

/// Factor converting a value in `source` units into `target` units
pub fn unit_rectification_scale_factor(
    source: &Unit,
    target: &Unit,
    angular_to_linear_ratio: f64,
) -> f64 {
    create_unit_rectification_scale(source, target, angular_to_linear_ratio)
}

/// Uniform scaling model, identity when the scale is 1
pub fn unit_rectification_transfo_model(
    source: &Unit,
    target: &Unit,
    angular_to_linear_ratio: f64,
) -> TransfoModel {
    let scale = create_unit_rectification_scale(source, target, angular_to_linear_ratio);
    if eq_one_eps(scale) {
        TransfoModel::Identity
    } else {
        TransfoModel::scaling(scale, scale, scale)
    }
}

/// Uniform scaling matrix, identity when the scale is 1
pub fn unit_rectification_transfo_matrix(
    source: &Unit,
    target: &Unit,
    angular_to_linear_ratio: f64,
) -> TransfoMatrix {
    let scale = create_unit_rectification_scale(source, target, angular_to_linear_ratio);
    if eq_one_eps(scale) {
        TransfoMatrix::identity()
    } else {
        TransfoMatrix::scaling(scale, scale, scale)
    }
}

/// Horizontal scale on X and Y, vertical scale on Z
pub fn unit_rectification_transfo_matrix_hv(
    source_horizontal: &Unit,
    source_vertical: &Unit,
    target_horizontal: &Unit,
    target_vertical: &Unit,
    angular_to_linear_ratio: f64,
) -> TransfoMatrix {
    let horizontal =
        create_unit_rectification_scale(source_horizontal, target_horizontal, angular_to_linear_ratio);
    let vertical =
        create_unit_rectification_scale(source_vertical, target_vertical, angular_to_linear_ratio);

    if eq_one_eps(horizontal) && eq_one_eps(vertical) {
        TransfoMatrix::identity()
    } else {
        TransfoMatrix::scaling(horizontal, horizontal, vertical)
    }
}

/// Model form of [`unit_rectification_transfo_matrix_hv`]
pub fn unit_rectification_transfo_model_hv(
    source_horizontal: &Unit,
    source_vertical: &Unit,
    target_horizontal: &Unit,
    target_vertical: &Unit,
    angular_to_linear_ratio: f64,
) -> TransfoModel {
    let matrix = unit_rectification_transfo_matrix_hv(
        source_horizontal,
        source_vertical,
        target_horizontal,
        target_vertical,
        angular_to_linear_ratio,
    );
    if matrix.is_identity() {
        TransfoModel::Identity
    } else {
        TransfoModel::Affine(matrix)
    }
}

/// Rectification matrix between the unit pairs of two GCS
/// Returns `None` if either GCS is null
pub fn gcs_unit_rectification_matrix(
    source: &Gcs,
    target: &Gcs,
    angular_to_linear_ratio: f64,
) -> Option<TransfoMatrix> {
    Some(unit_rectification_transfo_matrix_hv(
        source.horizontal_unit()?,
        source.vertical_unit()?,
        target.horizontal_unit()?,
        target.vertical_unit()?,
        angular_to_linear_ratio,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::RADIANS_PER_DEGREE;
    use approx::assert_relative_eq;

    fn foot() -> Unit {
        Unit::create_linear_from("foot", 0.3048)
    }

    #[test]
    fn test_same_unit_is_identity() {
        for unit in [Unit::meter().clone(), Unit::degree().clone(), foot()] {
            for ratio in [1.0, 111_319.49, 0.5] {
                assert_eq!(unit_rectification_scale_factor(&unit, &unit, ratio), 1.0);
                assert!(unit_rectification_transfo_matrix(&unit, &unit, ratio).is_identity());
                assert!(unit_rectification_transfo_model(&unit, &unit, ratio).is_identity());
            }
        }
    }

    #[test]
    fn test_linear_scale() {
        let scale = unit_rectification_scale_factor(&foot(), Unit::meter(), 1.0);
        assert_relative_eq!(scale, 0.3048);

        let matrix = unit_rectification_transfo_matrix(Unit::meter(), &foot(), 1.0);
        assert_relative_eq!(matrix.get(0, 0), 1.0 / 0.3048);
        assert_relative_eq!(matrix.get(2, 2), 1.0 / 0.3048);
    }

    #[test]
    fn test_angular_to_linear_scale() {
        // one radian worth 6378137 meters
        let ratio = 6_378_137.0;
        let scale = unit_rectification_scale_factor(Unit::degree(), Unit::meter(), ratio);
        assert_relative_eq!(scale, RADIANS_PER_DEGREE * ratio);

        let back = unit_rectification_scale_factor(Unit::meter(), Unit::degree(), ratio);
        assert_relative_eq!(scale * back, 1.0);
    }

    #[test]
    fn test_horizontal_vertical_matrix() {
        let matrix = unit_rectification_transfo_matrix_hv(
            &foot(),
            Unit::meter(),
            Unit::meter(),
            Unit::meter(),
            1.0,
        );
        assert_relative_eq!(matrix.get(0, 0), 0.3048);
        assert_relative_eq!(matrix.get(1, 1), 0.3048);
        assert_relative_eq!(matrix.get(2, 2), 1.0);

        let identity = unit_rectification_transfo_model_hv(
            Unit::meter(),
            &foot(),
            Unit::meter(),
            &foot(),
            1.0,
        );
        assert_eq!(identity, TransfoModel::Identity);
    }
}
