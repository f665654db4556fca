// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! WKT support probe, injected base libraries and the error policy.

use std::any::Any;
use std::sync::Arc;

use gcs_lite::{
    gcs_unit_rectification_matrix, wkt_support_for, BaseGcs, BaseGcsLibrary, CreationStage,
    Error, FactoryOptions, GcsFactory, LocalTransform, Result, TransfoModel, Unit, WktFlavor,
    WktSupport,
};
use gcs_lite_geometry::Matrix4;

/// Base library that only knows `MOCK["<unit>"]`
#[derive(Debug)]
struct MockLibrary;

#[derive(Debug)]
struct MockBase {
    units: String,
}

impl BaseGcs for MockBase {
    fn is_valid(&self) -> bool {
        self.units != "invalid"
    }

    fn is_equivalent(&self, other: &dyn BaseGcs) -> bool {
        other
            .as_any()
            .downcast_ref::<MockBase>()
            .map_or(false, |other| other.units == self.units)
    }

    fn units(&self) -> &str {
        &self.units
    }

    fn well_known_text(&self, _flavor: WktFlavor, _single_flavor_only: bool) -> Result<String> {
        Ok(format!(r#"MOCK["{}"]"#, self.units))
    }

    fn compound_well_known_text(&self, flavor: WktFlavor, single_flavor_only: bool) -> Result<String> {
        self.well_known_text(flavor, single_flavor_only)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl BaseGcsLibrary for MockLibrary {
    fn init_from_well_known_text(&self, _flavor: WktFlavor, text: &str) -> Result<Arc<dyn BaseGcs>> {
        let units = text
            .strip_prefix(r#"MOCK[""#)
            .and_then(|rest| rest.strip_suffix(r#""]"#))
            .ok_or_else(|| Error::BaseGcs(format!("not a mock definition: {}", text)))?;
        Ok(Arc::new(MockBase {
            units: units.to_string(),
        }))
    }
}

fn mock_factory() -> GcsFactory {
    GcsFactory::with_library(FactoryOptions::default(), Arc::new(MockLibrary))
}

#[test]
fn test_support_full_for_local_systems() {
    let factory = GcsFactory::new();
    for unit in [Unit::meter().clone(), Unit::degree().clone()] {
        let gcs = factory.try_create_from_unit(unit, None).unwrap();
        assert_eq!(wkt_support_for(&gcs, None), WktSupport::Full);
        assert_eq!(wkt_support_for(&gcs, Some(WktFlavor::Esri)), WktSupport::Full);
    }
}

#[test]
fn test_support_none_without_matrix() {
    let mut h = Matrix4::identity();
    h[(3, 1)] = 0.25;
    let projective = TransfoModel::from_projective(h).unwrap();
    let local_transform = LocalTransform::from_models(Some(projective), None);

    let gcs = GcsFactory::new()
        .try_create_from_unit(Unit::meter().clone(), Some(&local_transform))
        .unwrap();
    assert_eq!(wkt_support_for(&gcs, None), WktSupport::None);
}

#[test]
fn test_support_only_to_when_reimport_fails() {
    let factory = mock_factory();
    let gcs = factory.try_create_from_wkt(r#"MOCK["foot"]"#, None, None).unwrap();
    assert!(gcs.has_geo_ref());
    assert_eq!(gcs.unit().unwrap().name(), "foot");

    // The default factory cannot read MOCK text back
    assert_eq!(wkt_support_for(&gcs, None), WktSupport::OnlyTo);
    assert_eq!(factory.wkt_support_for(&gcs, None), WktSupport::Full);
}

#[test]
fn test_injected_library_inside_fitted() {
    let factory = mock_factory();
    let gcs = factory
        .try_create_from_wkt(r#"MOCK["metre"]"#, None, None)
        .unwrap();
    let scaled = factory
        .try_create_appended(&gcs, &LocalTransform::from_to_global(TransfoModel::scaling(2.0, 2.0, 1.0)))
        .unwrap();

    let wkt = scaled.wkt().unwrap();
    assert!(wkt.contains(r#", MOCK["metre"], AUTHORITY["BENTLEY_SYSTEMS","0"]]"#));

    let back = factory.try_create_from_wkt(&wkt, None, None).unwrap();
    assert!(back.is_equivalent(&scaled));
}

#[test]
fn test_invalid_base() {
    let factory = mock_factory();
    assert_eq!(
        factory
            .try_create_from_wkt(r#"MOCK["invalid"]"#, None, None)
            .unwrap_err(),
        Error::InvalidBaseGcs
    );

    let base = MockLibrary
        .init_from_well_known_text(WktFlavor::DEFAULT, r#"MOCK["invalid"]"#)
        .unwrap();
    let error = factory.create_from_base(Some(base), None).unwrap_err();
    assert_eq!(error.stage, CreationStage::BaseGcs);
    assert_eq!(error.input, r#"MOCK["invalid"]"#);
    assert_eq!(error.source, Error::InvalidBaseGcs);
}

#[test]
fn test_error_policy() {
    let strict = GcsFactory::new();
    let error = strict
        .create_from_wkt(
            r#"FITTED_CS["", PARAM_MT["Projective"], NULL[], AUTHORITY["BENTLEY_SYSTEMS","0"]]"#,
            None,
            None,
        )
        .unwrap_err();
    assert!(error.to_string().starts_with("Error creating gcs!"));
    assert!(matches!(error.source, Error::Structure(_)));

    let lenient = GcsFactory::with_options(FactoryOptions {
        throw_on_unhandled_errors: false,
        ..FactoryOptions::default()
    });
    let gcs = lenient
        .create_from_wkt(r#"GEOGCS["no unit"]"#, None, None)
        .unwrap();
    assert!(gcs.is_null());
}

#[test]
fn test_gcs_rectification_matrix() {
    let factory = GcsFactory::new();
    let feet = factory
        .try_create_from_unit(Unit::create_linear_from("foot", 0.3048), None)
        .unwrap();
    let meters = factory.try_create_from_unit(Unit::meter().clone(), None).unwrap();

    let matrix = gcs_unit_rectification_matrix(&feet, &meters, 1.0).unwrap();
    assert_eq!(matrix.get(0, 0), 0.3048);
    assert_eq!(matrix.get(2, 2), 0.3048);

    let null = factory.try_create_from_wkt("", None, None).unwrap();
    assert!(gcs_unit_rectification_matrix(&feet, &null, 1.0).is_none());
}
