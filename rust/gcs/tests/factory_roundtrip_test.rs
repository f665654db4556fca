// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end factory tests: WKT in, GCS out, WKT back.

use approx::assert_relative_eq;
use gcs_lite::{
    Error, Gcs, GcsFactory, LocalTransform, TransfoMatrix, TransfoModel, Unit, WktFlavor,
    RADIANS_PER_DEGREE,
};

const METER_LOCAL_CS: &str = r#"LOCAL_CS["", LOCAL_DATUM["AnywhereXYZ", 11000, AUTHORITY["BENTLEY_SYSTEMS","11000"]], UNIT["meter", 1], AXIS["X",OTHER], AXIS["Y",OTHER], AXIS["Z",OTHER], AUTHORITY["BENTLEY_SYSTEMS","0"]]"#;

const DEGREE_COMPD_CS: &str = r#"COMPD_CS["", LOCAL_CS["", LOCAL_DATUM["AnywhereLatLong", 11001, AUTHORITY["BENTLEY_SYSTEMS","11001"]], UNIT["degree", 0.0174532925199433], AXIS["Lat",OTHER], AXIS["Long",OTHER], AUTHORITY["BENTLEY_SYSTEMS","0"]], LOCAL_CS["", LOCAL_DATUM["AnywhereVertical", 11002, AUTHORITY["BENTLEY_SYSTEMS","11002"]], UNIT["meter", 1], AXIS["Up",UP], AUTHORITY["BENTLEY_SYSTEMS","0"]], AUTHORITY["BENTLEY_SYSTEMS","0"]]"#;

const UTM_32N: &str = r#"PROJCS["WGS 84 / UTM zone 32N", GEOGCS["WGS 84", DATUM["WGS_1984", SPHEROID["WGS 84",6378137,298.257223563]], PRIMEM["Greenwich",0], UNIT["degree",0.0174532925199433]], PROJECTION["Transverse_Mercator"], PARAMETER["central_meridian",9], PARAMETER["scale_factor",0.9996], PARAMETER["false_easting",500000], UNIT["metre",1], AUTHORITY["EPSG","32632"]]"#;

fn roundtrip(factory: &GcsFactory, gcs: &Gcs) -> Gcs {
    let wkt = gcs.wkt().unwrap();
    factory.try_create_from_wkt(&wkt, None, None).unwrap()
}

#[test]
fn test_linear_unit_scenario() {
    let meter = Unit::create_linear_from("meter", 1.0);
    assert_eq!(meter.ratio_to_base(), 1.0);
    assert!(meter.is_linear());
    assert!(!meter.is_angular());
}

#[test]
fn test_degree_based_unit_scenario() {
    let degree = Unit::create_from_degree_based("degree", 1.0);
    assert_relative_eq!(degree.ratio_to_base(), RADIANS_PER_DEGREE);
    assert_relative_eq!(degree.ratio_to_base(), 0.017453292519943295);
    assert!(degree.is_angular());
}

#[test]
fn test_meter_gcs_wkt() {
    let factory = GcsFactory::new();
    let gcs = factory.try_create_from_unit(Unit::meter().clone(), None).unwrap();
    assert_eq!(gcs.wkt().unwrap().as_str(), METER_LOCAL_CS);
}

#[test]
fn test_degree_gcs_wkt() {
    let factory = GcsFactory::new();
    let gcs = factory.try_create_from_unit(Unit::degree().clone(), None).unwrap();
    assert_eq!(gcs.wkt().unwrap().as_str(), DEGREE_COMPD_CS);
}

#[test]
fn test_based_gcs_with_scaling_wkt() {
    let factory = GcsFactory::new();
    let base = factory.try_create_from_wkt(UTM_32N, None, None).unwrap();
    let base_wkt = base.wkt().unwrap();

    let to_global = LocalTransform::from_to_global(
        TransfoModel::from_matrix(TransfoMatrix::from_rows([
            [2.0, 0.0, 0.0, 0.0],
            [0.0, 2.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
        ]))
        .unwrap(),
    );
    let fitted = factory
        .try_create_from_base(base.geo_ref().base().cloned(), Some(&to_global))
        .unwrap();

    let expected = format!(
        r#"FITTED_CS["", PARAM_MT["Affine", PARAMETER["elt_0_0", 2],PARAMETER["elt_1_1", 2]], {}, AUTHORITY["BENTLEY_SYSTEMS","0"]]"#,
        base_wkt
    );
    assert_eq!(fitted.wkt().unwrap().as_str(), expected);
}

#[test]
fn test_empty_wkt_is_null() {
    let gcs = GcsFactory::new().try_create_from_wkt("", None, None).unwrap();
    assert!(gcs.is_null());
}

#[test]
fn test_foreign_local_cs_goes_to_base_library() {
    let factory = GcsFactory::new();
    let foreign = r#"LOCAL_CS["Site grid", LOCAL_DATUM["Site",0], UNIT["foot",0.3048], AXIS["X",EAST], AXIS["Y",NORTH]]"#;

    let gcs = factory.try_create_from_wkt(foreign, None, None).unwrap();
    assert!(gcs.has_geo_ref());
    assert_eq!(gcs.unit().unwrap().name(), "foot");

    // Exported through the base, so it stays foreign
    let wkt = gcs.wkt().unwrap();
    assert!(wkt.starts_with(r#"LOCAL_CS["Site grid","#));
    assert!(roundtrip(&factory, &gcs).is_equivalent(&gcs));
}

#[test]
fn test_local_roundtrips() {
    let factory = GcsFactory::new();
    let units = [
        Unit::meter().clone(),
        Unit::create_linear_from("us survey foot", 1200.0 / 3937.0),
        Unit::create_linear_from("millimeter", 0.001),
        Unit::degree().clone(),
        Unit::create_angular_from("grad", std::f64::consts::PI / 200.0),
    ];

    for unit in units {
        let gcs = factory.try_create_from_unit(unit.clone(), None).unwrap();
        let back = roundtrip(&factory, &gcs);
        assert!(back.is_equivalent(&gcs), "unit {}", unit.name());
        assert!(back.unit().unwrap().is_equivalent(&unit));
    }
}

#[test]
fn test_fitted_roundtrips() {
    let factory = GcsFactory::new();
    let rotation = TransfoMatrix::from_rows([
        [0.8, -0.6, 0.0, 1250.5],
        [0.6, 0.8, 0.0, -340.25],
        [0.0, 0.0, 1.0, 12.0],
    ]);
    let model = TransfoModel::from_matrix(rotation).unwrap();

    let bases = [
        factory.try_create_from_unit(Unit::meter().clone(), None).unwrap(),
        factory.try_create_from_unit(Unit::degree().clone(), None).unwrap(),
        factory.try_create_from_wkt(UTM_32N, None, None).unwrap(),
    ];

    for base in &bases {
        for local_transform in [
            LocalTransform::from_to_global(model.clone()),
            LocalTransform::from_models(None, Some(model.clone())),
        ] {
            let fitted = factory.try_create_appended(base, &local_transform).unwrap();
            assert!(fitted.has_local_transform());

            let back = roundtrip(&factory, &fitted);
            assert!(back.is_equivalent(&fitted));
            assert!(fitted.is_equivalent(&back));
            assert!(!back.is_equivalent(base));
        }
    }
}

#[test]
fn test_fitted_direction_is_preserved() {
    let factory = GcsFactory::new();
    let to_local = LocalTransform::from_models(None, Some(TransfoModel::scaling(4.0, 4.0, 1.0)));
    let gcs = factory
        .try_create_from_unit(Unit::meter().clone(), Some(&to_local))
        .unwrap();

    let wkt = gcs.wkt().unwrap();
    assert!(wkt.contains("INVERSE_MT[PARAM_MT["));

    let back = factory.try_create_from_wkt(&wkt, None, None).unwrap();
    let matrix = back
        .local_transform()
        .to_local()
        .and_then(|m| m.convert_to_matrix())
        .unwrap();
    assert_eq!(matrix.get(0, 0), 4.0);
    // The inverse is derived on import
    assert!(back.local_transform().has_to_global());
}

#[test]
fn test_identity_to_global_does_not_hide_to_local() {
    let factory = GcsFactory::new();
    let local_transform = LocalTransform::from_models(
        Some(TransfoModel::Identity),
        Some(TransfoModel::scaling(0.5, 0.5, 1.0)),
    );
    let gcs = factory
        .try_create_from_unit(Unit::meter().clone(), Some(&local_transform))
        .unwrap();

    let back = roundtrip(&factory, &gcs);
    assert!(back.has_local_transform());
    let matrix = back
        .local_transform()
        .to_local()
        .and_then(|m| m.convert_to_matrix())
        .unwrap();
    assert_eq!(matrix.get(0, 0), 0.5);
}

#[test]
fn test_nested_fitted_collapses() {
    let factory = GcsFactory::new();
    let inner = factory
        .try_create_from_unit(
            Unit::meter().clone(),
            Some(&LocalTransform::from_to_global(TransfoModel::scaling(2.0, 2.0, 2.0))),
        )
        .unwrap();
    let nested = format!(
        r#"FITTED_CS["", PARAM_MT["Affine", PARAMETER["elt_0_3", 5]], {}, AUTHORITY["BENTLEY_SYSTEMS","0"]]"#,
        inner.wkt().unwrap()
    );

    let gcs = factory.try_create_from_wkt(&nested, None, None).unwrap();
    let matrix = gcs
        .local_transform()
        .to_global()
        .and_then(|m| m.convert_to_matrix())
        .unwrap();
    // outer translation applied first, then the inner scale
    assert_eq!(matrix.get(0, 0), 2.0);
    assert_eq!(matrix.get(0, 3), 10.0);
}

#[test]
fn test_recursion_limit_from_text() {
    let factory = GcsFactory::new();
    let limit = factory.options().max_recursion_depth;

    let mut text = factory
        .try_create_from_unit(Unit::meter().clone(), None)
        .unwrap()
        .wkt()
        .unwrap()
        .into_string();
    for level in 0..=limit {
        text = format!(
            r#"FITTED_CS["", PARAM_MT["Affine", PARAMETER["elt_0_3", 1]], {}, AUTHORITY["BENTLEY_SYSTEMS","0"]]"#,
            text
        );
        let result = factory.try_create_from_wkt(&text, None, None);
        if level < limit {
            assert!(result.is_ok(), "level {}", level);
        } else {
            assert_eq!(result.unwrap_err(), Error::RecursionLimit(limit));
        }
    }
}

#[test]
fn test_explicit_flavor_prefix() {
    let factory = GcsFactory::new();
    let plain = factory.try_create_from_wkt(UTM_32N, None, None).unwrap();
    let prefixed = factory
        .try_create_from_wkt(&format!("OGC::{}", UTM_32N), Some(WktFlavor::Ogc), None)
        .unwrap();
    assert!(plain.is_equivalent(&prefixed));
    assert_eq!(plain.unit(), Some(Unit::meter()));
}

#[test]
fn test_third_party_compound() {
    let factory = GcsFactory::new();
    let compound = format!(
        r#"COMPD_CS["UTM + height", {}, VERT_CS["EGM96", VERT_DATUM["EGM96 geoid",2005], UNIT["metre",1]]]"#,
        UTM_32N
    );
    let gcs = factory.try_create_from_wkt(&compound, None, None).unwrap();
    assert!(gcs.has_geo_ref());
    assert!(gcs.wkt().unwrap().starts_with(r#"COMPD_CS["UTM + height",PROJCS["#));
}

#[test]
fn test_appended_failure_leaves_input() {
    let factory = GcsFactory::new();
    let only_global = LocalTransform::from_models(Some(TransfoModel::scaling(2.0, 2.0, 2.0)), None);
    let only_local = LocalTransform::from_models(None, Some(TransfoModel::scaling(3.0, 3.0, 3.0)));

    let gcs = factory
        .try_create_from_unit(Unit::meter().clone(), Some(&only_global))
        .unwrap();
    assert!(matches!(
        factory.try_create_appended(&gcs, &only_local),
        Err(Error::Transform(_))
    ));
    assert!(gcs.local_transform().is_equivalent(&only_global));
}

#[test]
fn test_unlisted_base_units_keep_their_size() {
    let factory = GcsFactory::new();
    let cassini = r#"PROJCS["Trinidad 1903 / Trinidad Grid", GEOGCS["Trinidad 1903", DATUM["Trinidad_1903", SPHEROID["Clarke 1858",6378293.645208759,294.2606763692654]], PRIMEM["Greenwich",0], UNIT["degree",0.0174532925199433]], PROJECTION["Cassini_Soldner"], UNIT["Clarke's foot",0.3047972654]]"#;
    let gcs = factory.try_create_from_wkt(cassini, None, None).unwrap();
    let unit = gcs.unit().unwrap();
    assert!(unit.is_linear());
    assert_eq!(unit.ratio_to_base(), 0.3047972654);
    assert!(gcs.vertical_unit().unwrap().is_equivalent(unit));

    let geographic = r#"GEOGCS["NTF (Paris)", DATUM["Nouvelle_Triangulation_Francaise"], PRIMEM["Paris",2.33722917], UNIT["degree (supplier to define representation)",0.0174532925199433]]"#;
    let gcs = factory.try_create_from_wkt(geographic, None, None).unwrap();
    assert!(gcs.unit().unwrap().is_angular());
    assert!(!gcs.has_uniform_units());
    assert_eq!(gcs.vertical_unit(), Some(Unit::meter()));
}
