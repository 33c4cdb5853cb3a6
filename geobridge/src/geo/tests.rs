use assert_matches::assert_matches;
use geo_types::{coord, line_string, point, polygon, Rect};
use geobridge_types::crs::Unit;
use geobridge_types::geometry::{
    GeometryCollection, LineString, LinearRing, MultiLineString, MultiPoint, MultiPolygon, Point,
    Polygon, Spatial,
};
use geobridge_types::position::{C2D, C2DM, C3D, C3DM, G2D, G2DM, G3D, G3DM};
use geobridge_types::{CoordinateReferenceSystem, CrsRegistry, GeometryType, Position};

use super::*;
use crate::error::ConversionError;

fn square<P: Position>(offset: f64, size: f64, crs: &CoordinateReferenceSystem) -> LinearRing<P> {
    let corners = [
        (offset, offset),
        (offset + size, offset),
        (offset + size, offset + size),
        (offset, offset + size),
        (offset, offset),
    ];
    let positions = corners
        .iter()
        .enumerate()
        .map(|(i, (x, y))| {
            let i = (i % 4) as f64;
            P::from_components(*x, *y, Some(i), Some(100.0 + i)).expect("position")
        })
        .collect();
    LinearRing::new(positions, crs.clone()).expect("ring")
}

fn round_trip<P: Position>(geometry: &Geometry<P>) -> Geometry<P> {
    let external = to_geo(geometry);
    from_geo(&external, geometry.crs()).expect("from geo")
}

#[test]
fn point_round_trip() {
    let crs = CoordinateReferenceSystem::undefined_for::<C2D>();
    let point: Geometry<_> = Point::new(C2D::new(1.5, -2.0), crs).expect("point").into();

    let external = to_geo(&point);
    assert_eq!(external.geometry(), &geo_types::Geometry::Point(point!(x: 1.5, y: -2.0)));
    assert_eq!(external.srid(), NO_SRID);
    assert_eq!(external.z(), None);
    assert_eq!(round_trip(&point), point);
}

#[test]
fn srid_is_preserved() {
    let point: Geometry<_> = Point::new(G2D::new(4.35, 50.85), CoordinateReferenceSystem::wgs84())
        .expect("point")
        .into();

    let external = to_geo(&point);
    assert_eq!(external.srid(), 4326);

    let restored: Geometry<G2D> =
        from_geo_with_registry(&external, CrsRegistry::global()).expect("from geo");
    assert_eq!(restored, point);
    assert_eq!(restored.srid(), Some(4326));
}

#[test]
fn measure_is_carried() {
    let crs = CoordinateReferenceSystem::undefined_for::<C2DM>();
    let line: Geometry<_> = LineString::new(
        vec![C2DM::new(0.0, 0.0, 5.0), C2DM::new(3.0, 4.0, 10.0)].into(),
        crs,
    )
    .expect("line")
    .into();

    let external = to_geo(&line);
    assert_eq!(external.z(), None);
    assert_eq!(external.m(), Some(&[5.0, 10.0][..]));
    assert_eq!(
        external.coords()[1],
        DimensionalCoord {
            x: 3.0,
            y: 4.0,
            z: None,
            m: Some(10.0)
        }
    );
    assert_eq!(round_trip(&line), line);
}

#[test]
fn polygon_with_holes_round_trip() {
    let crs = CoordinateReferenceSystem::wgs84()
        .add_vertical(Unit::Meter)
        .and_then(|c| c.add_linear(Unit::Meter))
        .expect("crs");
    let polygon: Geometry<G3DM> = Polygon::new(
        vec![square(0.0, 10.0, &crs), square(2.0, 2.0, &crs), square(5.0, 2.0, &crs)],
        crs,
    )
    .expect("polygon")
    .into();

    let external = to_geo(&polygon);
    assert_eq!(external.z().map(|z| z.len()), Some(15));
    assert_eq!(round_trip(&polygon), polygon);
}

#[test]
fn linear_ring_keeps_its_type() {
    let crs = CoordinateReferenceSystem::undefined_for::<C3D>();
    let ring: Geometry<C3D> = square(0.0, 1.0, &crs).into();

    let external = to_geo(&ring);
    assert!(external.is_linear_ring());
    assert_matches!(external.geometry(), geo_types::Geometry::LineString(_));
    assert_eq!(round_trip(&ring), ring);
}

#[test]
fn multi_geometries_round_trip() {
    let crs = CoordinateReferenceSystem::undefined_for::<C3DM>();
    let points: Geometry<C3DM> = MultiPoint::new(
        vec![
            Point::new(C3DM::new(0.0, 1.0, 2.0, 3.0), crs.clone()).expect("point"),
            Point::new(C3DM::new(4.0, 5.0, 6.0, 7.0), crs.clone()).expect("point"),
        ],
        crs.clone(),
    )
    .expect("multipoint")
    .into();
    assert_eq!(round_trip(&points), points);

    let lines: Geometry<C3DM> = MultiLineString::new(
        vec![
            LineString::new(square(0.0, 1.0, &crs).sequence().clone(), crs.clone()).expect("line"),
            LineString::empty(crs.clone()).expect("line"),
        ],
        crs.clone(),
    )
    .expect("multiline")
    .into();
    assert_eq!(round_trip(&lines), lines);

    let polygons: Geometry<C3DM> = MultiPolygon::new(
        vec![
            Polygon::new(vec![square(0.0, 1.0, &crs)], crs.clone()).expect("polygon"),
            Polygon::new(vec![square(5.0, 1.0, &crs)], crs.clone()).expect("polygon"),
        ],
        crs,
    )
    .expect("multipolygon")
    .into();
    assert_eq!(round_trip(&polygons), polygons);
}

#[test]
fn collection_shape() {
    let crs = CoordinateReferenceSystem::undefined_for::<C2D>();
    let nested = GeometryCollection::new(
        vec![Point::new(C2D::new(0.0, 0.0), crs.clone()).expect("point").into()],
        crs.clone(),
    )
    .expect("nested");
    let collection: Geometry<C2D> = GeometryCollection::new(
        vec![
            Point::new(C2D::new(1.0, 1.0), crs.clone()).expect("point").into(),
            square(0.0, 1.0, &crs).into(),
            nested.into(),
        ],
        crs.clone(),
    )
    .expect("collection")
    .into();

    let external = to_geo(&collection);
    assert!(same_collection_shape(&collection, &external));

    let restored = from_geo::<C2D>(&external, &crs).expect("from geo");
    assert_eq!(restored.geometry_type(), GeometryType::GeometryCollection);
    assert_eq!(restored.num_geometries(), 3);
    assert_eq!(
        restored.geometry_n(1).map(|g| g.geometry_type()),
        Some(GeometryType::LineString)
    );

    let other = GeoGeometry::new(geo_types::Geometry::GeometryCollection(
        geo_types::GeometryCollection::<f64>(vec![]),
    ));
    assert!(!same_collection_shape(&collection, &other));
}

fn assert_empty_round_trip<P: Position>() {
    let crs = CoordinateReferenceSystem::undefined_for::<P>();
    let types = [
        GeometryType::Point,
        GeometryType::LineString,
        GeometryType::LinearRing,
        GeometryType::Polygon,
        GeometryType::MultiPoint,
        GeometryType::MultiLineString,
        GeometryType::MultiPolygon,
        GeometryType::GeometryCollection,
    ];

    for geometry_type in types {
        let empty = Geometry::<P>::empty(geometry_type, crs.clone()).expect("empty");
        let external = to_geo(&empty);
        assert!(external.is_empty(), "{geometry_type} is not empty");

        let restored = from_geo::<P>(&external, &crs).expect("from geo");
        assert_eq!(restored, empty);
        assert!(restored.is_empty());
    }
}

#[test]
fn empty_round_trip() {
    assert_empty_round_trip::<C2D>();
    assert_empty_round_trip::<C2DM>();
    assert_empty_round_trip::<C3D>();
    assert_empty_round_trip::<C3DM>();
    assert_empty_round_trip::<G2D>();
    assert_empty_round_trip::<G2DM>();
    assert_empty_round_trip::<G3D>();
    assert_empty_round_trip::<G3DM>();
}

#[test]
fn empty_point_is_nan() {
    let crs = CoordinateReferenceSystem::wgs84();
    let empty: Geometry<G2D> = Point::empty(crs).expect("empty").into();
    let external = to_geo(&empty);
    assert_matches!(external.geometry(), geo_types::Geometry::Point(p) if p.x().is_nan() && p.y().is_nan());
    assert_eq!(external.srid(), 4326);
}

#[test]
fn srid_mismatch_is_rejected() {
    let external = GeoGeometry::new(point!(x: 1.0, y: 2.0)).with_srid(3857);
    assert_matches!(
        from_geo::<G2D>(&external, &CoordinateReferenceSystem::wgs84()),
        Err(ConversionError::InvalidArgument(_))
    );
}

#[test]
fn side_channel_must_match_position_type() {
    let crs = CoordinateReferenceSystem::undefined_for::<C3D>();
    let line = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)];

    let missing_z = GeoGeometry::new(line.clone());
    assert_matches!(from_geo::<C3D>(&missing_z, &crs), Err(ConversionError::InvalidArgument(_)));

    let short_z = GeoGeometry::new(line.clone()).with_z(vec![1.0]);
    assert_matches!(from_geo::<C3D>(&short_z, &crs), Err(ConversionError::InvalidArgument(_)));

    let unexpected_m = GeoGeometry::new(line.clone()).with_z(vec![1.0, 2.0]).with_m(vec![0.0, 0.0]);
    assert_matches!(from_geo::<C3D>(&unexpected_m, &crs), Err(ConversionError::InvalidArgument(_)));

    let valid = GeoGeometry::new(line).with_z(vec![1.0, 2.0]);
    assert!(from_geo::<C3D>(&valid, &crs).is_ok());
}

#[test]
fn malformed_input_is_rejected() {
    let crs = CoordinateReferenceSystem::undefined_for::<C2D>();

    let half_nan = GeoGeometry::new(point!(x: f64::NAN, y: 1.0));
    assert_matches!(from_geo::<C2D>(&half_nan, &crs), Err(ConversionError::InvalidArgument(_)));

    let ring_flag_on_point = GeoGeometry::new(point!(x: 0.0, y: 1.0)).with_linear_ring(true);
    assert_matches!(
        from_geo::<C2D>(&ring_flag_on_point, &crs),
        Err(ConversionError::InvalidArgument(_))
    );

    let single_coord = GeoGeometry::new(line_string![(x: 0.0, y: 0.0)]);
    assert_matches!(from_geo::<C2D>(&single_coord, &crs), Err(ConversionError::Geometry(_)));
}

#[test]
fn foreign_variants_are_accepted() {
    let crs = CoordinateReferenceSystem::undefined_for::<C2D>();

    let line = GeoGeometry::new(geo_types::Line::new(coord!(x: 0.0, y: 0.0), coord!(x: 1.0, y: 2.0)));
    let converted = from_geo::<C2D>(&line, &crs).expect("line");
    assert_eq!(converted.geometry_type(), GeometryType::LineString);
    assert_eq!(converted.num_positions(), 2);

    let rect = GeoGeometry::new(Rect::new(coord!(x: 0.0, y: 0.0), coord!(x: 2.0, y: 1.0)));
    let converted = from_geo::<C2D>(&rect, &crs).expect("rect");
    assert_eq!(converted.geometry_type(), GeometryType::Polygon);
    let envelope = converted.envelope().expect("envelope");
    assert_eq!(envelope.lower(), C2D::new(0.0, 0.0));
    assert_eq!(envelope.upper(), C2D::new(2.0, 1.0));
}

#[test]
fn geo_polygon_converts() {
    let external = GeoGeometry::new(polygon![
        (x: 0.0, y: 0.0),
        (x: 4.0, y: 0.0),
        (x: 4.0, y: 4.0),
        (x: 0.0, y: 0.0)
    ])
    .with_srid(31370);

    let converted: Geometry<C2D> =
        from_geo_with_registry(&external, CrsRegistry::global()).expect("polygon");
    assert_eq!(converted.crs(), &CoordinateReferenceSystem::belgian_lambert_72());
    assert_eq!(converted.num_positions(), 4);
    assert_eq!(GeoGeometry::from(&converted), external);
}
