/*
This code is part of the MorphoTools drainage-basin analysis library.
License: MIT
*/

//! Geometry and raster normalization. Everything downstream assumes the
//! layers that come out of here: healed single-part geometries, one shared
//! projected CRS, and fully in-memory grids with a consistent nodata marker.

use crate::context::{Basin, BasinRing, StreamSegment};
use morpho_common::structures::Point2D;
use morpho_common::utils::{deg_to_utm, deg_to_utm_zone, utm_to_deg};
use morpho_raster::{Raster, RasterConfigs};
use morpho_vector::{FieldData, ShapeType, Shapefile};
use std::collections::HashSet;
use std::io::{Error, ErrorKind};

/// Before/after bookkeeping for one healing pass, reported in the run log
/// and the machine-readable manifest.
#[derive(Debug, Default, Clone, Copy)]
pub struct HealReport {
    pub features_in: usize,
    pub parts_in: usize,
    pub parts_dropped: usize,
    pub rings_closed: usize,
    pub features_out: usize,
}

/// The single projected CRS every layer is brought into when the DEM
/// arrives in geographic coordinates.
#[derive(Debug, Clone, Copy)]
pub struct WorkingCrs {
    pub zone: isize,
    pub band: char,
    pub epsg_code: u16,
}

const MIN_RING_VERTICES: usize = 4;

/// Finds an attribute field suitable as a basin identifier: a text field
/// whose values are non-empty and unique across all records.
fn find_id_field(shp: &Shapefile) -> Option<String> {
    for field in &shp.attributes.fields {
        if field.field_type != 'C' {
            continue;
        }
        let mut seen = HashSet::new();
        let mut usable = true;
        for rec in 0..shp.num_records {
            match shp.attributes.get_value(rec, &field.name) {
                FieldData::Text(s) if !s.trim().is_empty() => {
                    if !seen.insert(s.trim().to_string()) {
                        usable = false;
                        break;
                    }
                }
                _ => {
                    usable = false;
                    break;
                }
            }
        }
        if usable && shp.num_records > 0 {
            return Some(field.name.clone());
        }
    }
    None
}

/// Loads the subbasin polygon layer: closes unclosed rings, drops degenerate
/// parts, explodes multipart records into one basin per outer ring, and
/// assigns each hole to the outer ring that contains it.
pub fn load_basins(shp: &Shapefile, verbose: bool) -> Result<(Vec<Basin>, HealReport), Error> {
    if shp.header.shape_type.base_shape_type() != ShapeType::Polygon {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            format!(
                "The subbasin layer must be of a POLYGON base shape type ({}).",
                shp.file_name
            ),
        ));
    }

    let id_field = find_id_field(shp);
    if verbose {
        match &id_field {
            Some(f) => println!("Basin identifiers taken from attribute '{}'.", f),
            None => println!("No usable name attribute found; synthesizing basin identifiers."),
        }
    }

    let mut report = HealReport {
        features_in: shp.num_records,
        ..Default::default()
    };
    let mut basins: Vec<Basin> = vec![];

    for rec_num in 0..shp.num_records {
        let record = shp.get_record(rec_num);
        if record.shape_type == ShapeType::Null {
            report.parts_dropped += 1;
            continue;
        }

        let base_id = match &id_field {
            Some(f) => match shp.attributes.get_value(rec_num, f) {
                FieldData::Text(s) => s.trim().to_string(),
                _ => format!("SB{}", rec_num + 1),
            },
            None => format!("SB{}", rec_num + 1),
        };

        // heal each ring, separating outer boundaries from holes
        let mut outers: Vec<Vec<Point2D>> = vec![];
        let mut holes: Vec<Vec<Point2D>> = vec![];
        for part in 0..record.num_parts as usize {
            report.parts_in += 1;
            let mut ring = record.get_part_points(part).to_vec();
            if !ring.is_empty() && ring[0] != ring[ring.len() - 1] {
                let first = ring[0];
                ring.push(first);
                report.rings_closed += 1;
            }
            if ring.len() < MIN_RING_VERTICES {
                println!(
                    "Warning: basin '{}' part {} is degenerate and was dropped.",
                    base_id, part
                );
                report.parts_dropped += 1;
                continue;
            }
            if record.is_hole(part as i32) {
                holes.push(ring);
            } else {
                outers.push(ring);
            }
        }

        if outers.is_empty() && !holes.is_empty() {
            // The winding convention is unreliable in this record; treat
            // every surviving ring as an outer boundary.
            println!(
                "Warning: basin '{}' has no clockwise outer ring; ring winding ignored.",
                base_id
            );
            outers = holes;
            holes = vec![];
        }

        let num_outers = outers.len();
        for (k, outer) in outers.into_iter().enumerate() {
            let basin_id = if num_outers > 1 {
                format!("{}-p{}", base_id, k + 1)
            } else {
                base_id.clone()
            };
            let mut rings = vec![BasinRing {
                points: outer,
                is_hole: false,
            }];
            for hole in &holes {
                if morpho_common::algorithms::point_in_poly(&hole[0], &rings[0].points) {
                    rings.push(BasinRing {
                        points: hole.clone(),
                        is_hole: true,
                    });
                }
            }
            let basin = Basin::from_rings(&basin_id, rings);
            if basin.area_m2 <= 0f64 {
                println!(
                    "Warning: basin '{}' has zero area after healing and was dropped.",
                    basin_id
                );
                report.parts_dropped += 1;
                continue;
            }
            basins.push(basin);
        }
    }

    report.features_out = basins.len();
    if verbose {
        println!(
            "Subbasins: {} record(s) in, {} basin(s) out ({} part(s) dropped, {} ring(s) closed).",
            report.features_in, report.features_out, report.parts_dropped, report.rings_closed
        );
    }
    Ok((basins, report))
}

/// Loads the stream-network polyline layer, reading the Strahler order from
/// the named integer attribute and exploding multipart records.
pub fn load_streams(
    shp: &Shapefile,
    order_field: &str,
    verbose: bool,
) -> Result<(Vec<StreamSegment>, HealReport), Error> {
    if shp.header.shape_type.base_shape_type() != ShapeType::PolyLine {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            format!(
                "The stream layer must be of a POLYLINE base shape type ({}).",
                shp.file_name
            ),
        ));
    }
    if shp.attributes.get_field_num(order_field).is_none() {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            format!(
                "The stream layer does not contain an attribute named '{}'.",
                order_field
            ),
        ));
    }

    let mut report = HealReport {
        features_in: shp.num_records,
        ..Default::default()
    };
    let mut streams: Vec<StreamSegment> = vec![];

    for rec_num in 0..shp.num_records {
        let record = shp.get_record(rec_num);
        if record.shape_type == ShapeType::Null {
            report.parts_dropped += 1;
            continue;
        }
        let order = match shp.attributes.get_value(rec_num, order_field).as_f64() {
            Some(v) => v.round() as i32,
            None => {
                println!(
                    "Warning: stream record {} has no usable '{}' value and was dropped.",
                    rec_num + 1,
                    order_field
                );
                report.parts_dropped += record.num_parts.max(1) as usize;
                continue;
            }
        };
        if order < 1 {
            println!(
                "Warning: stream record {} has non-positive order {} and was dropped.",
                rec_num + 1,
                order
            );
            report.parts_dropped += record.num_parts.max(1) as usize;
            continue;
        }
        for part in 0..record.num_parts as usize {
            report.parts_in += 1;
            let points = record.get_part_points(part).to_vec();
            if points.len() < 2 {
                report.parts_dropped += 1;
                continue;
            }
            streams.push(StreamSegment::new(points, order));
        }
    }

    report.features_out = streams.len();
    if verbose {
        println!(
            "Streams: {} record(s) in, {} segment(s) out ({} part(s) dropped).",
            report.features_in, report.features_out, report.parts_dropped
        );
    }
    Ok((streams, report))
}

/// Derives the working UTM CRS from the DEM extent centroid when the DEM is
/// in geographic coordinates; returns None when the DEM is already
/// projected.
pub fn derive_working_crs(dem: &Raster) -> Option<WorkingCrs> {
    if !dem.is_in_geographic_coordinates() {
        return None;
    }
    let lon = (dem.configs.west + dem.configs.east) / 2.0;
    let lat = (dem.configs.south + dem.configs.north) / 2.0;
    let (_, _, zone, band) = deg_to_utm(lat, lon);
    let epsg_code = if band < 'N' {
        32700 + zone as u16
    } else {
        32600 + zone as u16
    };
    Some(WorkingCrs {
        zone: zone,
        band: band,
        epsg_code: epsg_code,
    })
}

fn project_point(p: &Point2D, crs: &WorkingCrs) -> Point2D {
    // vector coordinates carry longitude in x and latitude in y
    let (easting, northing) = deg_to_utm_zone(p.y, p.x, crs.zone, crs.band);
    Point2D::new(easting, northing)
}

/// Reprojects the basin layer in place, rebuilding each basin so that the
/// cached area, perimeter, and bounding box match the projected geometry.
pub fn reproject_basins(basins: &mut Vec<Basin>, crs: &WorkingCrs) {
    for basin in basins.iter_mut() {
        let rings = basin
            .rings
            .iter()
            .map(|r| BasinRing {
                points: r.points.iter().map(|p| project_point(p, crs)).collect(),
                is_hole: r.is_hole,
            })
            .collect();
        *basin = Basin::from_rings(&basin.basin_id, rings);
    }
}

pub fn reproject_streams(streams: &mut Vec<StreamSegment>, crs: &WorkingCrs) {
    for seg in streams.iter_mut() {
        let points = seg.points.iter().map(|p| project_point(p, crs)).collect();
        let order = seg.order;
        let basin_id = seg.basin_id.clone();
        *seg = StreamSegment::new(points, order);
        seg.basin_id = basin_id;
    }
}

/// Reprojects a geographic raster into the working UTM CRS by inverse
/// mapping with bilinear resampling. The output keeps the input's grid
/// dimensions; its extent is the projected input extent.
pub fn reproject_raster(input: &Raster, crs: &WorkingCrs) -> Raster {
    let rows = input.configs.rows;
    let columns = input.configs.columns;
    let nodata = input.configs.nodata;

    // projected extent from the four corners of the geographic extent
    let corners = [
        (input.configs.south, input.configs.west),
        (input.configs.south, input.configs.east),
        (input.configs.north, input.configs.west),
        (input.configs.north, input.configs.east),
    ];
    let mut west = f64::INFINITY;
    let mut east = f64::NEG_INFINITY;
    let mut south = f64::INFINITY;
    let mut north = f64::NEG_INFINITY;
    for (lat, lon) in corners {
        let (x, y) = deg_to_utm_zone(lat, lon, crs.zone, crs.band);
        west = west.min(x);
        east = east.max(x);
        south = south.min(y);
        north = north.max(y);
    }

    let configs = RasterConfigs {
        rows: rows,
        columns: columns,
        north: north,
        south: south,
        east: east,
        west: west,
        resolution_x: (east - west) / columns as f64,
        resolution_y: (north - south) / rows as f64,
        nodata: nodata,
        data_type: input.configs.data_type,
        projection: format!("UTM zone {}{}", crs.zone, crs.band),
        coordinate_ref_system_wkt: format!(
            "PROJCS[\"WGS 84 / UTM zone {}{}\"]",
            crs.zone, crs.band
        ),
        xy_units: "m".to_string(),
        z_units: input.configs.z_units.clone(),
        epsg_code: crs.epsg_code,
        ..Default::default()
    };
    let mut output = Raster::initialize_using_config(&input.file_name, &configs);

    for row in 0..rows as isize {
        for col in 0..columns as isize {
            let x = output.get_x_from_column(col);
            let y = output.get_y_from_row(row);
            let (lat, lon) = utm_to_deg(crs.zone, crs.band, x, y);
            output.set_value(row, col, bilinear_sample(input, lon, lat));
        }
    }
    output.update_min_max();
    output
}

/// Bilinear interpolation at a source-grid location, skipping nodata
/// neighbours by re-normalizing the weights over the valid ones.
fn bilinear_sample(input: &Raster, x: f64, y: f64) -> f64 {
    let nodata = input.configs.nodata;
    let col_f = (x - input.configs.west) / input.configs.resolution_x - 0.5;
    let row_f = (input.configs.north - y) / input.configs.resolution_y - 0.5;
    let col0 = col_f.floor() as isize;
    let row0 = row_f.floor() as isize;
    let dx = col_f - col0 as f64;
    let dy = row_f - row0 as f64;

    let mut sum = 0f64;
    let mut weight_sum = 0f64;
    for (dr, dc, w) in [
        (0isize, 0isize, (1.0 - dx) * (1.0 - dy)),
        (0, 1, dx * (1.0 - dy)),
        (1, 0, (1.0 - dx) * dy),
        (1, 1, dx * dy),
    ] {
        let z = input.get_value(row0 + dr, col0 + dc);
        if z != nodata {
            sum += z * w;
            weight_sum += w;
        }
    }
    if weight_sum > 0f64 {
        sum / weight_sum
    } else {
        nodata
    }
}

/// Derives a slope grid (degrees) from the DEM with Horn's third-order
/// finite difference. Nodata neighbours take the centre cell's elevation.
pub fn derive_slope(dem: &Raster) -> Raster {
    let rows = dem.configs.rows as isize;
    let columns = dem.configs.columns as isize;
    let nodata = dem.configs.nodata;
    let eight_res_x = dem.configs.resolution_x * 8.0;
    let eight_res_y = dem.configs.resolution_y * 8.0;
    let dx = [1, 1, 1, 0, -1, -1, -1, 0];
    let dy = [-1, 0, 1, 1, 1, 0, -1, -1];

    let mut output = Raster::initialize_using_file(&derived_name(dem, "slope"), dem);
    let mut n: [f64; 8] = [0.0; 8];
    for row in 0..rows {
        for col in 0..columns {
            let z = dem.get_value(row, col);
            if z == nodata {
                continue;
            }
            for i in 0..8 {
                n[i] = dem.get_value(row + dy[i], col + dx[i]);
                if n[i] == nodata {
                    n[i] = z;
                }
            }
            let fx = (n[0] + 2.0 * n[1] + n[2] - n[4] - 2.0 * n[5] - n[6]) / eight_res_x;
            let fy = (n[6] + 2.0 * n[7] + n[0] - n[2] - 2.0 * n[3] - n[4]) / eight_res_y;
            output.set_value(row, col, (fx * fx + fy * fy).sqrt().atan().to_degrees());
        }
    }
    output.update_min_max();
    output
}

/// Derives a terrain ruggedness index grid: per cell, the root sum of
/// squares of the elevation differences to the up-to-8 valid neighbours.
pub fn derive_tri(dem: &Raster) -> Raster {
    let rows = dem.configs.rows as isize;
    let columns = dem.configs.columns as isize;
    let nodata = dem.configs.nodata;
    let dx = [1, 1, 1, 0, -1, -1, -1, 0];
    let dy = [-1, 0, 1, 1, 1, 0, -1, -1];

    let mut output = Raster::initialize_using_file(&derived_name(dem, "tri"), dem);
    for row in 0..rows {
        for col in 0..columns {
            let z = dem.get_value(row, col);
            if z == nodata {
                continue;
            }
            let mut sum_sq = 0f64;
            for i in 0..8 {
                let zn = dem.get_value(row + dy[i], col + dx[i]);
                if zn != nodata {
                    sum_sq += (z - zn) * (z - zn);
                }
            }
            output.set_value(row, col, sum_sq.sqrt());
        }
    }
    output.update_min_max();
    output
}

fn derived_name(input: &Raster, suffix: &str) -> String {
    let path = std::path::Path::new(&input.file_name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "raster".to_string());
    match path.parent() {
        Some(dir) => dir
            .join(format!("{}_{}.asc", stem, suffix))
            .to_string_lossy()
            .to_string(),
        None => format!("{}_{}.asc", stem, suffix),
    }
}

/// A pour point after snapping to the flow-accumulation maximum within the
/// search radius.
#[derive(Debug, Clone, Copy)]
pub struct SnapResult {
    pub point_num: usize,
    pub original: Point2D,
    pub snapped: Point2D,
    pub distance_m: f64,
    pub moved: bool,
}

/// Snaps each pour point to the maximum flow-accumulation cell within
/// `search_dist_m`. Points with no valid cell in range are left in place
/// with a warning.
pub fn snap_pour_points(
    points: &Shapefile,
    flow_accum: &Raster,
    search_dist_m: f64,
    verbose: bool,
) -> Vec<SnapResult> {
    let nodata = flow_accum.configs.nodata;
    let cells_x = (search_dist_m / flow_accum.configs.resolution_x).ceil() as isize;
    let cells_y = (search_dist_m / flow_accum.configs.resolution_y).ceil() as isize;
    let mut results = vec![];

    for rec_num in 0..points.num_records {
        let record = points.get_record(rec_num);
        if record.shape_type != ShapeType::Point || record.points.is_empty() {
            continue;
        }
        let p = record.points[0];
        let row_c = flow_accum.get_row_from_y(p.y);
        let col_c = flow_accum.get_column_from_x(p.x);

        let mut best_facc = f64::NEG_INFINITY;
        let mut best = p;
        let mut found = false;
        for row in (row_c - cells_y)..=(row_c + cells_y) {
            for col in (col_c - cells_x)..=(col_c + cells_x) {
                let facc = flow_accum.get_value(row, col);
                if facc == nodata {
                    continue;
                }
                let candidate = Point2D::new(
                    flow_accum.get_x_from_column(col),
                    flow_accum.get_y_from_row(row),
                );
                if p.distance(&candidate) <= search_dist_m && facc > best_facc {
                    best_facc = facc;
                    best = candidate;
                    found = true;
                }
            }
        }

        if !found {
            println!(
                "Warning: pour point {} has no flow-accumulation cell within {}m; left unsnapped.",
                rec_num + 1,
                search_dist_m
            );
        }
        let dist = p.distance(&best);
        if verbose && found {
            println!("Pour point {} snapped {:.1}m.", rec_num + 1, dist);
        }
        results.push(SnapResult {
            point_num: rec_num,
            original: p,
            snapped: best,
            distance_m: dist,
            moved: found && dist > 0f64,
        });
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use morpho_vector::{AttributeField, FieldDataType, ShapefileGeometry};

    fn raster_from(
        rows: usize,
        columns: usize,
        res: f64,
        values: &[f64],
        nodata: f64,
    ) -> Raster {
        let configs = RasterConfigs {
            rows: rows,
            columns: columns,
            west: 0.0,
            south: 0.0,
            east: columns as f64 * res,
            north: rows as f64 * res,
            resolution_x: res,
            resolution_y: res,
            nodata: nodata,
            epsg_code: 32643,
            ..Default::default()
        };
        let mut r = Raster::initialize_using_config("test.asc", &configs);
        for (i, v) in values.iter().enumerate() {
            r.data[i] = *v;
        }
        r
    }

    #[test]
    fn test_load_basins_explodes_and_heals() {
        let mut shp = Shapefile::new("basins.shp", ShapeType::Polygon).unwrap();
        shp.attributes
            .add_field(&AttributeField::new("Name", FieldDataType::Text, 20, 0));

        // two outer rings in one record, the first left unclosed
        let mut sfg = ShapefileGeometry::new(ShapeType::Polygon);
        sfg.add_part(&[
            Point2D::new(0.0, 0.0),
            Point2D::new(0.0, 100.0),
            Point2D::new(100.0, 100.0),
            Point2D::new(100.0, 0.0),
        ]);
        sfg.add_part(&[
            Point2D::new(200.0, 0.0),
            Point2D::new(200.0, 50.0),
            Point2D::new(250.0, 50.0),
            Point2D::new(250.0, 0.0),
            Point2D::new(200.0, 0.0),
        ]);
        shp.add_record(sfg);
        shp.attributes
            .add_record(vec![FieldData::Text("Subbasin-1".to_string())], false);

        let (basins, report) = load_basins(&shp, false).unwrap();
        assert_eq!(basins.len(), 2);
        assert_eq!(report.rings_closed, 1);
        assert_eq!(basins[0].basin_id, "Subbasin-1-p1");
        assert_eq!(basins[1].basin_id, "Subbasin-1-p2");
        assert!((basins[0].area_m2 - 10000.0).abs() < 1e-9);
        assert!((basins[1].area_m2 - 2500.0).abs() < 1e-9);
    }

    #[test]
    fn test_load_basins_drops_degenerate_parts() {
        let mut shp = Shapefile::new("basins.shp", ShapeType::Polygon).unwrap();
        let mut sfg = ShapefileGeometry::new(ShapeType::Polygon);
        sfg.add_part(&[Point2D::new(0.0, 0.0), Point2D::new(1.0, 1.0)]);
        sfg.add_part(&[
            Point2D::new(0.0, 0.0),
            Point2D::new(0.0, 10.0),
            Point2D::new(10.0, 10.0),
            Point2D::new(10.0, 0.0),
            Point2D::new(0.0, 0.0),
        ]);
        shp.add_record(sfg);
        shp.attributes.add_record(vec![], false);

        let (basins, report) = load_basins(&shp, false).unwrap();
        assert_eq!(basins.len(), 1);
        assert_eq!(basins[0].basin_id, "SB1");
        assert_eq!(report.parts_dropped, 1);
    }

    #[test]
    fn test_load_streams_reads_order_and_drops_bad_records() {
        let mut shp = Shapefile::new("streams.shp", ShapeType::PolyLine).unwrap();
        shp.attributes
            .add_field(&AttributeField::new("grid_code", FieldDataType::Int, 7, 0));

        let mut good = ShapefileGeometry::new(ShapeType::PolyLine);
        good.add_part(&[Point2D::new(0.0, 0.0), Point2D::new(30.0, 40.0)]);
        shp.add_record(good);
        shp.attributes.add_record(vec![FieldData::Int(2)], false);

        let mut bad = ShapefileGeometry::new(ShapeType::PolyLine);
        bad.add_part(&[Point2D::new(0.0, 0.0), Point2D::new(5.0, 5.0)]);
        shp.add_record(bad);
        shp.attributes.add_record(vec![FieldData::Int(0)], false);

        let (streams, _) = load_streams(&shp, "grid_code", false).unwrap();
        assert_eq!(streams.len(), 1);
        assert_eq!(streams[0].order, 2);
        assert!((streams[0].length_m - 50.0).abs() < 1e-9);

        assert!(load_streams(&shp, "no_such_field", false).is_err());
    }

    #[test]
    fn test_derive_working_crs_projected_dem_passes_through() {
        let dem = raster_from(2, 2, 30.0, &[1.0, 2.0, 3.0, 4.0], -32768.0);
        assert!(derive_working_crs(&dem).is_none());
    }

    #[test]
    fn test_derive_working_crs_geographic_dem() {
        let configs = RasterConfigs {
            rows: 10,
            columns: 10,
            west: 73.0,
            east: 74.0,
            south: 18.5,
            north: 19.5,
            resolution_x: 0.1,
            resolution_y: 0.1,
            epsg_code: 4326,
            xy_units: "deg".to_string(),
            ..Default::default()
        };
        let dem = Raster::initialize_using_config("dem.asc", &configs);
        let crs = derive_working_crs(&dem).unwrap();
        assert_eq!(crs.zone, 43);
        assert_eq!(crs.epsg_code, 32643);
    }

    #[test]
    fn test_derive_working_crs_bare_arcascii_dem() {
        // ArcAscii headers carry no CRS fields; the degree-range extent and
        // sub-degree cell size alone must trigger the UTM reprojection path
        let configs = RasterConfigs {
            rows: 120,
            columns: 120,
            west: 73.0,
            east: 74.0,
            south: 18.5,
            north: 19.5,
            resolution_x: 1.0 / 120.0,
            resolution_y: 1.0 / 120.0,
            ..Default::default()
        };
        let dem = Raster::initialize_using_config("dem.asc", &configs);
        let crs = derive_working_crs(&dem).unwrap();
        assert_eq!(crs.zone, 43);
        assert_eq!(crs.epsg_code, 32643);
    }

    #[test]
    fn test_derive_slope_flat_and_inclined() {
        let flat = raster_from(3, 3, 10.0, &[5.0; 9], -32768.0);
        let slope = derive_slope(&flat);
        assert!(slope.get_value(1, 1).abs() < 1e-9);

        // plane rising 1m per 10m eastward; expect atan(0.1)
        let mut vals = vec![0f64; 9];
        for row in 0..3 {
            for col in 0..3 {
                vals[row * 3 + col] = col as f64;
            }
        }
        let inclined = raster_from(3, 3, 10.0, &vals, -32768.0);
        let slope = derive_slope(&inclined);
        let expected = 0.1f64.atan().to_degrees();
        assert!((slope.get_value(1, 1) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_derive_tri() {
        let flat = raster_from(3, 3, 10.0, &[7.0; 9], -32768.0);
        let tri = derive_tri(&flat);
        assert!(tri.get_value(1, 1).abs() < 1e-9);

        let mut vals = vec![10.0; 9];
        vals[4] = 12.0; // centre 2m above all 8 neighbours
        let bumpy = raster_from(3, 3, 10.0, &vals, -32768.0);
        let tri = derive_tri(&bumpy);
        assert!((tri.get_value(1, 1) - (8.0 * 4.0f64).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_snap_pour_points() {
        // 5x5 grid, resolution 10; maximum accumulation at row 1, col 3
        let mut vals = vec![1.0; 25];
        vals[1 * 5 + 3] = 500.0;
        let facc = raster_from(5, 5, 10.0, &vals, -32768.0);

        let mut pts = Shapefile::new("pp.shp", ShapeType::Point).unwrap();
        pts.add_point_record(15.0, 25.0); // row 2, col 1
        let results = snap_pour_points(&pts, &facc, 300.0, false);
        assert_eq!(results.len(), 1);
        assert!(results[0].moved);
        assert!((results[0].snapped.x - 35.0).abs() < 1e-9);
        assert!((results[0].snapped.y - 35.0).abs() < 1e-9);

        // radius too small to reach the maximum: snaps to the best cell in
        // range, which is the point's own cell (distance 0)
        let results = snap_pour_points(&pts, &facc, 8.0, false);
        assert!(!results[0].moved);
    }
}
