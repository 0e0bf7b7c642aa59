/*
This code is part of the MorphoTools drainage-basin analysis library.
License: MIT
*/

mod arcascii;
mod surfer7;

use self::arcascii::{read_arcascii, write_arcascii};
use self::surfer7::{read_surfer7, write_surfer7};
use morpho_common::structures::BoundingBox;
use std::default::Default;
use std::f64;
use std::io::{Error, ErrorKind};
use std::path::Path;

/// Raster is an in-memory grid abstracting over the supported raster data
/// formats (ESRI ASCII grids and Surfer 7 binary grids). Cell values are
/// held as f64 in row-major order with row 0 at the northern edge.
///
/// Examples:
///
/// ```ignore
/// // Read a raster from a file.
/// let dem = Raster::new(&input_file, "r")?;
///
/// // Create a new raster sharing the grid of an existing one.
/// let mut output = Raster::initialize_using_file(&output_file, &dem);
/// ```
#[derive(Default, Clone)]
pub struct Raster {
    pub file_name: String,
    pub file_mode: String,
    pub raster_type: RasterType,
    pub configs: RasterConfigs,
    pub data: Vec<f64>,
}

impl Raster {
    /// Creates an in-memory `Raster` object. The data are either read from
    /// an existing file (`file_mode` is 'r') or prepared for new file
    /// creation (`file_mode` is 'w'). The raster format is determined by the
    /// file extension of `file_name`.
    pub fn new<'a>(file_name: &'a str, file_mode: &'a str) -> Result<Raster, Error> {
        let fm: String = file_mode.to_lowercase();
        let mut r = Raster {
            file_name: file_name.to_string(),
            file_mode: fm.clone(),
            raster_type: RasterType::from_file_name(file_name),
            ..Default::default()
        };
        if r.file_mode.contains("r") {
            match r.raster_type {
                RasterType::ArcAscii => {
                    read_arcascii(&r.file_name, &mut r.configs, &mut r.data)?;
                    r.update_min_max();
                    Ok(r)
                }
                RasterType::Surfer7Binary => {
                    read_surfer7(&r.file_name, &mut r.configs, &mut r.data)?;
                    Ok(r)
                }
                RasterType::Unknown => Err(Error::new(
                    ErrorKind::InvalidInput,
                    format!("Unrecognized raster type: {}", file_name),
                )),
            }
        } else {
            // write
            Ok(r)
        }
    }

    /// Creates a new in-memory `Raster` with grid extent and location based
    /// on a `RasterConfigs`, filled with the configured nodata value.
    pub fn initialize_using_config<'a>(file_name: &'a str, configs: &'a RasterConfigs) -> Raster {
        let new_file_name = if file_name.contains(".") {
            file_name.to_string()
        } else {
            // likely no extension provided; default to .asc
            format!("{}.asc", file_name)
        };
        let mut output = Raster {
            file_name: new_file_name.clone(),
            file_mode: "w".to_string(),
            raster_type: RasterType::from_file_name(&new_file_name),
            ..Default::default()
        };

        output.configs.rows = configs.rows;
        output.configs.columns = configs.columns;
        output.configs.north = configs.north;
        output.configs.south = configs.south;
        output.configs.east = configs.east;
        output.configs.west = configs.west;
        output.configs.resolution_x = configs.resolution_x;
        output.configs.resolution_y = configs.resolution_y;
        output.configs.nodata = configs.nodata;
        output.configs.data_type = configs.data_type;
        output.configs.projection = configs.projection.clone();
        output.configs.xy_units = configs.xy_units.clone();
        output.configs.z_units = configs.z_units.clone();
        output.configs.epsg_code = configs.epsg_code;
        output.configs.coordinate_ref_system_wkt = configs.coordinate_ref_system_wkt.clone();

        output.data = vec![output.configs.nodata; output.configs.rows * output.configs.columns];

        output
    }

    /// Creates a new in-memory `Raster` with grid extent and location based
    /// on an existing `Raster` that serves as a template.
    pub fn initialize_using_file<'a>(file_name: &'a str, input: &'a Raster) -> Raster {
        Raster::initialize_using_config(file_name, &input.configs)
    }

    /// Returns the filename, in shortened form (e.g. file.asc).
    pub fn get_short_filename(&self) -> String {
        let path = Path::new(&self.file_name);
        match path.file_stem() {
            Some(stem) => stem.to_string_lossy().to_string(),
            None => self.file_name.clone(),
        }
    }

    /// Returns the value contained within the grid cell specified by `row`
    /// and `column`. Off-grid cells yield the nodata value.
    pub fn get_value(&self, row: isize, column: isize) -> f64 {
        if column >= 0
            && row >= 0
            && column < self.configs.columns as isize
            && row < self.configs.rows as isize
        {
            let idx: usize = row as usize * self.configs.columns + column as usize;
            return self.data[idx];
        }
        // it's not within the area of the data
        self.configs.nodata
    }

    pub fn set_value(&mut self, row: isize, column: isize, value: f64) {
        if column >= 0 && row >= 0 {
            let c: usize = column as usize;
            let r: usize = row as usize;
            if c < self.configs.columns && r < self.configs.rows {
                let idx = r * self.configs.columns + c;
                self.data[idx] = value;
            }
        }
    }

    pub fn get_x_from_column(&self, column: isize) -> f64 {
        self.configs.west
            + self.configs.resolution_x / 2f64
            + column as f64 * self.configs.resolution_x
    }

    pub fn get_y_from_row(&self, row: isize) -> f64 {
        self.configs.north
            - self.configs.resolution_y / 2f64
            - row as f64 * self.configs.resolution_y
    }

    pub fn get_column_from_x(&self, x: f64) -> isize {
        ((x - self.configs.west) / self.configs.resolution_x).floor() as isize
    }

    pub fn get_row_from_y(&self, y: f64) -> isize {
        ((self.configs.north - y) / self.configs.resolution_y).floor() as isize
    }

    pub fn num_cells(&self) -> usize {
        self.configs.rows * self.configs.columns
    }

    pub fn num_valid_cells(&self) -> usize {
        let mut ret = 0;
        for value in &self.data {
            if *value != self.configs.nodata {
                ret += 1;
            }
        }
        ret
    }

    /// Recalculates the minimum and maximum values over the valid cells.
    pub fn update_min_max(&mut self) {
        self.configs.minimum = f64::INFINITY;
        self.configs.maximum = f64::NEG_INFINITY;
        for value in &self.data {
            let v = *value;
            if v != self.configs.nodata {
                if v < self.configs.minimum {
                    self.configs.minimum = v;
                }
                if v > self.configs.maximum {
                    self.configs.maximum = v;
                }
            }
        }
    }

    pub fn get_bounding_box(&self) -> BoundingBox {
        BoundingBox::new(
            self.configs.west,
            self.configs.east,
            self.configs.south,
            self.configs.north,
        )
    }

    /// Heuristic test of whether the grid georeferencing is in geographic
    /// (latitude/longitude) coordinates rather than a projected system.
    pub fn is_in_geographic_coordinates(&self) -> bool {
        if self.configs.west < -180f64
            || self.configs.east > 180f64
            || self.configs.north > 90f64
            || self.configs.south < -90f64
        {
            return false;
        }
        if self.configs.epsg_code == 4322
            || self.configs.epsg_code == 4326
            || self.configs.epsg_code == 4629
            || self.configs.epsg_code == 4277
        {
            return true;
        }
        let wkt = self.configs.coordinate_ref_system_wkt.to_lowercase();
        if !wkt.contains("projcs[") && !wkt.contains("not specified") {
            return true;
        }
        if self.configs.xy_units.to_lowercase().contains("deg") {
            return true;
        }
        // ArcAscii and Surfer grids carry no CRS metadata at all. When the
        // extent fits in the latitude/longitude range and the cell size is a
        // small fraction of a degree, no plausible metre-based grid matches,
        // so treat the georeferencing as geographic.
        if wkt.contains("not specified")
            && self.configs.xy_units.to_lowercase().contains("not specified")
            && self.configs.resolution_x > 0.0
            && self.configs.resolution_x < 0.05
            && self.configs.resolution_y > 0.0
            && self.configs.resolution_y < 0.05
        {
            return true;
        }
        false
    }

    /// Writes the in-memory raster to disc in the format indicated by its
    /// file extension.
    pub fn write(&mut self) -> Result<(), Error> {
        if self.file_mode == "r" {
            return Err(Error::new(
                ErrorKind::Other,
                "The file was opened in read-only mode.",
            ));
        }
        match self.raster_type {
            RasterType::ArcAscii => write_arcascii(self)?,
            RasterType::Surfer7Binary => write_surfer7(self)?,
            RasterType::Unknown => {
                return Err(Error::new(ErrorKind::InvalidInput, "Unrecognized raster type"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct RasterConfigs {
    pub title: String,
    pub rows: usize,
    pub columns: usize,
    pub bands: u8,
    pub nodata: f64,
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
    pub resolution_x: f64,
    pub resolution_y: f64,
    pub minimum: f64,
    pub maximum: f64,
    pub projection: String,
    pub data_type: DataType,
    pub z_units: String,
    pub xy_units: String,
    pub epsg_code: u16,
    pub coordinate_ref_system_wkt: String,
    pub metadata: Vec<String>,
}

impl Default for RasterConfigs {
    fn default() -> RasterConfigs {
        RasterConfigs {
            title: String::from(""),
            bands: 1,
            rows: 0,
            columns: 0,
            nodata: -32768.0,
            north: f64::NEG_INFINITY,
            south: f64::INFINITY,
            east: f64::NEG_INFINITY,
            west: f64::INFINITY,
            resolution_x: f64::NEG_INFINITY,
            resolution_y: f64::NEG_INFINITY,
            minimum: f64::INFINITY,
            maximum: f64::NEG_INFINITY,
            projection: "not specified".to_string(),
            data_type: DataType::Unknown,
            z_units: "not specified".to_string(),
            xy_units: "not specified".to_string(),
            epsg_code: 0u16,
            coordinate_ref_system_wkt: "not specified".to_string(),
            metadata: vec![],
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum RasterType {
    #[default]
    Unknown,
    ArcAscii,
    Surfer7Binary,
}

impl RasterType {
    pub fn from_file_name(file_name: &str) -> RasterType {
        let extension = Path::new(file_name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "asc" | "txt" => RasterType::ArcAscii,
            "grd" => RasterType::Surfer7Binary,
            _ => RasterType::Unknown,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum DataType {
    F64,
    F32,
    I32,
    #[default]
    Unknown,
}

#[cfg(test)]
mod test {
    use super::{Raster, RasterConfigs, RasterType};

    fn test_raster(rows: usize, columns: usize) -> Raster {
        let configs = RasterConfigs {
            rows: rows,
            columns: columns,
            north: rows as f64 * 10.0,
            south: 0.0,
            east: columns as f64 * 10.0,
            west: 0.0,
            resolution_x: 10.0,
            resolution_y: 10.0,
            nodata: -32768.0,
            ..Default::default()
        };
        Raster::initialize_using_config("test.asc", &configs)
    }

    #[test]
    fn test_raster_type_from_extension() {
        assert_eq!(RasterType::from_file_name("dem.asc"), RasterType::ArcAscii);
        assert_eq!(
            RasterType::from_file_name("dem.grd"),
            RasterType::Surfer7Binary
        );
        assert_eq!(RasterType::from_file_name("dem.xyz"), RasterType::Unknown);
    }

    #[test]
    fn test_georeferencing_round_trip() {
        let r = test_raster(5, 8);
        // cell centre of (0, 0) is half a cell in from the top-left corner
        assert_eq!(r.get_x_from_column(0), 5.0);
        assert_eq!(r.get_y_from_row(0), 45.0);
        for row in 0..5isize {
            for col in 0..8isize {
                let x = r.get_x_from_column(col);
                let y = r.get_y_from_row(row);
                assert_eq!(r.get_column_from_x(x), col);
                assert_eq!(r.get_row_from_y(y), row);
            }
        }
    }

    #[test]
    fn test_off_grid_cells_are_nodata() {
        let r = test_raster(3, 3);
        assert_eq!(r.get_value(-1, 0), r.configs.nodata);
        assert_eq!(r.get_value(0, 3), r.configs.nodata);
    }

    #[test]
    fn test_min_max_ignores_nodata() {
        let mut r = test_raster(2, 2);
        r.set_value(0, 0, 5.0);
        r.set_value(1, 1, -2.0);
        r.update_min_max();
        assert_eq!(r.configs.minimum, -2.0);
        assert_eq!(r.configs.maximum, 5.0);
        assert_eq!(r.num_valid_cells(), 2);
    }

    #[test]
    fn test_geographic_heuristic() {
        // an ArcAscii DEM carries nothing but the extent and cell size
        let mut r = test_raster(2, 2);
        r.configs.west = 75.0;
        r.configs.east = 76.0;
        r.configs.south = 18.0;
        r.configs.north = 19.0;
        r.configs.resolution_x = 0.000833;
        r.configs.resolution_y = 0.000833;
        assert!(r.is_in_geographic_coordinates());

        // an explicitly projected wkt overrides the extent signal
        r.configs.coordinate_ref_system_wkt = "PROJCS[\"WGS 84 / UTM zone 43N\"]".to_string();
        assert!(!r.is_in_geographic_coordinates());

        // metre cell sizes never read as geographic, even near the origin
        let m = test_raster(2, 2);
        assert!(!m.is_in_geographic_coordinates());

        // degree xy units are accepted regardless of cell size
        let mut d = test_raster(2, 2);
        d.configs.west = 75.0;
        d.configs.east = 77.0;
        d.configs.south = 18.0;
        d.configs.north = 20.0;
        d.configs.resolution_x = 1.0;
        d.configs.resolution_y = 1.0;
        d.configs.xy_units = "degrees".to_string();
        assert!(d.is_in_geographic_coordinates());
    }
}
