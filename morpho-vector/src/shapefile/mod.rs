/*
This code is part of the MorphoTools drainage-basin analysis library.
License: MIT

Notes: The logic behind working with the ESRI Shapefile format.
*/

pub mod attributes;
pub mod geometry;

use self::attributes::*;
use self::geometry::*;
use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use chrono::prelude::*;
use morpho_common::structures::Point2D;
use morpho_common::utils::{ByteOrderReader, Endianness};
use std::f64;
use std::fmt;
use std::fs;
use std::fs::File;
use std::io::prelude::*;
use std::io::{BufReader, BufWriter, Cursor, Error, ErrorKind};
use std::path::Path;

#[derive(Debug, Default, Clone)]
pub struct ShapefileHeader {
    file_code: i32, // BigEndian; value is 9994
    pub file_length: i32,      // BigEndian
    pub version: i32,          // LittleEndian
    pub shape_type: ShapeType, // LittleEndian
    pub x_min: f64,            // LittleEndian
    pub y_min: f64,            // LittleEndian
    pub x_max: f64,            // LittleEndian
    pub y_max: f64,            // LittleEndian
    pub z_min: f64,            // LittleEndian; 0f64 for the planimetric types
    pub z_max: f64,            // LittleEndian
    pub m_min: f64,            // LittleEndian
    pub m_max: f64,            // LittleEndian
}

impl fmt::Display for ShapefileHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "file_code: {}\nfile_length: {}\nversion: {}\nshape_type: {}\nx_min: {}\nx_max: {}\ny_min: {}\ny_max: {}",
            self.file_code,
            self.file_length,
            self.version,
            self.shape_type,
            self.x_min,
            self.x_max,
            self.y_min,
            self.y_max
        )
    }
}

/// `Shapefile` is an in-memory ESRI Shapefile, covering the planimetric
/// Point, PolyLine, and Polygon types. Z and M geometry is read with its
/// measure payloads discarded; writing is restricted to the planimetric
/// types.
///
/// Examples:
///
/// ```ignore
/// // Read a Shapefile from a file.
/// let input = Shapefile::read(&input_file)?;
///
/// // Create a new output Shapefile
/// let mut output = Shapefile::new(&output_file, ShapeType::Polygon)?;
/// output.projection = input.projection.clone();
///
/// // add attributes
/// let fid = AttributeField::new("FID", FieldDataType::Int, 7u8, 0u8);
/// output.attributes.add_field(&fid);
/// ```
#[derive(Default, Clone)]
pub struct Shapefile {
    pub file_name: String,
    pub file_mode: String,
    pub header: ShapefileHeader,
    pub num_records: usize,
    pub records: Vec<ShapefileGeometry>,
    pub attributes: ShapefileAttributes,
    pub projection: String,
}

impl Shapefile {
    pub fn read<'a>(file_name: &'a str) -> Result<Shapefile, Error> {
        let mut sf = Shapefile {
            file_name: file_name.to_string(),
            file_mode: "r".to_string(),
            ..Default::default()
        };
        sf.read_file()?;
        Ok(sf)
    }

    pub fn new<'a>(file_name: &'a str, file_type: ShapeType) -> Result<Shapefile, Error> {
        let new_file_name = if file_name.contains(".") {
            file_name.to_string()
        } else {
            // likely no extension provided; default to .shp
            format!("{}.shp", file_name)
        };
        let mut sf = Shapefile {
            file_name: new_file_name,
            file_mode: "w".to_string(),
            ..Default::default()
        };
        sf.header.shape_type = file_type;
        Ok(sf)
    }

    /// Returns the filename, in shortened form (e.g. file.shp).
    pub fn get_short_filename(&self) -> String {
        let path = Path::new(&self.file_name);
        match path.file_stem() {
            Some(stem) => stem.to_string_lossy().to_string(),
            None => self.file_name.clone(),
        }
    }

    /// Returns the ShapefileGeometry for a specified index, starting at zero.
    pub fn get_record<'a>(&'a self, index: usize) -> &'a ShapefileGeometry {
        if index >= self.records.len() {
            panic!("Record index out of bounds");
        }
        &self.records[index]
    }

    /// Adds a new ShapefileGeometry.
    pub fn add_record(&mut self, geometry: ShapefileGeometry) {
        if self.file_mode == "r" {
            panic!("The file was opened in read-only mode.");
        }
        if geometry.shape_type == self.header.shape_type {
            self.records.push(geometry);
            self.num_records += 1;
        } else {
            panic!("Attempt to add a ShapefileGeometry record of the wrong ShapeType.");
        }
    }

    /// Adds a new Point record.
    pub fn add_point_record(&mut self, x: f64, y: f64) {
        if self.file_mode == "r" {
            panic!("The file was opened in read-only mode.");
        }
        if self.header.shape_type == ShapeType::Point {
            let mut sfg = ShapefileGeometry::new(ShapeType::Point);
            sfg.add_point(Point2D { x: x, y: y });
            self.records.push(sfg);
            self.num_records += 1;
        } else {
            panic!("Attempt to add a ShapefileGeometry record of the wrong ShapeType.");
        }
    }

    fn read_file(&mut self) -> Result<(), Error> {
        ///////////////////////////////
        // First read the geometries //
        ///////////////////////////////

        let mut f = File::open(self.file_name.clone())?;
        let metadata = fs::metadata(self.file_name.clone())?;
        let file_size: usize = metadata.len() as usize;
        let mut buffer = vec![0; file_size];
        f.read(&mut buffer)?;

        // Note: the shapefile format uses mixed endianness for whatever reason.
        let mut bor =
            ByteOrderReader::<Cursor<Vec<u8>>>::new(Cursor::new(buffer), Endianness::BigEndian);
        bor.seek(0);
        self.header.file_code = bor.read_i32()?;
        if self.header.file_code != 9994 {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("{} is not an ESRI Shapefile.", self.file_name),
            ));
        }
        bor.seek(24);
        self.header.file_length = bor.read_i32()?;

        // the rest of the header is in LittleEndian format
        bor.set_byte_order(Endianness::LittleEndian);
        self.header.version = bor.read_i32()?;
        self.header.shape_type = ShapeType::from_int(bor.read_i32()?)?;

        // bounding box
        self.header.x_min = bor.read_f64()?;
        self.header.y_min = bor.read_f64()?;
        self.header.x_max = bor.read_f64()?;
        self.header.y_max = bor.read_f64()?;
        self.header.z_min = bor.read_f64()?;
        self.header.z_max = bor.read_f64()?;
        self.header.m_min = bor.read_f64()?;
        self.header.m_max = bor.read_f64()?;

        // read the records
        while bor.pos() < file_size {
            bor.set_byte_order(Endianness::BigEndian);
            bor.inc_pos(4); // we don't really need the record number
            let content_length = bor.read_i32()? as usize * 2; // in bytes
            bor.set_byte_order(Endianness::LittleEndian);
            let record_start = bor.pos();
            let shape_type = ShapeType::from_int(bor.read_i32()?)?;

            match shape_type.base_shape_type() {
                ShapeType::Null => {
                    self.records.push(ShapefileGeometry::new(ShapeType::Null));
                }

                ShapeType::Point => {
                    let mut sfg = ShapefileGeometry::new(ShapeType::Point);
                    sfg.add_point(Point2D {
                        x: bor.read_f64()?,
                        y: bor.read_f64()?,
                    });
                    self.records.push(sfg);
                }

                ShapeType::PolyLine | ShapeType::Polygon => {
                    let mut sfg = ShapefileGeometry {
                        shape_type: shape_type.base_shape_type(),
                        x_min: bor.read_f64()?,
                        y_min: bor.read_f64()?,
                        x_max: bor.read_f64()?,
                        y_max: bor.read_f64()?,
                        num_parts: bor.read_i32()?,
                        num_points: bor.read_i32()?,
                        ..Default::default()
                    };

                    for _ in 0..sfg.num_parts {
                        sfg.parts.push(bor.read_i32()?);
                    }

                    for _ in 0..sfg.num_points {
                        sfg.points.push(Point2D {
                            x: bor.read_f64()?,
                            y: bor.read_f64()?,
                        });
                    }

                    self.records.push(sfg);
                }

                _ => {
                    return Err(Error::new(
                        ErrorKind::InvalidData,
                        format!(
                            "Unsupported geometry type {} in {}",
                            shape_type, self.file_name
                        ),
                    ));
                }
            }

            // Z and M payloads, when present, trail the XY data; skip them.
            bor.seek(record_start + content_length);
        }

        self.num_records = self.records.len();

        //////////////////////////////
        // Read the projection file //
        //////////////////////////////
        let prj_file = Path::new(&self.file_name)
            .with_extension("prj")
            .into_os_string()
            .into_string()
            .unwrap_or_default();
        match File::open(prj_file) {
            Ok(f) => {
                let f = BufReader::new(f);
                for line in f.lines() {
                    let line_unwrapped = line?;
                    self.projection.push_str(&format!("{}\n", line_unwrapped));
                }
            }
            Err(_) => println!("Warning: Projection file not located."),
        }

        ///////////////////////////////
        // Read the attributes table //
        ///////////////////////////////
        let dbf_file = Path::new(&self.file_name)
            .with_extension("dbf")
            .into_os_string()
            .into_string()
            .unwrap_or_default();
        let mut f = File::open(dbf_file.clone())?;
        let metadata = fs::metadata(dbf_file.clone())?;
        let file_size: usize = metadata.len() as usize;
        let mut buffer = vec![0; file_size];
        f.read(&mut buffer)?;
        let mut bor =
            ByteOrderReader::<Cursor<Vec<u8>>>::new(Cursor::new(buffer), Endianness::LittleEndian);

        self.attributes.header.version = bor.read_u8()?;
        self.attributes.header.year = 1900u32 + bor.read_u8()? as u32;
        self.attributes.header.month = bor.read_u8()?;
        self.attributes.header.day = bor.read_u8()?;
        self.attributes.header.num_records = bor.read_u32()?;
        self.attributes.header.bytes_in_header = bor.read_u16()?;
        self.attributes.header.bytes_in_record = bor.read_u16()?;
        // reserved and LAN-only bytes
        bor.inc_pos(17);
        self.attributes.header.language_driver_id = bor.read_u8()?;
        // reserved bytes
        bor.inc_pos(2);

        // read the field descriptors
        let mut fields: Vec<AttributeField> = vec![];
        loop {
            let name = bor.read_utf8(11).replace(char::from(0), "");
            let field_type = char::from(bor.read_u8()?);
            bor.inc_pos(4);
            let field_length = bor.read_u8()?;
            let decimal_count = bor.read_u8()?;
            // skip the remaining descriptor bytes
            bor.inc_pos(14);

            fields.push(AttributeField {
                name: name,
                field_type: field_type,
                field_length: field_length,
                decimal_count: decimal_count,
            });

            // Checks for end of field descriptor array (0x0d). Valid .dbf files
            // will have this flag.
            if bor.peek_u8()? == 0x0d {
                break;
            }
        }
        self.attributes.add_fields(&fields);

        bor.inc_pos(1);

        let num_records = self.attributes.header.num_records;
        for _ in 0..num_records {
            let deleted = bor.read_u8()? as u32 == 0x2A;
            let mut r: Vec<FieldData> = vec![];
            for j in 0..self.attributes.header.num_fields as usize {
                let str_rep = bor
                    .read_utf8(self.attributes.fields[j].field_length as usize)
                    .replace(char::from(0), "")
                    .replace("*", "")
                    .trim()
                    .to_string();
                if str_rep.replace(" ", "").replace("?", "").is_empty() {
                    r.push(FieldData::Null);
                } else {
                    match self.attributes.fields[j].field_type {
                        'N' | 'F' | 'I' | 'O' => {
                            if self.attributes.fields[j].decimal_count == 0 {
                                r.push(FieldData::Int(str_rep.parse::<i32>().unwrap_or(0)));
                            } else {
                                r.push(FieldData::Real(str_rep.parse::<f64>().unwrap_or(0f64)));
                            }
                        }
                        'D' => {
                            if str_rep.len() == 8 {
                                r.push(FieldData::Date(DateData {
                                    year: str_rep[0..4].parse::<u16>().unwrap_or(0),
                                    month: str_rep[4..6].parse::<u8>().unwrap_or(0),
                                    day: str_rep[6..8].parse::<u8>().unwrap_or(0),
                                }));
                            } else {
                                r.push(FieldData::Null);
                            }
                        }
                        'L' => {
                            r.push(FieldData::Bool(str_rep.to_lowercase().contains("t")));
                        }
                        _ => {
                            // treat it like a string
                            r.push(FieldData::Text(str_rep.clone()));
                        }
                    }
                }
            }
            self.attributes.add_record(r, deleted);
        }

        Ok(())
    }

    pub fn write(&mut self) -> Result<(), Error> {
        if self.file_mode == "r" {
            return Err(Error::new(
                ErrorKind::Other,
                "The file was opened in read-only mode.",
            ));
        }
        match self.header.shape_type {
            ShapeType::Null | ShapeType::Point | ShapeType::PolyLine | ShapeType::Polygon => (),
            _ => {
                return Err(Error::new(
                    ErrorKind::InvalidInput,
                    "Only the Point, PolyLine, and Polygon types can be written.",
                ));
            }
        }

        self.num_records = self.records.len(); // make sure they are the same.
        if self.num_records == 0 {
            return Err(Error::new(
                ErrorKind::Other,
                "The file does not currently contain any record data.",
            ));
        }

        /////////////////////////////////////////
        // Write the geometry data (.shp file) //
        /////////////////////////////////////////

        let f = File::create(&self.file_name)?;
        let mut writer = BufWriter::new(f);

        // magic number
        writer.write_i32::<BigEndian>(9994i32)?;

        // unused header bytes
        for _ in 0..5 {
            writer.write_i32::<BigEndian>(0i32)?;
        }

        // file size
        let mut size = 100i32; // initialized to the size of the file header
        for i in 0..self.num_records {
            size += 8 + self.records[i].get_length();
        }
        let file_length = size / 2i32; // in 16-bit words
        writer.write_i32::<BigEndian>(file_length)?;

        // version
        writer.write_i32::<LittleEndian>(1000i32)?;

        // shape type
        writer.write_i32::<LittleEndian>(self.header.shape_type.to_int())?;

        // extent
        self.calculate_extent();
        self.write_header_extent(&mut writer)?;

        // write the geometries
        for i in 0..self.num_records {
            writer.write_i32::<BigEndian>(i as i32 + 1i32)?; // Record number
            writer.write_i32::<BigEndian>(self.records[i].get_length() / 2)?; // Content length in 16-bit words
            writer.write_i32::<LittleEndian>(self.records[i].shape_type.to_int())?;

            match self.records[i].shape_type {
                ShapeType::Null => (),
                ShapeType::Point => {
                    writer.write_f64::<LittleEndian>(self.records[i].points[0].x)?;
                    writer.write_f64::<LittleEndian>(self.records[i].points[0].y)?;
                }
                _ => {
                    // PolyLine or Polygon
                    writer.write_f64::<LittleEndian>(self.records[i].x_min)?;
                    writer.write_f64::<LittleEndian>(self.records[i].y_min)?;
                    writer.write_f64::<LittleEndian>(self.records[i].x_max)?;
                    writer.write_f64::<LittleEndian>(self.records[i].y_max)?;

                    writer.write_i32::<LittleEndian>(self.records[i].num_parts)?;
                    writer.write_i32::<LittleEndian>(self.records[i].num_points)?;

                    for part in &self.records[i].parts {
                        writer.write_i32::<LittleEndian>(*part)?;
                    }

                    for pt in &self.records[i].points {
                        writer.write_f64::<LittleEndian>(pt.x)?;
                        writer.write_f64::<LittleEndian>(pt.y)?;
                    }
                }
            }
        }

        /////////////////////////////////
        // Write the index file (.shx) //
        /////////////////////////////////

        let index_file = Path::new(&self.file_name)
            .with_extension("shx")
            .into_os_string()
            .into_string()
            .unwrap_or_default();
        let f = File::create(&index_file)?;
        let mut writer = BufWriter::new(f);

        // magic number
        writer.write_i32::<BigEndian>(9994i32)?;

        // unused header bytes
        for _ in 0..5 {
            writer.write_i32::<BigEndian>(0i32)?;
        }

        let file_length = (100 + 8 * self.num_records) as i32 / 2i32; // in 16-bit words
        writer.write_i32::<BigEndian>(file_length)?;

        // version
        writer.write_i32::<LittleEndian>(1000i32)?;

        // shape type
        writer.write_i32::<LittleEndian>(self.header.shape_type.to_int())?;

        // extent
        self.write_header_extent(&mut writer)?;

        let mut pos = 100i32;
        for i in 0..self.num_records {
            writer.write_i32::<BigEndian>(pos / 2)?; // Record offset in 16-bit words
            writer.write_i32::<BigEndian>(self.records[i].get_length() / 2)?; // Content length in 16-bit words
            pos += 8 + self.records[i].get_length();
        }

        ///////////////////////////////
        // Write the projection file //
        ///////////////////////////////

        if !self.projection.is_empty() {
            let prj_file = Path::new(&self.file_name)
                .with_extension("prj")
                .into_os_string()
                .into_string()
                .unwrap_or_default();
            let f = File::create(&prj_file)?;
            let mut writer = BufWriter::new(f);
            writer.write_all(self.projection.as_bytes())?;
        }

        ///////////////////////////////
        // Write the attributes file //
        ///////////////////////////////

        let dbf_file = Path::new(&self.file_name)
            .with_extension("dbf")
            .into_os_string()
            .into_string()
            .unwrap_or_default();
        let f = File::create(&dbf_file)?;
        let mut writer = BufWriter::new(f);

        self.attributes.header.version = 3;
        writer.write_u8(3u8)?;

        // write the date
        let now = Local::now();
        writer.write_u8((now.year() - 1900) as u8)?;
        writer.write_u8(now.month() as u8)?;
        writer.write_u8(now.day() as u8)?;

        writer.write_u32::<LittleEndian>(self.attributes.header.num_records)?;
        let header_size = 32u16 + self.attributes.header.num_fields as u16 * 32u16 + 1u16;
        self.attributes.header.bytes_in_header = header_size;
        writer.write_u16::<LittleEndian>(header_size)?;

        let mut bytes_in_record = 1u16; // the deletion flag
        for field in &self.attributes.fields {
            bytes_in_record += field.field_length as u16;
        }
        self.attributes.header.bytes_in_record = bytes_in_record;
        writer.write_u16::<LittleEndian>(bytes_in_record)?;

        // reserved or unused bytes
        for _ in 0..20 {
            writer.write_u8(0u8)?;
        }

        // field descriptor array
        for field in &self.attributes.fields {
            let mut s = field.name.clone();
            if s.len() > 10 {
                s = field.name[0..10].to_string();
            }
            for _ in s.len()..11 {
                s.push(char::from(0));
            }
            writer.write_all(s.as_bytes())?;
            writer.write_u8(field.field_type as u8)?;

            for _ in 0..4 {
                writer.write_u8(0u8)?;
            }

            writer.write_u8(field.field_length)?;
            writer.write_u8(field.decimal_count)?;

            for _ in 0..14 {
                writer.write_u8(0u8)?;
            }
        }

        writer.write_u8(0x0D)?; // terminator byte

        // write records
        for i in 0..self.attributes.header.num_records as usize {
            if !self.attributes.is_deleted[i] {
                writer.write_u8(0x20)?;
            } else {
                writer.write_u8(0x2A)?;
            }
            let rec = self.attributes.get_record(i);
            for j in 0..self.attributes.header.num_fields as usize {
                let fl = self.attributes.fields[j].field_length as usize;
                match &rec[j] {
                    FieldData::Null => {
                        let spcs: String = vec![' '; fl].into_iter().collect();
                        writer.write_all(spcs.as_bytes())?;
                    }
                    FieldData::Int(v) => {
                        let b = v.to_string();
                        if b.len() < fl {
                            let mut spcs: String = vec![' '; fl - b.len()].into_iter().collect();
                            spcs.push_str(&b);
                            writer.write_all(spcs.as_bytes())?;
                        } else if b.len() > fl {
                            writer.write_all(b[b.len() - fl..b.len()].as_bytes())?;
                        } else {
                            writer.write_all(b.as_bytes())?;
                        }
                    }
                    FieldData::Real(v) => {
                        let dc = self.attributes.fields[j].decimal_count as usize;
                        let mut s = format!("{:.*}", dc, v);
                        if s.len() < fl {
                            for _ in 0..(fl - s.len()) {
                                s.push_str(" ");
                            }
                        } else if s.len() > fl {
                            s.truncate(fl);
                        }
                        writer.write_all(s.as_bytes())?;
                    }
                    FieldData::Bool(v) => {
                        if *v {
                            writer.write_all("T".as_bytes())?;
                        } else {
                            writer.write_all("F".as_bytes())?;
                        }
                    }
                    FieldData::Date(v) => {
                        writer.write_all(format!("{}", v).as_bytes())?;
                    }
                    FieldData::Text(v) => {
                        if v.len() < fl {
                            // pad with trailing spaces
                            let spcs: String = vec![' '; fl - v.len()].into_iter().collect();
                            writer.write_all(format!("{}{}", v, spcs).as_bytes())?;
                        } else if v.len() > fl {
                            writer.write_all(v[0..fl].as_bytes())?;
                        } else {
                            writer.write_all(v.as_bytes())?;
                        }
                    }
                }
            }
        }

        writer.write_u8(0x1A)?; // file terminator byte

        Ok(())
    }

    fn write_header_extent<W: Write>(&self, writer: &mut W) -> Result<(), Error> {
        writer.write_f64::<LittleEndian>(self.header.x_min)?;
        writer.write_f64::<LittleEndian>(self.header.y_min)?;
        writer.write_f64::<LittleEndian>(self.header.x_max)?;
        writer.write_f64::<LittleEndian>(self.header.y_max)?;
        writer.write_f64::<LittleEndian>(self.header.z_min)?;
        writer.write_f64::<LittleEndian>(self.header.z_max)?;
        writer.write_f64::<LittleEndian>(self.header.m_min)?;
        writer.write_f64::<LittleEndian>(self.header.m_max)?;
        Ok(())
    }

    fn calculate_extent(&mut self) {
        self.header.x_min = f64::INFINITY;
        self.header.x_max = f64::NEG_INFINITY;
        self.header.y_min = f64::INFINITY;
        self.header.y_max = f64::NEG_INFINITY;
        self.header.z_min = 0f64;
        self.header.z_max = 0f64;
        self.header.m_min = 0f64;
        self.header.m_max = 0f64;
        for sg in &self.records {
            for p in &sg.points {
                if p.x < self.header.x_min {
                    self.header.x_min = p.x;
                }
                if p.x > self.header.x_max {
                    self.header.x_max = p.x;
                }
                if p.y < self.header.y_min {
                    self.header.y_min = p.y;
                }
                if p.y > self.header.y_max {
                    self.header.y_max = p.y;
                }
            }
        }
        if self.header.shape_type == ShapeType::Null {
            self.header.x_min = 0f64;
            self.header.x_max = 0f64;
            self.header.y_min = 0f64;
            self.header.y_max = 0f64;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use morpho_common::structures::Point2D;
    use std::env;

    #[test]
    fn test_polygon_write_read_round_trip() {
        let dir = env::temp_dir();
        let file_name = dir
            .join("morpho_vector_test_poly.shp")
            .to_string_lossy()
            .to_string();

        let mut output = Shapefile::new(&file_name, ShapeType::Polygon).unwrap();
        output
            .attributes
            .add_field(&AttributeField::new("FID", FieldDataType::Int, 7u8, 0u8));
        output
            .attributes
            .add_field(&AttributeField::new("Name", FieldDataType::Text, 20u8, 0u8));

        let mut sfg = ShapefileGeometry::new(ShapeType::Polygon);
        sfg.add_part(&[
            Point2D::new(0.0, 0.0),
            Point2D::new(0.0, 100.0),
            Point2D::new(100.0, 100.0),
            Point2D::new(100.0, 0.0),
            Point2D::new(0.0, 0.0),
        ]);
        output.add_record(sfg);
        output.attributes.add_record(
            vec![
                FieldData::Int(1),
                FieldData::Text("Subbasin-1".to_string()),
            ],
            false,
        );
        output.write().unwrap();

        let input = Shapefile::read(&file_name).unwrap();
        assert_eq!(input.num_records, 1);
        assert_eq!(input.header.shape_type, ShapeType::Polygon);
        let rec = input.get_record(0);
        assert_eq!(rec.num_parts, 1);
        assert_eq!(rec.num_points, 5);
        assert_eq!(rec.points[2], Point2D::new(100.0, 100.0));
        assert_eq!(
            input.attributes.get_value(0, "Name"),
            FieldData::Text("Subbasin-1".to_string())
        );
        assert_eq!(input.attributes.get_value(0, "FID"), FieldData::Int(1));
    }

    #[test]
    fn test_polyline_write_read_round_trip() {
        let dir = env::temp_dir();
        let file_name = dir
            .join("morpho_vector_test_line.shp")
            .to_string_lossy()
            .to_string();

        let mut output = Shapefile::new(&file_name, ShapeType::PolyLine).unwrap();
        output
            .attributes
            .add_field(&AttributeField::new("grid_code", FieldDataType::Int, 7u8, 0u8));

        let mut sfg = ShapefileGeometry::new(ShapeType::PolyLine);
        sfg.add_part(&[Point2D::new(0.0, 0.0), Point2D::new(30.0, 40.0)]);
        output.add_record(sfg);
        output
            .attributes
            .add_record(vec![FieldData::Int(2)], false);
        output.write().unwrap();

        let input = Shapefile::read(&file_name).unwrap();
        assert_eq!(input.num_records, 1);
        assert_eq!(input.header.shape_type, ShapeType::PolyLine);
        assert_eq!(
            input.attributes.get_value(0, "grid_code"),
            FieldData::Int(2)
        );
    }
}
