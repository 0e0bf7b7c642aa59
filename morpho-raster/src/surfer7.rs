/*
This code is part of the MorphoTools drainage-basin analysis library.
License: MIT
*/
use super::{DataType, Raster, RasterConfigs};
use byteorder::{LittleEndian, WriteBytesExt};
use morpho_common::utils::{ByteOrderReader, Endianness};
use std::f64;
use std::fs;
use std::fs::File;
use std::io::prelude::*;
use std::io::{BufWriter, Cursor, Error, ErrorKind};

// Surfer 7 section identifiers, each a four-byte ASCII tag.
const HEADER_ID: i32 = 0x42525344; // "DSRB"
const GRID_ID: i32 = 0x44495247; // "GRID"
const DATA_ID: i32 = 0x41544144; // "DATA"

// Values at or above this threshold are blanked cells.
const BLANK_THRESHOLD: f64 = 1.70141e38;

pub fn read_surfer7(
    file_name: &String,
    configs: &mut RasterConfigs,
    data: &mut Vec<f64>,
) -> Result<(), Error> {
    // read the file's bytes into a buffer
    let mut f = File::open(file_name.clone())?;
    let metadata = fs::metadata(file_name.clone())?;
    let file_size: usize = metadata.len() as usize;
    let mut buffer = vec![0; file_size];
    f.read(&mut buffer)?;

    let mut bor =
        ByteOrderReader::<Cursor<Vec<u8>>>::new(Cursor::new(buffer), Endianness::LittleEndian);

    let bad_format = || {
        Error::new(
            ErrorKind::InvalidData,
            "The input Surfer 7 grid does not appear to be formatted correctly.",
        )
    };

    // header section
    if bor.read_i32()? != HEADER_ID {
        return Err(bad_format());
    }
    if bor.read_i32()? != 4 {
        return Err(bad_format());
    }
    let version = bor.read_i32()?;

    // grid section
    if bor.read_i32()? != GRID_ID {
        return Err(bad_format());
    }
    if bor.read_i32()? != 72 {
        return Err(bad_format());
    }
    configs.rows = bor.read_i32()? as usize;
    configs.columns = bor.read_i32()? as usize;
    configs.west = bor.read_f64()?;
    configs.south = bor.read_f64()?;
    configs.resolution_x = bor.read_f64()?;
    configs.resolution_y = bor.read_f64()?;
    configs.east = configs.west + configs.resolution_x * configs.columns as f64;
    configs.north = configs.south + configs.resolution_y * configs.rows as f64;
    configs.minimum = bor.read_f64()?;
    configs.maximum = bor.read_f64()?;

    // The rotation value should always be zero; the official format
    // description is ambiguous about whether it is even present.
    let rotation_value = bor.read_f64()?;
    if rotation_value != 0.0f64 {
        println!("Warning: non-zero rotation values are not currently supported.");
    }

    configs.nodata = bor.read_f64()?;
    configs.data_type = DataType::F64;

    // data section
    if bor.read_i32()? != DATA_ID {
        return Err(bad_format());
    }
    let data_sz = bor.read_i32()? as usize;
    if data_sz != configs.rows * configs.columns * 8 {
        return Err(bad_format());
    }

    let num_cells = configs.rows * configs.columns;
    data.clear();
    data.resize(num_cells, configs.nodata);

    // Surfer grids are stored south-to-north; flip to row 0 = north.
    for row in (0..configs.rows).rev() {
        for col in 0..configs.columns {
            let i = row * configs.columns + col;
            let value = bor.read_f64()?;
            let blanked = if version == 2 {
                value == configs.nodata
            } else {
                value >= BLANK_THRESHOLD
            };
            data[i] = if blanked { configs.nodata } else { value };
        }
    }

    Ok(())
}

pub fn write_surfer7<'a>(r: &'a mut Raster) -> Result<(), Error> {
    r.update_min_max();

    // Save the file
    let f = File::create(r.file_name.clone())?;
    let mut writer = BufWriter::new(f);

    writer.write_i32::<LittleEndian>(HEADER_ID)?;
    writer.write_i32::<LittleEndian>(4i32)?;
    writer.write_i32::<LittleEndian>(2i32)?; // version

    writer.write_i32::<LittleEndian>(GRID_ID)?;
    writer.write_i32::<LittleEndian>(72i32)?;
    writer.write_i32::<LittleEndian>(r.configs.rows as i32)?;
    writer.write_i32::<LittleEndian>(r.configs.columns as i32)?;
    writer.write_f64::<LittleEndian>(r.configs.west)?;
    writer.write_f64::<LittleEndian>(r.configs.south)?;
    writer.write_f64::<LittleEndian>(r.configs.resolution_x)?;
    writer.write_f64::<LittleEndian>(r.configs.resolution_y)?;
    writer.write_f64::<LittleEndian>(r.configs.minimum)?;
    writer.write_f64::<LittleEndian>(r.configs.maximum)?;
    writer.write_f64::<LittleEndian>(0.0f64)?; // rotation of 0.0
    writer.write_f64::<LittleEndian>(r.configs.nodata)?;

    writer.write_i32::<LittleEndian>(DATA_ID)?;
    writer.write_i32::<LittleEndian>((r.configs.rows * r.configs.columns * 8) as i32)?;

    // write the data, south-to-north
    for row in (0..r.configs.rows).rev() {
        for col in 0..r.configs.columns {
            let i = row * r.configs.columns + col;
            writer.write_f64::<LittleEndian>(r.data[i])?;
        }
    }

    writer.flush()?;

    Ok(())
}
