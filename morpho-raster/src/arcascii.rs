/*
This code is part of the MorphoTools drainage-basin analysis library.
License: MIT
*/
use super::{DataType, Raster, RasterConfigs};
use std::f64;
use std::fs::File;
use std::io::prelude::*;
use std::io::{BufReader, BufWriter, Error, ErrorKind};

fn parse_value(val: &str, file_name: &str) -> Result<f64, Error> {
    val.trim().parse::<f64>().map_err(|_| {
        Error::new(
            ErrorKind::InvalidData,
            format!("Unparsable value '{}' in ASCII raster {}", val, file_name),
        )
    })
}

pub fn read_arcascii(
    file_name: &String,
    configs: &mut RasterConfigs,
    data: &mut Vec<f64>,
) -> Result<(), Error> {
    // read the file
    let f = File::open(file_name)?;
    let f = BufReader::new(f);

    // The lower-left anchor can be given as either a cell corner or a cell centre.
    let mut xllcenter: f64 = f64::NEG_INFINITY;
    let mut yllcenter: f64 = f64::NEG_INFINITY;
    let mut xllcorner: f64 = f64::NEG_INFINITY;
    let mut yllcorner: f64 = f64::NEG_INFINITY;
    for line in f.lines() {
        let line_unwrapped = line?;
        let vec = line_unwrapped.split_whitespace().collect::<Vec<&str>>();
        if vec.is_empty() {
            continue;
        }
        let keyword = vec[0].to_lowercase();
        if keyword.contains("nrows") {
            configs.rows = parse_value(vec[vec.len() - 1], file_name)? as usize;
            if configs.columns > 0 {
                data.reserve(configs.rows * configs.columns);
            }
        } else if keyword.contains("ncols") {
            configs.columns = parse_value(vec[vec.len() - 1], file_name)? as usize;
            if configs.rows > 0 {
                data.reserve(configs.rows * configs.columns);
            }
        } else if keyword.contains("xllcorner") {
            xllcorner = parse_value(vec[vec.len() - 1], file_name)?;
        } else if keyword.contains("yllcorner") {
            yllcorner = parse_value(vec[vec.len() - 1], file_name)?;
        } else if keyword.contains("xllcenter") {
            xllcenter = parse_value(vec[vec.len() - 1], file_name)?;
        } else if keyword.contains("yllcenter") {
            yllcenter = parse_value(vec[vec.len() - 1], file_name)?;
        } else if keyword.contains("cellsize") {
            configs.resolution_x = parse_value(vec[vec.len() - 1], file_name)?;
            configs.resolution_y = configs.resolution_x;
        } else if keyword.contains("nodata_value") {
            if vec[vec.len() - 1].contains(".") {
                configs.data_type = DataType::F32;
            } else {
                configs.data_type = DataType::I32;
            }
            configs.nodata = parse_value(vec[vec.len() - 1], file_name)?;
        } else {
            // it's a data line
            for val in vec {
                data.push(parse_value(val, file_name)?);
            }
        }
    }

    if configs.rows == 0 || configs.columns == 0 {
        return Err(Error::new(
            ErrorKind::InvalidData,
            format!("Missing NROWS/NCOLS header in ASCII raster {}", file_name),
        ));
    }
    if data.len() != configs.rows * configs.columns {
        return Err(Error::new(
            ErrorKind::InvalidData,
            format!(
                "ASCII raster {} contains {} values; {} expected from its header",
                file_name,
                data.len(),
                configs.rows * configs.columns
            ),
        ));
    }

    // set the North, East, South, and West coordinates
    if xllcorner != f64::NEG_INFINITY {
        configs.west = xllcorner;
        configs.east = xllcorner + (configs.columns as f64) * configs.resolution_x;
        configs.south = yllcorner;
        configs.north = yllcorner + (configs.rows as f64) * configs.resolution_y;
    } else {
        configs.west = xllcenter - 0.5 * configs.resolution_x;
        configs.east = configs.west + (configs.columns as f64) * configs.resolution_x;
        configs.south = yllcenter - 0.5 * configs.resolution_y;
        configs.north = configs.south + (configs.rows as f64) * configs.resolution_y;
    }

    Ok(())
}

pub fn write_arcascii<'a>(r: &'a mut Raster) -> Result<(), Error> {
    // Save the file
    let f = File::create(&(r.file_name))?;
    let mut writer = BufWriter::new(f);

    writer.write_all(format!("NCOLS {}\n", r.configs.columns).as_bytes())?;
    writer.write_all(format!("NROWS {}\n", r.configs.rows).as_bytes())?;
    writer.write_all(format!("XLLCORNER {}\n", r.configs.west).as_bytes())?;
    writer.write_all(format!("YLLCORNER {}\n", r.configs.south).as_bytes())?;
    writer.write_all(
        format!(
            "CELLSIZE {}\n",
            (r.configs.resolution_x + r.configs.resolution_y) / 2.0
        )
        .as_bytes(),
    )?;
    writer.write_all(format!("NODATA_VALUE {:.2}\n", r.configs.nodata).as_bytes())?;

    // write the data
    let mut s = String::new();
    let num_cells: usize = r.configs.rows * r.configs.columns;
    let mut col = 0;
    for i in 0..num_cells {
        if col < r.configs.columns - 1 {
            s += &format!("{:.2} ", r.data[i]);
        } else {
            s += &format!("{:.2}\n", r.data[i]);
        }
        col += 1;
        if col == r.configs.columns {
            writer.write_all(s.as_bytes())?;
            s = String::new();
            col = 0;
        }
    }

    writer.flush()?;

    Ok(())
}
