/*
This code is part of the MorphoTools drainage-basin analysis library.
License: MIT
*/

/*!
MorphoTools is a command-line program for quantitative drainage-basin
morphometric analysis. Given a subbasin polygon layer, a Strahler-ordered
stream network, and a DEM (plus optional flow-accumulation, slope, and
pour-point layers), it computes the linear, areal, and relief aspects of
every subbasin, assembles them into a master morphometric table, and ranks
the subbasins by watershed-treatment priority under three independent
methods with a Kendall's-tau agreement analysis.

| Flag              | Description                                                      |
| ----------------- | ---------------------------------------------------------------- |
| --subbasins       | Input subbasin polygon Shapefile.                                |
| --streams         | Input stream network Shapefile with a Strahler order attribute.  |
| --dem             | Input DEM raster (ESRI ASCII grid or Surfer 7 binary grid).      |
| --facc            | Optional flow-accumulation raster.                               |
| --slope           | Optional slope raster (degrees); derived from the DEM if absent. |
| --pour_pts        | Optional pour-point Shapefile, snapped along flow accumulation.  |
| --order_field     | Strahler order attribute name (default 'grid_code').             |
| --snap_dist       | Pour-point snap search distance in metres (default 300).         |
| -o, --output      | Output directory for tables, grids, and vectors.                 |
| -v                | Verbose mode.                                                    |
| -h, --help        | Prints help information.                                         |
| --version         | Prints version information.                                      |
*/

pub mod areal;
pub mod associate;
pub mod context;
pub mod linear;
pub mod manifest;
pub mod master;
pub mod normalize;
pub mod prioritize;
pub mod relief;
pub mod stats;

use crate::context::AnalysisContext;
use crate::manifest::RunManifest;
use morpho_common::utils::get_formatted_elapsed_time;
use morpho_raster::Raster;
use morpho_vector::Shapefile;
use std::env;
use std::io::{Error, ErrorKind};
use std::path;
use std::path::Path;
use std::time::Instant;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    match run() {
        Ok(()) => {}
        Err(err) => panic!("{}", err),
    }
}

fn version() {
    println!("morpho_tools v{}", VERSION);
}

fn help() {
    let help_str = "morpho_tools: drainage-basin morphometric analysis and watershed prioritization.

Usage:
  morpho_tools --subbasins=subbasins.shp --streams=streams.shp --dem=dem.asc -o=./out -v

Flags:
  --subbasins     Input subbasin polygon Shapefile (required)
  --streams       Input stream network Shapefile (required)
  --dem           Input DEM raster (required)
  --facc          Flow-accumulation raster
  --slope         Slope raster in degrees; derived from the DEM if absent
  --pour_pts      Pour-point Shapefile, snapped to flow-accumulation maxima
  --order_field   Strahler order attribute name (default 'grid_code')
  --snap_dist     Pour-point snap distance in metres (default 300.0)
  -o, --output    Output directory (required)
  --wd            Working directory, prepended to bare input file names
  -v              Verbose mode
  -h, --help      Prints this help
  --version       Prints version information";
    println!("{}", help_str);
}

/// Every flag the command line accepts, collected in one place.
#[derive(Debug, Clone)]
struct RunConfig {
    subbasins_file: String,
    streams_file: String,
    dem_file: String,
    facc_file: String,
    slope_file: String,
    pour_pts_file: String,
    order_field: String,
    snap_dist: f64,
    output_dir: String,
    working_directory: String,
    verbose: bool,
}

impl Default for RunConfig {
    fn default() -> RunConfig {
        RunConfig {
            subbasins_file: String::new(),
            streams_file: String::new(),
            dem_file: String::new(),
            facc_file: String::new(),
            slope_file: String::new(),
            pour_pts_file: String::new(),
            order_field: "grid_code".to_string(),
            snap_dist: 300f64,
            output_dir: String::new(),
            working_directory: String::new(),
            verbose: false,
        }
    }
}

fn run() -> Result<(), Error> {
    let args: Vec<String> = env::args().collect();
    if args.len() <= 1 {
        version();
        help();
        return Ok(());
    }

    let mut cfg = RunConfig::default();

    for i in 0..args.len() {
        let mut arg = args[i].replace("\"", "");
        arg = arg.replace("'", "");
        let cmd = arg.split("=");
        let vec = cmd.collect::<Vec<&str>>();
        let mut keyval = false;
        if vec.len() > 1 {
            keyval = true;
        }
        let flag_val = vec[0].to_lowercase().replace("--", "-");
        let value = |i: usize| -> String {
            if keyval {
                vec[1].to_string()
            } else if i + 1 < args.len() {
                args[i + 1].to_string()
            } else {
                String::new()
            }
        };
        if flag_val == "-subbasins" {
            cfg.subbasins_file = value(i);
        } else if flag_val == "-streams" {
            cfg.streams_file = value(i);
        } else if flag_val == "-dem" {
            cfg.dem_file = value(i);
        } else if flag_val == "-facc" {
            cfg.facc_file = value(i);
        } else if flag_val == "-slope" {
            cfg.slope_file = value(i);
        } else if flag_val == "-pour_pts" {
            cfg.pour_pts_file = value(i);
        } else if flag_val == "-order_field" {
            cfg.order_field = value(i);
        } else if flag_val == "-snap_dist" {
            cfg.snap_dist = value(i).parse::<f64>().unwrap_or(300f64);
        } else if flag_val == "-o" || flag_val == "-output" {
            cfg.output_dir = value(i);
        } else if flag_val == "-wd" {
            cfg.working_directory = value(i);
        } else if flag_val == "-v" {
            cfg.verbose = true;
        } else if flag_val == "-h" || flag_val == "-help" {
            version();
            help();
            return Ok(());
        } else if flag_val == "-version" {
            version();
            return Ok(());
        }
    }

    let sep: &str = &path::MAIN_SEPARATOR.to_string();
    if !cfg.working_directory.is_empty() && !cfg.working_directory.ends_with(sep) {
        cfg.working_directory.push_str(sep);
    }
    let qualify = |f: &str, wd: &str| -> String {
        if !f.is_empty() && !f.contains(sep) && !f.contains("/") {
            format!("{}{}", wd, f)
        } else {
            f.to_string()
        }
    };
    let subbasins_file = qualify(&cfg.subbasins_file, &cfg.working_directory);
    let streams_file = qualify(&cfg.streams_file, &cfg.working_directory);
    let dem_file = qualify(&cfg.dem_file, &cfg.working_directory);
    let facc_file = qualify(&cfg.facc_file, &cfg.working_directory);
    let slope_file = qualify(&cfg.slope_file, &cfg.working_directory);
    let pour_pts_file = qualify(&cfg.pour_pts_file, &cfg.working_directory);
    let order_field = cfg.order_field.clone();
    let snap_dist = cfg.snap_dist;
    let output_dir = qualify(&cfg.output_dir, &cfg.working_directory);
    let verbose = cfg.verbose;

    if subbasins_file.is_empty() || streams_file.is_empty() || dem_file.is_empty() {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            "The --subbasins, --streams, and --dem inputs are all required (run with --help).",
        ));
    }
    if output_dir.is_empty() {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            "An output directory must be specified with -o or --output.",
        ));
    }

    for f in [&subbasins_file, &streams_file, &dem_file] {
        if !Path::new(f).exists() {
            return Err(Error::new(
                ErrorKind::NotFound,
                format!("Required input file not located: {}", f),
            ));
        }
    }
    std::fs::create_dir_all(&output_dir)?;
    let out = |name: &str| -> String {
        if output_dir.ends_with(sep) {
            format!("{}{}", output_dir, name)
        } else {
            format!("{}{}{}", output_dir, sep, name)
        }
    };

    let start = Instant::now();
    if verbose {
        println!("*************************************");
        println!("* Welcome to morpho_tools v{}    *", VERSION);
        println!("*************************************");
    }

    let mut manifest = RunManifest {
        version: VERSION.to_string(),
        ..Default::default()
    };
    manifest.inputs.subbasins = subbasins_file.clone();
    manifest.inputs.streams = streams_file.clone();
    manifest.inputs.dem = dem_file.clone();
    manifest.inputs.order_field = order_field.clone();

    /////////////////////////////////////
    // Stage 1: normalize the inputs   //
    /////////////////////////////////////

    if verbose {
        println!("Reading input layers...");
    }
    let subbasins_shp = Shapefile::read(&subbasins_file)?;
    let streams_shp = Shapefile::read(&streams_file)?;
    let mut dem = Raster::new(&dem_file, "r")?;

    let mut flow_accum = if !facc_file.is_empty() {
        manifest.inputs.flow_accumulation = Some(facc_file.clone());
        Some(Raster::new(&facc_file, "r")?)
    } else {
        None
    };
    let mut slope_in = if !slope_file.is_empty() {
        manifest.inputs.slope = Some(slope_file.clone());
        Some(Raster::new(&slope_file, "r")?)
    } else {
        None
    };

    if let Some(facc) = &flow_accum {
        if (facc.configs.resolution_x - dem.configs.resolution_x).abs() > 1e-6
            || (facc.configs.resolution_y - dem.configs.resolution_y).abs() > 1e-6
        {
            println!(
                "Warning: the flow-accumulation grid resolution does not match the DEM resolution."
            );
        }
    }

    let (mut basins, basin_heal) = normalize::load_basins(&subbasins_shp, verbose)?;
    let (mut streams, stream_heal) = normalize::load_streams(&streams_shp, &order_field, verbose)?;
    manifest.basin_healing = (&basin_heal).into();
    manifest.stream_healing = (&stream_heal).into();
    if basins.is_empty() {
        return Err(Error::new(
            ErrorKind::InvalidData,
            "No valid subbasin polygon survived geometry healing.",
        ));
    }

    let working_crs = normalize::derive_working_crs(&dem);
    let projection = match &working_crs {
        Some(crs) => {
            if verbose {
                println!(
                    "DEM is in geographic coordinates; reprojecting all layers to UTM zone {}{} (EPSG:{}).",
                    crs.zone, crs.band, crs.epsg_code
                );
            }
            manifest.set_working_crs(crs);
            normalize::reproject_basins(&mut basins, crs);
            normalize::reproject_streams(&mut streams, crs);
            dem = normalize::reproject_raster(&dem, crs);
            if let Some(facc) = flow_accum.take() {
                flow_accum = Some(normalize::reproject_raster(&facc, crs));
            }
            if let Some(slope) = slope_in.take() {
                slope_in = Some(normalize::reproject_raster(&slope, crs));
            }
            format!("PROJCS[\"WGS 84 / UTM zone {}{}\"]", crs.zone, crs.band)
        }
        None => subbasins_shp.projection.clone(),
    };

    let slope = match slope_in {
        Some(s) => s,
        None => {
            if verbose {
                println!("No slope raster supplied; deriving slope from the DEM.");
            }
            normalize::derive_slope(&dem)
        }
    };
    let tri = normalize::derive_tri(&dem);

    if !pour_pts_file.is_empty() {
        manifest.inputs.pour_points = Some(pour_pts_file.clone());
        match &flow_accum {
            Some(facc) => {
                let pour_pts = Shapefile::read(&pour_pts_file)?;
                let snaps = normalize::snap_pour_points(&pour_pts, facc, snap_dist, verbose);
                manifest.set_snaps(&snaps);
            }
            None => {
                println!(
                    "Warning: pour points supplied without a flow-accumulation raster; snapping skipped."
                );
            }
        }
    }

    //////////////////////////////////////////
    // Stage 2: basin-stream association    //
    //////////////////////////////////////////

    let association = associate::associate_streams(&basins, &mut streams, verbose);
    manifest.association = Some((&association).into());

    // the context is immutable from here on; every aspect calculator only
    // reads from it
    let epsg_code = dem.configs.epsg_code;
    let ctx = AnalysisContext {
        dem,
        slope,
        tri,
        flow_accum,
        epsg_code,
        basins,
        streams,
    };

    /////////////////////////////////////////////
    // Stages 3-5: per-basin aspect calculators //
    /////////////////////////////////////////////

    let num_basins = ctx.basins.len();
    let mut linear_table = vec![];
    let mut areal_table = vec![];
    let mut relief_table = vec![];
    for (i, basin) in ctx.basins.iter().enumerate() {
        let segments = ctx.streams_of(&basin.basin_id);
        if segments.is_empty() {
            println!(
                "Warning: basin '{}' has no associated stream segments; excluded from linear aggregates.",
                basin.basin_id
            );
        } else {
            linear_table.push(linear::linear_aspect(&basin.basin_id, &segments));
        }

        let total_length: f64 = segments.iter().map(|s| s.length_m).sum();
        let areal_rec = areal::areal_aspect(basin, total_length, segments.len());

        match relief::relief_aspect(basin, &areal_rec, &ctx.dem, &ctx.slope, &ctx.tri, verbose) {
            Some(rec) => relief_table.push(rec),
            None => println!(
                "Warning: basin '{}' has no valid DEM cells; relief aspect withheld.",
                basin.basin_id
            ),
        }
        areal_table.push(areal_rec);

        if verbose {
            println!("Progress: {}%", (100 * (i + 1)) / num_basins);
        }
    }

    ///////////////////////////////////////
    // Stage 6: the master table         //
    ///////////////////////////////////////

    let rows = master::assemble_master(areal_table, relief_table.clone(), linear_table);
    let master_path = out("master_table.csv");
    master::write_master_csv(&master_path, &rows)?;
    let hypso_path = out("hypsometric_curves.csv");
    master::write_hypsometric_csv(&hypso_path, &relief_table)?;
    manifest.outputs.push(master_path);
    manifest.outputs.push(hypso_path);

    ///////////////////////////////////////
    // Statistics                        //
    ///////////////////////////////////////

    let stats_path = out("descriptive_stats.csv");
    stats::write_descriptive_csv(&stats_path, &stats::descriptive_stats(&rows))?;
    manifest.outputs.push(stats_path);

    let (names, pearson_m, spearman_m) = stats::correlation_matrices(&rows);
    if !names.is_empty() {
        let pearson_path = out("pearson_correlation.csv");
        stats::write_correlation_csv(&pearson_path, &names, &pearson_m)?;
        let spearman_path = out("spearman_correlation.csv");
        stats::write_correlation_csv(&spearman_path, &names, &spearman_m)?;
        manifest.outputs.push(pearson_path);
        manifest.outputs.push(spearman_path);
    }
    if let Some(vif) = stats::variance_inflation_factors(&rows) {
        let vif_path = out("vif.csv");
        stats::write_vif_csv(&vif_path, &vif)?;
        manifest.outputs.push(vif_path);
    }

    ///////////////////////////////////////
    // Stage 7: prioritization           //
    ///////////////////////////////////////

    let result = prioritize::prioritize(
        &rows,
        prioritize::DEFAULT_DIRECT,
        prioritize::DEFAULT_INVERSE,
    )?;
    manifest.set_prioritization(&result);

    let priority_path = out("prioritization.csv");
    prioritize::write_priority_csv(&priority_path, &result)?;
    let kendall_path = out("kendall_agreement.csv");
    prioritize::write_kendall_csv(&kendall_path, &result)?;
    let shp_path = out("priority_subbasins.shp");
    prioritize::write_priority_shapefile(&shp_path, &ctx.basins, &result, &projection)?;
    manifest.outputs.push(priority_path);
    manifest.outputs.push(kendall_path);
    manifest.outputs.push(shp_path);

    if verbose {
        for k in &result.kendall {
            println!(
                "Kendall's tau {}: tau={:.4}, p={:.4} ({} agreement)",
                k.pair, k.tau, k.p_value, k.agreement
            );
        }
    }

    let elapsed = get_formatted_elapsed_time(start);
    manifest.elapsed = elapsed.clone();
    manifest.write(&out("run_manifest.json"))?;

    if verbose {
        println!("Elapsed Time (excluding I/O): {}", elapsed);
    }
    Ok(())
}
