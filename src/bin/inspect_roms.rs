use clap::Parser;
use std::path::PathBuf;

use xroms::data_loader::load_roms_file;
use xroms::VerticalGrid;

/// Print the grid and fields xroms finds in a ROMS file
#[derive(Parser, Debug)]
#[command(name = "inspect_roms")]
struct Args {
    /// Path to the ROMS NetCDF file
    file: PathBuf,

    /// Time index to read
    #[arg(short, long, default_value_t = 0)]
    time_index: usize,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("Inspecting ROMS file: {}", args.file.display());

    // Raw dimensions, as written by the model
    let file = netcdf::open(&args.file)?;
    println!("\nDimensions:");
    for dim in file.dimensions() {
        println!(
            "  {} = {} {}",
            dim.name(),
            dim.len(),
            if dim.is_unlimited() { "(unlimited)" } else { "" }
        );
    }
    drop(file);

    let dataset = load_roms_file(&args.file, args.time_index)?;
    let grid = dataset.grid();
    let (rows, cols) = grid.shape();

    println!("\n=== GRID ===");
    println!("  rho points: {} x {}", rows, cols);
    let lon_range = min_max(grid.lon().iter().copied());
    let lat_range = min_max(grid.lat().iter().copied());
    println!("  lon: {:.4} .. {:.4}", lon_range.0, lon_range.1);
    println!("  lat: {:.4} .. {:.4}", lat_range.0, lat_range.1);

    match grid.mask() {
        Some(mask) => {
            let sea = mask.iter().filter(|&&wet| wet).count();
            println!("  sea points: {} of {}", sea, mask.len());
        }
        None => println!("  no land mask"),
    }
    if let Some(h) = grid.bathymetry() {
        let (h_min, h_max) = min_max(h.iter().copied());
        println!("  depth: {:.1} .. {:.1} m", h_min, h_max);
    }
    match grid.vertical() {
        Some(vertical) => println!("{}", describe_vertical(vertical)),
        None => println!("  no vertical grid"),
    }

    println!("\n=== FIELDS ===");
    for name in dataset.fields().names() {
        let field = dataset.field(name)?;
        let (min, max) = min_max(field.data().iter().copied().filter(|v| v.is_finite()));
        println!(
            "  {} [{}] shape {:?}, range {:.4} .. {:.4}",
            name,
            field.placement(),
            field.data().shape(),
            min,
            max
        );
    }

    println!("\n=== ATTRIBUTES ===");
    let mut names: Vec<_> = dataset.attributes().keys().collect();
    names.sort();
    for name in names {
        println!("  {}: {:?}", name, dataset.attributes()[name]);
    }

    Ok(())
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

fn describe_vertical(vertical: &VerticalGrid) -> String {
    format!(
        "  s-levels: {} (Vtransform {}, hc = {} m)",
        vertical.n_levels(),
        vertical.vtransform().code(),
        vertical.hc()
    )
}
