//! SVF CLI - Tool for inspecting SVF packages.

use std::env;
use std::path::Path;
use std::process::exit;

use svf::prelude::*;
use svf::propdb::PropertyValue as Value;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter.
const LOG_ENV: &str = "SVF_LOG";

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = "info";
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => level = "debug",
            "-vv" | "--trace" => level = "trace",
            "-q" | "--quiet" => level = "error",
            _ => filtered_args.push(arg),
        }
    }
    init_logging(level);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    let command = filtered_args[0];
    let rest = &filtered_args[1..];
    let result = match command {
        "info" | "i" => match rest {
            [path, ..] => cmd_info(path).await,
            _ => usage("svf info <package>"),
        },
        "fragments" | "f" => match rest {
            [path, tail @ ..] => cmd_fragments(path, parse_limit(tail)).await,
            _ => usage("svf fragments <package> [limit]"),
        },
        "geometries" | "g" => match rest {
            [path, tail @ ..] => cmd_geometries(path, parse_limit(tail)).await,
            _ => usage("svf geometries <package> [limit]"),
        },
        "packs" | "p" => match rest {
            [path, ..] => cmd_packs(path).await,
            _ => usage("svf packs <package>"),
        },
        "materials" | "m" => match rest {
            [path, ..] => cmd_materials(path).await,
            _ => usage("svf materials <package>"),
        },
        "props" => match rest {
            [path, id, ..] => match id.parse::<ObjectId>() {
                Ok(id) => cmd_props(path, id).await,
                Err(_) => usage("svf props <package> <object-id>"),
            },
            _ => usage("svf props <package> <object-id>"),
        },
        "find" => match rest {
            [path, attr, value, ..] => cmd_find(path, attr, value).await,
            _ => usage("svf find <package> <attribute> <value>"),
        },
        "help" | "h" | "-h" | "--help" => {
            print_help();
            Ok(())
        }
        "--version" | "-V" => {
            println!(
                "svf {} (built {} {})",
                env!("CARGO_PKG_VERSION"),
                env!("SVF_BUILD_DATE"),
                env!("SVF_BUILD_TIME")
            );
            Ok(())
        }
        // Default: if file exists, show info; otherwise error
        other => {
            if Path::new(other).exists() {
                cmd_info(other).await
            } else {
                eprintln!("Unknown command: {}", other);
                eprintln!();
                print_help();
                exit(1);
            }
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        exit(1);
    }
}

fn usage(text: &str) -> Result<()> {
    eprintln!("Error: missing arguments");
    eprintln!("Usage: {}", text);
    exit(1);
}

fn parse_limit(args: &[&str]) -> Option<usize> {
    args.first().and_then(|s| s.parse().ok())
}

fn print_help() {
    println!("svf - SVF package toolkit");
    println!();
    println!("USAGE:");
    println!("    svf [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    i, info       <package>                 Show metadata and asset table");
    println!("    f, fragments  <package> [limit]         List fragments");
    println!("    g, geometries <package> [limit]         List geometry metadata");
    println!("    p, packs      <package>                 Summarize mesh packs");
    println!("    m, materials  <package>                 List materials");
    println!("    props         <package> <object-id>     Show object properties");
    println!("    find          <package> <attr> <value>  Find objects by property value");
    println!("    h, help                                 Show this help");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose    Show debug output");
    println!("    -vv, --trace     Show trace output (very verbose)");
    println!("    -q, --quiet      Only show errors");
    println!("    -V, --version    Show version and build date");
    println!();
    println!("ENVIRONMENT:");
    println!("    {}          Log filter, overrides -v/-q (e.g. svf=trace)", LOG_ENV);
    println!();
    println!("EXAMPLES:");
    println!("    svf info model/output.svfm                # Quick overview");
    println!("    svf fragments model/output.svfm 20        # First 20 fragments");
    println!("    svf props model/output.svfm 42            # Properties of object 42");
    println!("    svf find model/output.svfm Level \"L1\"     # Objects on level L1");
}

async fn open(path: &str) -> Result<PackageDecoder> {
    info!("Opening package: {}", path);
    let pkg = PackageDecoder::open_path(path).await?;
    debug!("Catalog has {} assets", pkg.catalog().len());
    Ok(pkg)
}

async fn cmd_info(path: &str) -> Result<()> {
    let pkg = open(path).await?;
    let meta = pkg.metadata();

    println!("Package: {}", path);
    println!("Manifest version: {}", meta.format_version);
    if let Some(v) = &meta.version {
        println!("Metadata version: {}", v);
    }
    if let Some(unit) = &meta.distance_unit {
        println!("Distance unit: {}", unit);
    }
    if let Some(b) = &meta.world_bounds {
        println!("World bounds: {:?} .. {:?}", b.min.to_array(), b.max.to_array());
    }
    if let Some(up) = meta.world_up {
        println!("Up vector: {:?}", up.to_array());
    }
    if let Some(off) = meta.global_offset {
        println!("Global offset: {:?}", off.to_array());
    }
    println!();

    println!("Assets ({}):", pkg.catalog().len());
    for asset in pkg.catalog() {
        println!("  {:<40} {:<24} {:>10}", asset.uri, asset.asset_type.role(), asset.size);
    }
    println!();
    println!("Mesh packs: {}", pkg.mesh_pack_count());
    println!("Images:     {}", pkg.list_image_uris().len());
    Ok(())
}

async fn cmd_fragments(path: &str, limit: Option<usize>) -> Result<()> {
    let pkg = open(path).await?;
    let seq = pkg.enumerate_fragments().await?;
    let total = seq.declared_len();
    println!("Fragments: {}", total);

    for (i, fragment) in seq.take(limit.unwrap_or(usize::MAX)).enumerate() {
        let f = fragment?;
        let material = f.material_id.map(|m| m.to_string()).unwrap_or_else(|| "-".into());
        let translation = f.transform.as_ref().map(|t| t.translation().to_array()).unwrap_or_default();
        println!(
            "  [{}] geometry={} material={} db_id={} visible={} translation={:?}",
            i,
            f.geometry_id,
            material,
            f.db_id,
            f.visible(),
            translation
        );
    }
    Ok(())
}

async fn cmd_geometries(path: &str, limit: Option<usize>) -> Result<()> {
    let pkg = open(path).await?;
    let seq = pkg.enumerate_geometries().await?;
    println!("Geometries: {}", seq.declared_len());

    for geometry in seq.take(limit.unwrap_or(usize::MAX)) {
        let g = geometry?;
        let kind = if g.is_lines() {
            "lines"
        } else if g.is_points() {
            "points"
        } else {
            "mesh"
        };
        println!(
            "  [{}] {} pack={} entity={} primitives={}",
            g.id,
            kind,
            g.pack_uri(),
            g.entity_id,
            g.primitive_count
        );
    }
    Ok(())
}

async fn cmd_packs(path: &str) -> Result<()> {
    let pkg = open(path).await?;
    let numbers = pkg.catalog().mesh_pack_numbers();
    println!("Mesh packs: {}", numbers.len());

    for n in numbers {
        let (mut meshes, mut lines, mut points, mut skipped) = (0, 0, 0, 0);
        let (mut verts, mut tris) = (0usize, 0usize);
        for entry in pkg.enumerate_mesh_pack(n).await? {
            match entry? {
                MeshPackEntry::Mesh(m) => {
                    meshes += 1;
                    verts += m.num_vertices();
                    tris += m.num_triangles();
                }
                MeshPackEntry::Lines(_) => lines += 1,
                MeshPackEntry::Points(_) => points += 1,
                MeshPackEntry::Unrecognized { .. } => skipped += 1,
            }
        }
        println!(
            "  {}.pf: {} meshes ({} vertices, {} triangles), {} lines, {} points, {} unrecognized",
            n, meshes, verts, tris, lines, points, skipped
        );
    }
    Ok(())
}

async fn cmd_materials(path: &str) -> Result<()> {
    let pkg = open(path).await?;
    let materials = pkg.list_materials().await?;
    println!("Materials: {}", materials.len());

    for (i, entry) in materials.iter().enumerate() {
        match entry {
            MaterialEntry::Material(m) => {
                println!(
                    "  [{}] diffuse={:?} opacity={} glossiness={}{}",
                    i,
                    m.diffuse.to_array(),
                    m.opacity,
                    m.glossiness,
                    if m.metal { " metal" } else { "" }
                );
                for (slot, map) in m.maps.iter() {
                    println!("      {} map: {} ({} x {})", slot, map.uri, map.u_scale, map.v_scale);
                }
            }
            MaterialEntry::Unrecognized { definition } => {
                println!("  [{}] unrecognized ({})", i, definition);
            }
        }
    }
    Ok(())
}

async fn cmd_props(path: &str, id: ObjectId) -> Result<()> {
    let pkg = open(path).await?;
    let db = pkg.open_property_database().await?;
    println!("Object {} ({})", id, db.external_id(id)?);

    for (category, props) in db.properties_by_category(id)? {
        println!("  {}", if category.is_empty() { "(no category)" } else { &category });
        for (name, value) in props {
            println!("    {}: {}", name, value);
        }
    }
    Ok(())
}

async fn cmd_find(path: &str, attr: &str, value: &str) -> Result<()> {
    let pkg = open(path).await?;
    let db = pkg.open_property_database().await?;

    // Compare textually so numbers and booleans match their printed form.
    let hits = db.find(attr, |v| match v {
        Value::String(s) => s == value,
        other => other.to_string() == value,
    });
    println!("{} objects with {} = {}", hits.len(), attr, value);
    for id in hits {
        println!("  {} ({})", id, db.external_id(id)?);
    }
    Ok(())
}
