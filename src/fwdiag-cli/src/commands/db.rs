//! Descriptor database command handlers.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use fwdiag::{pack, DescriptorDatabase};

#[derive(Serialize)]
struct DbStats {
    version: i32,
    entries: usize,
    capacity: usize,
}

pub fn info(db_path: &Path, json: bool) -> Result<()> {
    let db = load(db_path)?;
    let stats = DbStats {
        version: db.file_version(),
        entries: db.len(),
        capacity: db.capacity(),
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("version:  {}", stats.version);
        println!("entries:  {}", stats.entries);
        println!("capacity: {}", stats.capacity);
    }
    Ok(())
}

pub fn lookup(db_path: &Path, id: u32) -> Result<()> {
    let db = load(db_path)?;
    match db.lookup(id) {
        Some(entry) => {
            println!("id:     {}", entry.id);
            println!("format: {}", entry.format);
            println!(
                "pack:   {}",
                if entry.pack.is_empty() {
                    "(literal, no arguments)"
                } else {
                    entry.pack.as_str()
                }
            );
            Ok(())
        }
        None => bail!("id {id} not found in {}", db_path.display()),
    }
}

pub fn expand(raw_pack: &str) {
    println!("{}", pack::expand(raw_pack, 128));
}

fn load(db_path: &Path) -> Result<DescriptorDatabase> {
    DescriptorDatabase::from_path(db_path)
        .with_context(|| format!("failed to load descriptor file {}", db_path.display()))
}
