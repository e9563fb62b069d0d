use anyhow::*;
use fs_extra::{copy_items, dir::CopyOptions};
use std::{env, path::PathBuf};

// Native builds read the screen poster from OUT_DIR/assets, so the binary
// finds it no matter which directory it is started from.
fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=assets");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let assets = manifest_dir.join("assets");
    if !assets.exists() {
        println!("cargo:warning=no assets directory, the native screen stays black");
        return Ok(());
    }

    let out_dir = env::var("OUT_DIR")?;
    let options = CopyOptions {
        overwrite: true,
        ..CopyOptions::new()
    };
    copy_items(&[assets], out_dir, &options)?;
    Ok(())
}
