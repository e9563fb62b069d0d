/**
 * Geometry generation and loading of local files.
 *
 * The viewer has no model files: every part is generated from its catalog
 * shape. The only file read from disk is the poster frame the native build
 * shows on its screen; the build script copies `assets/` into `OUT_DIR`.
 */
pub mod mesh;

#[cfg(not(target_arch = "wasm32"))]
pub fn asset_path(file_name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("OUT_DIR"))
        .join("assets")
        .join(file_name)
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    let path = asset_path(file_name);
    let data = tokio::fs::read(&path)
        .await
        .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
    Ok(data)
}
