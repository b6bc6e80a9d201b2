use std::fs;
use std::io;
use std::path::Path;

fn main() -> io::Result<()> {
    let out_dir = Path::new("static");
    let dist_dir = Path::new("../frontend/dist");

    if dist_dir.exists() {
        let _ = fs::remove_dir_all(out_dir);
        fs::create_dir_all(out_dir)?;
        fs_extra::dir::copy(
            dist_dir,
            out_dir,
            &fs_extra::dir::CopyOptions::new().overwrite(true).copy_inside(true),
        )
        .map_err(|err| io::Error::other(err.to_string()))?;
    } else {
        // The client bundle is optional; the server still builds and proxies.
        fs::create_dir_all(out_dir.join("dist"))?;
    }
    println!("cargo:rerun-if-changed=../frontend/dist");
    Ok(())
}
