use std::fs;
use std::path::Path;

fn main() {
    let out_dir = Path::new("static");
    let embed_dir = out_dir.join("dist");
    let dist_dir = Path::new("../frontend/dist");

    if dist_dir.exists() {
        let _ = fs::remove_dir_all(out_dir);
        fs::create_dir_all(out_dir).expect("cannot create static directory");
        fs_extra::dir::copy(
            dist_dir,
            out_dir,
            &fs_extra::dir::CopyOptions::new().overwrite(true),
        )
        .expect("cannot copy frontend/dist");
    }
    // include_dir! needs the directory even before the frontend was built.
    fs::create_dir_all(&embed_dir).expect("cannot create static/dist");

    println!("cargo:rerun-if-changed=../frontend/dist");
}
