//! Bundles the compiled yew client (`frontend/dist`, produced by `trunk build`)
//! into `static/dist`, which the server embeds with `include_dir!`.

use fs_extra::dir::CopyOptions;
use std::fs;
use std::path::Path;

const FALLBACK_PAGE: &str = "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>mailforge</title></head>\
<body><p>The web client has not been built. Run <code>trunk build --release</code> in <code>frontend/</code> and rebuild the server.</p></body></html>";

fn main() {
    let out_dir = Path::new("static");
    let dist_dir = Path::new("../frontend/dist");
    let embedded = out_dir.join("dist");

    if dist_dir.exists() {
        let _ = fs::remove_dir_all(out_dir);
        fs::create_dir_all(out_dir).expect("failed to create static/");
        fs_extra::dir::copy(
            dist_dir,
            out_dir,
            &CopyOptions::new().overwrite(true).copy_inside(true),
        )
        .expect("failed to copy frontend/dist");
    } else if !embedded.join("index.html").exists() {
        fs::create_dir_all(&embedded).expect("failed to create static/dist");
        fs::write(embedded.join("index.html"), FALLBACK_PAGE)
            .expect("failed to write placeholder index.html");
    }
    println!("cargo:rerun-if-changed=../frontend/dist");
}
