use std::{env, path::PathBuf};

fn main() {
    let out_dir = PathBuf::from(env::var_os("OUT_DIR").expect("OUT_DIR not set"));

    compressembed::Config::new("blobs/file.txt", "FILE_TXT")
        .package("blobs")
        .output(out_dir.join("file.dat"))
        .source(out_dir.join("blobs.rs"))
        .rerun_if_changed(true)
        .run()
        .expect("Failed to embed blobs");
}
