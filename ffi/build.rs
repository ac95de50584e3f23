use std::path::{Path, PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=src");

    let crate_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap_or_default());
    let Some(out_dir) = std::env::var_os("OUT_DIR").map(PathBuf::from) else {
        println!("cargo:warning=C header not generated: OUT_DIR is not set");
        return;
    };

    // Header generation is best-effort; the library builds without it.
    if let Err(err) = generate_header(&crate_dir, &out_dir.join("authfetch.h")) {
        println!("cargo:warning=C header not generated: {err}");
    }
}

fn generate_header(crate_dir: &Path, out: &Path) -> Result<(), String> {
    let bindings = cbindgen::Builder::new()
        .with_crate(crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("AUTHFETCH_H")
        .with_documentation(true)
        .generate()
        .map_err(|e| e.to_string())?;

    if let Some(dir) = out.parent() {
        std::fs::create_dir_all(dir).map_err(|e| format!("{}: {e}", dir.display()))?;
    }
    // `write_to_file` reports whether the file changed, not whether it was
    // written, so check the result on disk.
    bindings.write_to_file(out);
    if !out.is_file() {
        return Err(format!("{} was not written", out.display()));
    }
    println!("cargo:rustc-env=AUTHFETCH_HEADER={}", out.display());
    Ok(())
}
