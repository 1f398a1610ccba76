/// vectorcanvas build script.
///
/// Embeds every pre-built native rasterizer found under
/// `resources/native/{os}-{arch}/` into the crate.  The generated table maps
/// the resource path `/native/{os}-{arch}/{filename}` to the file's bytes and
/// is included by `loader::resource::EmbeddedResources`.
use std::{
    env, fs,
    path::{Path, PathBuf},
};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=VECTORCANVAS_RESOURCE_DIR");

    let manifest_dir = PathBuf::from(env::var_os("CARGO_MANIFEST_DIR").unwrap_or_default());
    let resource_dir = env::var_os("VECTORCANVAS_RESOURCE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| manifest_dir.join("resources").join("native"));
    println!("cargo:rerun-if-changed={}", resource_dir.display());

    let mut entries = Vec::new();
    collect(&resource_dir, &mut entries);
    entries.sort();

    let mut table = String::from("pub(crate) static EMBEDDED: &[(&str, &[u8])] = &[\n");
    for (resource_path, file) in &entries {
        println!("cargo:rerun-if-changed={}", file.display());
        table.push_str(&format!(
            "    ({resource_path:?}, include_bytes!({:?})),\n",
            file.display().to_string()
        ));
    }
    table.push_str("];\n");

    let out_dir = PathBuf::from(env::var_os("OUT_DIR").expect("OUT_DIR is set by cargo"));
    fs::write(out_dir.join("embedded_natives.rs"), table)
        .expect("failed to write embedded_natives.rs");
}

/// Collect `(resource_path, absolute_file)` pairs from the two-level
/// `{os}-{arch}/{filename}` layout.  A missing directory embeds nothing.
fn collect(root: &Path, entries: &mut Vec<(String, PathBuf)>) {
    let Ok(platforms) = fs::read_dir(root) else {
        return;
    };
    for platform in platforms.flatten() {
        let platform_path = platform.path();
        if !platform_path.is_dir() {
            continue;
        }
        let tag = platform.file_name().to_string_lossy().into_owned();
        let Ok(files) = fs::read_dir(&platform_path) else {
            continue;
        };
        for file in files.flatten() {
            let file_path = file.path();
            if !file_path.is_file() {
                continue;
            }
            let name = file.file_name().to_string_lossy().into_owned();
            let absolute = fs::canonicalize(&file_path).unwrap_or(file_path);
            entries.push((format!("/native/{tag}/{name}"), absolute));
        }
    }
}
