use std::{env, path::Path};

/// Build-time hints for locating FFmpeg. `ffmpeg-sys-next` does the actual
/// discovery; on Windows it needs `FFMPEG_DIR` or a vcpkg install, and its
/// own error when neither is present is hard to read.
fn main() {
    for variable in ["FFMPEG_DIR", "VCPKG_ROOT", "VCPKGRS_TRIPLET"] {
        println!("cargo:rerun-if-env-changed={variable}");
    }

    if env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("windows")
        || env::var_os("FFMPEG_DIR").is_some()
    {
        return;
    }

    let Some(vcpkg_root) = env::var_os("VCPKG_ROOT") else {
        println!(
            "cargo:warning=mediascope: neither FFMPEG_DIR nor VCPKG_ROOT is set; FFmpeg headers and libraries may not be found"
        );
        return;
    };

    let triplet = env::var("VCPKGRS_TRIPLET").unwrap_or_else(|_| "x64-windows".to_owned());
    let install = Path::new(&vcpkg_root).join("installed").join(triplet);
    if install.join("include").join("libavformat").is_dir() {
        println!(
            "cargo:warning=mediascope: using vcpkg FFmpeg under {}; set FFMPEG_DIR to pin it",
            install.display()
        );
    } else {
        println!(
            "cargo:warning=mediascope: no FFmpeg install under {} (run `vcpkg install ffmpeg`)",
            install.display()
        );
    }
}
