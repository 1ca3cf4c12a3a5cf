use std::path::PathBuf;

fn reelcut_exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_reelcut")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "reelcut.exe"
            } else {
                "reelcut"
            });
            p
        })
}

#[test]
fn cli_init_writes_timeline_template() {
    let dir = tempfile::tempdir().unwrap();
    let media = dir.path().join("media");
    std::fs::create_dir_all(&media).unwrap();
    for name in ["b.mp4", "a.jpg", "notes.txt"] {
        std::fs::write(media.join(name), b"").unwrap();
    }
    let out = dir.path().join("timeline.json");

    let status = std::process::Command::new(reelcut_exe())
        .arg("init")
        .arg("--folder")
        .arg(&media)
        .arg("--out")
        .arg(&out)
        .status()
        .unwrap();
    assert!(status.success());

    let timeline = reelcut::load_timeline(&out).unwrap();
    let keys: Vec<&str> = timeline.keys().map(String::as_str).collect();
    assert_eq!(keys, ["a.jpg", "b.mp4"]);
    assert_eq!(timeline["a.jpg"].kind, "photo");
    assert_eq!(timeline["b.mp4"].end, 10.0);
}

#[test]
fn cli_render_rejects_a_missing_config() {
    let dir = tempfile::tempdir().unwrap();
    let status = std::process::Command::new(reelcut_exe())
        .arg("render")
        .arg("--config")
        .arg(dir.path().join("absent.json"))
        .arg("--media-dir")
        .arg(dir.path())
        .status()
        .unwrap();
    assert!(!status.success());
}
