mod support;

use reelcut::CfrCache;
use support::{FakeToolchain, touch, vfr_video};

#[test]
fn same_source_is_transcoded_once_per_run() {
    let media = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let src = media.path().join("clip.mp4");
    touch(&src);
    let tools = FakeToolchain::new();
    tools.register(&src, vfr_video(640, 480, 10.0));

    let mut cfr = CfrCache::new(work.path().join("cfr"));
    let first = cfr.normalize(&tools, &src, 29).unwrap();
    let second = cfr.normalize(&tools, &src, 29).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, work.path().join("cfr").join("clip.mp4_cfr_29fps.mp4"));
    assert_eq!(tools.transcode_count(), 1);
    assert_eq!(cfr.temp_files(), [first.clone()]);
    assert_eq!(cfr.len(), 1);
    assert!(first.exists());
}

#[test]
fn existing_conversion_on_disk_is_reused_but_not_owned() {
    let media = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let src = media.path().join("clip.mp4");
    touch(&src);
    let tools = FakeToolchain::new();

    let mut cfr = CfrCache::new(work.path().join("cfr"));
    let dst = cfr.cache_path(&src, 25);
    std::fs::create_dir_all(dst.parent().unwrap()).unwrap();
    std::fs::write(&dst, b"from an earlier session").unwrap();

    let got = cfr.normalize(&tools, &src, 25).unwrap();
    assert_eq!(got, dst);
    assert_eq!(tools.transcode_count(), 0);
    assert!(cfr.temp_files().is_empty());

    assert_eq!(cfr.purge(), 0);
    assert!(dst.exists());
}

#[test]
fn failed_transcode_propagates_and_leaves_nothing_behind() {
    let media = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let src = media.path().join("clip.mp4");
    touch(&src);
    let tools = FakeToolchain::new();
    tools.fail_transcode.set(true);

    let mut cfr = CfrCache::new(work.path().join("cfr"));
    let err = cfr.normalize(&tools, &src, 29).unwrap_err();

    assert!(err.to_string().starts_with("transcode error:"));
    assert!(cfr.is_empty());
    assert!(cfr.temp_files().is_empty());
    assert!(!cfr.cache_path(&src, 29).exists());
}

#[test]
fn zero_fps_is_rejected_without_transcoding() {
    let tools = FakeToolchain::new();
    let mut cfr = CfrCache::new("unused");
    let err = cfr
        .normalize(&tools, std::path::Path::new("clip.mp4"), 0)
        .unwrap_err();
    assert!(err.to_string().starts_with("validation error:"));
    assert_eq!(tools.transcode_count(), 0);
}

#[test]
fn purge_removes_files_and_tolerates_ones_already_gone() {
    let media = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let tools = FakeToolchain::new();
    let a = media.path().join("a.mp4");
    let b = media.path().join("b.mov");
    touch(&a);
    touch(&b);

    let mut cfr = CfrCache::new(work.path().join("cfr"));
    let a_out = cfr.normalize(&tools, &a, 30).unwrap();
    let b_out = cfr.normalize(&tools, &b, 24).unwrap();
    std::fs::remove_file(&b_out).unwrap();

    assert_eq!(cfr.purge(), 1);
    assert!(!a_out.exists());
    assert!(cfr.temp_files().is_empty());
    assert!(cfr.is_empty());

    // After a purge the cache forgets earlier answers.
    cfr.normalize(&tools, &a, 30).unwrap();
    assert_eq!(tools.transcode_count(), 3);
}
