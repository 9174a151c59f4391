use super::*;

#[test]
fn create_clears_previous_leftovers() {
    let out = tempfile::tempdir().unwrap();
    let stale = out.path().join(MediaWorkspace::DIR_NAME).join("old.mp4");
    std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
    std::fs::write(&stale, b"x").unwrap();

    let ws = MediaWorkspace::create(out.path()).unwrap();
    assert!(ws.root().is_dir());
    assert!(!stale.exists());
}

#[test]
fn job_dirs_are_isolated_and_fresh() {
    let out = tempfile::tempdir().unwrap();
    let ws = MediaWorkspace::create(out.path()).unwrap();
    let a = ws.job_dir("a__Scene").unwrap();
    std::fs::write(a.join("partial.mp4"), b"x").unwrap();
    let b = ws.job_dir("b__Scene").unwrap();
    assert_ne!(a, b);

    let again = ws.job_dir("a__Scene").unwrap();
    assert!(!again.join("partial.mp4").exists());
}

#[test]
fn finish_removes_on_success_and_keeps_on_failure() {
    let out = tempfile::tempdir().unwrap();
    let ws = MediaWorkspace::create(out.path()).unwrap();
    let root = ws.root().to_path_buf();
    ws.finish(true);
    assert!(root.is_dir());

    let ws = MediaWorkspace::create(out.path()).unwrap();
    ws.finish(false);
    assert!(!root.exists());
}
