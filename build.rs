use std::process::Command;

fn git(args: &[&str]) -> Option<std::process::Output> {
    Command::new("git").args(args).output().ok()
}

fn main() {
    // Short commit hash
    let git_hash = git(&["rev-parse", "--short", "HEAD"])
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let is_release = git(&["describe", "--exact-match", "--tags", "HEAD"])
        .map(|o| o.status.success())
        .unwrap_or(false);

    // Development builds report the commit they were built from
    if is_release {
        println!("cargo:rustc-env=CHATMAP_VERSION_SUFFIX=");
    } else {
        println!("cargo:rustc-env=CHATMAP_VERSION_SUFFIX=-dev.{}", git_hash);
    }

    // Rebuild if git HEAD changes
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads");
}
