use std::process::Command;

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    Some(text.trim().to_owned()).filter(|t| !t.is_empty())
}

fn main() {
    println!("cargo:rerun-if-changed=src/render/templates");
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");

    if let Some(sha) = git(&["rev-parse", "--short", "HEAD"]) {
        println!("cargo:rustc-env=PAPERSHELF_GIT_SHA={sha}");
    }
    // Only an exact tag on HEAD names a release.
    if let Some(tag) = git(&["describe", "--tags", "--exact-match"]) {
        println!("cargo:rustc-env=PAPERSHELF_RELEASE_TAG={tag}");
    }
    if let Ok(epoch) = std::env::var("SOURCE_DATE_EPOCH") {
        println!("cargo:rustc-env=PAPERSHELF_BUILD_EPOCH={epoch}");
    }
}
