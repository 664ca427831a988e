use std::env;
use std::fs;
use std::path::Path;

// Exposes KEY=VALUE pairs from .env to option_env! in src/config.rs.
// Values already present in the build environment win.
fn main() {
    let env_file = Path::new(".env");

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.env");

    let contents = match fs::read_to_string(env_file) {
        Ok(contents) => contents,
        Err(_) => {
            println!("cargo:warning=No .env file found, using built-in client defaults (see src/config.rs)");
            return;
        }
    };

    for (key, value) in contents.lines().filter_map(parse_line) {
        if env::var(key).is_err() {
            println!("cargo:rustc-env={}={}", key, value);
        }
    }
}

fn parse_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (key, value) = line.split_once('=')?;
    let value = value.trim().trim_matches('"');
    Some((key.trim(), value))
}
