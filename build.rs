use std::env;
use std::fs;
use std::path::Path;

// Pasa las variables de `.env` a option_env!() (ver config.rs).
// Las variables ya definidas en el entorno tienen prioridad.
fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.env");

    let env_file = Path::new(".env");
    let contents = match fs::read_to_string(env_file) {
        Ok(contents) => contents,
        Err(_) => {
            println!("cargo:warning=Sin archivo .env, se usan los valores por defecto de AppConfig");
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
