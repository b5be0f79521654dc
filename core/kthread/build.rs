use std::{env, fs, path::Path};

const DEFAULT_MAX_PRIORITIES: usize = 6;
const DEFAULT_MINIMAL_STACK_SIZE: u16 = 128;

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    println!("cargo:rerun-if-env-changed={key}");
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .unwrap_or_else(|_| panic!("{key}={value} is not a valid number")),
        Err(_) => default,
    }
}

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let config_rs_path = Path::new(&out_dir).join("config.rs");

    let max_priorities = env_or("KTHREAD_MAX_PRIORITIES", DEFAULT_MAX_PRIORITIES);
    // The priority scale is only defined for at least one level.
    assert!(max_priorities >= 1, "KTHREAD_MAX_PRIORITIES must be at least 1");
    let minimal_stack_size = env_or("KTHREAD_MINIMAL_STACK_SIZE", DEFAULT_MINIMAL_STACK_SIZE);

    let config = format!(
        "/// Number of priority levels provided by the scheduler.\n\
         pub const MAX_PRIORITIES: usize = {max_priorities};\n\
         /// Smallest stack depth (in words) a task should be created with.\n\
         pub const MINIMAL_STACK_SIZE: u16 = {minimal_stack_size};\n"
    );
    fs::write(&config_rs_path, config).expect("Failed to write config.rs to OUT_DIR");
}
