fn main() {
    if let Err(err) = orbit_lib::run() {
        eprintln!("orbit: {err:#}");
        std::process::exit(1);
    }
}
