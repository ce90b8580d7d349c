fn main() {
    if let Err(err) = lead_segments::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
