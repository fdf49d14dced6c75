fn main() {
    if let Err(err) = perch::cli::main() {
        eprintln!("❌ {err}");
        std::process::exit(1);
    }
}
