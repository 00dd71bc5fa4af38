fn main() {
    if let Err(error) = jjdeck_cli::run() {
        eprintln!("Error: {error:#}");
        std::process::exit(1);
    }
}
