fn main() {
    env_logger::init();
    if let Err(e) = scorecard_lib::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
