use farm_cli::output::print_error;

fn main() {
    if let Err(e) = farm_cli::run() {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
