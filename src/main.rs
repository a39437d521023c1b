use gozelle::core::error::GozelleError;

fn main() {
    match gozelle::run() {
        Ok(()) => {}
        Err(GozelleError::NotFound(path)) => {
            eprintln!("not found: {}", path);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
