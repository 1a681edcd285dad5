// src/main.rs

fn main() {
    match sypmix::run(std::env::args_os()) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("sypmix error: {err:?}");
            std::process::exit(1);
        }
    }
}
